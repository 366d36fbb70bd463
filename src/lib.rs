//! ArchDrive - private file storage client
//!
//! Browses, uploads, previews and downloads files kept behind the ArchDrive
//! storage API, from a line-oriented terminal.

pub mod client;
pub mod config;
pub mod error;
pub mod file;
pub mod i18n;
pub mod logging;
pub mod screen;
pub mod view;

pub use client::{Blob, FilePreview, ObjectUrl, ObjectUrls, StorageClient};
pub use config::Config;
pub use error::{DriveError, Result};
pub use file::{Crumb, FileIcon, Folder, PreviewKind, StoredFile};
pub use i18n::I18n;
pub use screen::{BrowserScreen, ScreenResult, Terminal};
pub use view::{Action, ActionState, Browser, Listing, LoadState, PreviewState};
