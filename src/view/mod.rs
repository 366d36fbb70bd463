//! Browsing/upload view for ArchDrive.
//!
//! Holds the per-session state and drives the storage client. Every
//! asynchronous concern is a tagged state instead of a set of flags, and
//! listing loads carry a generation so late responses cannot overwrite
//! newer ones.

mod browser;
mod state;

pub use browser::{fetch_listing, Browser, LoadTicket};
pub use state::{Action, ActionState, Listing, LoadState, OpenPreview, PreviewState};
