//! Storage client for ArchDrive.
//!
//! A typed wrapper over the remote file-storage REST API:
//! - Uploads (multipart), listings and folder management
//! - Downloads saved under the original file name
//! - Previews registered as object URLs that the caller releases

mod object_url;
mod preview;
mod storage;

pub use object_url::{Blob, ObjectUrl, ObjectUrls, OBJECT_URL_PREFIX};
pub use preview::FilePreview;
pub use storage::{StorageClient, API_PREFIX};
