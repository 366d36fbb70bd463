//! Tagged session states of the browser view.

use crate::client::FilePreview;
use crate::file::{Folder, StoredFile};
use crate::DriveError;

/// Contents of one folder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    /// Child folders.
    pub folders: Vec<Folder>,
    /// Files directly in the folder.
    pub files: Vec<StoredFile>,
}

impl Listing {
    /// Whether the folder has neither files nor subfolders.
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.files.is_empty()
    }
}

/// State of the folder listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A load with this generation is in flight.
    Loading { generation: u64 },
    /// The latest load succeeded.
    Loaded(Listing),
    /// The latest load failed; `message` is a locale key.
    Errored { message: &'static str },
}

impl LoadState {
    /// Whether a load is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading { .. })
    }

    /// The loaded listing, if any.
    pub fn listing(&self) -> Option<&Listing> {
        match self {
            LoadState::Loaded(listing) => Some(listing),
            _ => None,
        }
    }
}

/// A user action that talks to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Upload,
    CreateFolder,
    DeleteFile(String),
    DeleteFolder(String),
    Download(String),
    Preview(String),
}

impl Action {
    /// Locale key of the inline message shown when this action fails.
    pub fn failure_key(&self, error: &DriveError) -> &'static str {
        match (self, error) {
            (Action::Upload, DriveError::Validation(_)) => "upload.no_file",
            (Action::CreateFolder, DriveError::Validation(_)) => "folder.invalid_name",
            (Action::Upload, _) => "upload.failed",
            (Action::CreateFolder, _) => "folder.create_failed",
            (Action::DeleteFile(_), _) => "file.delete_failed",
            (Action::DeleteFolder(_), _) => "folder.delete_failed",
            (Action::Download(_), _) => "file.download_failed",
            (Action::Preview(_), _) => "preview.failed",
        }
    }
}

/// State of the most recent mutating or fetching action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ActionState {
    #[default]
    Idle,
    Pending(Action),
    /// The action failed; `message` is a locale key.
    Failed {
        action: Action,
        message: &'static str,
    },
}

impl ActionState {
    /// Locale key of the current error message, if any.
    pub fn error_key(&self) -> Option<&'static str> {
        match self {
            ActionState::Failed { message, .. } => Some(*message),
            _ => None,
        }
    }
}

/// An open preview overlay.
#[derive(Debug, Clone)]
pub struct OpenPreview {
    /// The file being previewed.
    pub file: StoredFile,
    /// Fetched content; its object URL is released when the overlay closes.
    pub preview: FilePreview,
}

/// State of the preview overlay.
#[derive(Debug, Clone, Default)]
pub enum PreviewState {
    #[default]
    Closed,
    Open(OpenPreview),
    /// The preview could not be fetched.
    Unavailable { file_name: String },
}

impl PreviewState {
    /// Whether the overlay is showing.
    pub fn is_open(&self) -> bool {
        !matches!(self, PreviewState::Closed)
    }
}
