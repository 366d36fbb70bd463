//! Error types for ArchDrive.

use thiserror::Error;

/// Common error type for ArchDrive.
#[derive(Error, Debug)]
pub enum DriveError {
    /// The request never reached the server or no response came back.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status.
    #[error("request failed with status {status}: {message}")]
    Request {
        /// HTTP status code.
        status: u16,
        /// Response body or status reason.
        message: String,
    },

    /// Validation error for user input, raised before any request is sent.
    #[error("validation error: {0}")]
    Validation(String),

    /// The server answered 2xx but the body could not be understood.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Locale catalog error.
    #[error("locale error: {0}")]
    Locale(#[from] crate::i18n::I18nError),
}

impl DriveError {
    /// Locale key of the inline message shown for this error.
    pub fn message_key(&self) -> &'static str {
        match self {
            DriveError::Network(_) => "error.network",
            DriveError::Request { status: 404, .. } => "error.not_found",
            DriveError::Request { .. } => "error.request",
            DriveError::Validation(_) => "error.validation",
            DriveError::InvalidResponse(_) => "error.invalid_response",
            DriveError::Io(_) => "error.io",
            DriveError::Config(_) | DriveError::Locale(_) => "error.internal",
        }
    }

    /// Whether this is a client-side validation failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, DriveError::Validation(_))
    }
}

impl From<reqwest::Error> for DriveError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            DriveError::Request {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("unknown status")
                    .to_string(),
            }
        } else if e.is_decode() {
            DriveError::InvalidResponse(e.to_string())
        } else {
            DriveError::Network(e.to_string())
        }
    }
}

/// Result type alias for ArchDrive operations.
pub type Result<T> = std::result::Result<T, DriveError>;
