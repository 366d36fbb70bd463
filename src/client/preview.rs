//! Preview payloads.

use super::object_url::ObjectUrl;
use crate::file::{self, PreviewKind};

/// A fetched preview, backed by a registered object URL.
#[derive(Debug, Clone)]
pub struct FilePreview {
    /// Handle to the previewed bytes; must be revoked when the preview closes.
    pub object_url: ObjectUrl,
    /// Content type reported by the server.
    pub content_type: String,
    /// Size of the previewed content in bytes.
    pub size: usize,
    /// Decoded text, only for text-like content types.
    pub text_content: Option<String>,
}

impl FilePreview {
    /// How the content should be rendered.
    pub fn kind(&self) -> PreviewKind {
        file::preview_kind_for_content_type(&self.content_type)
    }
}
