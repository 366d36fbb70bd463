//! File and folder domain model for ArchDrive.
//!
//! This module provides:
//! - `StoredFile` and `Folder` records as returned by the storage API
//! - Slash-terminated folder path arithmetic and breadcrumbs
//! - Human-readable file sizes
//! - The extension table used for icons and previewability

mod folder;
mod kind;
mod metadata;

pub use folder::{
    breadcrumbs, child_path, folder_name_of, is_within, normalize_folder, parent_path,
    validate_folder_name, Crumb, Folder,
};
pub use kind::{
    can_preview, extension_of, icon_for, is_text_content_type, preview_kind_for_content_type,
    FileIcon, PreviewKind,
};
pub use metadata::{display_name_from_id, format_file_size, StoredFile};

/// Maximum length for a folder name (in characters).
pub const MAX_FOLDER_NAME_LENGTH: usize = 50;
