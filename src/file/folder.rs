//! Folder record and folder path arithmetic.
//!
//! Folders are identified by slash-terminated paths such as `"docs/2024/"`.
//! The root has no path and is represented as `None`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::MAX_FOLDER_NAME_LENGTH;
use crate::{DriveError, Result};

/// A folder in the remote storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    /// Server-assigned folder ID.
    pub id: String,
    /// Immediate folder name (last path segment).
    pub name: String,
    /// Full slash-terminated path.
    pub path: String,
    /// When the folder was created (server local time).
    pub created_at: NaiveDateTime,
    /// Number of files directly in this folder, maintained by the server.
    #[serde(default)]
    pub file_count: u64,
}

impl Folder {
    /// Parent folder path, `None` for a top-level folder.
    pub fn parent(&self) -> Option<String> {
        parent_path(&self.path)
    }
}

/// Normalize a user-supplied folder filter.
///
/// Blank input and `"/"` mean the root (`None`). Otherwise leading slashes
/// are removed and a trailing slash is ensured.
pub fn normalize_folder(folder: &str) -> Option<String> {
    let trimmed = folder.trim().trim_start_matches('/');
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.ends_with('/') {
        Some(trimmed.to_string())
    } else {
        Some(format!("{trimmed}/"))
    }
}

/// Parent of a folder path; single-segment paths have the root as parent.
pub fn parent_path(path: &str) -> Option<String> {
    let trimmed = path.strip_suffix('/').unwrap_or(path);

    match trimmed.rsplit_once('/') {
        Some((parent, _)) if !parent.is_empty() => Some(format!("{parent}/")),
        _ => None,
    }
}

/// Path of folder `name` created under `parent`.
pub fn child_path(parent: Option<&str>, name: &str) -> String {
    match parent.map(|p| p.trim_end_matches('/')).filter(|p| !p.is_empty()) {
        Some(parent) => format!("{parent}/{name}/"),
        None => format!("{name}/"),
    }
}

/// Last segment of a folder path (`"docs/2024/"` -> `"2024"`).
pub fn folder_name_of(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// Whether `path` is `ancestor` itself or lies below it.
pub fn is_within(path: &str, ancestor: &str) -> bool {
    match normalize_folder(ancestor) {
        Some(ancestor) => path.starts_with(&ancestor),
        None => true,
    }
}

/// Validate a folder name before it is sent to the server.
///
/// Returns the trimmed name.
pub fn validate_folder_name(name: &str) -> Result<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(DriveError::Validation("folder name is empty".to_string()));
    }
    if name.chars().count() > MAX_FOLDER_NAME_LENGTH {
        return Err(DriveError::Validation(format!(
            "folder name is longer than {MAX_FOLDER_NAME_LENGTH} characters"
        )));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(DriveError::Validation(
            "folder name must not contain slashes".to_string(),
        ));
    }
    if name == "." || name == ".." {
        return Err(DriveError::Validation(format!(
            "'{name}' is not a valid folder name"
        )));
    }

    Ok(name.to_string())
}

/// One element of the breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Crumb {
    /// The storage root.
    Root {
        /// Whether the root is the folder being viewed.
        current: bool,
    },
    /// A folder on the way to the current one.
    Folder {
        /// Segment name.
        name: String,
        /// Full path up to and including this segment.
        path: String,
        /// Whether this is the folder being viewed.
        current: bool,
    },
}

impl Crumb {
    /// Navigation target: `None` for the root.
    pub fn target(&self) -> Option<&str> {
        match self {
            Crumb::Root { .. } => None,
            Crumb::Folder { path, .. } => Some(path),
        }
    }

    /// Whether this crumb is the folder being viewed.
    pub fn is_current(&self) -> bool {
        match self {
            Crumb::Root { current } | Crumb::Folder { current, .. } => *current,
        }
    }

    /// Only ancestors are links; the current folder is plain text.
    pub fn is_clickable(&self) -> bool {
        !self.is_current()
    }
}

/// Breadcrumb trail for the current folder: root first, current folder last.
pub fn breadcrumbs(current: Option<&str>) -> Vec<Crumb> {
    let segments: Vec<&str> = current
        .map(|p| p.split('/').filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    let mut crumbs = Vec::with_capacity(segments.len() + 1);
    crumbs.push(Crumb::Root {
        current: segments.is_empty(),
    });

    let mut path = String::new();
    for (i, segment) in segments.iter().enumerate() {
        path.push_str(segment);
        path.push('/');
        crumbs.push(Crumb::Folder {
            name: (*segment).to_string(),
            path: path.clone(),
            current: i + 1 == segments.len(),
        });
    }

    crumbs
}
