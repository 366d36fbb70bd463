//! Stored file metadata.

use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

use super::kind::{self, FileIcon};

/// Metadata for a file in the remote storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    /// Server-assigned storage ID (`<folder><uuid>_<original name>`).
    pub id: String,
    /// Original filename (display name).
    pub file_name: String,
    /// Folder path, `None` for files in the root.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub folder: Option<String>,
    /// Public URL, when the server exposes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// File size in bytes.
    pub size: u64,
    /// When the file was uploaded (server local time).
    pub uploaded_at: NaiveDateTime,
}

impl StoredFile {
    /// Name to show and to save downloads under.
    ///
    /// Prefers the server-supplied file name and falls back to the
    /// storage ID convention.
    pub fn display_name(&self) -> String {
        if self.file_name.trim().is_empty() {
            display_name_from_id(&self.id)
        } else {
            sanitize_file_name(&self.file_name)
        }
    }

    /// Human-readable size.
    pub fn formatted_size(&self) -> String {
        format_file_size(self.size)
    }

    /// Icon for this file's extension.
    pub fn icon(&self) -> FileIcon {
        kind::icon_for(&self.file_name)
    }

    /// Whether this file can be opened in the preview overlay.
    pub fn can_preview(&self) -> bool {
        kind::can_preview(&self.file_name)
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

/// Reconstruct the original file name from a storage ID.
///
/// The server prefixes stored objects with a unique token followed by `_`
/// (`docs/5f0c..._report.pdf`). Everything up to and including the first
/// `_` of the last path segment is stripped. IDs without `_` are returned
/// as-is. The result is always a bare file name.
pub fn display_name_from_id(id: &str) -> String {
    let last = id.rsplit('/').next().unwrap_or(id);
    let name = match last.split_once('_') {
        Some((_, rest)) if !rest.is_empty() => rest,
        _ => last,
    };

    sanitize_file_name(name)
}

fn sanitize_file_name(name: &str) -> String {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or("download")
        .to_string()
}

const SIZE_UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// Format a byte count for display.
///
/// Sizes below 1 KB are shown exactly, larger sizes with two decimals in
/// binary units up to TB.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut scale: u64 = 1;
    while unit < SIZE_UNITS.len() - 1 && bytes >= scale * 1024 {
        scale *= 1024;
        unit += 1;
    }

    if unit == 0 {
        format!("{bytes} Bytes")
    } else {
        format!("{:.2} {}", bytes as f64 / scale as f64, SIZE_UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn magnitude(formatted: &str) -> f64 {
        let (value, unit) = formatted.split_once(' ').unwrap();
        let exp = SIZE_UNITS.iter().position(|u| *u == unit).unwrap();
        value.parse::<f64>().unwrap() * 1024f64.powi(exp as i32)
    }

    #[test]
    fn test_format_zero() {
        assert_eq!(format_file_size(0), "0 Bytes");
    }

    #[test]
    fn test_format_bytes_exact() {
        assert_eq!(format_file_size(1), "1 Bytes");
        assert_eq!(format_file_size(1023), "1023 Bytes");
    }

    #[test]
    fn test_format_units() {
        assert_eq!(format_file_size(1024), "1.00 KB");
        assert_eq!(format_file_size(1536), "1.50 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.00 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3.00 GB");
        assert_eq!(format_file_size(2 * 1024u64.pow(4)), "2.00 TB");
    }

    #[test]
    fn test_format_caps_at_terabytes() {
        assert_eq!(format_file_size(2048 * 1024u64.pow(4)), "2048.00 TB");
        assert!(format_file_size(u64::MAX).ends_with(" TB"));
    }

    #[test]
    fn test_format_monotonic() {
        let mut sizes: Vec<u64> = Vec::new();
        for exp in 0..5u32 {
            let base = 1024u64.pow(exp);
            for delta in [0, 1, 2, 5, 10, 100] {
                sizes.push((base * 1024).saturating_sub(delta));
                sizes.push(base * 1024 + delta);
                sizes.push(base + delta);
            }
            sizes.push(base * 512);
            sizes.push(base * 1000);
        }
        sizes.sort_unstable();

        let mut previous = 0.0;
        for size in sizes {
            let current = magnitude(&format_file_size(size));
            assert!(
                current >= previous,
                "format_file_size({size}) went down: {current} < {previous}"
            );
            previous = current;
        }
    }

    #[test]
    fn test_display_name_from_id() {
        assert_eq!(
            display_name_from_id("5f0c9a0e-1111-2222-3333-444455556666_report.pdf"),
            "report.pdf"
        );
        assert_eq!(display_name_from_id("abc_my_notes.txt"), "my_notes.txt");
        assert_eq!(display_name_from_id("docs/abc_report.pdf"), "report.pdf");
        assert_eq!(display_name_from_id("my_docs/abc_report.pdf"), "report.pdf");
        assert_eq!(display_name_from_id("plain.txt"), "plain.txt");
        assert_eq!(display_name_from_id("trailing_"), "trailing_");
    }

    #[test]
    fn test_display_name_never_escapes() {
        assert_eq!(display_name_from_id("x_.."), "download");
        assert_eq!(display_name_from_id(""), "download");
    }

    #[test]
    fn test_stored_file_deserialize_root_folder() {
        let json = r#"{
            "id": "abc_notes.txt",
            "fileName": "notes.txt",
            "folder": "",
            "url": "https://cdn.example.com/abc_notes.txt",
            "size": 12,
            "uploadedAt": "2024-05-01T10:20:30"
        }"#;

        let file: StoredFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.folder, None);
        assert_eq!(file.url.as_deref(), Some("https://cdn.example.com/abc_notes.txt"));
        assert_eq!(file.formatted_size(), "12 Bytes");
        assert_eq!(file.display_name(), "notes.txt");
        assert!(file.can_preview());
    }

    #[test]
    fn test_stored_file_deserialize_missing_optional_fields() {
        let json = r#"{
            "id": "docs/abc_report.pdf",
            "fileName": "",
            "folder": "docs/",
            "size": 2048,
            "uploadedAt": "2024-05-01T10:20:30.5"
        }"#;

        let file: StoredFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.folder.as_deref(), Some("docs/"));
        assert_eq!(file.url, None);
        assert_eq!(file.display_name(), "report.pdf");
    }
}
