//! File type classification.
//!
//! A single extension table drives both the icon shown for a file and
//! whether the file may be previewed, so the two cannot disagree.

/// How a file's content is shown in the preview overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewKind {
    Image,
    Video,
    Audio,
    Pdf,
    Text,
    Unsupported,
}

/// Icon shown next to a file in the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileIcon {
    Pdf,
    Document,
    Spreadsheet,
    Presentation,
    Text,
    Image,
    Video,
    Audio,
    Archive,
    Generic,
}

impl FileIcon {
    /// Fixed-width tag used by the terminal listing.
    pub fn tag(&self) -> &'static str {
        match self {
            FileIcon::Pdf => "[PDF]",
            FileIcon::Document => "[DOC]",
            FileIcon::Spreadsheet => "[XLS]",
            FileIcon::Presentation => "[PPT]",
            FileIcon::Text => "[TXT]",
            FileIcon::Image => "[IMG]",
            FileIcon::Video => "[VID]",
            FileIcon::Audio => "[AUD]",
            FileIcon::Archive => "[ZIP]",
            FileIcon::Generic => "[   ]",
        }
    }
}

struct FileType {
    icon: FileIcon,
    preview: Option<PreviewKind>,
}

const fn previewable(icon: FileIcon, kind: PreviewKind) -> FileType {
    FileType {
        icon,
        preview: Some(kind),
    }
}

const fn plain(icon: FileIcon) -> FileType {
    FileType {
        icon,
        preview: None,
    }
}

const IMAGE: FileType = previewable(FileIcon::Image, PreviewKind::Image);
const TEXT: FileType = previewable(FileIcon::Text, PreviewKind::Text);
const VIDEO: FileType = previewable(FileIcon::Video, PreviewKind::Video);
const AUDIO: FileType = previewable(FileIcon::Audio, PreviewKind::Audio);

static FILE_TYPES: &[(&str, FileType)] = &[
    ("jpg", IMAGE),
    ("jpeg", IMAGE),
    ("png", IMAGE),
    ("gif", IMAGE),
    ("webp", IMAGE),
    ("svg", IMAGE),
    ("bmp", IMAGE),
    ("ico", IMAGE),
    ("txt", TEXT),
    ("md", TEXT),
    ("json", TEXT),
    ("xml", TEXT),
    ("html", TEXT),
    ("htm", TEXT),
    ("css", TEXT),
    ("js", TEXT),
    ("ts", TEXT),
    ("java", TEXT),
    ("py", TEXT),
    ("sql", TEXT),
    ("yaml", TEXT),
    ("yml", TEXT),
    ("pdf", previewable(FileIcon::Pdf, PreviewKind::Pdf)),
    ("mp4", VIDEO),
    ("webm", VIDEO),
    ("avi", VIDEO),
    ("mov", VIDEO),
    ("wmv", VIDEO),
    ("mp3", AUDIO),
    ("wav", AUDIO),
    ("ogg", AUDIO),
    ("aac", AUDIO),
    ("flac", AUDIO),
    ("doc", plain(FileIcon::Document)),
    ("docx", plain(FileIcon::Document)),
    ("xls", plain(FileIcon::Spreadsheet)),
    ("xlsx", plain(FileIcon::Spreadsheet)),
    ("ppt", plain(FileIcon::Presentation)),
    ("pptx", plain(FileIcon::Presentation)),
    ("zip", plain(FileIcon::Archive)),
    ("rar", plain(FileIcon::Archive)),
    ("7z", plain(FileIcon::Archive)),
    ("tar", plain(FileIcon::Archive)),
    ("gz", plain(FileIcon::Archive)),
];

fn lookup(file_name: &str) -> Option<&'static FileType> {
    let ext = extension_of(file_name)?;
    FILE_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, file_type)| file_type)
}

/// Lowercase extension of the last path segment, if any.
pub fn extension_of(file_name: &str) -> Option<String> {
    let last = file_name.rsplit('/').next().unwrap_or(file_name);
    match last.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => Some(ext.to_lowercase()),
        _ => None,
    }
}

/// Icon for a file name.
pub fn icon_for(file_name: &str) -> FileIcon {
    lookup(file_name)
        .map(|t| t.icon)
        .unwrap_or(FileIcon::Generic)
}

/// Whether a file name has a previewable extension.
pub fn can_preview(file_name: &str) -> bool {
    lookup(file_name).is_some_and(|t| t.preview.is_some())
}

fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase()
}

/// Whether a content type should be decoded and shown as text.
pub fn is_text_content_type(content_type: &str) -> bool {
    let essence = essence(content_type);
    essence.starts_with("text/")
        || ["javascript", "json", "xml", "yaml", "sql", "typescript"]
            .iter()
            .any(|marker| essence.contains(marker))
}

/// Preview kind for a response content type.
pub fn preview_kind_for_content_type(content_type: &str) -> PreviewKind {
    let essence = essence(content_type);

    if essence.starts_with("image/") {
        PreviewKind::Image
    } else if essence.starts_with("video/") {
        PreviewKind::Video
    } else if essence.starts_with("audio/") {
        PreviewKind::Audio
    } else if essence == "application/pdf" {
        PreviewKind::Pdf
    } else if is_text_content_type(&essence) {
        PreviewKind::Text
    } else {
        PreviewKind::Unsupported
    }
}
