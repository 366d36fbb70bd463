//! Command parsing for the browser screen.

use super::ESCAPE;

/// A command typed at the listing prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open entry `n` (1-based; folders first, then files).
    Open(usize),
    /// Upload a local file into the current folder.
    Upload(Option<String>),
    /// Create a folder under the current one.
    MakeFolder(String),
    /// Delete folder entry `n`.
    DeleteFolder(usize),
    /// Follow breadcrumb `n` (0 is the root).
    Crumb(usize),
    Back,
    Refresh,
    Help,
    Quit,
    /// Nothing recognizable; redraw.
    Unknown,
}

/// Parse a line typed at the listing prompt.
pub fn parse_command(input: &str) -> Command {
    let input = input.trim();
    if input.is_empty() {
        return Command::Unknown;
    }

    if let Ok(n) = input.parse::<usize>() {
        return if n > 0 {
            Command::Open(n)
        } else {
            Command::Unknown
        };
    }

    let (head, rest) = match input.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (input, ""),
    };

    match (head.to_ascii_lowercase().as_str(), rest) {
        ("q", "") => Command::Quit,
        ("b", "") => Command::Back,
        ("r", "") => Command::Refresh,
        ("?" | "h", "") => Command::Help,
        ("u", "") => Command::Upload(None),
        ("u", path) => Command::Upload(Some(path.to_string())),
        ("m", name) => Command::MakeFolder(name.to_string()),
        ("k", n) => match n.parse::<usize>() {
            Ok(n) if n > 0 => Command::DeleteFolder(n),
            _ => Command::Unknown,
        },
        ("g", n) => n.parse().map(Command::Crumb).unwrap_or(Command::Unknown),
        _ => Command::Unknown,
    }
}

/// A choice in the file menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileChoice {
    Preview,
    Download,
    Delete,
    Back,
}

/// Parse a line typed at the file menu prompt.
pub fn parse_file_choice(input: &str) -> FileChoice {
    match input.trim().to_ascii_lowercase().as_str() {
        "p" => FileChoice::Preview,
        "d" => FileChoice::Download,
        "x" => FileChoice::Delete,
        _ => FileChoice::Back,
    }
}

/// Whether a line typed in the preview overlay closes it.
pub(crate) fn closes_preview(input: &str) -> bool {
    let input = input.trim();
    input.is_empty()
        || input.starts_with(ESCAPE)
        || input.eq_ignore_ascii_case("x")
        || input.eq_ignore_ascii_case("q")
}

/// Whether a confirmation answer is yes.
pub(crate) fn is_yes(input: &str) -> bool {
    matches!(
        input.trim().to_lowercase().as_str(),
        "y" | "yes" | "т" | "так"
    )
}
