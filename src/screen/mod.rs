//! Line-oriented terminal front end.
//!
//! The screen draws the browser state as text and turns typed commands into
//! view operations. Input and output are generic async streams so the whole
//! loop can run against stdin/stdout or in-memory buffers.

mod browser;
mod command;

pub use browser::BrowserScreen;
pub use command::{parse_command, parse_file_choice, Command, FileChoice};

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::Result;

/// Escape key as it arrives on a line-buffered terminal.
pub const ESCAPE: char = '\u{1b}';

/// How a screen was left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenResult {
    /// The user quit.
    Quit,
    /// Input ended.
    Disconnected,
}

/// Text terminal over an async reader/writer pair.
pub struct Terminal<R, W> {
    reader: R,
    writer: W,
}

impl<R, W> Terminal<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Write text without a newline and flush.
    pub async fn send(&mut self, text: &str) -> Result<()> {
        self.writer.write_all(text.as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Write a line.
    pub async fn send_line(&mut self, text: &str) -> Result<()> {
        self.writer.write_all(text.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Read one line without its line ending. `None` at end of input.
    pub async fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line).await? == 0 {
            return Ok(None);
        }

        let trimmed = line.trim_end_matches(&['\r', '\n'][..]);
        Ok(Some(trimmed.to_string()))
    }

    /// Give back the reader and writer.
    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_terminal_read_and_write() {
        let input: &[u8] = b"first\r\nsecond\n";
        let mut term = Terminal::new(input, Vec::new());

        term.send("> ").await.unwrap();
        term.send_line("hello").await.unwrap();

        assert_eq!(term.read_line().await.unwrap().as_deref(), Some("first"));
        assert_eq!(term.read_line().await.unwrap().as_deref(), Some("second"));
        assert_eq!(term.read_line().await.unwrap(), None);

        let (_, output) = term.into_inner();
        assert_eq!(String::from_utf8(output).unwrap(), "> hello\n");
    }
}
