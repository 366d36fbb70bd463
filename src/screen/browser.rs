//! File browser screen.

use std::path::{Path, PathBuf};

use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::warn;

use super::command::{closes_preview, is_yes, parse_command, parse_file_choice};
use super::{Command, FileChoice, ScreenResult, Terminal};
use crate::file::{format_file_size, Crumb, Folder, PreviewKind, StoredFile};
use crate::i18n::I18n;
use crate::view::{Browser, Listing, LoadState, PreviewState};
use crate::Result;

/// Longest file name shown in the listing before truncation.
const MAX_NAME_WIDTH: usize = 30;

/// Lines of text shown in a text preview.
const MAX_PREVIEW_LINES: usize = 200;

enum Entry {
    Folder(Folder),
    File(StoredFile),
}

/// Entry `n` (1-based) of the listing: folders first, then files.
fn entry(listing: &Listing, n: usize) -> Option<Entry> {
    let index = n.checked_sub(1)?;
    if let Some(folder) = listing.folders.get(index) {
        return Some(Entry::Folder(folder.clone()));
    }

    listing
        .files
        .get(index - listing.folders.len())
        .cloned()
        .map(Entry::File)
}

fn truncate_name(name: &str) -> String {
    if name.chars().count() > MAX_NAME_WIDTH {
        let truncated: String = name.chars().take(MAX_NAME_WIDTH - 3).collect();
        format!("{truncated}...")
    } else {
        name.to_string()
    }
}

/// Terminal renderer and input loop for a [`Browser`].
pub struct BrowserScreen {
    i18n: I18n,
    download_dir: PathBuf,
}

impl BrowserScreen {
    pub fn new(i18n: I18n, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            i18n,
            download_dir: download_dir.into(),
        }
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Run the browser until the user quits or input ends.
    pub async fn run<R, W>(
        &self,
        browser: &mut Browser,
        term: &mut Terminal<R, W>,
    ) -> Result<ScreenResult>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        if matches!(browser.load_state(), LoadState::Idle) {
            browser.refresh().await;
        }

        loop {
            self.draw(browser, term).await?;
            term.send(self.i18n.t("browser.prompt")).await?;

            let Some(line) = term.read_line().await? else {
                return Ok(ScreenResult::Disconnected);
            };

            match parse_command(&line) {
                Command::Quit => return Ok(ScreenResult::Quit),
                Command::Back => {
                    browser.go_back().await;
                }
                Command::Refresh => {
                    browser.clear_error();
                    browser.refresh().await;
                }
                Command::Crumb(index) => {
                    browser.go_to_crumb(index).await;
                }
                Command::Upload(path) => {
                    let path = path.map(PathBuf::from);
                    if let Ok(stored) = browser.upload(path.as_deref()).await {
                        let msg = self
                            .i18n
                            .t_with("upload.success", &[("name", &stored.file_name)]);
                        term.send_line(&msg).await?;
                    }
                }
                Command::MakeFolder(name) => {
                    if let Ok(folder) = browser.create_folder(&name).await {
                        let msg = self
                            .i18n
                            .t_with("folder.created", &[("name", &folder.name)]);
                        term.send_line(&msg).await?;
                    }
                }
                Command::DeleteFolder(n) => {
                    if let Some(result) = self.delete_folder(browser, term, n).await? {
                        return Ok(result);
                    }
                }
                Command::Open(n) => {
                    let Some(selected) = browser.listing().and_then(|l| entry(l, n)) else {
                        continue;
                    };

                    match selected {
                        Entry::Folder(folder) => browser.navigate(Some(&folder.path)).await,
                        Entry::File(file) => {
                            if let Some(result) = self.file_menu(browser, term, file).await? {
                                return Ok(result);
                            }
                        }
                    }
                }
                Command::Help => {
                    term.send_line(self.i18n.t("app.help")).await?;
                }
                Command::Unknown => {}
            }
        }
    }

    /// Breadcrumb line: links are numbered, the current folder is not.
    pub fn render_breadcrumbs(&self, crumbs: &[Crumb]) -> String {
        crumbs
            .iter()
            .enumerate()
            .map(|(i, crumb)| {
                let label = match crumb {
                    Crumb::Root { .. } => self.i18n.t("browser.root"),
                    Crumb::Folder { name, .. } => name.as_str(),
                };
                if crumb.is_clickable() {
                    format!("[{i}] {label}")
                } else {
                    label.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" > ")
    }

    /// Lines describing a listing.
    pub fn render_listing(&self, listing: &Listing, folder_name: Option<&str>) -> Vec<String> {
        if listing.is_empty() {
            let line = match folder_name {
                Some(name) => self.i18n.t_with("browser.folder_empty", &[("name", name)]),
                None => self.i18n.t("browser.empty").to_string(),
            };
            return vec![line];
        }

        let mut lines = Vec::new();
        let mut n = 0;

        for folder in &listing.folders {
            n += 1;
            let items = self
                .i18n
                .t_with("browser.folder_items", &[("count", &folder.file_count.to_string())]);
            lines.push(format!("  {n:>3}. [DIR] {}  ({items})", folder.name));
        }

        for file in &listing.files {
            n += 1;
            let marker = if file.can_preview() { " *" } else { "" };
            lines.push(format!(
                "  {n:>3}. {} {:<width$} {:>12}{marker}",
                file.icon().tag(),
                truncate_name(&file.file_name),
                file.formatted_size(),
                width = MAX_NAME_WIDTH,
            ));
        }

        lines
    }

    async fn draw<R, W>(&self, browser: &Browser, term: &mut Terminal<R, W>) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let folder_name = browser.current_folder_name();
        let title = folder_name
            .clone()
            .unwrap_or_else(|| self.i18n.t("browser.root").to_string());

        term.send_line("").await?;
        term.send_line(&format!("=== {title} ===")).await?;
        term.send_line(&self.render_breadcrumbs(&browser.breadcrumbs()))
            .await?;

        if let Some(key) = browser.action_state().error_key() {
            term.send_line(&format!("! {}", self.i18n.t(key))).await?;
        }

        match browser.load_state() {
            LoadState::Idle | LoadState::Loading { .. } => {
                term.send_line(self.i18n.t("browser.loading")).await?;
            }
            LoadState::Errored { message } => {
                term.send_line(&format!("! {}", self.i18n.t(message))).await?;
            }
            LoadState::Loaded(listing) => {
                for line in self.render_listing(listing, folder_name.as_deref()) {
                    term.send_line(&line).await?;
                }
            }
        }

        term.send_line("").await
    }

    async fn confirm<R, W>(&self, term: &mut Terminal<R, W>, question: &str) -> Result<Option<bool>>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        term.send(&format!("{question} {} ", self.i18n.t("common.yes_no")))
            .await?;
        Ok(term.read_line().await?.map(|answer| is_yes(&answer)))
    }

    async fn delete_folder<R, W>(
        &self,
        browser: &mut Browser,
        term: &mut Terminal<R, W>,
        n: usize,
    ) -> Result<Option<ScreenResult>>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let Some(Entry::Folder(folder)) = browser.listing().and_then(|l| entry(l, n)) else {
            term.send_line(self.i18n.t("browser.not_a_folder")).await?;
            return Ok(None);
        };

        let question = self
            .i18n
            .t_with("folder.delete_confirm", &[("name", &folder.name)]);
        match self.confirm(term, &question).await? {
            None => Ok(Some(ScreenResult::Disconnected)),
            Some(false) => Ok(None),
            Some(true) => {
                if browser.delete_folder(&folder.path).await.is_ok() {
                    let msg = self
                        .i18n
                        .t_with("folder.deleted", &[("name", &folder.name)]);
                    term.send_line(&msg).await?;
                }
                Ok(None)
            }
        }
    }

    async fn file_menu<R, W>(
        &self,
        browser: &mut Browser,
        term: &mut Terminal<R, W>,
        file: StoredFile,
    ) -> Result<Option<ScreenResult>>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let name = file.display_name();

        term.send_line("").await?;
        term.send_line(&format!("--- {name} ---")).await?;
        term.send_line(&format!(
            "{}: {}",
            self.i18n.t("file.size"),
            file.formatted_size()
        ))
        .await?;
        term.send_line(&format!(
            "{}: {}",
            self.i18n.t("file.uploaded"),
            file.uploaded_at.format("%Y-%m-%d %H:%M")
        ))
        .await?;

        let prompt = if file.can_preview() {
            self.i18n.t("file.menu_prompt_preview")
        } else {
            self.i18n.t("file.menu_prompt")
        };
        term.send(prompt).await?;

        let Some(line) = term.read_line().await? else {
            return Ok(Some(ScreenResult::Disconnected));
        };

        match parse_file_choice(&line) {
            FileChoice::Preview => {
                if browser.open_preview(&file).await {
                    return self.preview_loop(browser, term).await;
                }
                term.send_line(self.i18n.t("preview.not_supported")).await?;
            }
            FileChoice::Download => {
                if let Ok(path) = browser.download(&file, &self.download_dir).await {
                    let path = path.display().to_string();
                    let msg = self.i18n.t_with("file.downloaded", &[("path", &path)]);
                    term.send_line(&msg).await?;
                }
            }
            FileChoice::Delete => {
                let question = self
                    .i18n
                    .t_with("file.delete_confirm", &[("name", &name)]);
                match self.confirm(term, &question).await? {
                    None => return Ok(Some(ScreenResult::Disconnected)),
                    Some(true) => {
                        browser.delete_file(&file.id).await.ok();
                    }
                    Some(false) => {}
                }
            }
            FileChoice::Back => {}
        }

        Ok(None)
    }

    async fn preview_loop<R, W>(
        &self,
        browser: &mut Browser,
        term: &mut Terminal<R, W>,
    ) -> Result<Option<ScreenResult>>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        loop {
            for line in self.render_preview(browser.preview_state()) {
                term.send_line(&line).await?;
            }
            term.send(self.i18n.t("preview.prompt")).await?;

            let Some(line) = term.read_line().await? else {
                browser.close_preview();
                return Ok(Some(ScreenResult::Disconnected));
            };

            if closes_preview(&line) {
                browser.close_preview();
                return Ok(None);
            }

            if line.trim().eq_ignore_ascii_case("s") {
                let msg = self.save_preview(browser).await;
                term.send_line(&msg).await?;
            }
        }
    }

    /// Lines showing the preview overlay.
    pub fn render_preview(&self, state: &PreviewState) -> Vec<String> {
        let mut lines = vec![String::new()];

        match state {
            PreviewState::Closed => return Vec::new(),
            PreviewState::Unavailable { file_name } => {
                lines.push(format!("--- {file_name} ---"));
                lines.push(self.i18n.t("preview.unavailable").to_string());
            }
            PreviewState::Open(open) => {
                let preview = &open.preview;
                lines.push(format!(
                    "--- {} ({}) ---",
                    open.file.display_name(),
                    preview.content_type
                ));

                match preview.kind() {
                    PreviewKind::Text => match &preview.text_content {
                        Some(text) => {
                            let mut text_lines = text.lines();
                            lines.extend(
                                text_lines
                                    .by_ref()
                                    .take(MAX_PREVIEW_LINES)
                                    .map(str::to_string),
                            );
                            if text_lines.next().is_some() {
                                lines.push("...".to_string());
                            }
                        }
                        None => lines.push(self.i18n.t("preview.text_unavailable").to_string()),
                    },
                    PreviewKind::Unsupported => {
                        lines.push(self.i18n.t("preview.unsupported").to_string());
                        lines.push(preview.content_type.clone());
                    }
                    kind => {
                        let kind_key = match kind {
                            PreviewKind::Image => "preview.kind.image",
                            PreviewKind::Video => "preview.kind.video",
                            PreviewKind::Audio => "preview.kind.audio",
                            _ => "preview.kind.pdf",
                        };
                        let size = format_file_size(preview.size as u64);
                        let url = preview.object_url.to_string();
                        lines.push(self.i18n.t_with(
                            "preview.media",
                            &[
                                ("kind", self.i18n.t(kind_key)),
                                ("size", &size),
                                ("url", &url),
                            ],
                        ));
                    }
                }
            }
        }

        lines
    }

    /// Save the open preview's bytes to the download directory.
    async fn save_preview(&self, browser: &Browser) -> String {
        let PreviewState::Open(open) = browser.preview_state() else {
            return self.i18n.t("preview.unavailable").to_string();
        };
        let Some(blob) = browser.client().object_urls().get(&open.preview.object_url) else {
            return self.i18n.t("preview.unavailable").to_string();
        };

        let target = self.download_dir.join(open.file.display_name());
        let result = async {
            tokio::fs::create_dir_all(&self.download_dir).await?;
            tokio::fs::write(&target, blob.bytes()).await
        }
        .await;

        match result {
            Ok(()) => {
                let path = target.display().to_string();
                self.i18n.t_with("preview.saved", &[("path", &path)])
            }
            Err(e) => {
                warn!(path = %target.display(), error = %e, "failed to save preview");
                self.i18n.t("error.io").to_string()
            }
        }
    }
}
