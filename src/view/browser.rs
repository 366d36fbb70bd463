//! Browsing/upload session over a [`StorageClient`].

use std::path::{Path, PathBuf};

use futures::future::try_join;
use tracing::{debug, warn};

use super::state::{Action, ActionState, Listing, LoadState, OpenPreview, PreviewState};
use crate::client::StorageClient;
use crate::file::{
    self, breadcrumbs, folder_name_of, is_within, normalize_folder, parent_path, Crumb, Folder,
    StoredFile,
};
use crate::{DriveError, Result};

/// Identifies one listing load. Results carrying an outdated ticket are
/// dropped by [`Browser::finish_load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    folder: Option<String>,
}

impl LoadTicket {
    /// Generation this load was started with.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Folder being loaded.
    pub fn folder(&self) -> Option<&str> {
        self.folder.as_deref()
    }
}

/// Fetch files and subfolders of `folder` concurrently.
pub async fn fetch_listing(client: &StorageClient, folder: Option<&str>) -> Result<Listing> {
    let (files, folders) = try_join(client.list_files(folder), client.list_folders(folder)).await?;
    Ok(Listing { folders, files })
}

/// Transient browsing session: current folder, listing, action and preview state.
pub struct Browser {
    client: StorageClient,
    current_folder: Option<String>,
    generation: u64,
    load: LoadState,
    action: ActionState,
    preview: PreviewState,
}

impl Browser {
    /// Start a session at the root. Nothing is loaded until the first navigation.
    pub fn new(client: StorageClient) -> Self {
        Self {
            client,
            current_folder: None,
            generation: 0,
            load: LoadState::Idle,
            action: ActionState::Idle,
            preview: PreviewState::Closed,
        }
    }

    pub fn client(&self) -> &StorageClient {
        &self.client
    }

    /// Folder being viewed, `None` for the root.
    pub fn current_folder(&self) -> Option<&str> {
        self.current_folder.as_deref()
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn action_state(&self) -> &ActionState {
        &self.action
    }

    pub fn preview_state(&self) -> &PreviewState {
        &self.preview
    }

    /// Generation of the most recently started load.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn listing(&self) -> Option<&Listing> {
        self.load.listing()
    }

    pub fn breadcrumbs(&self) -> Vec<Crumb> {
        breadcrumbs(self.current_folder())
    }

    /// Name of the folder being viewed, `None` at the root.
    pub fn current_folder_name(&self) -> Option<String> {
        let current = self.current_folder.as_deref()?;
        let listed = self
            .listing()
            .and_then(|l| l.folders.iter().find(|f| f.path == current))
            .map(|f| f.name.clone());

        Some(listed.unwrap_or_else(|| folder_name_of(current).to_string()))
    }

    /// Enter `Loading` and hand out a ticket for the new generation.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.load = LoadState::Loading {
            generation: self.generation,
        };

        LoadTicket {
            generation: self.generation,
            folder: self.current_folder.clone(),
        }
    }

    /// Apply a load result if its ticket is still current. A successful
    /// load also clears the last action error.
    ///
    /// Returns `false` when the result was stale and discarded.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<Listing>) -> bool {
        if ticket.generation != self.generation {
            debug!(
                stale = ticket.generation,
                current = self.generation,
                folder = ?ticket.folder,
                "discarding stale listing"
            );
            return false;
        }

        self.load = match result {
            Ok(listing) => {
                self.clear_error();
                LoadState::Loaded(listing)
            }
            Err(e) => {
                warn!(folder = ?ticket.folder, error = %e, "failed to load listing");
                LoadState::Errored {
                    message: "browser.load_failed",
                }
            }
        };
        true
    }

    /// Reload the current folder.
    pub async fn refresh(&mut self) {
        let ticket = self.begin_load();
        let result = fetch_listing(&self.client, ticket.folder()).await;
        self.finish_load(ticket, result);
    }

    /// Switch to `folder` (`None` for the root) and load it.
    pub async fn navigate(&mut self, folder: Option<&str>) {
        self.current_folder = folder.and_then(normalize_folder);
        debug!(folder = ?self.current_folder, "navigating");
        self.refresh().await;
    }

    /// Go to the parent folder. Returns `false` at the root.
    pub async fn go_back(&mut self) -> bool {
        let Some(current) = self.current_folder.as_deref() else {
            return false;
        };

        let parent = parent_path(current);
        self.navigate(parent.as_deref()).await;
        true
    }

    /// Follow breadcrumb `index`. The current folder's crumb is not a link.
    pub async fn go_to_crumb(&mut self, index: usize) -> bool {
        let target = match self.breadcrumbs().get(index) {
            Some(crumb) if crumb.is_clickable() => crumb.target().map(str::to_string),
            _ => return false,
        };

        self.navigate(target.as_deref()).await;
        true
    }

    /// Forget the last action error.
    pub fn clear_error(&mut self) {
        if matches!(self.action, ActionState::Failed { .. }) {
            self.action = ActionState::Idle;
        }
    }

    fn settle<T>(&mut self, action: Action, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => self.action = ActionState::Idle,
            Err(e) => {
                warn!(action = ?action, error = %e, "action failed");
                self.action = ActionState::Failed {
                    message: action.failure_key(e),
                    action,
                };
            }
        }
        result
    }

    /// Upload the selected local file into the current folder.
    ///
    /// Without a selection this fails with a validation error and sends
    /// nothing.
    pub async fn upload(&mut self, selection: Option<&Path>) -> Result<StoredFile> {
        let Some(path) = selection else {
            let err = DriveError::Validation("no file selected".to_string());
            return self.settle(Action::Upload, Err(err));
        };

        self.action = ActionState::Pending(Action::Upload);
        let result = self
            .client
            .upload_path(path, self.current_folder.as_deref())
            .await;

        let result = self.settle(Action::Upload, result);
        if result.is_ok() {
            self.refresh().await;
        }
        result
    }

    /// Create a folder under the current one.
    pub async fn create_folder(&mut self, name: &str) -> Result<Folder> {
        self.action = ActionState::Pending(Action::CreateFolder);
        let result = self
            .client
            .create_folder(name, self.current_folder.as_deref())
            .await;

        let result = self.settle(Action::CreateFolder, result);
        if result.is_ok() {
            self.refresh().await;
        }
        result
    }

    /// Delete a file by storage ID. Confirmation is the caller's job.
    ///
    /// A preview of the file stays open if the deletion fails.
    pub async fn delete_file(&mut self, id: &str) -> Result<()> {
        let action = Action::DeleteFile(id.to_string());
        self.action = ActionState::Pending(action.clone());
        let result = self.client.delete_file(id).await;

        let result = self.settle(action, result);
        if result.is_ok() {
            let previewing = matches!(
                &self.preview,
                PreviewState::Open(open) if open.file.id == id
            );
            if previewing {
                self.close_preview();
            }
            self.refresh().await;
        }
        result
    }

    /// Delete a folder by path. Confirmation is the caller's job.
    ///
    /// If the view is inside the deleted folder it returns to the root.
    pub async fn delete_folder(&mut self, folder: &str) -> Result<()> {
        let action = Action::DeleteFolder(folder.to_string());
        let Some(path) = normalize_folder(folder) else {
            let err = DriveError::Validation("folder name is empty".to_string());
            return self.settle(action, Err(err));
        };

        self.action = ActionState::Pending(action.clone());
        let result = self.client.delete_folder(&path).await;

        let result = self.settle(action, result);
        if result.is_ok() {
            let inside = self
                .current_folder
                .as_deref()
                .is_some_and(|current| is_within(current, &path));

            if inside {
                self.navigate(None).await;
            } else {
                self.refresh().await;
            }
        }
        result
    }

    /// Save a file into `dir` under its display name.
    pub async fn download(&mut self, file: &StoredFile, dir: &Path) -> Result<PathBuf> {
        let action = Action::Download(file.id.clone());
        self.action = ActionState::Pending(action.clone());

        let target = dir.join(file.display_name());
        let result = self.client.download_file_as(&file.id, &target).await;
        self.settle(action, result)
    }

    /// Open the preview overlay for `file`.
    ///
    /// Files without a previewable extension are ignored and `false` is
    /// returned. An open preview is released before the new one is shown.
    /// A failed fetch shows the overlay in its unavailable state.
    pub async fn open_preview(&mut self, file: &StoredFile) -> bool {
        if !file::can_preview(&file.file_name) {
            return false;
        }

        self.close_preview();
        self.action = ActionState::Pending(Action::Preview(file.id.clone()));

        self.preview = match self.client.preview_file(&file.id).await {
            Ok(preview) => PreviewState::Open(OpenPreview {
                file: file.clone(),
                preview,
            }),
            Err(e) => {
                warn!(id = %file.id, error = %e, "preview unavailable");
                PreviewState::Unavailable {
                    file_name: file.display_name(),
                }
            }
        };
        self.action = ActionState::Idle;
        true
    }

    /// Close the preview overlay and release its object URL.
    ///
    /// Returns `false` if no overlay was showing.
    pub fn close_preview(&mut self) -> bool {
        match std::mem::take(&mut self.preview) {
            PreviewState::Open(open) => {
                self.client.revoke_object_url(&open.preview.object_url);
                true
            }
            PreviewState::Unavailable { .. } => true,
            PreviewState::Closed => false,
        }
    }
}

impl Drop for Browser {
    fn drop(&mut self) {
        self.close_preview();
    }
}
