//! HTTP client for the ArchDrive storage API.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use tracing::{debug, info};
use url::Url;

use super::object_url::{ObjectUrl, ObjectUrls};
use super::preview::FilePreview;
use crate::config::ApiConfig;
use crate::file::{
    display_name_from_id, is_text_content_type, normalize_folder, validate_folder_name, Folder,
    StoredFile,
};
use crate::{DriveError, Result};

/// Path prefix of every storage endpoint.
pub const API_PREFIX: &str = "/api/files";

/// Longest error body kept in a `RequestError` message.
const MAX_ERROR_BODY: usize = 200;

/// Typed client for the remote file-storage service.
///
/// The base URL is injected through [`ApiConfig`]; nothing is read from
/// global state.
#[derive(Debug, Clone)]
pub struct StorageClient {
    client: Client,
    api_root: String,
    object_urls: ObjectUrls,
}

impl StorageClient {
    /// Create a client with its own object URL registry.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        Self::with_object_urls(config, ObjectUrls::new())
    }

    /// Create a client that registers previews in `object_urls`.
    pub fn with_object_urls(config: &ApiConfig, object_urls: ObjectUrls) -> Result<Self> {
        let base = Url::parse(&config.base_url).map_err(|e| {
            DriveError::Config(format!("invalid base URL '{}': {e}", config.base_url))
        })?;

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| DriveError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_root: format!("{}{}", base.as_str().trim_end_matches('/'), API_PREFIX),
            object_urls,
        })
    }

    /// Absolute URL of the storage API root.
    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    /// Registry holding preview blobs.
    pub fn object_urls(&self) -> &ObjectUrls {
        &self.object_urls
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_root, path)
    }

    /// Turn a non-2xx response into a `RequestError`.
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let body = body.trim();
        let message = if body.is_empty() {
            status
                .canonical_reason()
                .unwrap_or("unknown status")
                .to_string()
        } else {
            body.chars().take(MAX_ERROR_BODY).collect()
        };

        Err(DriveError::Request {
            status: status.as_u16(),
            message,
        })
    }

    /// Upload `content` as `file_name` into `folder` (root when `None`).
    pub async fn upload_file(
        &self,
        file_name: &str,
        content: Vec<u8>,
        folder: Option<&str>,
    ) -> Result<StoredFile> {
        let mime = mime_guess::from_path(file_name).first_or_octet_stream();
        let size = content.len();

        let part = Part::bytes(content)
            .file_name(file_name.to_string())
            .mime_str(mime.as_ref())
            .map_err(|e| DriveError::Validation(format!("invalid content type: {e}")))?;

        let mut form = Form::new().part("file", part);
        let folder = folder.and_then(normalize_folder);
        if let Some(folder) = &folder {
            form = form.text("folder", folder.clone());
        }

        debug!(file_name, size, folder = ?folder, "uploading file");
        let response = self
            .client
            .post(self.endpoint("/upload"))
            .multipart(form)
            .send()
            .await?;
        let stored: StoredFile = Self::check(response).await?.json().await?;

        info!(id = %stored.id, size = stored.size, "file uploaded");
        Ok(stored)
    }

    /// Read a local file and upload it under its own name.
    pub async fn upload_path(&self, path: &Path, folder: Option<&str>) -> Result<StoredFile> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                DriveError::Validation(format!("'{}' is not a file path", path.display()))
            })?
            .to_string();

        let content = tokio::fs::read(path).await?;
        self.upload_file(&file_name, content, folder).await
    }

    /// List files in `folder` (all root files when `None`).
    pub async fn list_files(&self, folder: Option<&str>) -> Result<Vec<StoredFile>> {
        let mut request = self.client.get(self.endpoint(""));
        if let Some(folder) = folder.and_then(normalize_folder) {
            request = request.query(&[("folder", folder)]);
        }

        let files: Vec<StoredFile> = Self::check(request.send().await?).await?.json().await?;
        debug!(folder = ?folder, count = files.len(), "listed files");
        Ok(files)
    }

    /// List folders directly under `parent` (top-level folders when `None`).
    pub async fn list_folders(&self, parent: Option<&str>) -> Result<Vec<Folder>> {
        let mut request = self.client.get(self.endpoint("/folders"));
        if let Some(parent) = parent.and_then(normalize_folder) {
            request = request.query(&[("parent", parent)]);
        }

        let folders: Vec<Folder> = Self::check(request.send().await?).await?.json().await?;
        debug!(parent = ?parent, count = folders.len(), "listed folders");
        Ok(folders)
    }

    /// Create folder `name` under `parent`.
    ///
    /// The name is validated locally first; duplicates and other rules are
    /// up to the server.
    pub async fn create_folder(&self, name: &str, parent: Option<&str>) -> Result<Folder> {
        let name = validate_folder_name(name)?;

        let mut query = vec![("name", name.clone())];
        if let Some(parent) = parent.and_then(normalize_folder) {
            query.push(("parent", parent));
        }

        let response = self
            .client
            .post(self.endpoint("/folders"))
            .query(&query)
            .send()
            .await?;
        let folder: Folder = Self::check(response).await?.json().await?;

        info!(path = %folder.path, "folder created");
        Ok(folder)
    }

    /// Delete a folder by name or path. The server also removes its files.
    pub async fn delete_folder(&self, folder: &str) -> Result<()> {
        let name = folder.trim().trim_end_matches('/');
        if name.is_empty() {
            return Err(DriveError::Validation("folder name is empty".to_string()));
        }

        let url = self.endpoint(&format!("/folders/{}", urlencoding::encode(name)));
        Self::check(self.client.delete(url).send().await?).await?;

        info!(folder = name, "folder deleted");
        Ok(())
    }

    /// Delete a file by storage ID.
    pub async fn delete_file(&self, id: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.endpoint(""))
            .query(&[("fileName", id)])
            .send()
            .await?;
        Self::check(response).await?;

        info!(id, "file deleted");
        Ok(())
    }

    /// Download the raw content of a file.
    pub async fn fetch_file(&self, id: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(self.endpoint("/download"))
            .query(&[("fileName", id)])
            .send()
            .await?;
        let bytes = Self::check(response).await?.bytes().await?;
        Ok(bytes.to_vec())
    }

    /// Download a file into `dir`, naming it after the ID's original name.
    pub async fn download_file(&self, id: &str, dir: &Path) -> Result<PathBuf> {
        let target = dir.join(display_name_from_id(id));
        self.download_file_as(id, &target).await
    }

    /// Download a file to an explicit path, creating parent directories.
    pub async fn download_file_as(&self, id: &str, target: &Path) -> Result<PathBuf> {
        let content = self.fetch_file(id).await?;

        if let Some(parent) = target.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(target, &content).await?;

        info!(id, path = %target.display(), size = content.len(), "file downloaded");
        Ok(target.to_path_buf())
    }

    /// Fetch a preview and register it as an object URL.
    ///
    /// The caller owns the returned URL and must pass it to
    /// [`StorageClient::revoke_object_url`] when the preview closes.
    pub async fn preview_file(&self, id: &str) -> Result<FilePreview> {
        let response = self
            .client
            .get(self.endpoint("/preview"))
            .query(&[("fileName", id)])
            .send()
            .await?;
        let response = Self::check(response).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = response.bytes().await?.to_vec();

        let text_content = is_text_content_type(&content_type)
            .then(|| String::from_utf8_lossy(&bytes).into_owned());
        let size = bytes.len();
        let object_url = self.object_urls.create(bytes, content_type.clone());

        debug!(id, content_type = %content_type, size, url = %object_url, "preview fetched");
        Ok(FilePreview {
            object_url,
            content_type,
            size,
            text_content,
        })
    }

    /// Release a preview's object URL. Returns `false` if already released.
    pub fn revoke_object_url(&self, url: &ObjectUrl) -> bool {
        self.object_urls.revoke(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_root_from_base_url() {
        let client = StorageClient::new(&ApiConfig::with_base_url("http://localhost:8080")).unwrap();
        assert_eq!(client.api_root(), "http://localhost:8080/api/files");
        assert_eq!(
            client.endpoint("/folders"),
            "http://localhost:8080/api/files/folders"
        );
    }

    #[test]
    fn test_api_root_keeps_base_path() {
        let client =
            StorageClient::new(&ApiConfig::with_base_url("https://example.com/drive/")).unwrap();
        assert_eq!(client.api_root(), "https://example.com/drive/api/files");
    }

    #[test]
    fn test_invalid_base_url() {
        let result = StorageClient::new(&ApiConfig::with_base_url("::nope::"));
        assert!(matches!(result, Err(DriveError::Config(_))));
    }

    #[test]
    fn test_shared_object_urls() {
        let urls = ObjectUrls::new();
        let client =
            StorageClient::with_object_urls(&ApiConfig::default(), urls.clone()).unwrap();

        let url = urls.create(vec![1, 2, 3], "image/png");
        assert_eq!(client.object_urls().live_count(), 1);
        assert!(client.revoke_object_url(&url));
        assert!(!client.revoke_object_url(&url));
    }

    #[tokio::test]
    async fn test_create_folder_validates_before_request() {
        // Nothing listens on this port; a request would fail with a network error.
        let client = StorageClient::new(&ApiConfig::with_base_url("http://127.0.0.1:9")).unwrap();

        let result = client.create_folder("   ", None).await;
        assert!(matches!(result, Err(DriveError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_folder_rejects_empty_name() {
        let client = StorageClient::new(&ApiConfig::with_base_url("http://127.0.0.1:9")).unwrap();

        let result = client.delete_folder("/").await;
        assert!(matches!(result, Err(DriveError::Validation(_))));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let client = StorageClient::new(&ApiConfig::with_base_url("http://127.0.0.1:9")).unwrap();

        let result = client.list_files(None).await;
        assert!(matches!(result, Err(DriveError::Network(_))));
    }
}
