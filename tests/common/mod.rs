//! Test helpers for integration tests.
//!
//! Provides `FakeDrive`, an in-memory storage API served by axum on a random
//! local port, with the same endpoints and JSON shapes as the real service.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use uuid::Uuid;

use archdrive::config::ApiConfig;
use archdrive::file::{child_path, folder_name_of, is_within, normalize_folder, parent_path};
use archdrive::{Folder, StorageClient, StoredFile};

type Reply = Result<Response, (StatusCode, String)>;

#[derive(Default)]
struct Store {
    files: Vec<(StoredFile, Vec<u8>)>,
    folders: Vec<Folder>,
}

impl Store {
    fn add_folder(&mut self, path: &str) -> Folder {
        let folder = Folder {
            id: Uuid::new_v4().to_string(),
            name: folder_name_of(path).to_string(),
            path: path.to_string(),
            created_at: Utc::now().naive_utc(),
            file_count: 0,
        };
        self.folders.push(folder.clone());
        folder
    }

    fn add_file(&mut self, folder: Option<String>, file_name: &str, content: Vec<u8>) -> StoredFile {
        let prefix = folder.clone().unwrap_or_default();
        let stored = StoredFile {
            id: format!("{prefix}{}_{file_name}", Uuid::new_v4()),
            file_name: file_name.to_string(),
            folder: folder.clone(),
            url: None,
            size: content.len() as u64,
            uploaded_at: Utc::now().naive_utc(),
        };

        if let Some(path) = &folder {
            if let Some(f) = self.folders.iter_mut().find(|f| &f.path == path) {
                f.file_count += 1;
            }
        }

        self.files.push((stored.clone(), content));
        stored
    }

    fn file(&self, id: &str) -> Option<&(StoredFile, Vec<u8>)> {
        self.files.iter().find(|(f, _)| f.id == id)
    }
}

struct DriveState {
    store: Mutex<Store>,
    requests: AtomicUsize,
    failing: AtomicBool,
}

impl DriveState {
    fn store(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap()
    }

    /// Count the request; fail it when the server is switched to failing.
    fn enter(&self) -> Result<(), (StatusCode, String)> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

fn not_found(what: &str) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, format!("{what} not found"))
}

#[derive(Deserialize)]
struct FolderQuery {
    folder: Option<String>,
}

#[derive(Deserialize)]
struct ParentQuery {
    parent: Option<String>,
}

#[derive(Deserialize)]
struct CreateQuery {
    name: String,
    parent: Option<String>,
}

#[derive(Deserialize)]
struct FileQuery {
    #[serde(rename = "fileName")]
    file_name: String,
}

async fn list_files(State(state): State<Arc<DriveState>>, Query(q): Query<FolderQuery>) -> Reply {
    state.enter()?;
    let folder = q.folder.as_deref().and_then(normalize_folder);

    let files: Vec<StoredFile> = state
        .store()
        .files
        .iter()
        .filter(|(f, _)| f.folder == folder)
        .map(|(f, _)| f.clone())
        .collect();
    Ok(Json(files).into_response())
}

async fn list_folders(State(state): State<Arc<DriveState>>, Query(q): Query<ParentQuery>) -> Reply {
    state.enter()?;
    let parent = q.parent.as_deref().and_then(normalize_folder);

    let folders: Vec<Folder> = state
        .store()
        .folders
        .iter()
        .filter(|f| parent_path(&f.path) == parent)
        .cloned()
        .collect();
    Ok(Json(folders).into_response())
}

async fn create_folder(State(state): State<Arc<DriveState>>, Query(q): Query<CreateQuery>) -> Reply {
    state.enter()?;
    let parent = q.parent.as_deref().and_then(normalize_folder);
    let path = child_path(parent.as_deref(), q.name.trim());

    let mut store = state.store();
    if store.folders.iter().any(|f| f.path == path) {
        return Err((StatusCode::CONFLICT, format!("folder {path} already exists")));
    }
    Ok(Json(store.add_folder(&path)).into_response())
}

async fn delete_folder(State(state): State<Arc<DriveState>>, Path(name): Path<String>) -> Reply {
    state.enter()?;
    let path = normalize_folder(&name).ok_or_else(|| not_found("folder"))?;

    let mut store = state.store();
    if !store.folders.iter().any(|f| f.path == path) {
        return Err(not_found("folder"));
    }
    store.folders.retain(|f| !is_within(&f.path, &path));
    store
        .files
        .retain(|(f, _)| !f.folder.as_deref().is_some_and(|folder| is_within(folder, &path)));
    Ok(StatusCode::OK.into_response())
}

async fn upload(State(state): State<Arc<DriveState>>, mut multipart: Multipart) -> Reply {
    state.enter()?;

    let mut file: Option<(String, Vec<u8>)> = None;
    let mut folder: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?
    {
        match field.name().unwrap_or("") {
            "file" => {
                let name = field.file_name().unwrap_or("upload").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
                file = Some((name, bytes.to_vec()));
            }
            "folder" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
                folder = normalize_folder(&text);
            }
            _ => {}
        }
    }

    let (name, content) = file.ok_or((StatusCode::BAD_REQUEST, "file is required".to_string()))?;
    let stored = state.store().add_file(folder, &name, content);
    Ok(Json(stored).into_response())
}

async fn delete_file(State(state): State<Arc<DriveState>>, Query(q): Query<FileQuery>) -> Reply {
    state.enter()?;

    let mut store = state.store();
    let Some(index) = store.files.iter().position(|(f, _)| f.id == q.file_name) else {
        return Err(not_found("file"));
    };

    let (removed, _) = store.files.remove(index);
    if let Some(path) = &removed.folder {
        if let Some(f) = store.folders.iter_mut().find(|f| &f.path == path) {
            f.file_count = f.file_count.saturating_sub(1);
        }
    }
    Ok(StatusCode::OK.into_response())
}

async fn download(State(state): State<Arc<DriveState>>, Query(q): Query<FileQuery>) -> Reply {
    state.enter()?;

    let store = state.store();
    let (_, content) = store.file(&q.file_name).ok_or_else(|| not_found("file"))?;
    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream".to_string())],
        content.clone(),
    )
        .into_response())
}

async fn preview(State(state): State<Arc<DriveState>>, Query(q): Query<FileQuery>) -> Reply {
    state.enter()?;

    let store = state.store();
    let (file, content) = store.file(&q.file_name).ok_or_else(|| not_found("file"))?;
    let content_type = mime_guess::from_path(&file.file_name)
        .first_or_octet_stream()
        .to_string();
    Ok(([(header::CONTENT_TYPE, content_type)], content.clone()).into_response())
}

/// In-memory ArchDrive server for tests.
pub struct FakeDrive {
    addr: SocketAddr,
    state: Arc<DriveState>,
    handle: JoinHandle<()>,
}

impl FakeDrive {
    /// Start a server on a random local port.
    pub async fn start() -> Self {
        let state = Arc::new(DriveState {
            store: Mutex::new(Store::default()),
            requests: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
        });

        let router = Router::new()
            .route("/api/files", get(list_files).delete(delete_file))
            .route("/api/files/upload", post(upload))
            .route("/api/files/folders", get(list_folders).post(create_folder))
            .route("/api/files/folders/:name", delete(delete_folder))
            .route("/api/files/download", get(download))
            .route("/api/files/preview", get(preview))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test server");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.ok();
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::with_base_url(&self.base_url())
    }

    /// A client pointed at this server.
    pub fn client(&self) -> StorageClient {
        StorageClient::new(&self.api_config()).expect("Failed to create client")
    }

    /// Number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }

    /// Make every following request fail with 500.
    pub fn set_failing(&self, failing: bool) {
        self.state.failing.store(failing, Ordering::SeqCst);
    }

    /// Create a folder directly in the store.
    pub fn seed_folder(&self, path: &str) -> Folder {
        let path = normalize_folder(path).expect("folder path must not be empty");
        self.state.store().add_folder(&path)
    }

    /// Create a file directly in the store.
    pub fn seed_file(&self, folder: Option<&str>, file_name: &str, content: &[u8]) -> StoredFile {
        let folder = folder.and_then(normalize_folder);
        self.state
            .store()
            .add_file(folder, file_name, content.to_vec())
    }

    pub fn file_ids(&self) -> Vec<String> {
        self.state.store().files.iter().map(|(f, _)| f.id.clone()).collect()
    }

    pub fn folder_paths(&self) -> Vec<String> {
        self.state.store().folders.iter().map(|f| f.path.clone()).collect()
    }
}

impl Drop for FakeDrive {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
