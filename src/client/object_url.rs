//! In-memory blob registry addressed by object URLs.
//!
//! Every preview registers its bytes here and hands out an [`ObjectUrl`].
//! The holder must revoke the URL when done; until then the bytes stay
//! alive for the rest of the session.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::warn;
use uuid::Uuid;

/// Scheme prefix of every object URL handed out by the registry.
pub const OBJECT_URL_PREFIX: &str = "blob:archdrive/";

/// Handle to a blob held by [`ObjectUrls`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectUrl(String);

impl ObjectUrl {
    /// The URL string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bytes plus their content type.
#[derive(Debug, Clone)]
pub struct Blob {
    bytes: Arc<[u8]>,
    content_type: String,
}

impl Blob {
    /// Blob content.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// MIME type reported by the server.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the blob is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Shared registry of live object URLs. Clones share the same registry.
#[derive(Debug, Clone, Default)]
pub struct ObjectUrls {
    blobs: Arc<Mutex<HashMap<ObjectUrl, Blob>>>,
}

impl ObjectUrls {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ObjectUrl, Blob>> {
        self.blobs
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register bytes and return a fresh URL for them.
    pub fn create(&self, bytes: Vec<u8>, content_type: impl Into<String>) -> ObjectUrl {
        let url = ObjectUrl(format!("{OBJECT_URL_PREFIX}{}", Uuid::new_v4()));
        let blob = Blob {
            bytes: Arc::from(bytes),
            content_type: content_type.into(),
        };

        self.lock().insert(url.clone(), blob);
        url
    }

    /// Look up a live blob.
    pub fn get(&self, url: &ObjectUrl) -> Option<Blob> {
        self.lock().get(url).cloned()
    }

    /// Release a URL. Returns `false` if it was already released.
    pub fn revoke(&self, url: &ObjectUrl) -> bool {
        let released = self.lock().remove(url).is_some();
        if !released {
            warn!(url = %url, "object URL revoked twice");
        }
        released
    }

    /// Number of URLs not yet revoked.
    pub fn live_count(&self) -> usize {
        self.lock().len()
    }
}
