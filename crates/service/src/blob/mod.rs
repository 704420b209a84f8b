//! Object storage for office photos.
//!
//! A [`BlobStore`] keeps named binary objects in one container and hands
//! back URLs. Backends: S3-compatible HTTP ([`http::HttpBlobStore`]), a
//! local directory ([`local::LocalBlobStore`]) and an in-memory mock.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use uuid::Uuid;

pub mod http;
pub mod local;

/// Blob store failures. `NotFound` is the only one the service layer
/// translates into a domain error.
#[derive(Debug, Error)]
pub enum BlobError {
    #[error("The file with the name: {0} does not exist")]
    NotFound(String),
    #[error("invalid blob name: {0}")]
    InvalidName(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("object store returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Photo payload owned by one request.
///
/// Moved into the service call and on into [`BlobStore::upload`]; the
/// buffer is released when the value drops, on every exit path.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub content: Bytes,
    pub content_type: String,
    pub file_name: Option<String>,
}

impl PhotoUpload {
    pub fn new(content: impl Into<Bytes>, content_type: impl Into<String>, file_name: Option<String>) -> Self {
        Self { content: content.into(), content_type: content_type.into(), file_name }
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Create the container if it does not exist yet.
    async fn ensure_container(&self) -> Result<(), BlobError>;
    /// Store `photo` under `name`, replacing any object with that name.
    async fn upload(&self, photo: PhotoUpload, name: &str) -> Result<String, BlobError>;
    /// Remove `name`. Absent objects are not an error.
    async fn delete(&self, name: &str) -> Result<(), BlobError>;
    /// URL of an existing object; `NotFound` if it does not exist.
    async fn get_url(&self, name: &str) -> Result<String, BlobError>;
}

const DEFAULT_FILE_NAME: &str = "photo";

const UPLOAD_TAG_LEN: usize = 12;

/// Blob name for one photo upload: `{office_id}_{tag}_{file_name}`.
///
/// `tag` is the first hex digits of `upload_id`, so every upload gets its
/// own name even when the file name repeats. The file name is reduced to
/// `[A-Za-z0-9._-]`; anything else becomes `_`. Without a file name the
/// suffix is `photo`.
pub fn blob_name(office_id: Uuid, upload_id: Uuid, file_name: Option<&str>) -> String {
    let cleaned: String = file_name
        .map(|n| n.rsplit(['/', '\\']).next().unwrap_or(n))
        .unwrap_or("")
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '_' })
        .collect();
    let cleaned = cleaned.trim_matches('.');
    let suffix = if cleaned.is_empty() { DEFAULT_FILE_NAME } else { cleaned };
    let upload = upload_id.simple().to_string();
    format!("{office_id}_{}_{suffix}", &upload[..UPLOAD_TAG_LEN])
}

/// Blob name addressed by a stored photo reference (its last path segment).
pub fn name_from_reference(reference: &str) -> &str {
    let path = reference.split(['?', '#']).next().unwrap_or(reference);
    path.rsplit('/').next().unwrap_or(path)
}

pub(crate) fn check_name(name: &str) -> Result<(), BlobError> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(BlobError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Simple in-memory blob store for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::RwLock;

    pub struct MockBlobStore {
        base_url: String,
        blobs: RwLock<HashMap<String, PhotoUpload>>,
        uploads: AtomicUsize,
        deletes: AtomicUsize,
    }

    impl Default for MockBlobStore {
        fn default() -> Self {
            Self::new("http://blobs.test/offices")
        }
    }

    impl MockBlobStore {
        pub fn new(base_url: &str) -> Self {
            Self {
                base_url: base_url.trim_end_matches('/').to_string(),
                blobs: RwLock::new(HashMap::new()),
                uploads: AtomicUsize::new(0),
                deletes: AtomicUsize::new(0),
            }
        }

        pub fn upload_count(&self) -> usize {
            self.uploads.load(Ordering::SeqCst)
        }

        pub fn delete_count(&self) -> usize {
            self.deletes.load(Ordering::SeqCst)
        }

        pub fn call_count(&self) -> usize {
            self.upload_count() + self.delete_count()
        }

        pub async fn contains(&self, name: &str) -> bool {
            self.blobs.read().await.contains_key(name)
        }

        pub async fn len(&self) -> usize {
            self.blobs.read().await.len()
        }

        /// Stored blob names, sorted.
        pub async fn names(&self) -> Vec<String> {
            let mut names: Vec<String> = self.blobs.read().await.keys().cloned().collect();
            names.sort();
            names
        }

        pub async fn get(&self, name: &str) -> Option<PhotoUpload> {
            self.blobs.read().await.get(name).cloned()
        }

        fn url(&self, name: &str) -> String {
            format!("{}/{}", self.base_url, name)
        }
    }

    #[async_trait]
    impl BlobStore for MockBlobStore {
        async fn ensure_container(&self) -> Result<(), BlobError> {
            Ok(())
        }

        async fn upload(&self, photo: PhotoUpload, name: &str) -> Result<String, BlobError> {
            check_name(name)?;
            self.uploads.fetch_add(1, Ordering::SeqCst);
            self.blobs.write().await.insert(name.to_string(), photo);
            Ok(self.url(name))
        }

        async fn delete(&self, name: &str) -> Result<(), BlobError> {
            check_name(name)?;
            self.deletes.fetch_add(1, Ordering::SeqCst);
            self.blobs.write().await.remove(name);
            Ok(())
        }

        async fn get_url(&self, name: &str) -> Result<String, BlobError> {
            check_name(name)?;
            if self.blobs.read().await.contains_key(name) {
                Ok(self.url(name))
            } else {
                Err(BlobError::NotFound(name.to_string()))
            }
        }
    }
}
