//! Directory-backed blob store.
//!
//! Objects are plain files under `root`; URLs are `{public_base_url}/{name}`
//! and the HTTP server serves `root` at that prefix.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, info, instrument};

use super::{check_name, BlobError, BlobStore, PhotoUpload};

pub struct LocalBlobStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self { root: root.into(), public_base_url: public_base_url.trim_end_matches('/').to_string() }
    }

    pub fn from_config(cfg: &configs::BlobConfig) -> Self {
        Self::new(&cfg.local_root, &cfg.public_base_url)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, name: &str) -> Result<PathBuf, BlobError> {
        check_name(name)?;
        Ok(self.root.join(name))
    }

    fn url(&self, name: &str) -> String {
        format!("{}/{}", self.public_base_url, name)
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn ensure_container(&self) -> Result<(), BlobError> {
        fs::create_dir_all(&self.root).await?;
        info!(root = %self.root.display(), "local blob directory ready");
        Ok(())
    }

    #[instrument(skip(self, photo), fields(blob = %name, bytes = photo.len()))]
    async fn upload(&self, photo: PhotoUpload, name: &str) -> Result<String, BlobError> {
        let path = self.path(name)?;
        fs::write(&path, &photo.content).await?;
        info!("blob uploaded");
        Ok(self.url(name))
    }

    #[instrument(skip(self), fields(blob = %name))]
    async fn delete(&self, name: &str) -> Result<(), BlobError> {
        let path = self.path(name)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if fs::metadata(&self.root).await.is_err() {
                    return Err(BlobError::NotFound(name.to_string()));
                }
                debug!("blob already absent");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self), fields(blob = %name))]
    async fn get_url(&self, name: &str) -> Result<String, BlobError> {
        let path = self.path(name)?;
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(self.url(name)),
            Ok(_) => Err(BlobError::NotFound(name.to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(BlobError::NotFound(name.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}
