//! Runtime wiring helpers
//!
//! Picks the document store and blob store named by configuration,
//! prepares their on-disk or remote prerequisites and returns a ready
//! [`OfficeService`]. Binary crates go through here instead of touching
//! `models`, `migration` or `common` directly.

use std::sync::Arc;

use anyhow::Context;
use configs::{AppConfig, BlobBackend, StorageBackend};
use migration::MigratorTrait;
use tracing::info;

use crate::blob::{http::HttpBlobStore, local::LocalBlobStore, BlobStore};
use crate::office::repo::{json::JsonOfficeRepository, seaorm::SeaOrmOfficeRepository};
use crate::office::repository::OfficeRepository;
use crate::office::OfficeService;

/// Open the configured document store. Postgres is migrated up first.
pub async fn build_repository(cfg: &AppConfig) -> anyhow::Result<Arc<dyn OfficeRepository>> {
    match cfg.storage.backend {
        StorageBackend::Postgres => {
            let db = models::db::connect_with_config(&cfg.database).await?;
            migration::Migrator::up(&db, None).await.context("run migrations")?;
            info!("document store: postgres");
            Ok(Arc::new(SeaOrmOfficeRepository { db }))
        }
        StorageBackend::Json => {
            common::env::ensure_parent_dir(&cfg.storage.json_path).await?;
            let repo = JsonOfficeRepository::open(&cfg.storage.json_path).await?;
            info!(path = %cfg.storage.json_path, "document store: json file");
            Ok(Arc::new(repo))
        }
    }
}

/// Open the configured blob store and make sure its container exists.
pub async fn build_blob_store(cfg: &AppConfig) -> anyhow::Result<Arc<dyn BlobStore>> {
    let store: Arc<dyn BlobStore> = match cfg.blob.backend {
        BlobBackend::Http => {
            info!(endpoint = %cfg.blob.endpoint, container = %cfg.blob.container, "blob store: http");
            Arc::new(HttpBlobStore::from_config(&cfg.blob)?)
        }
        BlobBackend::Local => {
            common::env::ensure_dir(&cfg.blob.local_root).await?;
            info!(root = %cfg.blob.local_root, "blob store: local directory");
            Arc::new(LocalBlobStore::from_config(&cfg.blob))
        }
    };
    store.ensure_container().await.context("ensure blob container")?;
    Ok(store)
}

pub async fn build_office_service(cfg: &AppConfig) -> anyhow::Result<OfficeService> {
    let repo = build_repository(cfg).await?;
    let blobs = build_blob_store(cfg).await?;
    Ok(OfficeService::new(repo, blobs))
}
