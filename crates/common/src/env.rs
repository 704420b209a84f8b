//! Environment/runtime helpers
//!
//! Sanity checks to ensure directories used by the file-backed stores exist
//! at startup.

use std::path::Path;

use tracing::{info, warn};

/// Ensure a data directory exists, creating it (and parents) if needed.
pub async fn ensure_dir(dir: &str) -> anyhow::Result<()> {
    if tokio::fs::metadata(dir).await.is_ok() {
        return Ok(());
    }
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {dir}: {e}"))?;
    info!(%dir, "created data directory");
    Ok(())
}

/// Ensure the parent directory of a file path exists.
pub async fn ensure_parent_dir(file: &str) -> anyhow::Result<()> {
    match Path::new(file).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            ensure_dir(&parent.to_string_lossy()).await
        }
        _ => {
            warn!(%file, "file path has no parent directory; using working directory");
            Ok(())
        }
    }
}
