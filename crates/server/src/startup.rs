use std::net::SocketAddr;

use configs::{AppConfig, BlobBackend};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, AppState, RouterConfig};
use service::runtime;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address: {e}")))
}

fn router_config(cfg: &AppConfig) -> RouterConfig {
    RouterConfig {
        max_photo_bytes: cfg.server.max_photo_bytes,
        photos_dir: (cfg.blob.backend == BlobBackend::Local).then(|| cfg.blob.local_root.clone()),
    }
}

/// Public entry: build the app from configuration and run the HTTP server
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let offices = runtime::build_office_service(&cfg)
        .await
        .map_err(|e| StartupError::Runtime(format!("{e:#}")))?;
    let state = AppState { offices };

    let app = routes::build_router(state, build_cors(), &router_config(&cfg));

    let addr = bind_addr(&cfg)?;
    info!(%addr, storage = ?cfg.storage.backend, blob = ?cfg.blob.backend, "starting offices server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
