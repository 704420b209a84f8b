use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;
use service::office::OfficeService;

use crate::{metrics, offices, openapi::ApiDoc};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub offices: OfficeService,
}

/// Router options taken from configuration.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    pub max_photo_bytes: usize,
    /// Directory served at `/photos` when photos live on local disk.
    pub photos_dir: Option<String>,
}

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse))
)]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn metrics_handler() -> (axum::http::StatusCode, String) {
    metrics::encode_metrics()
}

/// Build the full application router: office API, health, metrics and docs.
pub fn build_router(state: AppState, cors: CorsLayer, cfg: &RouterConfig) -> Router {
    let api = Router::new()
        .route("/api/offices", get(offices::list))
        .route("/api/offices/:id/picture", get(offices::picture))
        .route("/api/offices/office", post(offices::create))
        .route(
            "/api/offices/office/:id",
            get(offices::get).put(offices::update).delete(offices::delete),
        )
        .route("/api/offices/office/:id/status", put(offices::update_status))
        .layer(DefaultBodyLimit::max(cfg.max_photo_bytes));

    let mut app = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_handler))
        .merge(api)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    if let Some(dir) = &cfg.photos_dir {
        app = app.nest_service("/photos", ServeDir::new(dir));
    }

    app.with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
