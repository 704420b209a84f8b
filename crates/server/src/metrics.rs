use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};
use service::errors::ServiceError;

use crate::errors::JsonApiError;

// Prometheus metrics (default registry)
pub static OFFICE_OPERATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "offices_operations_total",
        "Office operations handled, by operation",
        &["operation"]
    )
    .expect("register offices_operations_total")
});

pub static OFFICE_FAILURES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "offices_failures_total",
        "Failed office operations, by operation and error kind",
        &["operation", "kind"]
    )
    .expect("register offices_failures_total")
});

fn kind(e: &ServiceError) -> &'static str {
    match e {
        ServiceError::Validation(_) => "validation",
        ServiceError::NotFound(_) => "not_found",
        ServiceError::Db(_) | ServiceError::Model(_) => "document_store",
        ServiceError::Blob(_) => "blob_store",
    }
}

/// Count one service call and convert its error for the HTTP layer.
pub fn observe<T>(operation: &'static str, res: Result<T, ServiceError>) -> Result<T, JsonApiError> {
    OFFICE_OPERATIONS_TOTAL.with_label_values(&[operation]).inc();
    res.map_err(|e| {
        OFFICE_FAILURES_TOTAL.with_label_values(&[operation, kind(&e)]).inc();
        e.into()
    })
}

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}
