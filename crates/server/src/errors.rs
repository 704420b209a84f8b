use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use service::errors::{FieldError, ServiceError};
use thiserror::Error;
use tracing::error;

/// JSON error body: `{statusCode, message, errors?}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub message: String,
    pub errors: Vec<FieldError>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into(), errors: Vec::new() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, message: "One or more validation errors occurred.".into(), errors }
    }
}

/// Infrastructure details stay in the log; clients only see a generic 500.
impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(errors) => Self::validation(errors),
            ServiceError::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, msg),
            other => {
                error!(error = %other, "request failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { status_code: self.status.as_u16(), message: self.message, errors: self.errors };
        (self.status, Json(body)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("runtime check failed: {0}")]
    Runtime(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_service_errors_to_status() {
        let e: JsonApiError = ServiceError::Validation(vec![FieldError::new("address", "bad")]).into();
        assert_eq!(e.status, StatusCode::BAD_REQUEST);
        assert_eq!(e.errors.len(), 1);

        let e: JsonApiError = ServiceError::NotFound("gone".into()).into();
        assert_eq!(e.status, StatusCode::NOT_FOUND);
        assert_eq!(e.message, "gone");

        let e: JsonApiError = ServiceError::Db("connection refused".into()).into();
        assert_eq!(e.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(e.message, "Internal Server Error");
    }
}
