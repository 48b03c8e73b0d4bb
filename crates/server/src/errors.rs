use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

/// `{"error": ...}` envelope returned for every failed request.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub error: String,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self { status, error: error.into() }
    }

    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    /// Validation errors keep their message; everything else is logged and
    /// replaced by `generic` so storage details never reach the caller.
    pub fn from_service(err: ServiceError, generic: &str) -> Self {
        match err {
            ServiceError::Validation(msg) => Self::bad_request(msg),
            other => {
                error!(error = %other, "{}", generic);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, generic)
            }
        }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({"error": self.error}))).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
