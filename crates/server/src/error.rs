// crates/server/src/error.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::jobs::RegistryError;

/// Structured JSON error body for API errors.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

/// Body returned for a rejected submission: one message per failed field.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct ValidationResponse {
    pub errors: Vec<String>,
}

/// API error types that map to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid submission")]
    Validation(Vec<String>),

    #[error("a report job is already running")]
    AlreadyRunning,

    #[error("job not found: {0}")]
    NotFound(String),

    #[error("report file is not ready")]
    NotReady,

    #[error("downloaded file is missing")]
    ArtifactMissing,

    #[error("internal server error: {0}")]
    Internal(String),
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::AlreadyRunning => ApiError::AlreadyRunning,
            RegistryError::NotFound(id) => ApiError::NotFound(id),
            RegistryError::NotReady => ApiError::NotReady,
            // A rejected step transition reaching the HTTP layer is a bug.
            RegistryError::Job(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                tracing::warn!(error_count = errors.len(), "submission rejected");
                (StatusCode::BAD_REQUEST, Json(ValidationResponse { errors })).into_response()
            }
            ApiError::AlreadyRunning => {
                tracing::warn!("submission rejected: a job is already running");
                (
                    StatusCode::CONFLICT,
                    Json(ErrorResponse::new("A report job is already running.")),
                )
                    .into_response()
            }
            ApiError::NotFound(id) => {
                tracing::warn!(job_id = %id, "job not found");
                (StatusCode::NOT_FOUND, Json(ErrorResponse::new("Job not found"))).into_response()
            }
            ApiError::NotReady => {
                tracing::warn!("download requested before the report was ready");
                (StatusCode::BAD_REQUEST, Json(ErrorResponse::new("File is not ready")))
                    .into_response()
            }
            ApiError::ArtifactMissing => {
                tracing::error!("recorded report file is missing on disk");
                (
                    StatusCode::NOT_FOUND,
                    Json(ErrorResponse::new("Downloaded file is missing")),
                )
                    .into_response()
            }
            ApiError::Internal(msg) => {
                tracing::error!(message = %msg, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new("Internal server error")),
                )
                    .into_response()
            }
        }
    }
}

/// Result type alias for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
