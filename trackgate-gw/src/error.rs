//! Error types for trackgate-gw
//!
//! Every error body is JSON with an `error` field. Access denials also echo
//! the underlying message in `details`; internal faults are logged and
//! answered with a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::{BlobError, ResolveError};

/// Message returned when the catalog has no such track
pub const TRACK_NOT_FOUND: &str = "Track not found";

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("{0}")]
    NotFound(String),

    /// Access denied (403)
    #[error("Access Forbidden: {0}")]
    Forbidden(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::NotFound(_) => ApiError::NotFound(TRACK_NOT_FOUND.to_string()),
            ResolveError::Blob(BlobError::InvalidKey(ref key)) => {
                ApiError::Forbidden(format!("Invalid track identifier: {:?}", key))
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            ApiError::Forbidden(details) => {
                tracing::error!("Access forbidden: {}", details);
                (
                    StatusCode::FORBIDDEN,
                    json!({ "error": "Access Forbidden", "details": details }),
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!("Request failed: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
