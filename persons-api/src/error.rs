//! Error types for persons-api
//!
//! Handlers return [`ApiError`], which renders as `{"error": "<message>"}`.
//! Internal failures only expose a per-operation message; the cause is logged.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Request exceeded its deadline (504)
    #[error("Request timed out")]
    Timeout,

    /// Internal server error (500)
    #[error("{context}: {source}")]
    Internal {
        context: &'static str,
        #[source]
        source: persons_common::Error,
    },
}

impl ApiError {
    /// Map a domain error from the operation named by `context`
    ///
    /// Returns a closure so it slots into `map_err`.
    pub fn failed(context: &'static str) -> impl FnOnce(persons_common::Error) -> ApiError {
        move |err| match err {
            persons_common::Error::NotFound(msg) => ApiError::NotFound(msg),
            persons_common::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            source => ApiError::Internal { context, source },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Timeout => (StatusCode::GATEWAY_TIMEOUT, "request timed out".to_string()),
            ApiError::Internal { context, source } => {
                error!(error = %source, "{}", context);
                (StatusCode::INTERNAL_SERVER_ERROR, context.to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
