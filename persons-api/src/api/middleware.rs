//! Request deadline middleware

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::error::ApiError;
use crate::AppState;

/// Bound every request by the configured timeout
///
/// On expiry the handler future is dropped, which abandons in-flight
/// enrichment calls and rolls back any open transaction.
pub async fn request_timeout(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    match tokio::time::timeout(state.request_timeout, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            warn!(
                method = %method,
                uri = %uri,
                timeout_ms = state.request_timeout.as_millis() as u64,
                "Request deadline exceeded"
            );
            ApiError::Timeout.into_response()
        }
    }
}
