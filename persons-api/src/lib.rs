//! persons-api library - person records with name-based enrichment
//!
//! CRUD over persons, enriched at creation with age, gender and nationality
//! inferred from the person's name by three external sources.

use axum::{middleware, Router};
use chrono::{DateTime, Utc};
use std::time::Duration;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod clients;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

pub use error::{ApiError, ApiResult};
pub use services::PersonService;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub service: PersonService,
    /// Upper bound on each request
    pub request_timeout: Duration,
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(service: PersonService, request_timeout: Duration) -> Self {
        Self {
            service,
            request_timeout,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
///
/// Person routes live under `/api`; `/health` stays at the root. Every
/// request is traced and bounded by the configured timeout.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api::person_routes())
        .merge(api::health_routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
