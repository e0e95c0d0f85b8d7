//! HTTP API handlers for persons-api

pub mod health;
pub mod middleware;
pub mod pagination;
pub mod persons;

pub use health::health_routes;
pub use middleware::request_timeout;
pub use persons::{
    create_person, delete_person, filter_persons, get_person, list_persons, update_person,
};

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

/// Person routes, relative to the API base path
pub fn person_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/persons",
            post(create_person).put(update_person).get(list_persons),
        )
        .route("/persons/filtered", get(filter_persons))
        .route("/persons/:id", get(get_person).delete(delete_person))
}
