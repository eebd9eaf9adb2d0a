use axum::{routing::get, Router};

use crate::handlers::{events, health};
use crate::AppState;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Events relay
        .route("/events", get(events::get_events))
}

/// Health check plus everything under `/api`, without middleware or static
/// files.
pub fn app_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_routes())
        .with_state(state)
}
