pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod principal;
pub mod producer;
pub mod store;
pub mod telemetry;
pub mod views;

use axum::{routing::get, Router};

use crate::handlers::{health, publish};
use crate::models::AppState;

/// Builds the HTTP router with all routes bound to `state`.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/:topic/:message", get(publish))
        .with_state(state)
}
