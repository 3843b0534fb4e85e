//! HTTP API route definitions.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::cors::cors_layer;
use super::docs::swagger_ui;
use super::handlers::{health, hello, highlight, prometheus, root, AppState};
use crate::config::CorsPolicy;
use crate::metrics::track_requests;

/// Create the API router.
pub fn create_router(state: AppState, policy: &CorsPolicy) -> Router {
    Router::new()
        .route("/", get(root))
        // Health endpoints
        .route("/health", get(health))
        // Frontend endpoints
        .route("/hello", get(hello))
        .route("/highlight", post(highlight))
        .route("/metrics", get(prometheus))
        .route_layer(middleware::from_fn(track_requests))
        .merge(swagger_ui())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(policy))
        .with_state(state)
}
