//! HTTP API module: greeting, highlight, health, and metrics endpoints.

pub mod cors;
pub mod docs;
pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
