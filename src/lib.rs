//! Minimal JSON API service paired with a static frontend site.
//!
//! The API answers a fixed greeting that the static site fetches and renders,
//! accepts text highlights posted by the page, and allows cross-origin calls
//! from any origin unless `CORS_ALLOWED_ORIGINS` narrows it.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`api`]: HTTP routes, handlers, and cross-origin policy
//! - [`metrics`]: Prometheus request metrics
//! - [`site`]: Static site configuration, rendering, and backend probe
//! - [`utils`]: Logging setup and shutdown signalling

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod site;
pub mod utils;

pub use config::Config;
pub use error::{AppError, Result};
