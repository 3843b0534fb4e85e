//! HTTP API handlers.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::error::{ApiError, ErrorResponse};
use crate::metrics;

/// Message returned by `/hello`. The static site renders it verbatim.
pub const HELLO_MESSAGE: &str = "Hello from the Rust backend!";

/// Application state shared with handlers.
#[derive(Clone, Default)]
pub struct AppState {
    /// Prometheus handle, present when metrics are enabled.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state without metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create app state exposing the given recorder on `/metrics`.
    pub fn with_metrics(handle: PrometheusHandle) -> Self {
        Self {
            prometheus: Some(handle),
        }
    }
}

/// Service banner returned from `/`.
#[derive(Debug, Serialize, ToSchema)]
pub struct RootResponse {
    /// Crate name.
    pub service: &'static str,
    /// Crate version.
    pub version: &'static str,
    /// Status: "ok".
    pub status: &'static str,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Greeting response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HelloResponse {
    /// Fixed greeting.
    pub message: &'static str,
}

/// A span of text selected in the frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Highlight {
    /// Selected text.
    pub text: String,
    /// Start offset of the selection.
    pub start: u64,
    /// End offset of the selection.
    pub end: u64,
}

/// Acknowledgement of a received highlight.
#[derive(Debug, Serialize, ToSchema)]
pub struct HighlightReceipt {
    /// Status: "success".
    pub status: &'static str,
    /// The highlight as received.
    pub received: Highlight,
}

/// Root handler - returns the service banner.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service banner", body = RootResponse))
)]
pub async fn root() -> impl IntoResponse {
    Json(RootResponse {
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        status: "ok",
    })
}

/// Health check handler - always returns 200.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Greeting handler consumed by the static site.
#[utoipa::path(
    get,
    path = "/hello",
    responses((status = 200, description = "Fixed greeting", body = HelloResponse))
)]
pub async fn hello() -> impl IntoResponse {
    Json(HelloResponse {
        message: HELLO_MESSAGE,
    })
}

/// Highlight handler - logs the selection and echoes it back.
#[utoipa::path(
    post,
    path = "/highlight",
    request_body = Highlight,
    responses(
        (status = 200, description = "Highlight received", body = HighlightReceipt),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 415, description = "Missing JSON content type", body = ErrorResponse),
        (status = 422, description = "Body does not match the schema", body = ErrorResponse)
    )
)]
pub async fn highlight(
    payload: Result<Json<Highlight>, JsonRejection>,
) -> Result<Json<HighlightReceipt>, ApiError> {
    let Json(hl) = payload?;

    info!("Received highlight: '{}' from {} to {}", hl.text, hl.start, hl.end);
    metrics::inc_highlights_received();

    Ok(Json(HighlightReceipt {
        status: "success",
        received: hl,
    }))
}

/// Prometheus exposition handler.
pub async fn prometheus(State(state): State<AppState>) -> Result<Response, ApiError> {
    let handle = state.prometheus.as_ref().ok_or(ApiError::MetricsDisabled)?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        handle.render(),
    )
        .into_response())
}
