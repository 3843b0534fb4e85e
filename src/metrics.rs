//! Prometheus metrics for request tracking.

use std::time::{Duration, Instant};

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::AppError;

// === Metric Name Constants ===

/// HTTP request latency metric name.
pub const METRIC_HTTP_REQUEST_LATENCY: &str = "http_request_latency_ms";
/// HTTP requests counter metric name.
pub const METRIC_HTTP_REQUESTS: &str = "http_requests_total";
/// Highlights received counter metric name.
pub const METRIC_HIGHLIGHTS_RECEIVED: &str = "highlights_received_total";

/// How often buffered histogram samples are folded into their summaries.
pub const UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

static PROMETHEUS: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus recorder and register metric descriptions.
///
/// The global recorder can only be set once per process; later calls return
/// the handle created by the first one.
pub fn install_recorder() -> Result<PrometheusHandle, AppError> {
    PROMETHEUS
        .get_or_try_init(|| -> Result<PrometheusHandle, AppError> {
            let handle = PrometheusBuilder::new()
                .install_recorder()
                .map_err(|e| AppError::Metrics(e.to_string()))?;
            init_metrics();
            Ok(handle)
        })
        .cloned()
}

/// Run recorder upkeep on a fixed interval until the task is aborted.
///
/// Without it histogram samples stay buffered until the next scrape.
pub fn spawn_upkeep(handle: PrometheusHandle, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            handle.run_upkeep();
        }
    })
}

/// Initialize all metric descriptions.
fn init_metrics() {
    describe_histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "HTTP request latency in milliseconds"
    );
    describe_counter!(
        METRIC_HTTP_REQUESTS,
        "Total number of HTTP requests handled"
    );
    describe_counter!(
        METRIC_HIGHLIGHTS_RECEIVED,
        "Total number of highlights received"
    );

    debug!("Metrics initialized");
}

/// Record HTTP request latency.
pub fn record_http_latency(start: Instant, endpoint: &str) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_HTTP_REQUEST_LATENCY, "endpoint" => endpoint.to_string()).record(latency_ms);
}

/// Increment the request counter.
pub fn inc_http_requests(endpoint: &str, status: u16) {
    counter!(
        METRIC_HTTP_REQUESTS,
        "endpoint" => endpoint.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Increment highlights received counter.
pub fn inc_highlights_received() {
    counter!(METRIC_HIGHLIGHTS_RECEIVED).increment(1);
}

/// Middleware recording latency and count per matched route.
///
/// Attached with `route_layer`, so only requests that hit a route reach it and
/// the label is the route template, never the raw URI.
pub async fn track_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let Some(endpoint) = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
    else {
        return next.run(request).await;
    };

    let response = next.run(request).await;

    record_http_latency(start, &endpoint);
    inc_http_requests(&endpoint, response.status().as_u16());

    response
}
