//! Reachability check of the backend URL baked into the site.

use serde_json::Value;
use tracing::{debug, info, instrument};

use super::config::SiteConfig;
use crate::error::SiteError;

/// Endpoint the site's page script calls.
pub const HELLO_PATH: &str = "/hello";

/// Result of probing the configured backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    /// URL that was requested.
    pub url: String,
    /// HTTP status returned.
    pub status: u16,
    /// `message` field of the JSON body.
    pub message: String,
}

/// Request `{backend_url}/hello` and check the greeting shape.
#[instrument(skip(client, config), fields(backend = %config.backend_url))]
pub async fn probe_backend(
    client: &reqwest::Client,
    config: &SiteConfig,
) -> Result<ProbeReport, SiteError> {
    let url = config.backend_endpoint(HELLO_PATH)?;
    let url_str = url.to_string();
    let failed = |reason: String| SiteError::ProbeFailed {
        url: url_str.clone(),
        reason,
    };

    debug!("Probing {}", url_str);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| failed(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(failed(format!("unexpected status {}", status)));
    }

    let body: Value = response
        .json()
        .await
        .map_err(|e| failed(format!("body is not JSON: {}", e)))?;

    let message = body
        .get("message")
        .and_then(Value::as_str)
        .ok_or_else(|| failed("response has no string 'message' field".to_string()))?
        .to_string();

    info!("Backend answered {} with '{}'", status.as_u16(), message);

    Ok(ProbeReport {
        url: url_str.clone(),
        status: status.as_u16(),
        message,
    })
}
