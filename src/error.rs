//! Unified error types for the API service and site tooling.

use std::path::PathBuf;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Unified error type for the service.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Static site error.
    #[error("site error: {0}")]
    Site(#[from] SiteError),

    /// Prometheus recorder could not be installed.
    #[error("metrics error: {0}")]
    Metrics(String),

    /// HTTP client could not be built.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Static site configuration, rendering, and probing errors.
#[derive(Error, Debug)]
pub enum SiteError {
    /// Failed to read a site file.
    #[error("failed to read {path}: {source}")]
    Read {
        /// The file that could not be read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Failed to write rendered output.
    #[error("failed to write {path}: {source}")]
    Write {
        /// The output path.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Site configuration is not valid TOML for the expected shape.
    #[error("failed to parse site config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Backend URL is not an absolute http(s) URL.
    #[error("invalid backend_url '{url}': {reason}")]
    InvalidBackendUrl {
        /// The configured value.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Base path must be empty or start with '/'.
    #[error("invalid baseurl '{0}': must be empty or start with '/'")]
    InvalidBaseUrl(String),

    /// Template references a value the renderer does not know.
    #[error("unknown placeholder '{name}' in {file}")]
    UnknownPlaceholder {
        /// Placeholder name as written in the template.
        name: String,
        /// Template file.
        file: PathBuf,
    },

    /// Source and output directories overlap.
    #[error("output directory {0} must not be inside the source directory")]
    OutputInsideSource(PathBuf),

    /// Backend did not answer the probe as expected.
    #[error("backend probe of {url} failed: {reason}")]
    ProbeFailed {
        /// The probed URL.
        url: String,
        /// What went wrong.
        reason: String,
    },
}

/// Body of every error response produced by the API.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error string.
    pub error: String,
}

/// Errors returned from HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request body could not be decoded.
    #[error("{message}")]
    InvalidBody {
        /// Status chosen by the extractor.
        status: StatusCode,
        /// Decoder message.
        message: String,
    },

    /// Metrics are disabled for this instance.
    #[error("metrics are disabled")]
    MetricsDisabled,
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidBody { status, .. } => *status,
            ApiError::MetricsDisabled => StatusCode::NOT_FOUND,
        };

        let body = ErrorResponse {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;
