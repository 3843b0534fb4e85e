//! Application configuration loaded from environment variables.

use std::net::{IpAddr, SocketAddr};

use axum::http::HeaderValue;
use serde::Deserialize;
use strum::{Display, EnumString};
use url::Url;

use crate::error::{AppError, Result};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    /// Human-readable output.
    #[default]
    Pretty,
    /// One JSON object per line, for log aggregation on hosted platforms.
    Json,
}

/// Which browser origins may read API responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsPolicy {
    /// Every origin is allowed. Not suitable for production.
    Any,
    /// Only the listed origins are allowed.
    List(Vec<HeaderValue>),
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server Configuration ===
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP port. Hosting platforms usually inject `PORT`.
    #[serde(default = "default_port")]
    pub port: u16,

    // === Cross-Origin Policy ===
    /// `*` or a comma-separated list of allowed origins.
    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: String,

    // === Observability ===
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Log output format: pretty or json.
    #[serde(default)]
    pub log_format: LogFormat,

    /// Expose Prometheus metrics on `/metrics`.
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cors_origins() -> String {
    "*".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_allowed_origins: default_cors_origins(),
            rust_log: default_log_level(),
            log_format: LogFormat::default(),
            metrics_enabled: default_true(),
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Ok(envy::from_env()?)
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(invalid("PORT must be non-zero".to_string()));
        }

        self.socket_addr()?;
        self.cors_policy()?;

        Ok(())
    }

    /// Address the HTTP server binds to.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .host
            .trim()
            .parse()
            .map_err(|_| invalid(format!("HOST is not a valid IP address: {}", self.host)))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Parse `CORS_ALLOWED_ORIGINS` into a policy.
    pub fn cors_policy(&self) -> Result<CorsPolicy> {
        let raw = self.cors_allowed_origins.trim();
        if raw.is_empty() || raw == "*" {
            return Ok(CorsPolicy::Any);
        }

        let mut origins = Vec::new();
        for entry in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            origins.push(parse_origin(entry).map_err(invalid)?);
        }

        if origins.is_empty() {
            return Ok(CorsPolicy::Any);
        }

        Ok(CorsPolicy::List(origins))
    }
}

fn invalid(reason: String) -> AppError {
    AppError::InvalidConfig(reason)
}

/// Validate a single origin entry and convert it to a header value.
fn parse_origin(entry: &str) -> std::result::Result<HeaderValue, String> {
    if entry == "*" {
        return Err("CORS_ALLOWED_ORIGINS cannot mix '*' with explicit origins".to_string());
    }

    let url = Url::parse(entry)
        .map_err(|e| format!("invalid origin '{}' in CORS_ALLOWED_ORIGINS: {}", entry, e))?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(format!(
            "origin '{}' must be an absolute http(s) origin",
            entry
        ));
    }

    // Browsers send origins without a trailing slash or path.
    let origin = url.origin().ascii_serialization();
    HeaderValue::from_str(&origin).map_err(|e| format!("invalid origin '{}': {}", entry, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values_are_sensible() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8000);
        assert_eq!(config.cors_allowed_origins, "*");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.metrics_enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_port() {
        let config = Config {
            port: 0,
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_unparsable_host() {
        let config = Config {
            host: "not-an-ip".to_string(),
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn wildcard_origin_is_any() {
        let config = Config::default();
        assert_eq!(config.cors_policy().unwrap(), CorsPolicy::Any);
    }

    #[test]
    fn origin_list_is_normalized() {
        let config = Config {
            cors_allowed_origins: "https://example.github.io/, http://localhost:4000".to_string(),
            ..Config::default()
        };

        let policy = config.cors_policy().unwrap();
        assert_eq!(
            policy,
            CorsPolicy::List(vec![
                HeaderValue::from_static("https://example.github.io"),
                HeaderValue::from_static("http://localhost:4000"),
            ])
        );
    }

    #[test]
    fn validate_rejects_bad_origin() {
        let config = Config {
            cors_allowed_origins: "https://ok.example, ftp://files.example".to_string(),
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn validation_failures_are_invalid_config() {
        let config = Config {
            cors_allowed_origins: "not a url".to_string(),
            ..Config::default()
        };

        match config.validate() {
            Err(AppError::InvalidConfig(reason)) => assert!(reason.contains("not a url")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_mixed_wildcard() {
        let config = Config {
            cors_allowed_origins: "*, https://ok.example".to_string(),
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn log_format_parses_case_insensitively() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::Json.to_string(), "json");
    }
}
