//! Static site configuration (`site.toml`).

use std::path::Path;

use serde::Deserialize;
use url::Url;

use crate::error::SiteError;

/// File name of the site configuration inside the source directory.
pub const SITE_CONFIG_FILE: &str = "site.toml";

/// Values the static site generator substitutes into templates.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SiteConfig {
    /// Page title.
    pub title: String,

    /// Base path the site is served under, e.g. `/my-repo` on a project page.
    #[serde(default)]
    pub baseurl: String,

    /// Public URL of the deployed API service.
    pub backend_url: String,
}

impl SiteConfig {
    /// Read and validate a site configuration file.
    pub fn load(path: &Path) -> Result<Self, SiteError> {
        let raw = std::fs::read_to_string(path).map_err(|source| SiteError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&raw)
    }

    /// Parse and validate a site configuration from TOML text.
    pub fn from_toml(raw: &str) -> Result<Self, SiteError> {
        let config: SiteConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the base path and backend URL.
    ///
    /// Both end up inside attribute values and a script string literal, so
    /// quoting and markup characters are rejected rather than escaped.
    pub fn validate(&self) -> Result<(), SiteError> {
        if !self.baseurl.is_empty() && !self.baseurl.starts_with('/') {
            return Err(SiteError::InvalidBaseUrl(self.baseurl.clone()));
        }

        if self.baseurl.chars().any(is_unsafe_url_char) {
            return Err(SiteError::InvalidBaseUrl(self.baseurl.clone()));
        }

        if self.backend_url.chars().any(is_unsafe_url_char) {
            return Err(SiteError::InvalidBackendUrl {
                url: self.backend_url.clone(),
                reason: "contains whitespace, quotes or markup characters".to_string(),
            });
        }

        let url = Url::parse(&self.backend_url).map_err(|e| SiteError::InvalidBackendUrl {
            url: self.backend_url.clone(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(SiteError::InvalidBackendUrl {
                url: self.backend_url.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        if url.host_str().is_none() {
            return Err(SiteError::InvalidBackendUrl {
                url: self.backend_url.clone(),
                reason: "missing host".to_string(),
            });
        }

        if url.query().is_some() || url.fragment().is_some() {
            return Err(SiteError::InvalidBackendUrl {
                url: self.backend_url.clone(),
                reason: "must be a base URL without query or fragment".to_string(),
            });
        }

        Ok(())
    }

    /// Absolute URL of an API endpoint under the backend base URL.
    pub fn backend_endpoint(&self, path: &str) -> Result<Url, SiteError> {
        let joined = format!(
            "{}/{}",
            self.backend_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| SiteError::InvalidBackendUrl {
            url: joined,
            reason: e.to_string(),
        })
    }

    /// Look up a template placeholder by name.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        match name {
            "site.title" => Some(&self.title),
            "site.baseurl" => Some(&self.baseurl),
            "site.backend_url" => Some(&self.backend_url),
            _ => None,
        }
    }
}

fn is_unsafe_url_char(c: char) -> bool {
    c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '`' | '\\' | '<' | '>' | '&')
}
