//! Static site support: configuration, template rendering, and a probe of
//! the backend URL the site is wired to.
//!
//! The site itself is plain files under `site/`. Placeholders of the form
//! `{{ site.title }}`, `{{ site.baseurl }}` and `{{ site.backend_url }}` are
//! filled from `site.toml` at build time; nothing is resolved at runtime.

use std::path::Path;
use std::time::Duration;

use crate::error::Result;

pub mod config;
pub mod probe;
pub mod render;

pub use config::{SiteConfig, SITE_CONFIG_FILE};
pub use probe::{probe_backend, ProbeReport};
pub use render::{build_site, render_template, BuildReport};

/// Load `site.toml` from a site source directory.
pub fn load_site_config(source: &Path) -> Result<SiteConfig> {
    Ok(SiteConfig::load(&source.join(SITE_CONFIG_FILE))?)
}

/// Load the site config from `source` and render the site into `out`.
pub fn render_site(source: &Path, out: &Path) -> Result<(SiteConfig, BuildReport)> {
    let site = load_site_config(source)?;
    let report = build_site(source, out, &site)?;
    Ok((site, report))
}

/// Probe the backend a site is wired to with a fresh client.
pub async fn check_site(site: &SiteConfig, timeout: Duration) -> Result<ProbeReport> {
    let http_client = reqwest::Client::builder().timeout(timeout).build()?;
    Ok(probe_backend(&http_client, site).await?)
}
