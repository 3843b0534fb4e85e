//! Template substitution and site output.

use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::{debug, info, instrument};

use super::config::{SiteConfig, SITE_CONFIG_FILE};
use crate::error::SiteError;

/// `{{ name }}` with optional inner whitespace.
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([A-Za-z0-9_.]+)\s*\}\}").expect("valid regex"));

/// Extensions rendered through the template engine. Everything else is copied.
const TEMPLATE_EXTENSIONS: &[&str] = &["html", "htm", "md", "txt", "js", "css"];

/// Templates whose substituted values are HTML-escaped.
const MARKUP_EXTENSIONS: &[&str] = &["html", "htm", "md"];

/// Outcome of a site build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Files rendered through the template engine.
    pub rendered: Vec<PathBuf>,
    /// Files copied verbatim.
    pub copied: Vec<PathBuf>,
}

/// Substitute every placeholder in `template`.
///
/// `file` names the template in errors and selects escaping: values land
/// HTML-escaped in markup files and verbatim everywhere else.
pub fn render_template(template: &str, config: &SiteConfig, file: &Path) -> Result<String, SiteError> {
    let markup = has_extension(file, MARKUP_EXTENSIONS);
    let mut unknown = None;

    let rendered = PLACEHOLDER.replace_all(template, |caps: &Captures| {
        let name = &caps[1];
        match config.lookup(name) {
            Some(value) if markup => escape_html(value),
            Some(value) => value.to_string(),
            None => {
                unknown.get_or_insert_with(|| name.to_string());
                caps[0].to_string()
            }
        }
    });

    if let Some(name) = unknown {
        return Err(SiteError::UnknownPlaceholder {
            name,
            file: file.to_path_buf(),
        });
    }

    Ok(rendered.into_owned())
}

/// Render `source` into `out`, preserving the directory layout.
#[instrument(skip(config), fields(title = %config.title))]
pub fn build_site(source: &Path, out: &Path, config: &SiteConfig) -> Result<BuildReport, SiteError> {
    fs::create_dir_all(out).map_err(|source| SiteError::Write {
        path: out.to_path_buf(),
        source,
    })?;

    // Canonical paths so `..` and symlinks cannot hide an overlap.
    let source_abs = canonical(source)?;
    let out_abs = canonical(out)?;
    if out_abs.starts_with(&source_abs) {
        return Err(SiteError::OutputInsideSource(out.to_path_buf()));
    }

    let mut report = BuildReport::default();
    build_dir(source, source, out, config, &mut report)?;

    report.rendered.sort();
    report.copied.sort();

    info!(
        "Site built into {}: {} rendered, {} copied",
        out.display(),
        report.rendered.len(),
        report.copied.len()
    );

    Ok(report)
}

fn build_dir(
    root: &Path,
    dir: &Path,
    out: &Path,
    config: &SiteConfig,
    report: &mut BuildReport,
) -> Result<(), SiteError> {
    let entries = fs::read_dir(dir).map_err(|source| SiteError::Read {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| SiteError::Read {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        // Hidden files and the generator's own config are not published.
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with('.') || (dir == root && name == SITE_CONFIG_FILE) {
            continue;
        }

        let relative = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
        let target = out.join(&relative);

        if path.is_dir() {
            build_dir(root, &path, out, config, report)?;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|source| SiteError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        if is_template(&path) {
            let template = fs::read_to_string(&path).map_err(|source| SiteError::Read {
                path: path.clone(),
                source,
            })?;
            let rendered = render_template(&template, config, &relative)?;
            fs::write(&target, rendered).map_err(|source| SiteError::Write {
                path: target.clone(),
                source,
            })?;
            debug!("Rendered {}", relative.display());
            report.rendered.push(relative);
        } else {
            fs::copy(&path, &target).map_err(|source| SiteError::Write {
                path: target.clone(),
                source,
            })?;
            debug!("Copied {}", relative.display());
            report.copied.push(relative);
        }
    }

    Ok(())
}

fn is_template(path: &Path) -> bool {
    has_extension(path, TEMPLATE_EXTENSIONS)
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn canonical(path: &Path) -> Result<PathBuf, SiteError> {
    fs::canonicalize(path).map_err(|source| SiteError::Read {
        path: path.to_path_buf(),
        source,
    })
}
