//! starter-api entry point.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info};

use starter_api::api::{create_router, AppState};
use starter_api::config::{Config, CorsPolicy, LogFormat};
use starter_api::metrics;
use starter_api::site::{check_site, load_site_config, render_site, SITE_CONFIG_FILE};
use starter_api::utils::{init_tracing, shutdown_signal};

/// Minimal JSON API service and static site tooling.
#[derive(Parser, Debug)]
#[command(name = "starter-api")]
#[command(about = "Placeholder JSON API with a static frontend site")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (pretty or json). Overrides LOG_FORMAT.
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API server (default).
    Serve {
        /// Port to listen on. Overrides PORT.
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Render the static site with values from its site.toml.
    RenderSite {
        /// Site source directory.
        #[arg(long, default_value = "site")]
        source: PathBuf,

        /// Output directory.
        #[arg(long, default_value = "_site")]
        out: PathBuf,
    },

    /// Check that the backend URL configured for the site answers.
    CheckSite {
        /// Site source directory.
        #[arg(long, default_value = "site")]
        source: PathBuf,

        /// Request timeout in seconds.
        #[arg(long, default_value = "10")]
        timeout: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    let command = args.command.unwrap_or(Command::Serve { port: None });

    // API configuration drives the log format, so load it before logging is
    // up; site commands do not need it and ignore a broken environment.
    let config = Config::load();
    let (format, level) = match &config {
        Ok(c) => (args.log_format.unwrap_or(c.log_format), c.rust_log.clone()),
        Err(_) => (args.log_format.unwrap_or_default(), "info".to_string()),
    };
    init_tracing(args.verbose, format, &level);

    match command {
        Command::RenderSite { source, out } => cmd_render_site(&source, &out),
        Command::CheckSite { source, timeout } => cmd_check_site(&source, timeout).await,
        Command::CheckConfig => cmd_check_config(&loaded(config)?),
        Command::Serve { port } => cmd_serve(loaded(config)?, port).await,
    }
}

/// Surface a configuration load failure for the commands that need it.
fn loaded(config: starter_api::Result<Config>) -> anyhow::Result<Config> {
    config.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e.into()
    })
}

/// Run the HTTP API server until a shutdown signal arrives.
async fn cmd_serve(mut config: Config, port_override: Option<u16>) -> anyhow::Result<()> {
    // Override with CLI args if provided
    if let Some(port) = port_override {
        config.port = port;
    }

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    let addr = config.socket_addr()?;
    let policy = config.cors_policy()?;

    // Create app state
    let app_state = if config.metrics_enabled {
        let handle = metrics::install_recorder()?;
        metrics::spawn_upkeep(handle.clone(), metrics::UPKEEP_INTERVAL);
        AppState::with_metrics(handle)
    } else {
        info!("Metrics disabled");
        AppState::new()
    };

    let router = create_router(app_state, &policy);

    // Start HTTP server
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

/// Check configuration validity.
fn cmd_check_config(config: &Config) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("STARTER API - CONFIGURATION CHECK");
    println!("======================================================================");

    // Validate configuration
    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    // Show configuration summary
    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Listen Address: {}:{}", config.host, config.port);
    match config.cors_policy() {
        Ok(CorsPolicy::Any) => println!("  CORS: any origin (WARNING: not for production)"),
        Ok(CorsPolicy::List(origins)) => {
            println!("  CORS: {} origin(s)", origins.len());
            for origin in &origins {
                println!("    - {}", origin.to_str().unwrap_or("<non-ascii>"));
            }
        }
        Err(e) => println!("  CORS: invalid ({})", e),
    }
    println!("  Log Level: {}", config.rust_log);
    println!("  Log Format: {}", config.log_format);
    println!("  Metrics: {}", if config.metrics_enabled { "Enabled" } else { "Disabled" });
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Render the static site into an output directory.
fn cmd_render_site(source: &Path, out: &Path) -> anyhow::Result<()> {
    let (site, report) = render_site(source, out)?;
    info!("Rendered '{}' for backend {}", site.title, site.backend_url);

    println!("Rendered {} file(s), copied {} file(s) into {}",
        report.rendered.len(),
        report.copied.len(),
        out.display());

    Ok(())
}

/// Probe the backend URL configured for the static site.
async fn cmd_check_site(source: &Path, timeout_secs: u64) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("STARTER API - SITE BACKEND CHECK");
    println!("======================================================================");

    let site = load_site_config(source)?;
    println!("Site: {}", site.title);
    println!("Backend URL: {}", site.backend_url);

    print!("\nRequesting greeting... ");
    match check_site(&site, Duration::from_secs(timeout_secs)).await {
        Ok(report) => {
            println!("OK");
            println!("   URL: {}", report.url);
            println!("   Status: {}", report.status);
            println!("   Message: {}", report.message);
        }
        Err(e) => {
            println!("FAILED");
            println!("   Error: {}", e);
            println!("\nUpdate backend_url in {} after deploying the API.",
                source.join(SITE_CONFIG_FILE).display());
            return Err(e.into());
        }
    }

    println!("======================================================================");
    println!("SITE BACKEND CHECK PASSED");
    println!("======================================================================");

    Ok(())
}
