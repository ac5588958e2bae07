//! header-compliance server
//!
//! Serves `/cookie`, reporting the cookies and tolerated violations of each
//! request under the configured compliance mode.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server (request ID, trace, timeout)
//!                         │
//!                         ▼
//!                     compliance::evaluate ──▶ host::validate ──▶ 400 + close
//!                         │
//!                         ▼
//!                     cookie::parse ──▶ cookie_handler ──▶ properties report
//!
//!     Cross-cutting: config (TOML), lifecycle (startup/shutdown),
//!                    observability (tracing, Prometheus counters)
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use header_compliance::config::{load_config, ServerConfig};
use header_compliance::lifecycle::{resolve_mode, signals, Shutdown, StartupError};
use header_compliance::observability::{logging, metrics};
use header_compliance::HttpServer;

#[derive(Parser)]
#[command(name = "header-compliance")]
#[command(about = "HTTP Cookie and Host header compliance server", long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Compliance mode, overriding `compliance.mode`
    #[arg(short, long)]
    mode: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let loaded = match &args.config {
        Some(path) => load_config(path),
        None => Ok(ServerConfig::default()),
    };
    let level = loaded
        .as_ref()
        .map(|c| c.observability.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    logging::init_logging(&level);

    tracing::info!("header-compliance v{} starting", env!("CARGO_PKG_VERSION"));

    let config = loaded.map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        StartupError::from(e)
    })?;

    let mode = resolve_mode(&config.compliance, args.mode.as_deref()).map_err(|e| {
        tracing::error!(error = %e, "Failed to resolve compliance mode");
        StartupError::from(e)
    })?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        record_violations = config.compliance.record_violations,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .map_err(StartupError::from)?;

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, mode);
    let server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    signals::shutdown_signal().await;
    shutdown.trigger();

    server_task.await??;
    tracing::info!("Shutdown complete");
    Ok(())
}
