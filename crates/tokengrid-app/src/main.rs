//! Tokengrid market table engine - Entry Point
//!
//! Seeds the instrument store, runs the simulated feed, and logs the
//! assembled table on every store version bump.

use anyhow::Result;
use clap::Parser;
use tracing::info;

/// Tokengrid market table engine
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via TOKENGRID_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    tokengrid_app::telemetry::init_logging()?;

    info!("Starting tokengrid v{}", env!("CARGO_PKG_VERSION"));

    // Determine config path: CLI arg > TOKENGRID_CONFIG env var > default
    let config_path = args
        .config
        .or_else(|| std::env::var("TOKENGRID_CONFIG").ok())
        .unwrap_or_else(|| "config/default.toml".to_string());

    info!(config_path = %config_path, "Loading configuration");

    let config = if std::path::Path::new(&config_path).exists() {
        tokengrid_app::AppConfig::from_file(&config_path)?
    } else {
        tracing::warn!(path = %config_path, "Config file not found, using defaults");
        tokengrid_app::AppConfig::default()
    };
    info!(
        tick_interval_ms = config.feed.tick_interval_ms,
        highlight_duration_ms = config.highlight.duration_ms,
        "Configuration loaded"
    );

    // Create and run application
    let app = tokengrid_app::Application::new(config)?;
    app.run().await?;

    Ok(())
}
