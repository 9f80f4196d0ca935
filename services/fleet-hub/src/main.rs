//! Fleet Hub CLI
//!
//! Command-line interface for the sensor fleet dashboard service.

use std::path::PathBuf;

use clap::Parser;
use fleet_hub::{load_config, Config};
use tracing::Level;

#[derive(Parser)]
#[command(name = "fleet-hub")]
#[command(about = "Sensor fleet dashboard service")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL (overrides config file)
    #[arg(long)]
    backend_url: Option<String>,

    /// Dashboard port (overrides config file)
    #[arg(long)]
    dashboard_port: Option<u16>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    if let Some(backend_url) = args.backend_url {
        config.backend.base_url = backend_url;
    }
    if let Some(dashboard_port) = args.dashboard_port {
        config.dashboard.port = dashboard_port;
    }

    tracing::info!("Starting fleet hub");
    tracing::debug!(
        "Backend: {}, dashboard port: {}, refresh every {}s",
        config.backend.base_url,
        config.dashboard.port,
        config.refresh.interval_seconds
    );

    fleet_hub::run(config).await?;

    Ok(())
}
