//! Multi-source gateway with response-header reconciliation.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                 MESH GATEWAY                  │
//!                      │                                               │
//!  Client Request      │  ┌─────────┐      ┌──────────────────────┐   │
//!  ────────────────────┼─▶│  http   │─────▶│  fan-out fetch to     │───┼──▶ Sources
//!                      │  │ server  │      │  configured sources   │   │
//!                      │  └─────────┘      └──────────┬───────────┘   │
//!                      │                              │ headers       │
//!                      │                              ▼               │
//!                      │                   ┌──────────────────────┐   │
//!                      │                   │  headers registry     │   │
//!                      │                   │  (per-request)        │   │
//!                      │                   └──────────┬───────────┘   │
//!                      │                              │               │
//!                      │        ┌─────────────────────┼────────────┐  │
//!                      │        ▼                     ▼            │  │
//!  Client Response     │  ┌──────────┐      ┌──────────────────┐   │  │
//!  ◀───────────────────┼──│ compose  │◀─────│ project + cache- │◀──┘  │
//!                      │  │ + apply  │      │ control LCD       │      │
//!                      │  └──────────┘      └──────────────────┘      │
//!                      └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use mesh_gateway::config::{load_config, MeshConfig};
use mesh_gateway::observability::{logging, metrics};
use mesh_gateway::GatewayServer;

#[derive(Parser)]
#[command(name = "mesh-gateway")]
#[command(about = "Multi-source gateway with response-header reconciliation", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => MeshConfig::default(),
    };

    logging::init(&config.observability.log_level);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        sources = config.sources.len(),
        request_timeout_secs = config.timeouts.request_secs,
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

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = GatewayServer::new(config);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
