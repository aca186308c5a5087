//! Wallink relay.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                WALLINK RELAY                 │
//!   UI (zkLogin)       │  ┌────────┐   ┌──────────┐   ┌────────────┐  │
//!   ───────────────────┼─▶│  http  │──▶│ sponsor  │──▶│ blockchain │──┼──▶ Sui node
//!                      │  │ server │   │  mapper  │   │ rpc client │  │   (JSON-RPC)
//!   ◀──────────────────┼──│        │◀──│          │◀──│            │◀─┼───
//!                      │  └────────┘   └──────────┘   └────────────┘  │
//!                      │   config · observability · security ·       │
//!                      │   lifecycle                                  │
//!                      └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use wallink_relay::blockchain::SuiRpcClient;
use wallink_relay::config::load_config;
use wallink_relay::lifecycle::{wait_for_signal, Shutdown};
use wallink_relay::observability::{logging, metrics};
use wallink_relay::HttpServer;

#[derive(Parser)]
#[command(name = "wallink-relay", version)]
#[command(about = "Builds and relays link-tree profile transactions", long_about = None)]
struct Args {
    /// Optional TOML config file; environment variables override it.
    #[arg(short, long, env = "WALLINK_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let (config, warnings) = load_config(args.config.as_deref())?;

    logging::init_logging(&config.observability)?;
    for warning in &warnings {
        tracing::warn!("{}", warning);
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        network = %config.sui.network,
        rpc_url = %config.sui.rpc_url,
        module = %config.sui.module_name,
        gas_budget = config.sui.default_gas_budget,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // Validation guarantees the address parses.
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let ledger = Arc::new(SuiRpcClient::new(config.sui.clone())?);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    });

    let server = HttpServer::new(config, ledger);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
