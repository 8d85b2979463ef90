//! Tasignal API Server
//!
//! Serves signal computations, the ticker catalogue, health and metrics
//! over HTTP. Stateless; every request fetches fresh market data.

use std::sync::Arc;
use tasignal::config::{get_environment, get_port, SignalConfig};
use tasignal::core::http::{start_server, AppState};
use tasignal::logging;
use tasignal::metrics::Metrics;
use tasignal::signals::SignalEngine;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Loads .env before anything reads the environment.
    let config = SignalConfig::from_env()?;
    logging::init_logging();

    let port = get_port();
    info!("Starting Tasignal API Server");
    info!(environment = %get_environment(), "Environment");
    info!(
        fetch_timeout_secs = config.fetch_timeout_secs,
        yahoo = %config.yahoo_base_url,
        binance = %config.binance_base_url,
        "Market data providers"
    );

    let metrics = Arc::new(Metrics::new()?);
    let engine = Arc::new(SignalEngine::new(config).with_metrics(metrics.clone()));
    let state = AppState::new(engine, metrics);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(state, port).await {
            error!(error = %e, "HTTP server error");
        }
    });

    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
