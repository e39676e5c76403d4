use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};

use zcta_housing::{CensusClient, ServerConfig, build_app, logger};

#[tokio::main]
async fn main() -> Result<()> {
    logger::init(logger::DEFAULT_FILTER);

    // Read configuration from environment
    let config = ServerConfig::from_env();
    if config.census.api_key.is_none() {
        tracing::warn!("CENSUS_API_KEY is not set, requests will be sent without a key");
    }

    let client = Arc::new(
        CensusClient::with_config(config.census.clone())
            .context("Failed to initialize Census client")?,
    );
    tracing::info!(
        "Census client ready (base {}, ACS {}, CBP {})",
        config.census.base_url,
        config.census.acs_year,
        config.census.cbp_year
    );

    let app = build_app(client);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on {}", addr);

    // Run server with graceful shutdown
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down gracefully...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down gracefully...");
        }
    }
}
