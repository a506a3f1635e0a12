//! Relay server entry point.
//!
//! Accepts entries from Cardo clients and fans them back out to every
//! connected client over server-sent events.

use std::sync::Arc;

use cardo_relay::{RelayState, ServerConfig, start_server};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Application entry point.
///
/// Initializes logging, loads the bind address from environment variables,
/// and serves until the process is terminated.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the server fails.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("cardo-relay starting");

    let config = ServerConfig::from_env()?;
    info!(host = config.host, port = config.port, "configuration loaded");

    start_server(&config, Arc::new(RelayState::new())).await?;

    Ok(())
}
