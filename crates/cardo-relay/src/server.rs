//! Relay HTTP server lifecycle management.
//!
//! Provides [`start_server`] which binds to a TCP port and runs the Axum
//! server until the process is terminated, and [`serve`] for callers that
//! bring their own listener (tests bind to port 0).

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::router::build_router;
use crate::state::RelayState;

/// Configuration for the relay server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// The host address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// The TCP port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 4000,
        }
    }
}

impl ServerConfig {
    /// Load the bind address from `RELAY_HOST` and `RELAY_PORT`.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Config`] if `RELAY_PORT` is not a valid port.
    pub fn from_env() -> Result<Self, ServerError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load the bind address through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Config`] if the port is not a valid `u16`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let host = lookup("RELAY_HOST").unwrap_or(defaults.host);
        let port = match lookup("RELAY_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e| ServerError::Config(format!("invalid RELAY_PORT: {e}")))?,
            None => defaults.port,
        };
        Ok(Self { host, port })
    }
}

/// Start the relay HTTP server.
///
/// Binds to the configured address, builds the router, and serves requests
/// until the process is terminated.
///
/// # Errors
///
/// Returns an error if the address is invalid, the TCP listener cannot bind,
/// or the server encounters a fatal I/O error.
pub async fn start_server(config: &ServerConfig, state: Arc<RelayState>) -> Result<(), ServerError> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| ServerError::Bind(format!("invalid address: {e}")))?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind(format!("bind failed on {addr}: {e}")))?;

    serve(listener, state).await
}

/// Serve the relay on an already bound listener.
///
/// # Errors
///
/// Returns [`ServerError::Serve`] if the server encounters a fatal I/O error.
pub async fn serve(listener: TcpListener, state: Arc<RelayState>) -> Result<(), ServerError> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "relay server listening");
    }

    axum::serve(listener, build_router(state))
        .await
        .map_err(|e| ServerError::Serve(format!("serve error: {e}")))
}

/// Errors that can occur when starting or running the relay server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The bind address could not be configured.
    #[error("config error: {0}")]
    Config(String),

    /// Failed to bind to the network address.
    #[error("bind error: {0}")]
    Bind(String),

    /// The server encountered a fatal error while serving.
    #[error("serve error: {0}")]
    Serve(String),
}
