//! Reference relay server for Cardo clients.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **`POST /entry`** accepting `{"text": <string>}` from a client's
//!   outbound sync
//! - **`GET /sse`** streaming every accepted entry to all connected clients
//!   as `{"payload": <text>}` server-sent events via
//!   [`tokio::sync::broadcast`]
//! - **`GET /health`** reporting subscriber and entry counts
//!
//! # Architecture
//!
//! Accepted entries are published on a broadcast channel held in
//! [`RelayState`]. Each stream client owns a receiver; a client that falls
//! behind skips the events it missed instead of stalling the others.
//!
//! [`RelayState`]: state::RelayState

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{ServerConfig, ServerError, serve, start_server};
pub use state::RelayState;
