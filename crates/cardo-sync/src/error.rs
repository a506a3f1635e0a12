//! Error types for server synchronization.
//!
//! Sync failures never reach application state: the outbound worker and
//! the inbound stream task log them and carry on (or stop, for the stream).
//! [`SyncError`] is what those tasks log, and what setup code returns.

use cardo_store::StoreError;

/// Errors that can occur while configuring or running synchronization.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Configuration is invalid.
    #[error("config error: {0}")]
    Config(String),

    /// The HTTP transport failed (connect, timeout, read).
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// An inbound event did not match the canonical envelope.
    #[error("malformed stream event: {0}")]
    Envelope(String),

    /// The store rejected a dispatched action.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Serialization or deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}
