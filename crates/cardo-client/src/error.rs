//! Error types for the console client.

use cardo_store::StoreError;

/// Errors reported for a single console line. None of them end the session.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The first word is not a known command.
    #[error("unknown command '{0}' (try 'help')")]
    UnknownCommand(String),

    /// A command was missing or had malformed arguments.
    #[error("usage: {0}")]
    Usage(String),

    /// `dismiss` named a position with no alert.
    #[error("no alert at position {0}")]
    NoSuchAlert(usize),

    /// An `action` payload was not valid JSON.
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    /// The store rejected the action or projection.
    #[error(transparent)]
    Store(#[from] StoreError),
}
