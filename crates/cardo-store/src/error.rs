//! Error types for the card store.
//!
//! Validation rejections are not errors: they are redirected into alerts by
//! the dispatcher. [`StoreError`] covers the remaining programming errors at
//! the dynamic boundary (unknown names, malformed payloads, missing cards).

/// Errors that can occur when dispatching actions or reading projections.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No action is registered under the given name.
    #[error("unknown action: {0}")]
    UnknownAction(String),

    /// No projection is registered under the given name.
    #[error("unknown projection: {0}")]
    UnknownProjection(String),

    /// The payload does not match the shape the action expects.
    #[error("invalid payload for {action}: {source}")]
    InvalidPayload {
        /// The action name the payload was supplied for.
        action: String,
        /// The underlying decode error.
        source: serde_json::Error,
    },

    /// A card record is missing a required field or has a malformed one.
    #[error("invalid card: {0}")]
    InvalidCard(String),

    /// A field operation targeted a card that does not exist.
    #[error("card not found: {0}")]
    CardNotFound(String),

    /// A projection could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
