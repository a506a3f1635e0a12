//! Shared application state for the relay server.
//!
//! [`RelayState`] holds the broadcast channel that fans accepted entries out
//! to every connected event-stream client, plus a counter of accepted
//! entries.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::error::RelayError;

/// Capacity of the broadcast channel for stream events.
///
/// If a subscriber falls behind by more than this many messages it will
/// receive a [`broadcast::error::RecvError::Lagged`] and skip to the
/// newest message.
const BROADCAST_CAPACITY: usize = 256;

/// Body accepted by `POST /entry`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRequest {
    /// Entry text.
    pub text: String,
}

/// Event envelope written to `GET /sse` clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamPayload {
    /// The relayed entry.
    pub payload: serde_json::Value,
}

/// Shared state for the Axum application.
#[derive(Debug)]
pub struct RelayState {
    /// Broadcast sender for serialized stream events.
    tx: broadcast::Sender<String>,
    /// Number of entries accepted since start.
    entries_received: AtomicU64,
}

impl RelayState {
    /// Create a new relay state with no subscribers.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            tx,
            entries_received: AtomicU64::new(0),
        }
    }

    /// Subscribe to the event channel.
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }

    /// Number of connected stream clients.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Number of entries accepted so far.
    pub fn entries_received(&self) -> u64 {
        self.entries_received.load(Ordering::Acquire)
    }

    /// Record an accepted entry and relay it to every stream client.
    ///
    /// Returns the number of clients that received it; 0 is not an error.
    pub fn publish(&self, entry: &EntryRequest) -> Result<usize, RelayError> {
        let event = serde_json::to_string(&StreamPayload {
            payload: serde_json::Value::String(entry.text.clone()),
        })?;
        self.entries_received.fetch_add(1, Ordering::AcqRel);
        // send returns Err only when there are zero receivers.
        Ok(self.tx.send(event).unwrap_or(0))
    }
}

impl Default for RelayState {
    fn default() -> Self {
        Self::new()
    }
}
