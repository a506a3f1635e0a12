//! Inbound sync: ingest the server's event stream into the store.
//!
//! One long-lived `GET` is opened against the stream endpoint. Every
//! `message` event whose data decodes as a [`StreamEnvelope`] is dispatched
//! as a `receiveData` action. Malformed events are logged and dropped; the
//! stream keeps going. When the stream fails or the server closes it,
//! [`InboundSync::run`] returns and nothing reconnects.

use std::sync::Arc;

use cardo_store::{Action, Dispatcher};
use futures::StreamExt;
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::envelope::StreamEnvelope;
use crate::error::SyncError;
use crate::sse::{SseDecoder, SseEvent};

/// The dispatcher shared between the caller and the sync tasks.
pub type SharedDispatcher = Arc<RwLock<Dispatcher>>;

/// Consumer of the server's event stream.
#[derive(Debug, Clone)]
pub struct InboundSync {
    client: reqwest::Client,
    url: String,
    store: SharedDispatcher,
}

impl InboundSync {
    /// Create a consumer for a stream URL feeding a shared dispatcher.
    pub const fn new(client: reqwest::Client, url: String, store: SharedDispatcher) -> Self {
        Self { client, url, store }
    }

    /// Stream URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Open the stream and ingest events until it ends.
    ///
    /// Returns `Ok(())` when the server closes the stream.
    ///
    /// # Errors
    ///
    /// [`SyncError::Transport`] if the connection cannot be opened or a read
    /// fails, [`SyncError::Status`] if the server refuses the stream.
    pub async fn run(&self) -> Result<(), SyncError> {
        debug!(url = %self.url, "opening event stream");
        let response = self
            .client
            .get(&self.url)
            .header(ACCEPT, "text/event-stream")
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(|e| SyncError::Transport(format!("GET {} failed: {e}", self.url)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }
        info!(url = %self.url, "event stream opened");

        let mut decoder = SseDecoder::new();
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            let chunk =
                chunk.map_err(|e| SyncError::Transport(format!("event stream read failed: {e}")))?;
            for event in decoder.feed(&chunk) {
                if let Err(e) = self.handle_event(&event).await {
                    warn!(error = %e, "dropping stream event");
                }
            }
        }

        info!(url = %self.url, "event stream closed by server");
        Ok(())
    }

    /// Ingest one decoded event.
    ///
    /// Non-`message` events are ignored and return `Ok(false)`. A message
    /// that was dispatched returns `Ok(true)`.
    ///
    /// # Errors
    ///
    /// [`SyncError::Envelope`] for malformed data, [`SyncError::Store`] if
    /// the dispatcher rejects the action.
    pub async fn handle_event(&self, event: &SseEvent) -> Result<bool, SyncError> {
        if !event.is_message() {
            debug!(event = %event.event, "ignoring non-message stream event");
            return Ok(false);
        }
        let envelope = StreamEnvelope::decode(&event.data)?;
        debug!("receiving data");
        self.store
            .write()
            .await
            .dispatch(Action::ReceiveData(envelope.payload))?;
        Ok(true)
    }
}
