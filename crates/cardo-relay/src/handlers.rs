//! HTTP handlers for the relay endpoints.

use std::convert::Infallible;
use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use tokio::sync::broadcast::error::RecvError;
use tracing::debug;

use crate::error::RelayError;
use crate::state::{EntryRequest, RelayState};

/// Accept an entry and relay it to every stream client.
///
/// # Route
///
/// `POST /entry`
pub async fn post_entry(
    State(state): State<Arc<RelayState>>,
    body: Result<Json<EntryRequest>, JsonRejection>,
) -> Result<StatusCode, RelayError> {
    let Json(entry) = body.map_err(|rejection| RelayError::InvalidEntry(rejection.body_text()))?;
    let delivered = state.publish(&entry)?;
    debug!(delivered, "entry relayed");
    Ok(StatusCode::NO_CONTENT)
}

/// Stream relayed entries as server-sent events.
///
/// # Route
///
/// `GET /sse`
pub async fn stream(
    State(state): State<Arc<RelayState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("stream client connected");
    let rx = state.subscribe();

    let events = futures::stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(data) => return Some((Ok(Event::default().data(data)), rx)),
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "stream client lagged, skipping ahead");
                }
                Err(RecvError::Closed) => {
                    debug!("broadcast channel closed, ending stream");
                    return None;
                }
            }
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Report relay liveness and counters.
///
/// # Route
///
/// `GET /health`
pub async fn health(State(state): State<Arc<RelayState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "subscribers": state.subscriber_count(),
        "entries_received": state.entries_received(),
    }))
}
