//! Axum router construction for the relay.
//!
//! Assembles the entry, stream, and health routes into a single [`Router`]
//! with CORS middleware enabled so browser clients on another origin can
//! post and subscribe.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::RelayState;

/// Build the complete Axum router for the relay.
///
/// The router includes:
/// - `POST /entry` -- accept an entry
/// - `GET /sse` -- server-sent event stream of accepted entries
/// - `GET /health` -- liveness and counters
pub fn build_router(state: Arc<RelayState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/entry", post(handlers::post_entry))
        .route("/sse", get(handlers::stream))
        .route("/health", get(handlers::health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
