//! Server synchronization for the Cardo store.
//!
//! Two independent paths keep the client store and the server in step:
//!
//! - **Outbound**: [`OutboundSync`] subscribes to the store and queues a
//!   forwarding intent for every allow-listed mutation. An
//!   [`OutboundWorker`] drains the queue and posts each entry to the server
//!   as its own request.
//! - **Inbound**: [`InboundSync`] holds one long-lived `text/event-stream`
//!   connection and dispatches every decoded event back into the store as a
//!   `receiveData` action.
//!
//! # Architecture
//!
//! ```text
//! caller --> Dispatcher --> Store::commit --> OutboundSync --> queue --> OutboundWorker --> POST /entry
//!                ^
//!                \-- InboundSync <-- SseDecoder <-- GET /sse
//! ```
//!
//! [`Session`] wires both paths around a shared dispatcher and owns their
//! background tasks.

pub mod config;
pub mod envelope;
pub mod error;
pub mod inbound;
pub mod outbound;
pub mod session;
pub mod sse;

// Re-export primary types for convenience.
pub use config::{RetryPolicy, SyncConfig};
pub use envelope::{EntryBody, StreamEnvelope};
pub use error::SyncError;
pub use inbound::{InboundSync, SharedDispatcher};
pub use outbound::{ForwardIntent, Forwarder, OutboundSync, OutboundWorker};
pub use session::Session;
pub use sse::{SseDecoder, SseEvent};
