//! Session wiring: one store, one outbound worker, one inbound stream.
//!
//! [`Session`] is the application root. It owns the shared dispatcher and
//! the two background tasks, and is the handle callers dispatch actions and
//! read projections through. There is no global store; every consumer gets
//! its state from a session it was handed.

use std::sync::Arc;

use cardo_store::{Action, Dispatcher, Projection, State, StoreError};
use serde_json::Value;
use tokio::sync::{RwLock, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::inbound::{InboundSync, SharedDispatcher};
use crate::outbound::{Forwarder, OutboundSync, OutboundWorker};

/// A running client session.
#[derive(Debug)]
pub struct Session {
    store: SharedDispatcher,
    inbound: JoinHandle<()>,
    outbound: JoinHandle<()>,
    stop_outbound: oneshot::Sender<()>,
}

impl Session {
    /// Build the store over `state`, register outbound forwarding, and
    /// spawn the outbound worker and the inbound stream task.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// [`SyncError::Transport`] if the HTTP client cannot be built.
    pub fn start(config: &SyncConfig, state: State) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| SyncError::Transport(format!("failed to build HTTP client: {e}")))?;

        let (outbound_sync, rx) = OutboundSync::channel();
        let mut dispatcher = Dispatcher::new(state);
        dispatcher.subscribe(outbound_sync);
        let store = Arc::new(RwLock::new(dispatcher));

        let forwarder = Forwarder::new(
            client.clone(),
            config.entry_url(),
            config.request_timeout,
            config.retry,
        );
        let (stop_outbound, shutdown) = oneshot::channel();
        let outbound = tokio::spawn(OutboundWorker::new(forwarder, rx).run(shutdown));

        let inbound_sync = InboundSync::new(client, config.stream_url(), Arc::clone(&store));
        let inbound = tokio::spawn(async move {
            match inbound_sync.run().await {
                Ok(()) => info!("event stream ended; not reconnecting"),
                Err(e) => warn!(error = %e, "event stream failed; not reconnecting"),
            }
        });

        info!(
            entry_url = %config.entry_url(),
            stream_url = %config.stream_url(),
            "session started"
        );

        Ok(Self {
            store,
            inbound,
            outbound,
            stop_outbound,
        })
    }

    /// A handle to the shared dispatcher.
    pub fn store(&self) -> SharedDispatcher {
        Arc::clone(&self.store)
    }

    /// Dispatch a typed action.
    pub async fn dispatch(&self, action: Action) -> Result<(), StoreError> {
        self.store.write().await.dispatch(action)
    }

    /// Dispatch an action by name with a JSON payload.
    pub async fn dispatch_named(&self, name: &str, payload: Value) -> Result<(), StoreError> {
        self.store.write().await.dispatch_named(name, payload)
    }

    /// Run a read against the current state.
    pub async fn read<T, F>(&self, read: F) -> T
    where
        F: FnOnce(&State) -> T,
    {
        let guard = self.store.read().await;
        read(guard.state())
    }

    /// Evaluate a named projection.
    pub async fn project(&self, projection: &Projection) -> Result<Value, StoreError> {
        self.store.read().await.store().project(projection)
    }

    /// Whether the inbound stream task is still running.
    pub fn is_streaming(&self) -> bool {
        !self.inbound.is_finished()
    }

    /// Close the inbound stream and stop the outbound worker.
    ///
    /// Entries queued before the call are still handed to the network and
    /// finish on their own. Handles obtained from [`Session::store`] stay
    /// usable, but their mutations are no longer forwarded.
    pub async fn shutdown(self) {
        self.inbound.abort();
        if let Err(e) = self.inbound.await {
            if !e.is_cancelled() {
                warn!(error = %e, "inbound task ended abnormally");
            }
        }
        if self.stop_outbound.send(()).is_err() {
            debug!("outbound worker already stopped");
        }
        if let Err(e) = self.outbound.await {
            warn!(error = %e, "outbound worker ended abnormally");
        }
        debug!("session shut down");
    }
}
