//! Outbound sync: forward selected mutations to the entry endpoint.
//!
//! [`OutboundSync`] is a store [`Subscriber`]. It runs inside the commit, so
//! it only decides and enqueues; it never touches the network. The
//! [`OutboundWorker`] drains the queue and spawns one independent request
//! per intent, so requests leave in mutation order but may complete in any
//! order. Delivery is best-effort: failures are logged and dropped after the
//! configured retries.

use std::time::Duration;

use cardo_store::{Mutation, MutationKind, State, Subscriber};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::config::RetryPolicy;
use crate::envelope::EntryBody;
use crate::error::SyncError;

/// Mutation types forwarded when no allow-list is given.
pub const DEFAULT_ALLOW_LIST: [MutationKind; 1] = [MutationKind::AddMessage];

/// A queued request to forward one mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardIntent {
    /// Type of the mutation being forwarded.
    pub kind: MutationKind,
    /// Body to post.
    pub body: EntryBody,
}

// ---------------------------------------------------------------------------
// Subscriber
// ---------------------------------------------------------------------------

/// Store subscriber that enqueues a [`ForwardIntent`] per allow-listed
/// mutation.
#[derive(Debug)]
pub struct OutboundSync {
    tx: mpsc::UnboundedSender<ForwardIntent>,
    allow: Vec<MutationKind>,
}

impl OutboundSync {
    /// Create a subscriber with the default allow-list and its queue.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ForwardIntent>) {
        Self::with_allow_list(DEFAULT_ALLOW_LIST)
    }

    /// Create a subscriber forwarding the given mutation types.
    pub fn with_allow_list<I>(allow: I) -> (Self, mpsc::UnboundedReceiver<ForwardIntent>)
    where
        I: IntoIterator<Item = MutationKind>,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscriber = Self {
            tx,
            allow: allow.into_iter().collect(),
        };
        (subscriber, rx)
    }

    /// Whether mutations of this type are forwarded.
    pub fn allows(&self, kind: MutationKind) -> bool {
        self.allow.contains(&kind)
    }

    /// The forwarding intent for a mutation, if it is allow-listed and
    /// carries text.
    pub fn intent_for(&self, mutation: &Mutation) -> Option<ForwardIntent> {
        let kind = mutation.kind();
        if !self.allows(kind) {
            return None;
        }
        match mutation.text() {
            Some(text) => Some(ForwardIntent {
                kind,
                body: EntryBody::new(text),
            }),
            None => {
                warn!(mutation = %kind, "allow-listed mutation has no text payload; not forwarded");
                None
            }
        }
    }
}

impl Subscriber for OutboundSync {
    fn on_mutation(&self, mutation: &Mutation, _state: &State) {
        let Some(intent) = self.intent_for(mutation) else {
            return;
        };
        debug!(mutation = %intent.kind, "queueing outbound entry");
        if self.tx.send(intent).is_err() {
            warn!("outbound worker has stopped; entry dropped");
        }
    }
}

// ---------------------------------------------------------------------------
// Forwarder
// ---------------------------------------------------------------------------

/// Posts entries to the server with a per-request deadline and retry policy.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: reqwest::Client,
    url: String,
    request_timeout: Duration,
    retry: RetryPolicy,
}

impl Forwarder {
    /// Create a forwarder for an entry endpoint URL.
    pub const fn new(
        client: reqwest::Client,
        url: String,
        request_timeout: Duration,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            client,
            url,
            request_timeout,
            retry,
        }
    }

    /// Target URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Post one entry once.
    ///
    /// # Errors
    ///
    /// [`SyncError::Transport`] if the request fails or times out,
    /// [`SyncError::Status`] if the server answers with a non-2xx status.
    pub async fn post(&self, body: &EntryBody) -> Result<(), SyncError> {
        let response = self
            .client
            .post(&self.url)
            .timeout(self.request_timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| SyncError::Transport(format!("POST {} failed: {e}", self.url)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }
        Ok(())
    }

    /// Post an entry, retrying per policy. Failures are logged, not returned.
    ///
    /// Returns whether the entry was delivered.
    pub async fn deliver(&self, intent: &ForwardIntent) -> bool {
        let mut retry = 0_u32;
        loop {
            match self.post(&intent.body).await {
                Ok(()) => {
                    debug!(mutation = %intent.kind, url = %self.url, "entry forwarded");
                    return true;
                }
                Err(e) if retry < self.retry.max_retries => {
                    let delay = self.retry.delay_for(retry);
                    debug!(
                        error = %e,
                        retry,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "entry forward failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    retry = retry.saturating_add(1);
                }
                Err(e) => {
                    warn!(error = %e, mutation = %intent.kind, "failed to forward entry");
                    return false;
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Worker
// ---------------------------------------------------------------------------

/// Drains the outbound queue, spawning one delivery task per intent.
#[derive(Debug)]
pub struct OutboundWorker {
    forwarder: Forwarder,
    rx: mpsc::UnboundedReceiver<ForwardIntent>,
}

impl OutboundWorker {
    /// Create a worker over a queue.
    pub const fn new(forwarder: Forwarder, rx: mpsc::UnboundedReceiver<ForwardIntent>) -> Self {
        Self { forwarder, rx }
    }

    /// Run until every sender (the subscriber) is dropped or `shutdown`
    /// fires. A dropped shutdown sender counts as a shutdown.
    ///
    /// On shutdown the queue is closed and intents already in it are still
    /// delivered. Deliveries already spawned keep running after this
    /// returns.
    pub async fn run(mut self, mut shutdown: oneshot::Receiver<()>) {
        debug!(url = %self.forwarder.url(), "outbound worker started");
        loop {
            tokio::select! {
                intent = self.rx.recv() => match intent {
                    Some(intent) => self.spawn_delivery(intent),
                    None => {
                        debug!("outbound queue closed, worker stopping");
                        return;
                    }
                },
                _ = &mut shutdown => {
                    self.rx.close();
                    let mut drained = 0_usize;
                    while let Ok(intent) = self.rx.try_recv() {
                        self.spawn_delivery(intent);
                        drained = drained.saturating_add(1);
                    }
                    debug!(drained, "shutdown requested, worker stopping");
                    return;
                }
            }
        }
    }

    fn spawn_delivery(&self, intent: ForwardIntent) {
        let forwarder = self.forwarder.clone();
        tokio::spawn(async move {
            forwarder.deliver(&intent).await;
        });
    }
}
