//! The state store: state, mutation log, and subscribers.
//!
//! [`Store::commit`] is the single write path. It applies the mutation,
//! appends it to the log, and then calls every subscriber in registration
//! order before returning. Subscribers therefore always observe the
//! post-mutation state, and a commit is never observed half-applied.

use serde_json::Value;
use tracing::trace;

use crate::error::StoreError;
use crate::mutation::{Mutation, MutationLog};
use crate::projection::Projection;
use crate::state::State;

/// Observer of committed mutations.
///
/// Called synchronously inside the commit, so implementations must not
/// block. Anything slow (network I/O) belongs on a queue drained elsewhere.
pub trait Subscriber: Send + Sync {
    /// Called once per committed mutation, after it has been applied.
    fn on_mutation(&self, mutation: &Mutation, state: &State);
}

impl<F> Subscriber for F
where
    F: Fn(&Mutation, &State) + Send + Sync,
{
    fn on_mutation(&self, mutation: &Mutation, state: &State) {
        self(mutation, state);
    }
}

/// State plus its mutation log and subscriber list.
pub struct Store {
    state: State,
    log: MutationLog,
    subscribers: Vec<Box<dyn Subscriber>>,
}

impl Store {
    /// Create a store over an initial state.
    pub const fn new(state: State) -> Self {
        Self {
            state,
            log: MutationLog::new(),
            subscribers: Vec::new(),
        }
    }

    /// Current state.
    pub const fn state(&self) -> &State {
        &self.state
    }

    /// Every mutation committed so far.
    pub const fn log(&self) -> &MutationLog {
        &self.log
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Evaluate a named read projection against the current state.
    pub fn project(&self, projection: &Projection) -> Result<Value, StoreError> {
        projection.evaluate(&self.state)
    }

    /// Register a subscriber. Subscribers run in registration order.
    pub(crate) fn subscribe(&mut self, subscriber: Box<dyn Subscriber>) {
        self.subscribers.push(subscriber);
    }

    /// Apply a mutation, record it, and notify subscribers.
    pub(crate) fn commit(&mut self, mutation: Mutation) {
        trace!(mutation = %mutation.kind(), "commit");
        self.state.apply(&mutation);
        self.log.append(mutation);
        if let Some(committed) = self.log.last() {
            for subscriber in &self.subscribers {
                subscriber.on_mutation(committed, &self.state);
            }
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(State::default())
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("log_len", &self.log.len())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::mutation::MutationKind;

    #[test]
    fn commit_applies_logs_and_notifies_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut store = Store::new(State::new());

        let first = Arc::clone(&seen);
        store.subscribe(Box::new(move |m: &Mutation, s: &State| {
            first
                .lock()
                .unwrap()
                .push(format!("first:{}:{}", m.kind(), s.messages().len()));
        }));
        let second = Arc::clone(&seen);
        store.subscribe(Box::new(move |m: &Mutation, _: &State| {
            second.lock().unwrap().push(format!("second:{}", m.kind()));
        }));

        store.commit(Mutation::AddMessage("hi".to_owned()));

        assert_eq!(store.state().messages(), ["hi"]);
        assert_eq!(store.log().count_of(MutationKind::AddMessage), 1);
        let seen = seen.lock().unwrap().clone();
        assert_eq!(seen, vec!["first:addMessage:1", "second:addMessage"]);
    }

    #[test]
    fn store_debug_omits_subscriber_bodies() {
        let store = Store::default();
        let rendered = format!("{store:?}");
        assert!(rendered.contains("log_len: 0"));
        assert_eq!(store.subscriber_count(), 0);
    }
}
