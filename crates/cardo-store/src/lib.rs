//! Event-sourced card store for the Cardo client.
//!
//! The store holds four regions of state (messages, log lines, cards, and
//! alerts) and only changes through named [`Mutation`]s. Every committed
//! mutation is appended to the [`MutationLog`] and handed to each registered
//! [`Subscriber`] before the commit returns.
//!
//! # Architecture
//!
//! ```text
//! caller --> Dispatcher (actions) --> Store::commit (mutations) --> MutationLog
//!                                                               \-> subscribers
//! ```
//!
//! Callers never mutate the store directly. [`Store::commit`] is private to
//! this crate, so the [`Dispatcher`] is the only holder of a mutation-capable
//! handle. Reads go through [`State`] getters or named [`Projection`]s.

pub mod action;
pub mod alerts;
pub mod cards;
pub mod dispatcher;
pub mod error;
pub mod mutation;
pub mod projection;
pub mod state;
pub mod store;

// Re-export primary types for convenience.
pub use action::Action;
pub use alerts::{Alert, AlertDraft, AlertLevel, AlertList, Removal};
pub use cards::{Card, CardId, FieldDefinition, FieldRemoval, FieldUpsert, FIELD_CATALOG};
pub use dispatcher::Dispatcher;
pub use error::StoreError;
pub use mutation::{Mutation, MutationKind, MutationLog};
pub use projection::Projection;
pub use state::State;
pub use store::{Store, Subscriber};
