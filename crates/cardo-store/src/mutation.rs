//! Mutations and the append-only mutation log.
//!
//! A [`Mutation`] is a named, synchronous transformation of the store's
//! state. Each one serializes as a `{ "type": ..., "payload": ... }` record,
//! the same shape subscribers and the [`MutationLog`] see.

use serde::Serialize;

use crate::alerts::Alert;
use crate::cards::{Card, FieldRemoval, FieldUpsert};

/// A state-changing operation committed to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum Mutation {
    /// Append a locally authored message.
    #[serde(rename = "addMessage")]
    AddMessage(String),
    /// Append a message that arrived from the server stream.
    #[serde(rename = "checkIn")]
    CheckIn(String),
    /// Append an already formatted log line.
    #[serde(rename = "addLogLine")]
    AddLogLine(String),
    /// Insert a card under its id, replacing any card with that id.
    #[serde(rename = "cards_addCard")]
    AddCard(Card),
    /// Write one field on an existing card.
    #[serde(rename = "cards_upsertFieldOnCard")]
    UpsertFieldOnCard(FieldUpsert),
    /// Remove one field from an existing card.
    #[serde(rename = "cards_removeFieldFromCard")]
    RemoveFieldFromCard(FieldRemoval),
    /// Append an alert.
    #[serde(rename = "alerts_addAlert")]
    AddAlert(Alert),
    /// Remove the first alert equal to the payload.
    #[serde(rename = "alerts_removeAlert")]
    RemoveAlert(Alert),
}

/// Payload-free discriminant of a [`Mutation`], used for allow-lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MutationKind {
    /// [`Mutation::AddMessage`].
    AddMessage,
    /// [`Mutation::CheckIn`].
    CheckIn,
    /// [`Mutation::AddLogLine`].
    AddLogLine,
    /// [`Mutation::AddCard`].
    AddCard,
    /// [`Mutation::UpsertFieldOnCard`].
    UpsertFieldOnCard,
    /// [`Mutation::RemoveFieldFromCard`].
    RemoveFieldFromCard,
    /// [`Mutation::AddAlert`].
    AddAlert,
    /// [`Mutation::RemoveAlert`].
    RemoveAlert,
}

impl MutationKind {
    /// Wire name of the mutation type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AddMessage => "addMessage",
            Self::CheckIn => "checkIn",
            Self::AddLogLine => "addLogLine",
            Self::AddCard => "cards_addCard",
            Self::UpsertFieldOnCard => "cards_upsertFieldOnCard",
            Self::RemoveFieldFromCard => "cards_removeFieldFromCard",
            Self::AddAlert => "alerts_addAlert",
            Self::RemoveAlert => "alerts_removeAlert",
        }
    }
}

impl std::fmt::Display for MutationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Mutation {
    /// The mutation's type.
    pub const fn kind(&self) -> MutationKind {
        match self {
            Self::AddMessage(_) => MutationKind::AddMessage,
            Self::CheckIn(_) => MutationKind::CheckIn,
            Self::AddLogLine(_) => MutationKind::AddLogLine,
            Self::AddCard(_) => MutationKind::AddCard,
            Self::UpsertFieldOnCard(_) => MutationKind::UpsertFieldOnCard,
            Self::RemoveFieldFromCard(_) => MutationKind::RemoveFieldFromCard,
            Self::AddAlert(_) => MutationKind::AddAlert,
            Self::RemoveAlert(_) => MutationKind::RemoveAlert,
        }
    }

    /// The payload as text, for the mutations whose payload is a string.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::AddMessage(text) | Self::CheckIn(text) | Self::AddLogLine(text) => {
                Some(text.as_str())
            }
            _ => None,
        }
    }
}

/// Append-only, in-memory record of every committed mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MutationLog {
    entries: Vec<Mutation>,
}

impl MutationLog {
    /// Create an empty log.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// All entries in commit order.
    pub fn entries(&self) -> &[Mutation] {
        &self.entries
    }

    /// Number of committed mutations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been committed yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recent entry.
    pub fn last(&self) -> Option<&Mutation> {
        self.entries.last()
    }

    /// Count entries of a given type.
    pub fn count_of(&self, kind: MutationKind) -> usize {
        self.entries.iter().filter(|m| m.kind() == kind).count()
    }

    pub(crate) fn append(&mut self, mutation: Mutation) {
        self.entries.push(mutation);
    }
}
