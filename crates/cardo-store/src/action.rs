//! Actions: the named intents callers use to change state.
//!
//! Each [`Action`] variant carries its own typed payload. At the dynamic
//! boundary (console commands, scripted input) actions arrive as a name plus
//! a JSON payload; [`Action::from_named`] turns that pair into a typed action
//! or an explicit [`StoreError`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::alerts::{Alert, AlertDraft};
use crate::cards::{Card, FieldRemoval, FieldUpsert};
use crate::error::StoreError;

/// A high-level intent handled by the [`Dispatcher`](crate::Dispatcher).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "payload")]
pub enum Action {
    /// Post a new message.
    #[serde(rename = "addMessage")]
    AddMessage(String),
    /// Record a log line; the dispatcher prefixes a timestamp.
    #[serde(rename = "addLogLine")]
    AddLogLine(String),
    /// Ingest a datum received from the server stream.
    #[serde(rename = "receiveData")]
    ReceiveData(Value),
    /// Raise an error alert.
    #[serde(rename = "alerts_addError")]
    AddError(AlertDraft),
    /// Dismiss an alert.
    #[serde(rename = "alerts_removeAlert")]
    RemoveAlert(Alert),
    /// Add (or replace) a card.
    #[serde(rename = "cards_addCard")]
    AddCard(Card),
    /// Write a field on a card.
    #[serde(rename = "cards_upsertFieldOnCard")]
    UpsertFieldOnCard(FieldUpsert),
    /// Remove a field from a card. Removing `id` is rejected with an alert.
    #[serde(rename = "cards_removeField")]
    RemoveField(FieldRemoval),
}

impl Action {
    /// Every action name, in declaration order.
    pub const NAMES: [&'static str; 8] = [
        "addMessage",
        "addLogLine",
        "receiveData",
        "alerts_addError",
        "alerts_removeAlert",
        "cards_addCard",
        "cards_upsertFieldOnCard",
        "cards_removeField",
    ];

    /// Wire name of this action.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AddMessage(_) => "addMessage",
            Self::AddLogLine(_) => "addLogLine",
            Self::ReceiveData(_) => "receiveData",
            Self::AddError(_) => "alerts_addError",
            Self::RemoveAlert(_) => "alerts_removeAlert",
            Self::AddCard(_) => "cards_addCard",
            Self::UpsertFieldOnCard(_) => "cards_upsertFieldOnCard",
            Self::RemoveField(_) => "cards_removeField",
        }
    }

    /// Build a typed action from a name and a JSON payload.
    ///
    /// # Errors
    ///
    /// [`StoreError::UnknownAction`] if the name is not registered, or
    /// [`StoreError::InvalidPayload`] if the payload has the wrong shape.
    pub fn from_named(name: &str, payload: Value) -> Result<Self, StoreError> {
        if !Self::NAMES.contains(&name) {
            return Err(StoreError::UnknownAction(name.to_owned()));
        }
        let tagged = serde_json::json!({ "action": name, "payload": payload });
        serde_json::from_value(tagged).map_err(|source| StoreError::InvalidPayload {
            action: name.to_owned(),
            source,
        })
    }
}
