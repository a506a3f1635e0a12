//! Card records, the field catalog, and field operation payloads.
//!
//! A [`Card`] is an open, ordered map from field name to JSON value. Any
//! field name can be asked for and answers present or absent, so there is no
//! separate step to declare a field before writing it. Every card carries a
//! string `id` and a `name`; code outside this crate cannot remove fields
//! from a card, and the dispatcher refuses to remove `id` from a stored one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StoreError;

/// Identifier of a card, also the key it is stored under.
pub type CardId = String;

/// Name of the identity field. It can never be removed from a card.
pub const ID_FIELD: &str = "id";

/// Name of the display field every card is created with.
pub const NAME_FIELD: &str = "name";

// ---------------------------------------------------------------------------
// Card
// ---------------------------------------------------------------------------

/// A single card record.
///
/// Serializes as a flat JSON object, e.g. `{"id": "1", "name": "asdf"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, Value>", into = "BTreeMap<String, Value>")]
pub struct Card {
    fields: BTreeMap<String, Value>,
}

impl Card {
    /// Create a card with the two required fields.
    pub fn new(id: impl Into<CardId>, name: impl Into<String>) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(ID_FIELD.to_owned(), Value::String(id.into()));
        fields.insert(NAME_FIELD.to_owned(), Value::String(name.into()));
        Self { fields }
    }

    /// Builder-style helper that sets an additional field on a new card.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// The card's identifier, if the `id` field still holds a string.
    ///
    /// `id` can be overwritten through a field upsert, so a non-string value
    /// is possible in principle.
    pub fn id(&self) -> Option<&str> {
        self.fields.get(ID_FIELD).and_then(Value::as_str)
    }

    /// Value of a field, or `None` if the field is absent.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Whether the card currently has a value for `field`.
    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// All fields in name order.
    pub const fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    /// Write a field, returning the previous value.
    pub(crate) fn upsert(&mut self, field: &str, value: Value) -> Option<Value> {
        self.fields.insert(field.to_owned(), value)
    }

    /// Remove a field if present.
    pub(crate) fn remove(&mut self, field: &str) {
        self.fields.remove(field);
    }
}

impl TryFrom<BTreeMap<String, Value>> for Card {
    type Error = StoreError;

    fn try_from(fields: BTreeMap<String, Value>) -> Result<Self, Self::Error> {
        match fields.get(ID_FIELD) {
            Some(Value::String(_)) => {}
            Some(other) => {
                return Err(StoreError::InvalidCard(format!(
                    "field '{ID_FIELD}' must be a string, got {other}"
                )));
            }
            None => {
                return Err(StoreError::InvalidCard(format!(
                    "missing required field '{ID_FIELD}'"
                )));
            }
        }
        if !fields.contains_key(NAME_FIELD) {
            return Err(StoreError::InvalidCard(format!(
                "missing required field '{NAME_FIELD}'"
            )));
        }
        Ok(Self { fields })
    }
}

impl From<Card> for BTreeMap<String, Value> {
    fn from(card: Card) -> Self {
        card.fields
    }
}

// ---------------------------------------------------------------------------
// Field catalog
// ---------------------------------------------------------------------------

/// An entry in the fixed catalog of selectable field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldDefinition {
    /// Field name as written into card records. Empty for the placeholder.
    pub name: &'static str,
    /// Human-readable label for pickers.
    pub label: &'static str,
}

impl FieldDefinition {
    /// Whether this entry is the picker placeholder rather than a real field.
    pub const fn is_placeholder(&self) -> bool {
        self.name.is_empty()
    }
}

/// Field names offered to consumers when building field pickers, in order.
pub const FIELD_CATALOG: [FieldDefinition; 5] = [
    FieldDefinition {
        name: NAME_FIELD,
        label: "Name",
    },
    FieldDefinition {
        name: "description",
        label: "Description",
    },
    FieldDefinition {
        name: ID_FIELD,
        label: "Id",
    },
    FieldDefinition {
        name: "priority",
        label: "Priority",
    },
    FieldDefinition {
        name: "",
        label: "Choose a field\u{2026}",
    },
];

// ---------------------------------------------------------------------------
// Field operation payloads
// ---------------------------------------------------------------------------

/// Payload for writing one field on a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldUpsert {
    /// Field name to write.
    pub field: String,
    /// New value.
    pub value: Value,
    /// Card to write to.
    pub card_id: CardId,
}

/// Payload for removing one field from a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRemoval {
    /// Field name to remove.
    pub field: String,
    /// Card to remove it from.
    pub card_id: CardId,
}
