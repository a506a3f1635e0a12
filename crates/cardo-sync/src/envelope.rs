//! Wire envelopes for both sync directions.
//!
//! Outbound entries are posted as `{"text": <string>}`. Inbound stream
//! events carry exactly one canonical shape, `{"payload": <any>}`; anything
//! else is rejected at this boundary and never reaches the store.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SyncError;

/// Body of a `POST` to the entry endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryBody {
    /// The forwarded mutation payload.
    pub text: String,
}

impl EntryBody {
    /// Wrap a payload.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// The canonical envelope of a server-sent event's `data` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StreamEnvelope {
    /// The datum to hand to `receiveData`.
    pub payload: Value,
}

impl StreamEnvelope {
    /// Decode an event's `data` field.
    ///
    /// # Errors
    ///
    /// [`SyncError::Envelope`] if the data is not JSON or not exactly
    /// `{"payload": ...}`.
    pub fn decode(data: &str) -> Result<Self, SyncError> {
        serde_json::from_str(data).map_err(|e| SyncError::Envelope(format!("{e}: {data}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn entry_body_matches_wire_shape() {
        let json = serde_json::to_value(EntryBody::new("hello")).unwrap();
        assert_eq!(json, serde_json::json!({"text": "hello"}));
    }

    #[test]
    fn decodes_canonical_envelope() {
        let envelope = StreamEnvelope::decode(r#"{"payload":"hello"}"#);
        assert_eq!(envelope.ok().map(|e| e.payload), Some(Value::from("hello")));

        let nested = StreamEnvelope::decode(r#"{"payload":{"card":"1"}}"#);
        assert_eq!(
            nested.ok().map(|e| e.payload),
            Some(serde_json::json!({"card": "1"}))
        );
    }

    #[test]
    fn rejects_legacy_and_malformed_shapes() {
        for data in [
            r#"{"text":"hello"}"#,
            r#"{"_json":"hello"}"#,
            r#"{"payload":"a","extra":1}"#,
            r#""hello""#,
            "not json",
            "",
        ] {
            assert!(
                matches!(StreamEnvelope::decode(data), Err(SyncError::Envelope(_))),
                "{data} should be rejected"
            );
        }
    }
}
