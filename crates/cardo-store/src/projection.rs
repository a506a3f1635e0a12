//! Named read projections ("getters") over the store's state.
//!
//! The typed getters on [`State`] are the primary read API. [`Projection`]
//! exists for the dynamic boundary, where a consumer asks for a view by
//! name and wants JSON back.

use std::str::FromStr;

use serde_json::Value;

use crate::cards::CardId;
use crate::error::StoreError;
use crate::state::State;

/// A named, pure view of the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// All messages.
    Messages,
    /// All log lines.
    Logs,
    /// The alert list.
    AlertsList,
    /// All cards keyed by id.
    CardsCards,
    /// The field-name catalog.
    CardsFieldNames,
    /// One card by id; `null` if absent.
    CardsCard(CardId),
}

impl Projection {
    /// Names accepted by [`Projection::named`].
    pub const NAMES: [&'static str; 6] = [
        "messages",
        "logs",
        "alerts_list",
        "cards_cards",
        "cards_field_names",
        "cards_card",
    ];

    /// Resolve a projection by name. `cards_card` needs a card id argument.
    pub fn named(name: &str, arg: Option<&str>) -> Result<Self, StoreError> {
        match (name, arg) {
            ("messages", _) => Ok(Self::Messages),
            ("logs", _) => Ok(Self::Logs),
            ("alerts_list", _) => Ok(Self::AlertsList),
            ("cards_cards", _) => Ok(Self::CardsCards),
            ("cards_field_names", _) => Ok(Self::CardsFieldNames),
            ("cards_card", Some(id)) => Ok(Self::CardsCard(id.to_owned())),
            ("cards_card", None) => Err(StoreError::UnknownProjection(
                "cards_card requires a card id".to_owned(),
            )),
            (other, _) => Err(StoreError::UnknownProjection(other.to_owned())),
        }
    }

    /// Projection name without its argument.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Messages => "messages",
            Self::Logs => "logs",
            Self::AlertsList => "alerts_list",
            Self::CardsCards => "cards_cards",
            Self::CardsFieldNames => "cards_field_names",
            Self::CardsCard(_) => "cards_card",
        }
    }

    /// Evaluate against a state.
    pub fn evaluate(&self, state: &State) -> Result<Value, StoreError> {
        let value = match self {
            Self::Messages => serde_json::to_value(state.messages())?,
            Self::Logs => serde_json::to_value(state.logs())?,
            Self::AlertsList => serde_json::to_value(state.alerts_list())?,
            Self::CardsCards => serde_json::to_value(state.cards_cards())?,
            Self::CardsFieldNames => serde_json::to_value(state.cards_field_names())?,
            Self::CardsCard(id) => serde_json::to_value(state.cards_card(id))?,
        };
        Ok(value)
    }
}

/// Parses `name` or `cards_card:<id>`.
impl FromStr for Projection {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((name, arg)) => Self::named(name, Some(arg)),
            None => Self::named(s, None),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cards::Card;

    #[test]
    fn parses_all_names() {
        for name in Projection::NAMES {
            let parsed = Projection::named(name, Some("1"));
            assert!(parsed.is_ok(), "{name} should parse");
            assert_eq!(parsed.map(|p| p.name()).unwrap(), name);
        }
        assert!(Projection::named("cards_card", None).is_err());
        assert!(matches!(
            "nope".parse::<Projection>(),
            Err(StoreError::UnknownProjection(_))
        ));
        assert_eq!(
            "cards_card:2".parse::<Projection>().ok(),
            Some(Projection::CardsCard("2".to_owned()))
        );
    }

    #[test]
    fn evaluates_views_as_json() {
        let state = State::new()
            .with_messages(["a"])
            .with_cards([Card::new("1", "asdf")]);

        let messages = Projection::Messages.evaluate(&state).unwrap();
        assert_eq!(messages, serde_json::json!(["a"]));

        let card = Projection::CardsCard("1".to_owned())
            .evaluate(&state)
            .unwrap();
        assert_eq!(card, serde_json::json!({"id": "1", "name": "asdf"}));

        let missing = Projection::CardsCard("9".to_owned())
            .evaluate(&state)
            .unwrap();
        assert_eq!(missing, Value::Null);

        let fields = Projection::CardsFieldNames.evaluate(&state).unwrap();
        assert_eq!(
            fields.get(0).and_then(|f| f.get("name")),
            Some(&Value::from("name"))
        );
    }
}
