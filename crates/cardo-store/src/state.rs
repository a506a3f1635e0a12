//! The store's state and the pure transformations applied to it.
//!
//! [`State`] owns the four state regions. Reads are plain getters; writes
//! only happen through [`State::apply`], which the store calls from inside a
//! commit.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::alerts::{Alert, AlertList};
use crate::cards::{Card, CardId, FIELD_CATALOG, FieldDefinition};
use crate::mutation::Mutation;

/// All client-side state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct State {
    /// Messages, in arrival order.
    messages: Vec<String>,
    /// Formatted log lines, in arrival order.
    logs: Vec<String>,
    /// Cards keyed by id.
    cards: BTreeMap<CardId, Card>,
    /// Alerts, oldest first.
    alerts: AlertList,
}

impl State {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The session seed the client starts with: two messages, a ready log
    /// line, and two sample cards.
    pub fn seeded() -> Self {
        Self::new()
            .with_messages(["some", "messages"])
            .with_logs(["Logger is ready"])
            .with_cards([Card::new("1", "asdf"), Card::new("2", "asdf2")])
    }

    /// Seed messages.
    #[must_use]
    pub fn with_messages<I, S>(mut self, messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.messages.extend(messages.into_iter().map(Into::into));
        self
    }

    /// Seed log lines. These are stored as given, without a timestamp.
    #[must_use]
    pub fn with_logs<I, S>(mut self, logs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.logs.extend(logs.into_iter().map(Into::into));
        self
    }

    /// Seed cards. Cards whose `id` is not a string are skipped.
    #[must_use]
    pub fn with_cards<I>(mut self, cards: I) -> Self
    where
        I: IntoIterator<Item = Card>,
    {
        for card in cards {
            self.insert_card(card);
        }
        self
    }

    /// Seed alerts.
    #[must_use]
    pub fn with_alerts<I>(mut self, alerts: I) -> Self
    where
        I: IntoIterator<Item = Alert>,
    {
        for alert in alerts {
            self.alerts.push(alert);
        }
        self
    }

    // -----------------------------------------------------------------------
    // Getters
    // -----------------------------------------------------------------------

    /// All messages.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// All log lines.
    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    /// The alert list.
    pub const fn alerts_list(&self) -> &AlertList {
        &self.alerts
    }

    /// All cards keyed by id.
    pub const fn cards_cards(&self) -> &BTreeMap<CardId, Card> {
        &self.cards
    }

    /// The fixed field-name catalog.
    #[allow(clippy::unused_self)]
    pub const fn cards_field_names(&self) -> &'static [FieldDefinition] {
        &FIELD_CATALOG
    }

    /// A single card by id.
    pub fn cards_card(&self, id: &str) -> Option<&Card> {
        self.cards.get(id)
    }

    // -----------------------------------------------------------------------
    // Transformations
    // -----------------------------------------------------------------------

    /// Apply one mutation. Total: missing targets turn into logged no-ops.
    pub(crate) fn apply(&mut self, mutation: &Mutation) {
        match mutation {
            Mutation::AddMessage(text) | Mutation::CheckIn(text) => {
                self.messages.push(text.clone());
            }
            Mutation::AddLogLine(line) => self.logs.push(line.clone()),
            Mutation::AddCard(card) => self.insert_card(card.clone()),
            Mutation::UpsertFieldOnCard(upsert) => match self.cards.get_mut(&upsert.card_id) {
                Some(card) => {
                    card.upsert(&upsert.field, upsert.value.clone());
                }
                None => warn!(
                    card_id = %upsert.card_id,
                    field = %upsert.field,
                    "upsert on missing card ignored"
                ),
            },
            Mutation::RemoveFieldFromCard(removal) => match self.cards.get_mut(&removal.card_id) {
                Some(card) if card.has(&removal.field) => {
                    card.remove(&removal.field);
                }
                Some(_) => debug!(
                    card_id = %removal.card_id,
                    field = %removal.field,
                    "field already absent"
                ),
                None => warn!(
                    card_id = %removal.card_id,
                    field = %removal.field,
                    "field removal on missing card ignored"
                ),
            },
            Mutation::AddAlert(alert) => {
                debug!(level = alert.level.as_str(), msg = %alert.msg, "alert raised");
                self.alerts.push(alert.clone());
            }
            Mutation::RemoveAlert(alert) => {
                if !self.alerts.remove(alert).is_removed() {
                    debug!(level = alert.level.as_str(), msg = %alert.msg, "alert already dismissed");
                }
            }
        }
    }

    fn insert_card(&mut self, card: Card) {
        if let Some(id) = card.id().map(ToOwned::to_owned) {
            debug!(card_id = %id, fields = card.fields().len(), "card stored");
            self.cards.insert(id, card);
        } else {
            warn!("card without a string id ignored");
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::alerts::AlertLevel;
    use crate::cards::{FieldRemoval, FieldUpsert};

    #[test]
    fn seeded_state_matches_session_seed() {
        let state = State::seeded();
        assert_eq!(state.messages(), ["some", "messages"]);
        assert_eq!(state.logs(), ["Logger is ready"]);
        assert_eq!(state.cards_cards().len(), 2);
        assert_eq!(
            state.cards_card("2").and_then(|c| c.get("name")),
            Some(&Value::from("asdf2"))
        );
        assert!(state.alerts_list().is_empty());
    }

    #[test]
    fn upsert_is_idempotent() {
        let mut state = State::seeded();
        let mutation = Mutation::UpsertFieldOnCard(FieldUpsert {
            field: "status".to_owned(),
            value: Value::from("open"),
            card_id: "1".to_owned(),
        });
        state.apply(&mutation);
        let once = state.clone();
        state.apply(&mutation);
        assert_eq!(state, once);
        assert_eq!(
            state.cards_card("1").and_then(|c| c.get("status")),
            Some(&Value::from("open"))
        );
    }

    #[test]
    fn field_operations_on_missing_card_are_noops() {
        let mut state = State::seeded();
        let before = state.clone();
        state.apply(&Mutation::UpsertFieldOnCard(FieldUpsert {
            field: "status".to_owned(),
            value: Value::from("open"),
            card_id: "404".to_owned(),
        }));
        state.apply(&Mutation::RemoveFieldFromCard(FieldRemoval {
            field: "name".to_owned(),
            card_id: "404".to_owned(),
        }));
        assert_eq!(state, before);
    }

    #[test]
    fn add_card_replaces_same_id() {
        let mut state = State::new();
        state.apply(&Mutation::AddCard(Card::new("9", "first")));
        state.apply(&Mutation::AddCard(Card::new("9", "second")));
        assert_eq!(state.cards_cards().len(), 1);
        assert_eq!(
            state.cards_card("9").and_then(|c| c.get("name")),
            Some(&Value::from("second"))
        );
    }

    #[test]
    fn check_in_lands_in_messages() {
        let mut state = State::new();
        state.apply(&Mutation::AddMessage("local".to_owned()));
        state.apply(&Mutation::CheckIn("remote".to_owned()));
        assert_eq!(state.messages(), ["local", "remote"]);
    }

    #[test]
    fn removing_absent_alert_leaves_list() {
        let mut state = State::new().with_alerts([Alert::new(AlertLevel::Info, "hello")]);
        let before = state.clone();
        state.apply(&Mutation::RemoveAlert(Alert::new(AlertLevel::Danger, "nope")));
        assert_eq!(state, before);
    }

    #[test]
    fn removing_absent_field_leaves_card() {
        let mut state = State::seeded();
        let removal = Mutation::RemoveFieldFromCard(FieldRemoval {
            field: "name".to_owned(),
            card_id: "1".to_owned(),
        });
        state.apply(&removal);
        let after_first = state.clone();
        state.apply(&removal);

        assert_eq!(state, after_first);
        let card = state.cards_card("1");
        assert!(card.is_some_and(|c| !c.has("name") && c.has("id")));
        assert_eq!(card.map(|c| c.fields().len()), Some(1));
    }

    #[test]
    fn dismissing_alert_removes_first_equal() {
        let twice = Alert::new(AlertLevel::Warning, "twice");
        let mut state = State::new().with_alerts([twice.clone(), twice.clone()]);
        state.apply(&Mutation::RemoveAlert(twice));
        assert_eq!(state.alerts_list().len(), 1);
        assert_eq!(
            state.alerts_list().get(0).map(|a| a.level.as_str()),
            Some("warning")
        );
    }
}
