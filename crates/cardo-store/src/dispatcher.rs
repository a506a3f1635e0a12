//! The action dispatcher: the only holder of a mutation-capable store.
//!
//! Every state change enters through [`Dispatcher::dispatch`]. An action
//! either commits one or more mutations, dispatches further actions, or is
//! redirected; removing a card's `id` field never commits a removal and
//! raises an alert instead.

use serde_json::Value;
use tracing::debug;

use crate::action::Action;
use crate::alerts::AlertDraft;
use crate::cards::ID_FIELD;
use crate::error::StoreError;
use crate::mutation::Mutation;
use crate::state::State;
use crate::store::{Store, Subscriber};

/// Owns the [`Store`] and turns actions into mutations.
#[derive(Debug, Default)]
pub struct Dispatcher {
    store: Store,
}

impl Dispatcher {
    /// Create a dispatcher over an initial state.
    pub const fn new(state: State) -> Self {
        Self {
            store: Store::new(state),
        }
    }

    /// Read-only access to the store.
    pub const fn store(&self) -> &Store {
        &self.store
    }

    /// Shortcut for the store's current state.
    pub const fn state(&self) -> &State {
        self.store.state()
    }

    /// Register a subscriber that observes every committed mutation.
    pub fn subscribe<S>(&mut self, subscriber: S)
    where
        S: Subscriber + 'static,
    {
        self.store.subscribe(Box::new(subscriber));
    }

    /// Dispatch an action by name with a JSON payload.
    pub fn dispatch_named(&mut self, name: &str, payload: Value) -> Result<(), StoreError> {
        let action = Action::from_named(name, payload)?;
        self.dispatch(action)
    }

    /// Dispatch a typed action.
    ///
    /// # Errors
    ///
    /// [`StoreError::CardNotFound`] when a field operation targets a card
    /// that does not exist. Nothing is committed in that case.
    pub fn dispatch(&mut self, action: Action) -> Result<(), StoreError> {
        debug!(action = action.name(), "dispatching action");
        match action {
            Action::AddMessage(text) => self.store.commit(Mutation::AddMessage(text)),
            Action::AddLogLine(text) => {
                let line = format_log_line(chrono::Utc::now().timestamp_millis(), &text);
                self.store.commit(Mutation::AddLogLine(line));
            }
            Action::ReceiveData(value) => {
                let text = received_text(value);
                self.store.commit(Mutation::CheckIn(text.clone()));
                self.dispatch(Action::AddLogLine(text))?;
            }
            Action::AddError(draft) => self.store.commit(Mutation::AddAlert(draft.into_alert())),
            Action::RemoveAlert(alert) => self.store.commit(Mutation::RemoveAlert(alert)),
            Action::AddCard(card) => self.store.commit(Mutation::AddCard(card)),
            Action::UpsertFieldOnCard(upsert) => {
                self.require_card(&upsert.card_id)?;
                self.store.commit(Mutation::UpsertFieldOnCard(upsert));
            }
            Action::RemoveField(removal) => {
                if removal.field == ID_FIELD {
                    debug!(card_id = %removal.card_id, "refusing to remove id field");
                    let msg = format!("Field '{}' cannot be deleted.", removal.field);
                    return self.dispatch(Action::AddError(AlertDraft::new(msg)));
                }
                self.require_card(&removal.card_id)?;
                self.store.commit(Mutation::RemoveFieldFromCard(removal));
            }
        }
        Ok(())
    }

    fn require_card(&self, card_id: &str) -> Result<(), StoreError> {
        if self.state().cards_card(card_id).is_some() {
            Ok(())
        } else {
            Err(StoreError::CardNotFound(card_id.to_owned()))
        }
    }
}

/// `"{timestamp}: {text}"`, timestamp in Unix epoch milliseconds.
pub fn format_log_line(timestamp_ms: i64, text: &str) -> String {
    format!("{timestamp_ms}: {text}")
}

/// Strings are taken verbatim; any other JSON value in compact form.
fn received_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::alerts::{Alert, AlertLevel};
    use crate::cards::{Card, FieldRemoval, FieldUpsert};
    use crate::mutation::MutationKind;

    fn card_one() -> Dispatcher {
        Dispatcher::new(State::new().with_cards([Card::new("1", "asdf")]))
    }

    fn remove(field: &str) -> Action {
        Action::RemoveField(FieldRemoval {
            field: field.to_owned(),
            card_id: "1".to_owned(),
        })
    }

    /// `<digits>: <text>`
    fn assert_log_line(line: &str, text: &str) {
        let (stamp, rest) = line.split_once(": ").unwrap();
        assert!(!stamp.is_empty() && stamp.chars().all(|c| c.is_ascii_digit()), "{line}");
        assert_eq!(rest, text);
    }

    #[test]
    fn add_message_appends_in_call_order() {
        let mut dispatcher = Dispatcher::new(State::new());
        for text in ["one", "two", "three"] {
            assert!(dispatcher.dispatch(Action::AddMessage(text.to_owned())).is_ok());
        }
        assert_eq!(dispatcher.state().messages(), ["one", "two", "three"]);
    }

    #[test]
    fn add_log_line_is_timestamped() {
        let mut dispatcher = Dispatcher::new(State::new());
        assert!(dispatcher.dispatch(Action::AddLogLine("ready: set".to_owned())).is_ok());
        let line = dispatcher.state().logs().first().cloned().unwrap();
        assert_log_line(&line, "ready: set");
    }

    #[test]
    fn receive_data_checks_in_and_logs() {
        let mut dispatcher = Dispatcher::new(State::new());
        assert!(dispatcher.dispatch(Action::ReceiveData(Value::from("hello"))).is_ok());

        assert_eq!(dispatcher.state().messages(), ["hello"]);
        let line = dispatcher.state().logs().last().cloned().unwrap();
        assert_log_line(&line, "hello");
        assert_eq!(dispatcher.store().log().count_of(MutationKind::CheckIn), 1);
        assert_eq!(dispatcher.store().log().count_of(MutationKind::AddMessage), 0);
    }

    #[test]
    fn receive_data_encodes_non_string_values() {
        let mut dispatcher = Dispatcher::new(State::new());
        let value = serde_json::json!({"n": 1});
        assert!(dispatcher.dispatch(Action::ReceiveData(value)).is_ok());
        assert_eq!(dispatcher.state().messages(), [r#"{"n":1}"#]);
    }

    #[test]
    fn removing_id_raises_one_alert_and_keeps_field() {
        let mut dispatcher = card_one();
        assert!(dispatcher.dispatch(remove("id")).is_ok());

        let card = dispatcher.state().cards_card("1");
        assert_eq!(card.and_then(Card::id), Some("1"));
        let alerts = dispatcher.state().alerts_list();
        assert_eq!(alerts.len(), 1);
        assert!(alerts.get(0).is_some_and(|a| a.msg.contains("id")));
        assert_eq!(
            dispatcher.store().log().count_of(MutationKind::RemoveFieldFromCard),
            0
        );
    }

    #[test]
    fn end_to_end_field_removal() {
        let mut dispatcher = card_one();

        assert!(dispatcher.dispatch(remove("name")).is_ok());
        let card = serde_json::to_value(dispatcher.state().cards_card("1")).unwrap();
        assert_eq!(card, serde_json::json!({"id": "1"}));
        assert!(dispatcher.state().alerts_list().is_empty());

        assert!(dispatcher.dispatch(remove("id")).is_ok());
        let card = serde_json::to_value(dispatcher.state().cards_card("1")).unwrap();
        assert_eq!(card, serde_json::json!({"id": "1"}));
        assert_eq!(
            dispatcher.state().alerts_list().all(),
            [Alert::new(AlertLevel::Danger, "Field 'id' cannot be deleted.")]
        );
    }

    #[test]
    fn upsert_is_idempotent_through_dispatch() {
        let mut dispatcher = card_one();
        let action = Action::UpsertFieldOnCard(FieldUpsert {
            field: "status".to_owned(),
            value: Value::from("open"),
            card_id: "1".to_owned(),
        });
        assert!(dispatcher.dispatch(action.clone()).is_ok());
        let once = dispatcher.state().clone();
        assert!(dispatcher.dispatch(action).is_ok());
        assert_eq!(dispatcher.state(), &once);
        assert_eq!(
            dispatcher.state().cards_card("1").and_then(|c| c.get("status")),
            Some(&Value::from("open"))
        );
    }

    #[test]
    fn field_operations_on_missing_card_commit_nothing() {
        let mut dispatcher = card_one();
        let result = dispatcher.dispatch(Action::UpsertFieldOnCard(FieldUpsert {
            field: "status".to_owned(),
            value: Value::from("open"),
            card_id: "404".to_owned(),
        }));
        assert!(matches!(result, Err(StoreError::CardNotFound(id)) if id == "404"));
        assert!(dispatcher.store().log().is_empty());
    }

    #[test]
    fn removing_absent_alert_does_not_fault() {
        let mut dispatcher = Dispatcher::new(State::new());
        let alert = Alert::new(AlertLevel::Danger, "gone");
        assert!(dispatcher.dispatch(Action::RemoveAlert(alert.clone())).is_ok());
        assert!(dispatcher.state().alerts_list().is_empty());

        assert!(dispatcher.dispatch(Action::AddError(AlertDraft::new("gone"))).is_ok());
        assert!(dispatcher.dispatch(Action::RemoveAlert(alert.clone())).is_ok());
        assert!(dispatcher.dispatch(Action::RemoveAlert(alert)).is_ok());
        assert!(dispatcher.state().alerts_list().is_empty());
    }

    #[test]
    fn subscribers_see_every_commit() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut dispatcher = card_one();
        let counter = Arc::clone(&count);
        dispatcher.subscribe(move |_: &Mutation, _: &State| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(dispatcher.dispatch(Action::ReceiveData(Value::from("x"))).is_ok());
        assert!(dispatcher.dispatch(remove("id")).is_ok());

        // receiveData commits twice, the rejected removal once (the alert).
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn dispatch_named_parses_payload() {
        let mut dispatcher = card_one();
        let result = dispatcher.dispatch_named(
            "cards_upsertFieldOnCard",
            serde_json::json!({"field": "priority", "value": 2, "card_id": "1"}),
        );
        assert!(result.is_ok());
        assert_eq!(
            dispatcher.state().cards_card("1").and_then(|c| c.get("priority")),
            Some(&Value::from(2))
        );
        assert!(dispatcher.dispatch_named("explode", Value::Null).is_err());
    }
}
