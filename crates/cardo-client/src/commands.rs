//! Console command parsing.
//!
//! One command per line. The first word selects the command; free text
//! arguments (`msg`, `log`, `card` names, `set` values) take the rest of the
//! line verbatim.

use cardo_store::{Action, Card, FieldRemoval, FieldUpsert, Projection};
use serde_json::Value;

use crate::error::ClientError;

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Dispatch an action built from the command line.
    Dispatch(Action),
    /// Dispatch an action by name with a raw JSON payload.
    Named {
        /// Action name.
        name: String,
        /// Action payload.
        payload: Value,
    },
    /// Remove the alert at this position in the alert list.
    Dismiss(usize),
    /// Print a projection.
    Show(Projection),
    /// Print usage.
    Help,
    /// Shut the session down.
    Quit,
}

/// Usage text printed for `help` and unknown commands.
pub const USAGE: &str = "\
commands:
  msg <text>                      add a message
  log <text>                      add a log line
  card <id> <name>                add a card
  set <card_id> <field> <value>   write a field on a card
  unset <card_id> <field>         remove a field from a card
  dismiss <index>                 remove an alert
  action <name> <json>            dispatch any action by name
  show <projection> [card_id]     print a projection
  help
  quit";

/// Parse one input line. Blank lines parse to `None`.
pub fn parse(line: &str) -> Result<Option<Command>, ClientError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim_start();

    let command = match verb {
        "msg" => Command::Dispatch(Action::AddMessage(required(rest, "msg <text>")?.to_owned())),
        "log" => Command::Dispatch(Action::AddLogLine(required(rest, "log <text>")?.to_owned())),
        "card" => {
            let (id, name) = split_arg(rest, "card <id> <name>")?;
            Command::Dispatch(Action::AddCard(Card::new(id, name)))
        }
        "set" => {
            let (card_id, rest) = split_arg(rest, "set <card_id> <field> <value>")?;
            let (field, value) = split_arg(rest, "set <card_id> <field> <value>")?;
            Command::Dispatch(Action::UpsertFieldOnCard(FieldUpsert {
                field: field.to_owned(),
                value: Value::String(value.to_owned()),
                card_id: card_id.to_owned(),
            }))
        }
        "unset" => {
            let (card_id, field) = split_arg(rest, "unset <card_id> <field>")?;
            Command::Dispatch(Action::RemoveField(FieldRemoval {
                field: field.to_owned(),
                card_id: card_id.to_owned(),
            }))
        }
        "dismiss" => {
            let index = required(rest, "dismiss <index>")?
                .parse()
                .map_err(|e| ClientError::Usage(format!("dismiss <index>: {e}")))?;
            Command::Dismiss(index)
        }
        "action" => {
            let (name, json) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            let name = required(name, "action <name> <json>")?;
            let payload = if json.trim().is_empty() {
                Value::Null
            } else {
                serde_json::from_str(json.trim())?
            };
            Command::Named {
                name: name.to_owned(),
                payload,
            }
        }
        "show" => {
            let (name, card_id) = match rest.split_once(char::is_whitespace) {
                Some((name, card_id)) => (name, Some(card_id.trim())),
                None => (rest, None),
            };
            let name = required(name, "show <projection> [card_id]")?;
            Command::Show(Projection::named(name, card_id)?)
        }
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(ClientError::UnknownCommand(other.to_owned())),
    };
    Ok(Some(command))
}

fn required<'a>(arg: &'a str, usage: &str) -> Result<&'a str, ClientError> {
    let arg = arg.trim();
    if arg.is_empty() {
        Err(ClientError::Usage(usage.to_owned()))
    } else {
        Ok(arg)
    }
}

/// Split off the first word; the remainder must be non-empty.
fn split_arg<'a>(rest: &'a str, usage: &str) -> Result<(&'a str, &'a str), ClientError> {
    rest.split_once(char::is_whitespace)
        .map(|(head, tail)| (head, tail.trim()))
        .filter(|(head, tail)| !head.is_empty() && !tail.is_empty())
        .ok_or_else(|| ClientError::Usage(usage.to_owned()))
}
