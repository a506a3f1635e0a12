//! Alert list used as the user-facing error channel.
//!
//! Rejected intents (for example removing a card's `id`) surface here as
//! [`Alert`]s instead of failing. Alerts are removed by value: the first
//! entry equal to the requested one goes, and asking to remove an alert that
//! is no longer present is a reported no-op.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Alert types
// ---------------------------------------------------------------------------

/// Severity level of an alert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    /// A rejected operation or failure. The default for errors.
    #[default]
    Danger,
    /// Something is off but nothing was rejected.
    Warning,
    /// Informational notice.
    Info,
    /// Confirmation of a completed operation.
    Success,
}

impl AlertLevel {
    /// Lowercase wire name of the level.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Danger => "danger",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Success => "success",
        }
    }
}

/// A single alert shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// Severity of the alert.
    pub level: AlertLevel,
    /// Human-readable message.
    pub msg: String,
}

impl Alert {
    /// Create an alert with an explicit level.
    pub fn new(level: AlertLevel, msg: impl Into<String>) -> Self {
        Self {
            level,
            msg: msg.into(),
        }
    }
}

/// Caller-supplied fields for a new error alert.
///
/// The level is optional; a draft without one becomes a
/// [`AlertLevel::Danger`] alert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertDraft {
    /// Requested level, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<AlertLevel>,
    /// Message text.
    pub msg: String,
}

impl AlertDraft {
    /// Draft with only a message.
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            level: None,
            msg: msg.into(),
        }
    }

    /// Override the default level.
    #[must_use]
    pub const fn with_level(mut self, level: AlertLevel) -> Self {
        self.level = Some(level);
        self
    }

    /// Merge the draft over the defaults.
    pub fn into_alert(self) -> Alert {
        Alert {
            level: self.level.unwrap_or_default(),
            msg: self.msg,
        }
    }
}

// ---------------------------------------------------------------------------
// Alert list
// ---------------------------------------------------------------------------

/// Outcome of removing an alert by value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal {
    /// The first equal alert was removed.
    Removed(Alert),
    /// No equal alert was present; the list is unchanged.
    NotFound,
}

impl Removal {
    /// Whether an alert was actually removed.
    pub const fn is_removed(&self) -> bool {
        matches!(self, Self::Removed(_))
    }
}

/// Ordered list of alerts, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AlertList {
    alerts: Vec<Alert>,
}

impl AlertList {
    /// Create an empty list.
    pub const fn new() -> Self {
        Self { alerts: Vec::new() }
    }

    /// All alerts in insertion order.
    pub fn all(&self) -> &[Alert] {
        &self.alerts
    }

    /// Number of alerts.
    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    /// Alert at a position, if any.
    pub fn get(&self, index: usize) -> Option<&Alert> {
        self.alerts.get(index)
    }

    /// Append an alert.
    pub(crate) fn push(&mut self, alert: Alert) {
        self.alerts.push(alert);
    }

    /// Remove the first alert equal to `item`.
    pub(crate) fn remove(&mut self, item: &Alert) -> Removal {
        match self.alerts.iter().position(|a| a == item) {
            Some(index) => Removal::Removed(self.alerts.remove(index)),
            None => Removal::NotFound,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn draft_defaults_to_danger() {
        let alert = AlertDraft::new("boom").into_alert();
        assert_eq!(alert.level, AlertLevel::Danger);
        assert_eq!(alert.msg, "boom");

        let info = AlertDraft::new("fyi").with_level(AlertLevel::Info).into_alert();
        assert_eq!(info.level, AlertLevel::Info);
    }

    #[test]
    fn draft_deserializes_without_level() {
        let draft: AlertDraft =
            serde_json::from_value(serde_json::json!({"msg": "x"})).unwrap();
        assert_eq!(draft, AlertDraft::new("x"));
    }

    #[test]
    fn remove_takes_first_equal_alert() {
        let mut list = AlertList::new();
        list.push(Alert::new(AlertLevel::Danger, "a"));
        list.push(Alert::new(AlertLevel::Info, "b"));
        list.push(Alert::new(AlertLevel::Danger, "a"));

        let removal = list.remove(&Alert::new(AlertLevel::Danger, "a"));
        assert!(removal.is_removed());
        assert_eq!(list.len(), 2);
        assert_eq!(list.get(0).map(|a| a.msg.as_str()), Some("b"));
        assert_eq!(list.get(1).map(|a| a.msg.as_str()), Some("a"));
    }

    #[test]
    fn remove_missing_alert_is_noop() {
        let mut list = AlertList::new();
        list.push(Alert::new(AlertLevel::Warning, "kept"));
        let before = list.clone();

        let removal = list.remove(&Alert::new(AlertLevel::Danger, "kept"));
        assert_eq!(removal, Removal::NotFound);
        assert_eq!(list, before);
    }

    #[test]
    fn level_serializes_lowercase() {
        let json = serde_json::to_value(Alert::new(AlertLevel::Success, "ok")).unwrap();
        assert_eq!(json, serde_json::json!({"level": "success", "msg": "ok"}));
        assert_eq!(AlertLevel::Success.as_str(), "success");
    }
}
