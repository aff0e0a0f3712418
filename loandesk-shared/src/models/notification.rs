use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

use super::Timestamp;

/// Categories of notifications emitted by the platform.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    LoanApproved,
    LoanRejected,
    ReturnReminder,
    NewMessage,
    System,
}

impl NotificationType {
    /// Return the canonical string representation used on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LoanApproved => "loan_approved",
            Self::LoanRejected => "loan_rejected",
            Self::ReturnReminder => "return_reminder",
            Self::NewMessage => "new_message",
            Self::System => "system",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A notification addressed to the current actor.
///
/// `is_read` is the only field that ever changes locally; everything else is an
/// immutable server snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    /// Unique identifier for the notification.
    pub id: Uuid,

    /// The notification category.
    pub kind: NotificationType,

    /// Short title.
    pub title: String,

    /// Longer body text.
    pub message: String,

    /// Whether the actor has read the notification.
    pub is_read: bool,

    /// When the notification was created.
    pub created_at: Timestamp,
}

/// Local view predicate over a notification list. Never sent to the server.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationFilter {
    #[default]
    All,
    Unread,
    Read,
}

impl NotificationFilter {
    /// Whether `notification` is visible under this filter.
    #[must_use]
    pub fn matches(self, notification: &Notification) -> bool {
        match self {
            Self::All => true,
            Self::Unread => !notification.is_read,
            Self::Read => notification.is_read,
        }
    }
}

impl fmt::Display for NotificationFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::All => "all",
            Self::Unread => "unread",
            Self::Read => "read",
        };
        f.write_str(text)
    }
}

impl FromStr for NotificationFilter {
    type Err = &'static str;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "all" => Ok(Self::All),
            "unread" => Ok(Self::Unread),
            "read" => Ok(Self::Read),
            _ => Err("unknown notification filter"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample(is_read: bool) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            kind: NotificationType::ReturnReminder,
            title: "Return due".to_string(),
            message: "Laptop L-42 is due back tomorrow".to_string(),
            is_read,
            created_at: Timestamp(Utc.with_ymd_and_hms(2025, 3, 8, 9, 0, 0).unwrap()),
        }
    }

    #[test]
    fn test_notification_serialization() {
        let notification = sample(false);
        let serialized = serde_json::to_string(&notification).unwrap();
        let deserialized: Notification = serde_json::from_str(&serialized).unwrap();

        assert_eq!(deserialized, notification);
        assert!(serialized.contains("\"return_reminder\""));
        assert!(serialized.contains("\"is_read\":false"));
    }

    #[test]
    fn test_notification_type_wire_names() {
        for (kind, text) in [
            (NotificationType::LoanApproved, "loan_approved"),
            (NotificationType::LoanRejected, "loan_rejected"),
            (NotificationType::ReturnReminder, "return_reminder"),
            (NotificationType::NewMessage, "new_message"),
            (NotificationType::System, "system"),
        ] {
            assert_eq!(kind.as_str(), text);
            let json = format!("\"{text}\"");
            let parsed: NotificationType = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn test_unknown_notification_type_rejected() {
        assert!(serde_json::from_str::<NotificationType>("\"weather\"").is_err());
    }

    #[test]
    fn test_filter_matches() {
        let unread = sample(false);
        let read = sample(true);

        assert!(NotificationFilter::All.matches(&unread));
        assert!(NotificationFilter::All.matches(&read));
        assert!(NotificationFilter::Unread.matches(&unread));
        assert!(!NotificationFilter::Unread.matches(&read));
        assert!(NotificationFilter::Read.matches(&read));
        assert!(!NotificationFilter::Read.matches(&unread));
    }

    #[test]
    fn test_filter_roundtrip() {
        for (text, filter) in [
            ("all", NotificationFilter::All),
            ("unread", NotificationFilter::Unread),
            ("read", NotificationFilter::Read),
        ] {
            assert_eq!(filter.to_string(), text);
            assert_eq!(NotificationFilter::from_str(text).unwrap(), filter);
        }
        assert!(NotificationFilter::from_str("starred").is_err());
    }
}
