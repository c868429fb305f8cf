use pulse_core::SubjectId;
use serde::{Deserialize, Serialize};

/// Kind of notification delivered to a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// The subject was mentioned in a message.
    Mention,
}

impl NotificationKind {
    /// Returns a stable storage value for this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mention => "mention",
        }
    }
}

/// Notification addressed to one subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Recipient.
    pub recipient: SubjectId,
    /// Notification kind.
    pub kind: NotificationKind,
    /// Human-readable text.
    pub message: String,
    /// Link to the message that triggered the notification.
    pub url: String,
    /// Whether the recipient has opened it.
    pub read: bool,
    /// Creation timestamp in RFC3339.
    pub created_at: String,
}

impl Notification {
    /// Builds an unread mention notification.
    #[must_use]
    pub fn mention(
        recipient: SubjectId,
        author_name: &str,
        url: impl Into<String>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            recipient,
            kind: NotificationKind::Mention,
            message: format!("{author_name} mentioned you in a message"),
            url: url.into(),
            read: false,
            created_at: created_at.into(),
        }
    }
}
