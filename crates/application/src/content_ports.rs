use async_trait::async_trait;
use pulse_core::{AppResult, SubjectId};
use pulse_domain::{EditRecord, MessageRef, Notification, Reaction, ReactionEmoji};

/// Document that carries a reactions subcollection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionTarget {
    /// Collection holding the document, for example `posts`.
    pub collection_path: String,
    /// Document id.
    pub document_id: String,
}

impl ReactionTarget {
    /// Creates a reaction target.
    #[must_use]
    pub fn new(collection_path: impl Into<String>, document_id: impl Into<String>) -> Self {
        Self {
            collection_path: collection_path.into(),
            document_id: document_id.into(),
        }
    }

    /// Returns the reactions subcollection path.
    #[must_use]
    pub fn reactions_path(&self) -> String {
        format!("{}/{}/reactions", self.collection_path, self.document_id)
    }
}

/// Repository port for reactions.
///
/// Implementations key each record by `reaction_id(subject, emoji)` so that a
/// subject holds at most one reaction per emoji on a document.
#[async_trait]
pub trait ReactionRepository: Send + Sync {
    /// Writes a reaction, overwriting an existing record with the same identity.
    async fn save_reaction(&self, target: &ReactionTarget, reaction: Reaction) -> AppResult<()>;

    /// Reads one subject's reaction for an emoji.
    async fn find_reaction(
        &self,
        target: &ReactionTarget,
        subject: &SubjectId,
        emoji: ReactionEmoji,
    ) -> AppResult<Option<Reaction>>;

    /// Deletes one subject's reaction for an emoji.
    async fn delete_reaction(
        &self,
        target: &ReactionTarget,
        subject: &SubjectId,
        emoji: ReactionEmoji,
    ) -> AppResult<()>;

    /// Lists all reactions on a document in store order.
    async fn list_reactions(&self, target: &ReactionTarget) -> AppResult<Vec<Reaction>>;
}

/// Repository port for chat messages.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Writes edited content and the edit marker.
    async fn update_message(&self, message: &MessageRef, record: EditRecord) -> AppResult<()>;

    /// Deletes a message.
    async fn delete_message(&self, message: &MessageRef) -> AppResult<()>;
}

/// Repository port for notifications.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Stores a notification and returns its id.
    async fn add_notification(&self, notification: Notification) -> AppResult<String>;

    /// Marks a notification as read.
    async fn mark_read(&self, notification_id: &str) -> AppResult<()>;
}
