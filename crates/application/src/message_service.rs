use std::sync::Arc;

use pulse_core::{AppError, AppResult, SubjectIdentity};
use pulse_domain::{Capability, EditRecord, MessageRef, normalize_edit};
use tracing::info;

use crate::{AuthorizationService, MessageRepository};

/// Application service for editing and deleting chat messages.
#[derive(Clone)]
pub struct MessageService {
    authorization: AuthorizationService,
    repository: Arc<dyn MessageRepository>,
}

impl MessageService {
    /// Creates a message service.
    #[must_use]
    pub fn new(authorization: AuthorizationService, repository: Arc<dyn MessageRepository>) -> Self {
        Self {
            authorization,
            repository,
        }
    }

    /// Returns whether the actor may edit the message.
    pub async fn can_edit(&self, actor: &SubjectIdentity, message: &MessageRef) -> bool {
        self.is_author_or_holds(actor, message, Capability::EditAnyMessage)
            .await
    }

    /// Returns whether the actor may delete the message.
    pub async fn can_delete(&self, actor: &SubjectIdentity, message: &MessageRef) -> bool {
        self.is_author_or_holds(actor, message, Capability::DeleteAnyMessage)
            .await
    }

    /// Replaces a message's content.
    ///
    /// Returns `false` without writing when the content is unchanged.
    pub async fn edit_message(
        &self,
        actor: &SubjectIdentity,
        message: &MessageRef,
        proposed: &str,
    ) -> AppResult<bool> {
        let Some(content) = normalize_edit(&message.content, proposed)? else {
            return Ok(false);
        };

        if !self.can_edit(actor, message).await {
            return Err(AppError::Forbidden(format!(
                "subject '{}' cannot edit message '{}'",
                actor.id(),
                message.message_id
            )));
        }

        self.repository
            .update_message(
                message,
                EditRecord {
                    content,
                    edited: true,
                    edited_at: crate::now_timestamp(),
                },
            )
            .await?;

        info!(
            subject = %actor.id(),
            message = %message.message_id,
            "message edited"
        );
        Ok(true)
    }

    /// Deletes a message.
    pub async fn delete_message(
        &self,
        actor: &SubjectIdentity,
        message: &MessageRef,
    ) -> AppResult<()> {
        if !self.can_delete(actor, message).await {
            return Err(AppError::Forbidden(format!(
                "subject '{}' cannot delete message '{}'",
                actor.id(),
                message.message_id
            )));
        }

        self.repository.delete_message(message).await
    }

    async fn is_author_or_holds(
        &self,
        actor: &SubjectIdentity,
        message: &MessageRef,
        capability: Capability,
    ) -> bool {
        if actor.id() == &message.author {
            return true;
        }

        self.authorization
            .subject_has_capability(actor, capability)
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use pulse_core::{AppError, AppResult, SubjectId, SubjectIdentity};
    use pulse_domain::{EditRecord, MessageRef, Role};
    use tokio::sync::Mutex;

    use crate::{
        AuditEvent, AuditLogEntry, AuditLogQuery, AuditLogRepository, AuditRepository,
        AuthorizationPolicy, AuthorizationService, MessageRepository, RoleAssignment,
        RoleAssignmentRepository,
    };

    use super::MessageService;

    struct FixedRoleRepository {
        role: Option<Role>,
    }

    #[async_trait]
    impl RoleAssignmentRepository for FixedRoleRepository {
        async fn find_role(&self, _subject: &SubjectId) -> AppResult<Option<Role>> {
            Ok(self.role)
        }

        async fn save_assignment(&self, _assignment: RoleAssignment) -> AppResult<()> {
            Ok(())
        }

        async fn delete_assignment(&self, _subject: &SubjectId) -> AppResult<()> {
            Ok(())
        }
    }

    struct NoopAudit;

    #[async_trait]
    impl AuditRepository for NoopAudit {
        async fn append_event(&self, _event: AuditEvent) -> AppResult<()> {
            Ok(())
        }
    }

    #[async_trait]
    impl AuditLogRepository for NoopAudit {
        async fn list_recent_entries(&self, _query: AuditLogQuery) -> AppResult<Vec<AuditLogEntry>> {
            Ok(Vec::new())
        }
    }

    #[derive(Default)]
    struct FakeMessageRepository {
        edits: Mutex<Vec<(String, EditRecord)>>,
        deleted: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl MessageRepository for FakeMessageRepository {
        async fn update_message(&self, message: &MessageRef, record: EditRecord) -> AppResult<()> {
            if self.fail {
                return Err(AppError::Unavailable("store offline".to_owned()));
            }
            self.edits
                .lock()
                .await
                .push((message.message_id.clone(), record));
            Ok(())
        }

        async fn delete_message(&self, message: &MessageRef) -> AppResult<()> {
            self.deleted.lock().await.push(message.message_id.clone());
            Ok(())
        }
    }

    fn subject(id: &str) -> SubjectId {
        SubjectId::new(id).unwrap_or_else(|_| unreachable!())
    }

    fn identity(id: &str) -> SubjectIdentity {
        SubjectIdentity::new(subject(id), Some(id.to_owned()))
    }

    fn message() -> MessageRef {
        MessageRef {
            collection_path: "channels/general/messages".to_owned(),
            message_id: "m1".to_owned(),
            author: subject("author"),
            content: "hello".to_owned(),
        }
    }

    fn service_with(
        role: Option<Role>,
        repository: Arc<FakeMessageRepository>,
    ) -> MessageService {
        let authorization = AuthorizationService::new(
            AuthorizationPolicy::new(Vec::new(), None),
            Arc::new(FixedRoleRepository { role }),
            Arc::new(NoopAudit),
            Arc::new(NoopAudit),
        );
        MessageService::new(authorization, repository)
    }

    #[tokio::test]
    async fn author_and_admin_may_edit_but_others_may_not() {
        let user_service = service_with(None, Arc::new(FakeMessageRepository::default()));
        let admin_service =
            service_with(Some(Role::Admin), Arc::new(FakeMessageRepository::default()));

        assert!(user_service.can_edit(&identity("author"), &message()).await);
        assert!(!user_service.can_edit(&identity("other"), &message()).await);
        assert!(admin_service.can_edit(&identity("other"), &message()).await);
    }

    #[tokio::test]
    async fn moderator_may_delete_but_not_edit_foreign_messages() {
        let service =
            service_with(Some(Role::Moderator), Arc::new(FakeMessageRepository::default()));

        assert!(service.can_delete(&identity("other"), &message()).await);
        assert!(!service.can_edit(&identity("other"), &message()).await);
    }

    #[tokio::test]
    async fn edit_writes_trimmed_content_with_marker() {
        let repository = Arc::new(FakeMessageRepository::default());
        let service = service_with(None, repository.clone());

        let changed = service
            .edit_message(&identity("author"), &message(), "  hello there  ")
            .await
            .unwrap_or_else(|_| unreachable!());

        assert!(changed);
        let edits = repository.edits.lock().await;
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].0, "m1");
        assert_eq!(edits[0].1.content, "hello there");
        assert!(edits[0].1.edited);
    }

    #[tokio::test]
    async fn unchanged_content_is_a_no_op() {
        let repository = Arc::new(FakeMessageRepository::default());
        let service = service_with(None, repository.clone());

        let changed = service
            .edit_message(&identity("author"), &message(), " hello ")
            .await
            .unwrap_or_else(|_| unreachable!());

        assert!(!changed);
        assert!(repository.edits.lock().await.is_empty());
    }

    #[tokio::test]
    async fn edit_rejects_empty_content_and_strangers() {
        let repository = Arc::new(FakeMessageRepository::default());
        let service = service_with(None, repository.clone());

        let empty = service
            .edit_message(&identity("author"), &message(), "   ")
            .await;
        assert!(matches!(empty, Err(AppError::Validation(_))));

        let stranger = service
            .edit_message(&identity("other"), &message(), "changed")
            .await;
        assert!(matches!(stranger, Err(AppError::Forbidden(_))));
        assert!(repository.edits.lock().await.is_empty());
    }

    #[tokio::test]
    async fn store_failure_propagates() {
        let service = service_with(
            None,
            Arc::new(FakeMessageRepository {
                fail: true,
                ..FakeMessageRepository::default()
            }),
        );

        let result = service
            .edit_message(&identity("author"), &message(), "changed")
            .await;

        assert!(matches!(result, Err(AppError::Unavailable(_))));
    }

    #[tokio::test]
    async fn delete_requires_author_or_capability() {
        let repository = Arc::new(FakeMessageRepository::default());
        let service = service_with(Some(Role::Vip), repository.clone());

        let denied = service.delete_message(&identity("other"), &message()).await;
        assert!(matches!(denied, Err(AppError::Forbidden(_))));

        service
            .delete_message(&identity("author"), &message())
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(*repository.deleted.lock().await, vec!["m1".to_owned()]);
    }
}
