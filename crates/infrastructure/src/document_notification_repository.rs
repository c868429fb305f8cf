use std::sync::Arc;

use async_trait::async_trait;
use pulse_application::{DocumentStore, NotificationRepository};
use pulse_core::AppResult;
use pulse_domain::Notification;
use serde_json::Value;

use crate::document_fields::document_of;

const COLLECTION: &str = "notifications";

/// Notifications stored in the `notifications` collection.
#[derive(Clone)]
pub struct DocumentNotificationRepository {
    store: Arc<dyn DocumentStore>,
}

impl DocumentNotificationRepository {
    /// Creates a repository over a document store.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl NotificationRepository for DocumentNotificationRepository {
    async fn add_notification(&self, notification: Notification) -> AppResult<String> {
        let document = document_of([
            ("userId", Value::from(notification.recipient.as_str())),
            ("type", Value::from(notification.kind.as_str())),
            ("message", Value::from(notification.message)),
            ("url", Value::from(notification.url)),
            ("read", Value::from(notification.read)),
            ("createdAt", Value::from(notification.created_at)),
        ]);

        self.store.add(COLLECTION, document).await
    }

    async fn mark_read(&self, notification_id: &str) -> AppResult<()> {
        self.store
            .update(
                &format!("{COLLECTION}/{notification_id}"),
                document_of([("read", Value::from(true))]),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pulse_application::{DocumentStore, NotificationRepository};
    use pulse_core::SubjectId;
    use pulse_domain::Notification;
    use serde_json::json;

    use crate::InMemoryDocumentStore;

    use super::DocumentNotificationRepository;

    #[tokio::test]
    async fn add_then_mark_read() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let repository = DocumentNotificationRepository::new(store.clone());
        let notification = Notification::mention(
            SubjectId::new("u1").unwrap_or_else(|_| unreachable!()),
            "Ann",
            "/chat#m1",
            "2026-01-01T00:00:00.000Z",
        );

        let id = repository
            .add_notification(notification)
            .await
            .unwrap_or_else(|_| unreachable!());
        repository
            .mark_read(&id)
            .await
            .unwrap_or_else(|_| unreachable!());

        let stored = store
            .get(&format!("notifications/{id}"))
            .await
            .unwrap_or_else(|_| unreachable!())
            .unwrap_or_else(|| unreachable!());
        assert_eq!(stored.get("type"), Some(&json!("mention")));
        assert_eq!(stored.get("userId"), Some(&json!("u1")));
        assert_eq!(stored.get("read"), Some(&json!(true)));
        assert_eq!(
            stored.get("message"),
            Some(&json!("Ann mentioned you in a message"))
        );
    }
}
