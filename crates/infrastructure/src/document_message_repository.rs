use std::sync::Arc;

use async_trait::async_trait;
use pulse_application::{DocumentStore, MessageRepository};
use pulse_core::AppResult;
use pulse_domain::{EditRecord, MessageRef};
use serde_json::Value;

use crate::document_fields::document_of;

/// Chat messages stored as `{collection}/{message}` documents.
#[derive(Clone)]
pub struct DocumentMessageRepository {
    store: Arc<dyn DocumentStore>,
}

impl DocumentMessageRepository {
    /// Creates a repository over a document store.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

fn message_path(message: &MessageRef) -> String {
    format!("{}/{}", message.collection_path, message.message_id)
}

#[async_trait]
impl MessageRepository for DocumentMessageRepository {
    async fn update_message(&self, message: &MessageRef, record: EditRecord) -> AppResult<()> {
        let fields = document_of([
            ("content", Value::from(record.content)),
            ("edited", Value::from(record.edited)),
            ("editedAt", Value::from(record.edited_at)),
        ]);

        self.store.update(&message_path(message), fields).await
    }

    async fn delete_message(&self, message: &MessageRef) -> AppResult<()> {
        self.store.delete(&message_path(message)).await
    }
}
