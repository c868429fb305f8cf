use std::sync::Arc;

use async_trait::async_trait;
use pulse_application::{
    AuditEvent, AuditLogEntry, AuditLogQuery, AuditLogRepository, AuditRepository, Document,
    DocumentQuery, DocumentStore, FieldFilter, FilterOp, StoredDocument,
};
use pulse_core::AppResult;
use serde_json::{Value, json};

use crate::document_fields::{document_of, required_string_field, string_field};

const COLLECTION: &str = "adminLogs";

/// Append-only administrative audit log stored in the `adminLogs` collection.
#[derive(Clone)]
pub struct DocumentAuditRepository {
    store: Arc<dyn DocumentStore>,
}

impl DocumentAuditRepository {
    /// Creates a repository over a document store.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AuditRepository for DocumentAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        let mut details = json!({ "targetUserId": event.target.as_str() });
        if let (Some(role), Some(details)) = (event.role, details.as_object_mut()) {
            details.insert("role".to_owned(), Value::from(role.as_str()));
        }

        let document = document_of([
            ("adminId", Value::from(event.actor.as_str())),
            ("action", Value::from(event.action.as_str())),
            ("details", details),
            ("timestamp", Value::from(event.timestamp)),
        ]);

        self.store.add(COLLECTION, document).await.map(|_| ())
    }
}

#[async_trait]
impl AuditLogRepository for DocumentAuditRepository {
    async fn list_recent_entries(&self, query: AuditLogQuery) -> AppResult<Vec<AuditLogEntry>> {
        let filters = query
            .action
            .map(|action| vec![FieldFilter::new("action", FilterOp::Eq, action.as_str())])
            .unwrap_or_default();

        let documents = self
            .store
            .query(
                COLLECTION,
                DocumentQuery {
                    filters,
                    order_by: Some(("timestamp".to_owned(), true)),
                    limit: Some(query.limit),
                },
            )
            .await?;

        documents.into_iter().map(entry_from_document).collect()
    }
}

fn entry_from_document(document: StoredDocument) -> AppResult<AuditLogEntry> {
    let context = format!("audit entry '{}'", document.id);
    let details: Option<&Document> = document.data.get("details").and_then(Value::as_object);

    Ok(AuditLogEntry {
        actor: required_string_field(&document.data, "adminId", &context)?,
        action: required_string_field(&document.data, "action", &context)?,
        target: details
            .and_then(|details| string_field(details, "targetUserId"))
            .unwrap_or_default()
            .to_owned(),
        role: details
            .and_then(|details| string_field(details, "role"))
            .map(str::to_owned),
        timestamp: required_string_field(&document.data, "timestamp", &context)?,
        event_id: document.id,
    })
}
