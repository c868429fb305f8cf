use std::sync::Arc;

use async_trait::async_trait;
use pulse_application::{
    DocumentQuery, DocumentStore, FieldFilter, FilterOp, StoredDocument, SubjectDirectory,
    SubjectSummary,
};
use pulse_core::{AppResult, SubjectId};
use pulse_domain::DisplayName;
use serde_json::Value;
use tracing::debug;

use crate::document_fields::{document_of, string_field};

const COLLECTION: &str = "users";
const DISPLAY_NAME_FIELD: &str = "displayName";

/// Upper bound appended to a prefix to express starts-with as a range.
pub const PREFIX_RANGE_SENTINEL: char = '\u{f8ff}';

/// Subject directory backed by the `users` collection.
#[derive(Clone)]
pub struct DocumentSubjectDirectory {
    store: Arc<dyn DocumentStore>,
}

impl DocumentSubjectDirectory {
    /// Creates a directory over a document store.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SubjectDirectory for DocumentSubjectDirectory {
    async fn search_by_display_name_prefix(
        &self,
        prefix: &str,
        limit: usize,
    ) -> AppResult<Vec<SubjectSummary>> {
        let documents = self
            .store
            .query(
                COLLECTION,
                DocumentQuery {
                    filters: vec![
                        FieldFilter::new(DISPLAY_NAME_FIELD, FilterOp::Gte, prefix),
                        FieldFilter::new(
                            DISPLAY_NAME_FIELD,
                            FilterOp::Lte,
                            format!("{prefix}{PREFIX_RANGE_SENTINEL}"),
                        ),
                    ],
                    order_by: Some((DISPLAY_NAME_FIELD.to_owned(), false)),
                    limit: Some(limit),
                },
            )
            .await?;

        Ok(summaries(documents))
    }

    async fn find_by_display_name(&self, display_name: &str) -> AppResult<Vec<SubjectSummary>> {
        let documents = self
            .store
            .query(
                COLLECTION,
                DocumentQuery {
                    filters: vec![FieldFilter::new(
                        DISPLAY_NAME_FIELD,
                        FilterOp::Eq,
                        display_name,
                    )],
                    ..DocumentQuery::default()
                },
            )
            .await?;

        Ok(summaries(documents))
    }

    async fn save_display_name(
        &self,
        subject: &SubjectId,
        display_name: &DisplayName,
    ) -> AppResult<()> {
        self.store
            .set(
                &format!("{COLLECTION}/{subject}"),
                document_of([(DISPLAY_NAME_FIELD, Value::from(display_name.as_str()))]),
                true,
            )
            .await
    }
}

fn summaries(documents: Vec<StoredDocument>) -> Vec<SubjectSummary> {
    documents
        .into_iter()
        .filter_map(|document| {
            let display_name = string_field(&document.data, DISPLAY_NAME_FIELD)?.to_owned();
            match SubjectId::new(document.id.as_str()) {
                Ok(subject) => Some(SubjectSummary {
                    subject,
                    display_name,
                }),
                Err(error) => {
                    debug!(id = %document.id, error = %error, "skipping malformed user document");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pulse_application::{DocumentStore, SubjectDirectory};
    use pulse_core::SubjectId;
    use pulse_domain::DisplayName;
    use serde_json::json;

    use crate::InMemoryDocumentStore;
    use crate::document_fields::document_of;

    use super::DocumentSubjectDirectory;

    async fn directory() -> (Arc<InMemoryDocumentStore>, DocumentSubjectDirectory) {
        let store = Arc::new(InMemoryDocumentStore::new());
        for (id, name) in [("u1", "bob"), ("u2", "alice"), ("u3", "alfred"), ("u4", "Al")] {
            store
                .set(
                    &format!("users/{id}"),
                    document_of([("displayName", json!(name))]),
                    false,
                )
                .await
                .unwrap_or_else(|_| unreachable!());
        }
        store
            .set("users/u5", document_of([("bio", json!("no name"))]), false)
            .await
            .unwrap_or_else(|_| unreachable!());
        let directory = DocumentSubjectDirectory::new(store.clone());
        (store, directory)
    }

    fn names(summaries: &[pulse_application::SubjectSummary]) -> Vec<&str> {
        summaries
            .iter()
            .map(|summary| summary.display_name.as_str())
            .collect()
    }

    #[tokio::test]
    async fn prefix_search_is_case_sensitive_starts_with() {
        let (_, directory) = directory().await;

        let found = directory
            .search_by_display_name_prefix("al", 5)
            .await
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(names(&found), vec!["alfred", "alice"]);
        assert_eq!(found[1].subject.as_str(), "u2");
    }

    #[tokio::test]
    async fn prefix_search_respects_limit() {
        let (_, directory) = directory().await;

        let found = directory
            .search_by_display_name_prefix("", 2)
            .await
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn exact_lookup_and_save_merge_into_user_document() {
        let (store, directory) = directory().await;
        let subject = SubjectId::new("u5").unwrap_or_else(|_| unreachable!());
        let name = DisplayName::new("carol").unwrap_or_else(|_| unreachable!());

        directory
            .save_display_name(&subject, &name)
            .await
            .unwrap_or_else(|_| unreachable!());

        let found = directory
            .find_by_display_name("carol")
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(names(&found), vec!["carol"]);

        let stored = store
            .get("users/u5")
            .await
            .unwrap_or_else(|_| unreachable!())
            .unwrap_or_else(|| unreachable!());
        assert_eq!(stored.get("bio"), Some(&json!("no name")));
    }
}
