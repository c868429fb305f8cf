use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

use async_trait::async_trait;
use pulse_application::{
    Document, DocumentQuery, DocumentStore, FieldFilter, FilterOp, StoredDocument,
};
use pulse_core::{AppError, AppResult};
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;


/// In-memory hierarchical document store.
///
/// Document paths have an even number of segments and collection paths an odd
/// number, so `posts/p1/reactions/r1` is a document inside `posts/p1/reactions`.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<BTreeMap<String, Document>>,
    unavailable: AtomicBool,
}

impl InMemoryDocumentStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later call fail with [`AppError::Unavailable`] until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, AtomicOrdering::SeqCst);
    }

    /// Returns the number of stored documents.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Returns whether the store holds no documents.
    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    fn ensure_available(&self) -> AppResult<()> {
        if self.unavailable.load(AtomicOrdering::SeqCst) {
            return Err(AppError::Unavailable(
                "document store is unavailable".to_owned(),
            ));
        }

        Ok(())
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, path: &str) -> AppResult<Option<Document>> {
        self.ensure_available()?;
        let path = document_path(path)?;
        Ok(self.documents.read().await.get(&path).cloned())
    }

    async fn query(
        &self,
        collection_path: &str,
        query: DocumentQuery,
    ) -> AppResult<Vec<StoredDocument>> {
        self.ensure_available()?;
        let prefix = format!("{}/", collection_path_of(collection_path)?);
        let documents = self.documents.read().await;

        let mut matches: Vec<StoredDocument> = documents
            .range(prefix.clone()..)
            .take_while(|(path, _)| path.starts_with(&prefix))
            .filter_map(|(path, data)| {
                let id = &path[prefix.len()..];
                (!id.contains('/') && query.filters.iter().all(|filter| matches_filter(data, filter)))
                    .then(|| StoredDocument {
                        id: id.to_owned(),
                        data: data.clone(),
                    })
            })
            .collect();

        if let Some((field, descending)) = &query.order_by {
            matches.retain(|document| document.data.contains_key(field));
            matches.sort_by(|left, right| {
                let ordering = compare_fields(&left.data, &right.data, field);
                if *descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }

        if let Some(limit) = query.limit {
            matches.truncate(limit);
        }

        Ok(matches)
    }

    async fn set(&self, path: &str, document: Document, merge: bool) -> AppResult<()> {
        self.ensure_available()?;
        let path = document_path(path)?;
        let mut documents = self.documents.write().await;

        match documents.get_mut(&path) {
            Some(existing) if merge => existing.extend(document),
            _ => {
                documents.insert(path, document);
            }
        }

        Ok(())
    }

    async fn add(&self, collection_path: &str, document: Document) -> AppResult<String> {
        self.ensure_available()?;
        let collection_path = collection_path_of(collection_path)?;
        let id = Uuid::new_v4().simple().to_string();

        self.documents
            .write()
            .await
            .insert(format!("{collection_path}/{id}"), document);

        Ok(id)
    }

    async fn update(&self, path: &str, fields: Document) -> AppResult<()> {
        self.ensure_available()?;
        let path = document_path(path)?;
        let mut documents = self.documents.write().await;
        let existing = documents
            .get_mut(&path)
            .ok_or_else(|| AppError::NotFound(format!("document '{path}' does not exist")))?;

        existing.extend(fields);
        Ok(())
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        self.ensure_available()?;
        let path = document_path(path)?;
        self.documents.write().await.remove(&path);
        Ok(())
    }
}

fn normalize_path(path: &str) -> AppResult<Vec<&str>> {
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    if segments.iter().any(|segment| segment.trim().is_empty()) {
        return Err(AppError::InvalidArgument(format!(
            "path '{path}' contains an empty segment"
        )));
    }

    Ok(segments)
}

fn document_path(path: &str) -> AppResult<String> {
    let segments = normalize_path(path)?;
    if segments.len() % 2 != 0 {
        return Err(AppError::InvalidArgument(format!(
            "'{path}' is a collection path, expected a document path"
        )));
    }

    Ok(segments.join("/"))
}

fn collection_path_of(path: &str) -> AppResult<String> {
    let segments = normalize_path(path)?;
    if segments.len() % 2 == 0 {
        return Err(AppError::InvalidArgument(format!(
            "'{path}' is a document path, expected a collection path"
        )));
    }

    Ok(segments.join("/"))
}

fn matches_filter(document: &Document, filter: &FieldFilter) -> bool {
    let Some(value) = document.get(&filter.field) else {
        return false;
    };

    match filter.op {
        FilterOp::Eq => value == &filter.value,
        FilterOp::Gte => compare_values(value, &filter.value).is_some_and(Ordering::is_ge),
        FilterOp::Lte => compare_values(value, &filter.value).is_some_and(Ordering::is_le),
    }
}

fn compare_fields(left: &Document, right: &Document, field: &str) -> Ordering {
    match (left.get(field), right.get(field)) {
        (Some(left), Some(right)) => compare_values(left, right).unwrap_or(Ordering::Equal),
        _ => Ordering::Equal,
    }
}

/// Orders values of the same JSON type; mixed types are incomparable.
fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::String(left), Value::String(right)) => Some(left.cmp(right)),
        (Value::Number(left), Value::Number(right)) => {
            left.as_f64()?.partial_cmp(&right.as_f64()?)
        }
        (Value::Bool(left), Value::Bool(right)) => Some(left.cmp(right)),
        _ => None,
    }
}
