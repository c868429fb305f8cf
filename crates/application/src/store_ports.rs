use async_trait::async_trait;
use pulse_core::{AppResult, SubjectId, SubjectIdentity};
use pulse_domain::{DisplayName, UploadProgress};
use serde_json::{Map, Value};
use tokio::sync::mpsc::UnboundedSender;

/// Field map stored at one document path.
pub type Document = Map<String, Value>;

/// Sender half of an upload progress subscription.
///
/// Dropping the matching receiver unsubscribes; senders ignore closed channels.
pub type ProgressSender = UnboundedSender<UploadProgress>;

/// Auth provider port.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Returns the signed-in subject, if any.
    async fn current_subject(&self) -> AppResult<Option<SubjectIdentity>>;

    /// Replaces the subject's display name in the provider profile.
    async fn update_display_name(
        &self,
        subject: &SubjectId,
        display_name: &DisplayName,
    ) -> AppResult<()>;
}

/// Comparison applied by one query filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// Field equals the value.
    Eq,
    /// Field is greater than or equal to the value.
    Gte,
    /// Field is less than or equal to the value.
    Lte,
}

/// One field filter in a collection query.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    /// Field name.
    pub field: String,
    /// Comparison.
    pub op: FilterOp,
    /// Compared value.
    pub value: Value,
}

impl FieldFilter {
    /// Creates a filter.
    #[must_use]
    pub fn new(field: impl Into<String>, op: FilterOp, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }
}

/// Collection query: all filters must match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentQuery {
    /// Conjunctive filters.
    pub filters: Vec<FieldFilter>,
    /// Optional `(field, descending)` ordering.
    pub order_by: Option<(String, bool)>,
    /// Optional result ceiling.
    pub limit: Option<usize>,
}

/// Document returned by a collection query.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    /// Last path segment.
    pub id: String,
    /// Stored fields.
    pub data: Document,
}

/// Hierarchical document store port. Paths are slash-joined segments.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Reads one document.
    async fn get(&self, path: &str) -> AppResult<Option<Document>>;

    /// Lists documents directly inside a collection.
    async fn query(
        &self,
        collection_path: &str,
        query: DocumentQuery,
    ) -> AppResult<Vec<StoredDocument>>;

    /// Writes a document, merging into existing fields when `merge` is set.
    async fn set(&self, path: &str, document: Document, merge: bool) -> AppResult<()>;

    /// Adds a document with a generated id and returns that id.
    async fn add(&self, collection_path: &str, document: Document) -> AppResult<String>;

    /// Updates fields of an existing document.
    async fn update(&self, path: &str, fields: Document) -> AppResult<()>;

    /// Deletes a document; deleting a missing document succeeds.
    async fn delete(&self, path: &str) -> AppResult<()>;
}

/// Object storage port.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Uploads bytes to `path`, reporting progress, and returns the download URL.
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        progress: Option<ProgressSender>,
    ) -> AppResult<String>;

    /// Deletes the object behind a download URL.
    async fn delete(&self, url: &str) -> AppResult<()>;
}

/// Synchronous string key-value store, such as browser local storage.
pub trait KeyValueStore: Send + Sync {
    /// Reads one value.
    fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Writes one value.
    fn set(&self, key: &str, value: &str) -> AppResult<()>;
}
