use async_trait::async_trait;
use pulse_core::{AppResult, SubjectId};
use pulse_domain::DisplayName;
use serde::Serialize;

/// Subject record returned by directory lookups and offered as a mention candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectSummary {
    /// Stable subject identifier.
    pub subject: SubjectId,
    /// Display name used for mentions.
    pub display_name: String,
}

/// Repository port over the subject directory (`users` collection).
#[async_trait]
pub trait SubjectDirectory: Send + Sync {
    /// Lists subjects whose display name starts with `prefix`, in store order.
    async fn search_by_display_name_prefix(
        &self,
        prefix: &str,
        limit: usize,
    ) -> AppResult<Vec<SubjectSummary>>;

    /// Lists subjects whose display name equals `display_name` exactly.
    async fn find_by_display_name(&self, display_name: &str) -> AppResult<Vec<SubjectSummary>>;

    /// Merges a display name into the subject's directory record.
    async fn save_display_name(
        &self,
        subject: &SubjectId,
        display_name: &DisplayName,
    ) -> AppResult<()>;
}
