use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::{SubjectDirectory, SubjectSummary, SuggestionSource};

/// Default number of mention candidates offered.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// Suggestion source backed by a prefix query on the subject directory.
#[derive(Clone)]
pub struct DirectorySuggestionSource {
    directory: Arc<dyn SubjectDirectory>,
}

impl DirectorySuggestionSource {
    /// Creates a suggestion source over a directory.
    #[must_use]
    pub fn new(directory: Arc<dyn SubjectDirectory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl SuggestionSource for DirectorySuggestionSource {
    async fn suggest(&self, prefix: &str, limit: usize) -> Vec<SubjectSummary> {
        if limit == 0 {
            return Vec::new();
        }

        match self
            .directory
            .search_by_display_name_prefix(prefix, limit)
            .await
        {
            Ok(mut subjects) => {
                subjects.truncate(limit);
                subjects
            }
            Err(error) => {
                warn!(prefix = prefix, error = %error, "mention suggestion query failed");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use pulse_core::{AppError, AppResult, SubjectId};
    use pulse_domain::DisplayName;

    use crate::{SubjectDirectory, SubjectSummary, SuggestionSource};

    use super::DirectorySuggestionSource;

    struct FakeSubjectDirectory {
        subjects: Vec<SubjectSummary>,
        fail: bool,
    }

    #[async_trait]
    impl SubjectDirectory for FakeSubjectDirectory {
        async fn search_by_display_name_prefix(
            &self,
            prefix: &str,
            _limit: usize,
        ) -> AppResult<Vec<SubjectSummary>> {
            if self.fail {
                return Err(AppError::Unavailable("directory offline".to_owned()));
            }
            Ok(self
                .subjects
                .iter()
                .filter(|subject| subject.display_name.starts_with(prefix))
                .cloned()
                .collect())
        }

        async fn find_by_display_name(&self, _display_name: &str) -> AppResult<Vec<SubjectSummary>> {
            Ok(Vec::new())
        }

        async fn save_display_name(
            &self,
            _subject: &SubjectId,
            _display_name: &DisplayName,
        ) -> AppResult<()> {
            Ok(())
        }
    }

    fn summary(name: &str) -> SubjectSummary {
        SubjectSummary {
            subject: SubjectId::new(format!("id-{name}")).unwrap_or_else(|_| unreachable!()),
            display_name: name.to_owned(),
        }
    }

    #[tokio::test]
    async fn suggest_truncates_to_ceiling_in_store_order() {
        let source = DirectorySuggestionSource::new(Arc::new(FakeSubjectDirectory {
            subjects: vec![summary("al"), summary("alice"), summary("alfred"), summary("bob")],
            fail: false,
        }));

        let names: Vec<String> = source
            .suggest("al", 2)
            .await
            .into_iter()
            .map(|subject| subject.display_name)
            .collect();

        assert_eq!(names, vec!["al", "alice"]);
    }

    #[tokio::test]
    async fn suggest_swallows_directory_failures() {
        let source = DirectorySuggestionSource::new(Arc::new(FakeSubjectDirectory {
            subjects: vec![summary("alice")],
            fail: true,
        }));

        assert!(source.suggest("al", 5).await.is_empty());
    }
}
