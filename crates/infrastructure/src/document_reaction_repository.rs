use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use pulse_application::{
    Document, DocumentQuery, DocumentStore, ReactionRepository, ReactionTarget,
};
use pulse_core::{AppResult, SubjectId};
use pulse_domain::{Reaction, ReactionEmoji, reaction_id};
use serde_json::Value;
use tracing::debug;

use crate::document_fields::{document_of, string_field};

/// Reactions stored under `{collection}/{document}/reactions/{subject}_{emoji}`.
#[derive(Clone)]
pub struct DocumentReactionRepository {
    store: Arc<dyn DocumentStore>,
}

impl DocumentReactionRepository {
    /// Creates a repository over a document store.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

fn reaction_path(target: &ReactionTarget, subject: &SubjectId, emoji: ReactionEmoji) -> String {
    format!("{}/{}", target.reactions_path(), reaction_id(subject, emoji))
}

fn reaction_from_document(document: &Document) -> Option<Reaction> {
    let emoji = ReactionEmoji::from_str(string_field(document, "emoji")?).ok()?;
    let subject = SubjectId::new(string_field(document, "userId")?).ok()?;

    Some(Reaction {
        emoji,
        subject_name: string_field(document, "userName")
            .unwrap_or(subject.as_str())
            .to_owned(),
        subject,
        created_at: string_field(document, "createdAt")
            .unwrap_or_default()
            .to_owned(),
    })
}

#[async_trait]
impl ReactionRepository for DocumentReactionRepository {
    async fn save_reaction(&self, target: &ReactionTarget, reaction: Reaction) -> AppResult<()> {
        let path = reaction_path(target, &reaction.subject, reaction.emoji);
        let document = document_of([
            ("emoji", Value::from(reaction.emoji.as_str())),
            ("userId", Value::from(reaction.subject.as_str())),
            ("userName", Value::from(reaction.subject_name)),
            ("createdAt", Value::from(reaction.created_at)),
        ]);

        self.store.set(&path, document, false).await
    }

    async fn find_reaction(
        &self,
        target: &ReactionTarget,
        subject: &SubjectId,
        emoji: ReactionEmoji,
    ) -> AppResult<Option<Reaction>> {
        let document = self
            .store
            .get(&reaction_path(target, subject, emoji))
            .await?;

        Ok(document.as_ref().and_then(reaction_from_document))
    }

    async fn delete_reaction(
        &self,
        target: &ReactionTarget,
        subject: &SubjectId,
        emoji: ReactionEmoji,
    ) -> AppResult<()> {
        self.store
            .delete(&reaction_path(target, subject, emoji))
            .await
    }

    async fn list_reactions(&self, target: &ReactionTarget) -> AppResult<Vec<Reaction>> {
        let documents = self
            .store
            .query(&target.reactions_path(), DocumentQuery::default())
            .await?;

        Ok(documents
            .iter()
            .filter_map(|document| {
                let reaction = reaction_from_document(&document.data);
                if reaction.is_none() {
                    debug!(id = %document.id, "skipping malformed reaction document");
                }
                reaction
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pulse_application::{DocumentQuery, DocumentStore, ReactionRepository, ReactionTarget};
    use pulse_core::SubjectId;
    use pulse_domain::{Reaction, ReactionEmoji};
    use serde_json::json;

    use crate::InMemoryDocumentStore;
    use crate::document_fields::document_of;

    use super::DocumentReactionRepository;

    fn reaction(subject: &str, emoji: ReactionEmoji) -> Reaction {
        Reaction {
            emoji,
            subject: SubjectId::new(subject).unwrap_or_else(|_| unreachable!()),
            subject_name: subject.to_uppercase(),
            created_at: "2026-01-01T00:00:00.000Z".to_owned(),
        }
    }

    #[tokio::test]
    async fn saving_twice_keeps_one_document_at_derived_path() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let repository = DocumentReactionRepository::new(store.clone());
        let target = ReactionTarget::new("channels/general/messages", "m1");

        for _ in 0..2 {
            repository
                .save_reaction(&target, reaction("ann", ReactionEmoji::Clap))
                .await
                .unwrap_or_else(|_| unreachable!());
        }

        let stored = store
            .query("channels/general/messages/m1/reactions", DocumentQuery::default())
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, "ann_👏");
        assert_eq!(stored[0].data.get("userName"), Some(&json!("ANN")));
    }

    #[tokio::test]
    async fn find_list_and_delete_round_trip() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let repository = DocumentReactionRepository::new(store.clone());
        let target = ReactionTarget::new("posts", "p1");
        repository
            .save_reaction(&target, reaction("ann", ReactionEmoji::Wow))
            .await
            .unwrap_or_else(|_| unreachable!());
        repository
            .save_reaction(&target, reaction("bo", ReactionEmoji::Wow))
            .await
            .unwrap_or_else(|_| unreachable!());
        store
            .set(
                "posts/p1/reactions/junk",
                document_of([("emoji", json!("🦀"))]),
                false,
            )
            .await
            .unwrap_or_else(|_| unreachable!());

        let ann = SubjectId::new("ann").unwrap_or_else(|_| unreachable!());
        let found = repository
            .find_reaction(&target, &ann, ReactionEmoji::Wow)
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(found, Some(reaction("ann", ReactionEmoji::Wow)));

        assert_eq!(
            repository
                .list_reactions(&target)
                .await
                .unwrap_or_else(|_| unreachable!())
                .len(),
            2
        );

        repository
            .delete_reaction(&target, &ann, ReactionEmoji::Wow)
            .await
            .unwrap_or_else(|_| unreachable!());
        assert!(
            repository
                .find_reaction(&target, &ann, ReactionEmoji::Wow)
                .await
                .unwrap_or_else(|_| unreachable!())
                .is_none()
        );
    }
}
