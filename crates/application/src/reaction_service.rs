use std::sync::Arc;

use pulse_core::{AppResult, SubjectIdentity};
use pulse_domain::{Reaction, ReactionEmoji, ReactionSummary};
use tracing::warn;

use crate::{ReactionRepository, ReactionTarget};

/// Application service for emoji reactions on posts and messages.
#[derive(Clone)]
pub struct ReactionService {
    repository: Arc<dyn ReactionRepository>,
}

impl ReactionService {
    /// Creates a reaction service.
    #[must_use]
    pub fn new(repository: Arc<dyn ReactionRepository>) -> Self {
        Self { repository }
    }

    /// Adds a reaction. Adding the same emoji twice keeps one record.
    pub async fn add_reaction(
        &self,
        target: &ReactionTarget,
        actor: &SubjectIdentity,
        emoji: ReactionEmoji,
    ) -> AppResult<()> {
        let reaction = Reaction {
            emoji,
            subject: actor.id().clone(),
            subject_name: actor.label().to_owned(),
            created_at: crate::now_timestamp(),
        };

        self.repository.save_reaction(target, reaction).await
    }

    /// Removes the actor's reaction for an emoji.
    pub async fn remove_reaction(
        &self,
        target: &ReactionTarget,
        actor: &SubjectIdentity,
        emoji: ReactionEmoji,
    ) -> AppResult<()> {
        self.repository
            .delete_reaction(target, actor.id(), emoji)
            .await
    }

    /// Adds the reaction when absent, removes it otherwise.
    ///
    /// Returns whether the reaction is present afterwards.
    pub async fn toggle_reaction(
        &self,
        target: &ReactionTarget,
        actor: &SubjectIdentity,
        emoji: ReactionEmoji,
    ) -> AppResult<bool> {
        let existing = self
            .repository
            .find_reaction(target, actor.id(), emoji)
            .await?;

        if existing.is_some() {
            self.remove_reaction(target, actor, emoji).await?;
            Ok(false)
        } else {
            self.add_reaction(target, actor, emoji).await?;
            Ok(true)
        }
    }

    /// Groups a document's reactions by emoji. Read failures yield an empty summary.
    pub async fn summary(&self, target: &ReactionTarget) -> ReactionSummary {
        match self.repository.list_reactions(target).await {
            Ok(reactions) => ReactionSummary::from_reactions(&reactions),
            Err(error) => {
                warn!(
                    document = %target.document_id,
                    error = %error,
                    "failed to load reactions"
                );
                ReactionSummary::default()
            }
        }
    }
}
