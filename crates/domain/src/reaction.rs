use std::str::FromStr;

use pulse_core::{AppError, SubjectId};
use serde::{Deserialize, Serialize};

/// Maximum reacting names listed in a tooltip before summarising the rest.
pub const TOOLTIP_NAME_LIMIT: usize = 5;

/// Emoji offered by the reaction picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReactionEmoji {
    /// ❤️
    Like,
    /// 😍
    Love,
    /// 😂
    Laugh,
    /// 😮
    Wow,
    /// 😢
    Sad,
    /// 😠
    Angry,
    /// 🔥
    Fire,
    /// 👍
    ThumbsUp,
    /// 👎
    ThumbsDown,
    /// 👏
    Clap,
    /// ⭐
    Star,
    /// ✨
    Sparkles,
}

impl ReactionEmoji {
    /// Returns the emoji glyph, which is also its storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Like => "❤️",
            Self::Love => "😍",
            Self::Laugh => "😂",
            Self::Wow => "😮",
            Self::Sad => "😢",
            Self::Angry => "😠",
            Self::Fire => "🔥",
            Self::ThumbsUp => "👍",
            Self::ThumbsDown => "👎",
            Self::Clap => "👏",
            Self::Star => "⭐",
            Self::Sparkles => "✨",
        }
    }

    /// Returns the picker label.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Like => "Like",
            Self::Love => "Love",
            Self::Laugh => "Laugh",
            Self::Wow => "Wow",
            Self::Sad => "Sad",
            Self::Angry => "Angry",
            Self::Fire => "Fire",
            Self::ThumbsUp => "Thumbs Up",
            Self::ThumbsDown => "Thumbs Down",
            Self::Clap => "Clap",
            Self::Star => "Star",
            Self::Sparkles => "Sparkles",
        }
    }

    /// Returns all picker emoji in display order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[ReactionEmoji] = &[
            ReactionEmoji::Like,
            ReactionEmoji::Love,
            ReactionEmoji::Laugh,
            ReactionEmoji::Wow,
            ReactionEmoji::Sad,
            ReactionEmoji::Angry,
            ReactionEmoji::Fire,
            ReactionEmoji::ThumbsUp,
            ReactionEmoji::ThumbsDown,
            ReactionEmoji::Clap,
            ReactionEmoji::Star,
            ReactionEmoji::Sparkles,
        ];

        ALL
    }
}

impl FromStr for ReactionEmoji {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|emoji| emoji.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unsupported reaction '{value}'")))
    }
}

/// Derives the record identity that keeps one reaction per emoji and subject.
#[must_use]
pub fn reaction_id(subject: &SubjectId, emoji: ReactionEmoji) -> String {
    format!("{}_{}", subject.as_str(), emoji.as_str())
}

/// One stored reaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    /// Chosen emoji.
    pub emoji: ReactionEmoji,
    /// Reacting subject.
    pub subject: SubjectId,
    /// Reacting subject's display name at reaction time.
    pub subject_name: String,
    /// Creation timestamp in RFC3339.
    pub created_at: String,
}

/// Reactions on one post or message grouped by emoji.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReactionSummary {
    entries: Vec<ReactionSummaryEntry>,
}

/// Count and reacting names for one emoji.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionSummaryEntry {
    /// Emoji shown.
    pub emoji: ReactionEmoji,
    /// Names of reacting subjects in read order.
    pub subject_names: Vec<String>,
}

impl ReactionSummaryEntry {
    /// Returns the number of reactions.
    #[must_use]
    pub fn count(&self) -> usize {
        self.subject_names.len()
    }

    /// Returns hover text such as `Like: ann, bo and 2 more`.
    #[must_use]
    pub fn tooltip(&self) -> String {
        let shown = self
            .subject_names
            .iter()
            .take(TOOLTIP_NAME_LIMIT)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let hidden = self.subject_names.len().saturating_sub(TOOLTIP_NAME_LIMIT);

        if hidden > 0 {
            format!("{}: {shown} and {hidden} more", self.emoji.display_name())
        } else {
            format!("{}: {shown}", self.emoji.display_name())
        }
    }
}

impl ReactionSummary {
    /// Groups reactions by emoji, keeping first-seen emoji order.
    #[must_use]
    pub fn from_reactions(reactions: &[Reaction]) -> Self {
        let mut entries: Vec<ReactionSummaryEntry> = Vec::new();
        for reaction in reactions {
            match entries.iter_mut().find(|entry| entry.emoji == reaction.emoji) {
                Some(entry) => entry.subject_names.push(reaction.subject_name.clone()),
                None => entries.push(ReactionSummaryEntry {
                    emoji: reaction.emoji,
                    subject_names: vec![reaction.subject_name.clone()],
                }),
            }
        }

        Self { entries }
    }

    /// Returns the grouped entries.
    #[must_use]
    pub fn entries(&self) -> &[ReactionSummaryEntry] {
        &self.entries
    }

    /// Returns the count for one emoji.
    #[must_use]
    pub fn count(&self, emoji: ReactionEmoji) -> usize {
        self.entries
            .iter()
            .find(|entry| entry.emoji == emoji)
            .map(ReactionSummaryEntry::count)
            .unwrap_or(0)
    }

    /// Returns whether no reactions exist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pulse_core::SubjectId;

    use super::{Reaction, ReactionEmoji, ReactionSummary, reaction_id};

    fn reaction(emoji: ReactionEmoji, subject: &str) -> Reaction {
        Reaction {
            emoji,
            subject: SubjectId::new(subject).unwrap_or_else(|_| unreachable!()),
            subject_name: subject.to_owned(),
            created_at: "2026-01-01T00:00:00Z".to_owned(),
        }
    }

    #[test]
    fn reaction_id_joins_subject_and_emoji() {
        let subject = SubjectId::new("u1").unwrap_or_else(|_| unreachable!());
        assert_eq!(reaction_id(&subject, ReactionEmoji::Fire), "u1_🔥");
    }

    #[test]
    fn emoji_parse_accepts_only_picker_set() {
        assert!(matches!(
            ReactionEmoji::from_str("👍"),
            Ok(ReactionEmoji::ThumbsUp)
        ));
        assert!(ReactionEmoji::from_str("🦀").is_err());
    }

    #[test]
    fn summary_groups_in_first_seen_order() {
        let summary = ReactionSummary::from_reactions(&[
            reaction(ReactionEmoji::Fire, "ann"),
            reaction(ReactionEmoji::Like, "bo"),
            reaction(ReactionEmoji::Fire, "cy"),
        ]);

        let emoji: Vec<ReactionEmoji> = summary.entries().iter().map(|entry| entry.emoji).collect();
        assert_eq!(emoji, vec![ReactionEmoji::Fire, ReactionEmoji::Like]);
        assert_eq!(summary.count(ReactionEmoji::Fire), 2);
        assert_eq!(summary.count(ReactionEmoji::Star), 0);
    }

    #[test]
    fn tooltip_summarises_names_past_limit() {
        let reactions: Vec<Reaction> = ["a", "b", "c", "d", "e", "f", "g"]
            .iter()
            .map(|name| reaction(ReactionEmoji::Clap, name))
            .collect();
        let summary = ReactionSummary::from_reactions(&reactions);

        assert_eq!(
            summary.entries()[0].tooltip(),
            "Clap: a, b, c, d, e and 2 more"
        );
    }
}
