use async_trait::async_trait;
use pulse_domain::{Theme, ThemePalette};

use crate::SubjectSummary;

/// Source of mention candidates for a partial name.
///
/// Implementations never fail: an unreachable backend yields no candidates.
#[async_trait]
pub trait SuggestionSource: Send + Sync {
    /// Returns at most `limit` subjects whose display name starts with `prefix`.
    async fn suggest(&self, prefix: &str, limit: usize) -> Vec<SubjectSummary>;
}

/// Text-entry element the controller is attached to.
pub trait InputSurface: Send + Sync {
    /// Returns the current text.
    fn text(&self) -> String;

    /// Replaces the whole text and moves the cursor to a byte offset.
    fn replace_text(&self, text: String, cursor: usize);
}

/// Suggestion list rendered next to the input.
pub trait SuggestionSurface: Send + Sync {
    /// Shows the candidates, replacing any list already shown.
    fn render(&self, candidates: &[SubjectSummary], highlighted: usize);

    /// Moves the highlight.
    fn highlight(&self, index: usize);

    /// Removes the list.
    fn close(&self);
}

/// Input state captured when an input or selection event fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSnapshot {
    /// Full text.
    pub text: String,
    /// Cursor as a byte offset.
    pub cursor: usize,
}

impl InputSnapshot {
    /// Creates a snapshot.
    #[must_use]
    pub fn new(text: impl Into<String>, cursor: usize) -> Self {
        Self {
            text: text.into(),
            cursor,
        }
    }

    /// Creates a snapshot with the cursor at the end of the text.
    #[must_use]
    pub fn at_end(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.len();
        Self { text, cursor }
    }
}

/// Keys the controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MentionKey {
    /// Highlight the next candidate.
    ArrowDown,
    /// Highlight the previous candidate.
    ArrowUp,
    /// Commit the highlighted candidate.
    Enter,
    /// Commit the highlighted candidate.
    Tab,
    /// Abandon the session.
    Escape,
    /// Any other key.
    Other,
}

/// Whether the controller handled a key; `Consumed` suppresses the default action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The key drove the suggestion list.
    Consumed,
    /// The key should reach the input.
    PassThrough,
}

/// Where a pointer press landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// A row of the suggestion list.
    Suggestion(usize),
    /// The attached input.
    Input,
    /// Anywhere else.
    Outside,
}

/// Presentation layer that applies a theme to the running UI.
pub trait ThemeSink: Send + Sync {
    /// Applies CSS variables and particle colors for a theme.
    fn apply(&self, theme: Theme, palette: &ThemePalette);
}
