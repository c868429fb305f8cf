use pulse_domain::ActiveMention;

use crate::SubjectSummary;

/// Observable phase of a mention session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MentionState {
    /// No mention token under the cursor.
    Idle,
    /// A token is live and its suggestion query is in flight; an earlier
    /// list may still be shown and selectable.
    Composing,
    /// Suggestions are shown with one candidate highlighted.
    Selecting,
}

/// Candidate list currently rendered on the suggestion surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Shown {
    pub(super) candidates: Vec<SubjectSummary>,
    pub(super) highlighted: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Phase {
    Idle,
    /// `shown` keeps the previous list while a newer query is in flight.
    Composing {
        token: ActiveMention,
        shown: Option<Shown>,
    },
    Selecting {
        token: ActiveMention,
        shown: Shown,
    },
}

impl Phase {
    pub(super) fn token(&self) -> Option<&ActiveMention> {
        match self {
            Self::Idle => None,
            Self::Composing { token, .. } | Self::Selecting { token, .. } => Some(token),
        }
    }

    pub(super) fn shown(&self) -> Option<&Shown> {
        match self {
            Self::Idle => None,
            Self::Composing { shown, .. } => shown.as_ref(),
            Self::Selecting { shown, .. } => Some(shown),
        }
    }

    pub(super) fn shown_mut(&mut self) -> Option<&mut Shown> {
        match self {
            Self::Idle => None,
            Self::Composing { shown, .. } => shown.as_mut(),
            Self::Selecting { shown, .. } => Some(shown),
        }
    }

    pub(super) fn into_shown(self) -> Option<Shown> {
        match self {
            Self::Idle => None,
            Self::Composing { shown, .. } => shown,
            Self::Selecting { shown, .. } => Some(shown),
        }
    }
}

/// Controller-owned session state.
///
/// `generation` tags every suggestion query; a response is applied only while
/// the generation it was issued under is still current.
#[derive(Debug)]
pub(super) struct MentionSession {
    pub(super) generation: u64,
    pub(super) attached: bool,
    pub(super) surface_open: bool,
    pub(super) phase: Phase,
}

impl MentionSession {
    pub(super) fn new() -> Self {
        Self {
            generation: 0,
            attached: true,
            surface_open: false,
            phase: Phase::Idle,
        }
    }

    pub(super) fn advance(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    pub(super) fn state(&self) -> MentionState {
        match self.phase {
            Phase::Idle => MentionState::Idle,
            Phase::Composing { .. } => MentionState::Composing,
            Phase::Selecting { .. } => MentionState::Selecting,
        }
    }

    /// Returns to Idle and reports whether a surface was left open.
    pub(super) fn reset(&mut self) -> bool {
        self.phase = Phase::Idle;
        std::mem::replace(&mut self.surface_open, false)
    }
}
