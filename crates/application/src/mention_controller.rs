mod session;


use std::sync::Arc;

use pulse_domain::{ActiveMention, mention};
use tokio::sync::Mutex;
use tracing::debug;

use crate::{
    InputSnapshot, InputSurface, KeyOutcome, MentionKey, PointerTarget, SubjectSummary,
    SuggestionSource, SuggestionSurface,
};

pub use session::MentionState;

use session::{MentionSession, Phase, Shown};

/// Mention autocomplete controller for one text-entry surface.
///
/// Suggestion queries run without holding the session lock, so overlapping
/// queries may complete out of order; each carries the generation it was
/// issued under and stale results are dropped on arrival.
pub struct MentionController {
    input: Arc<dyn InputSurface>,
    source: Arc<dyn SuggestionSource>,
    surface: Arc<dyn SuggestionSurface>,
    limit: usize,
    session: Mutex<MentionSession>,
}

impl MentionController {
    /// Attaches a controller to an input and its suggestion surface.
    ///
    /// `limit` is the suggestion ceiling; zero is raised to one.
    #[must_use]
    pub fn attach(
        input: Arc<dyn InputSurface>,
        source: Arc<dyn SuggestionSource>,
        surface: Arc<dyn SuggestionSurface>,
        limit: usize,
    ) -> Self {
        Self {
            input,
            source,
            surface,
            limit: limit.max(1),
            session: Mutex::new(MentionSession::new()),
        }
    }

    /// Detaches from the input. Later events are ignored, any shown surface is
    /// closed and any in-flight query result is discarded. Idempotent.
    pub async fn detach(&self) {
        let mut session = self.session.lock().await;
        if !session.attached {
            return;
        }

        session.attached = false;
        session.advance();
        self.abandon(&mut session);
    }

    /// Handles an edit of the input text.
    pub async fn on_input(&self, snapshot: InputSnapshot) {
        let (generation, query) = {
            let mut session = self.session.lock().await;
            if !session.attached {
                return;
            }

            let generation = session.advance();
            let Some(token) = mention::active_token(&snapshot.text, snapshot.cursor) else {
                self.abandon(&mut session);
                return;
            };

            let query = token.query.clone();
            let shown = std::mem::replace(&mut session.phase, Phase::Idle).into_shown();
            session.phase = Phase::Composing { token, shown };
            (generation, query)
        };

        let mut candidates = self.source.suggest(&query, self.limit).await;

        let mut session = self.session.lock().await;
        if !session.attached || session.generation != generation {
            debug!(
                generation,
                current = session.generation,
                "dropping stale mention suggestions"
            );
            return;
        }

        let Phase::Composing { token, .. } = std::mem::replace(&mut session.phase, Phase::Idle) else {
            return;
        };

        if candidates.is_empty() {
            self.abandon(&mut session);
            return;
        }

        candidates.truncate(self.limit);
        self.surface.render(&candidates, 0);
        session.surface_open = true;
        session.phase = Phase::Selecting {
            token,
            shown: Shown {
                candidates,
                highlighted: 0,
            },
        };
    }

    /// Handles a cursor move that did not change the text.
    ///
    /// Moving off the live token abandons the session; landing on a different
    /// token starts a new query.
    pub async fn on_cursor_moved(&self, snapshot: InputSnapshot) {
        let live = mention::active_token(&snapshot.text, snapshot.cursor);
        {
            let mut session = self.session.lock().await;
            if !session.attached {
                return;
            }

            match (&live, session.phase.token()) {
                (None, None) => return,
                (None, Some(_)) => {
                    session.advance();
                    self.abandon(&mut session);
                    return;
                }
                (Some(live), Some(current)) if live == current => return,
                _ => {}
            }
        }

        self.on_input(snapshot).await;
    }

    /// Handles a key press on the input.
    pub async fn on_key(&self, key: MentionKey) -> KeyOutcome {
        let mut session = self.session.lock().await;
        if !session.attached {
            return KeyOutcome::PassThrough;
        }

        match key {
            MentionKey::ArrowDown | MentionKey::ArrowUp => {
                let Some(shown) = session.phase.shown_mut() else {
                    return KeyOutcome::PassThrough;
                };

                let count = shown.candidates.len();
                shown.highlighted = if key == MentionKey::ArrowDown {
                    (shown.highlighted + 1) % count
                } else {
                    (shown.highlighted + count - 1) % count
                };
                self.surface.highlight(shown.highlighted);
                KeyOutcome::Consumed
            }
            MentionKey::Enter | MentionKey::Tab => {
                let Some(highlighted) = session.phase.shown().map(|shown| shown.highlighted)
                else {
                    return KeyOutcome::PassThrough;
                };

                self.commit(&mut session, highlighted);
                KeyOutcome::Consumed
            }
            MentionKey::Escape => {
                if session.phase == Phase::Idle && !session.surface_open {
                    return KeyOutcome::PassThrough;
                }

                session.advance();
                if self.abandon(&mut session) {
                    KeyOutcome::Consumed
                } else {
                    KeyOutcome::PassThrough
                }
            }
            MentionKey::Other => KeyOutcome::PassThrough,
        }
    }

    /// Handles a pointer press. Returns the committed candidate, if any.
    pub async fn on_pointer(&self, target: PointerTarget) -> Option<SubjectSummary> {
        let mut session = self.session.lock().await;
        if !session.attached {
            return None;
        }

        match target {
            PointerTarget::Suggestion(index) => self.commit(&mut session, index),
            PointerTarget::Input => None,
            PointerTarget::Outside => {
                if session.phase != Phase::Idle || session.surface_open {
                    session.advance();
                    self.abandon(&mut session);
                }
                None
            }
        }
    }

    /// Returns the current state.
    pub async fn state(&self) -> MentionState {
        self.session.lock().await.state()
    }

    /// Returns the highlighted index while a list is shown.
    pub async fn highlighted(&self) -> Option<usize> {
        self.session
            .lock()
            .await
            .phase
            .shown()
            .map(|shown| shown.highlighted)
    }

    /// Returns the candidates currently shown.
    pub async fn candidates(&self) -> Vec<SubjectSummary> {
        self.session
            .lock()
            .await
            .phase
            .shown()
            .map(|shown| shown.candidates.clone())
            .unwrap_or_default()
    }

    /// Returns whether the controller still reacts to events.
    pub async fn is_attached(&self) -> bool {
        self.session.lock().await.attached
    }

    fn abandon(&self, session: &mut MentionSession) -> bool {
        let was_open = session.reset();
        if was_open {
            self.surface.close();
        }
        was_open
    }

    fn commit(&self, session: &mut MentionSession, index: usize) -> Option<SubjectSummary> {
        // The live token, not the one the shown list was queried for, is replaced.
        let (Some(token), Some(shown)) = (session.phase.token(), session.phase.shown()) else {
            return None;
        };

        let candidate = shown.candidates.get(index)?.clone();
        let token = token.clone();
        session.advance();
        self.abandon(session);

        match splice_mention(&self.input.text(), &token, &candidate.display_name) {
            Some((text, cursor)) => self.input.replace_text(text, cursor),
            None => debug!(
                start = token.start,
                end = token.end,
                "input no longer holds the mention token"
            ),
        }

        Some(candidate)
    }
}

/// Replaces the token span with `@name ` and returns the text and new cursor.
fn splice_mention(text: &str, token: &ActiveMention, name: &str) -> Option<(String, usize)> {
    if token.end > text.len()
        || !text.is_char_boundary(token.start)
        || !text.is_char_boundary(token.end)
        || !text[token.start..].starts_with(mention::MENTION_MARKER)
    {
        return None;
    }

    let inserted = format!("{}{name} ", mention::MENTION_MARKER);
    let cursor = token.start + inserted.len();
    let mut spliced = String::with_capacity(text.len() + inserted.len());
    spliced.push_str(&text[..token.start]);
    spliced.push_str(&inserted);
    spliced.push_str(&text[token.end..]);
    Some((spliced, cursor))
}
