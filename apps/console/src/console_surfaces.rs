use std::sync::Mutex;

use pulse_application::{InputSnapshot, InputSurface, SubjectSummary, SuggestionSurface, ThemeSink};
use pulse_domain::{Theme, ThemePalette, mention};
use tracing::info;

/// Line-editor state: the composed text and a byte cursor.
#[derive(Debug, Default)]
pub struct ConsoleInput {
    state: Mutex<(String, usize)>,
}

impl ConsoleInput {
    pub fn snapshot(&self) -> InputSnapshot {
        let state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        InputSnapshot::new(state.0.clone(), state.1)
    }

    /// Appends typed text at the end and moves the cursor after it.
    pub fn type_text(&self, typed: &str) -> InputSnapshot {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        state.0.push_str(typed);
        state.1 = state.0.len();
        InputSnapshot::new(state.0.clone(), state.1)
    }

    pub fn clear(&self) -> InputSnapshot {
        self.replace_text(String::new(), 0);
        InputSnapshot::new(String::new(), 0)
    }
}

impl InputSurface for ConsoleInput {
    fn text(&self) -> String {
        self.snapshot().text
    }

    fn replace_text(&self, text: String, cursor: usize) {
        let cursor = mention::floor_char_boundary(&text, cursor);
        println!("input: {}|{}", &text[..cursor], &text[cursor..]);
        *self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = (text, cursor);
    }
}

/// Suggestion list printed below the prompt.
#[derive(Debug, Default)]
pub struct ConsoleSuggestionList;

impl SuggestionSurface for ConsoleSuggestionList {
    fn render(&self, candidates: &[SubjectSummary], highlighted: usize) {
        println!("suggestions:");
        for (index, candidate) in candidates.iter().enumerate() {
            let marker = if index == highlighted { '>' } else { ' ' };
            println!("  {marker} {index}: @{}", candidate.display_name);
        }
    }

    fn highlight(&self, index: usize) {
        println!("  highlighted {index}");
    }

    fn close(&self) {
        println!("  (suggestions closed)");
    }
}

#[derive(Debug, Default)]
pub struct ConsoleThemeSink;

impl ThemeSink for ConsoleThemeSink {
    fn apply(&self, theme: Theme, palette: &ThemePalette) {
        info!(theme = %theme, particles = ?palette.particle_colors, "theme applied");
        for (property, value) in palette.css_variables {
            println!("  {property}: {value}");
        }
    }
}

#[cfg(test)]
mod tests {
    use pulse_application::InputSurface;

    use super::ConsoleInput;

    #[test]
    fn typing_appends_and_clamps_replaced_cursor() {
        let input = ConsoleInput::default();

        input.type_text("hi ");
        let snapshot = input.type_text("@al");
        assert_eq!(snapshot.text, "hi @al");
        assert_eq!(snapshot.cursor, 6);

        input.replace_text("é".to_owned(), 1);
        assert_eq!(input.snapshot().cursor, 0);
        assert_eq!(input.clear().text, "");
    }
}
