use std::sync::Arc;

use pulse_core::AppResult;
use pulse_domain::{THEME_STORAGE_KEY, Theme};
use tracing::warn;

use crate::{KeyValueStore, ThemeSink};

/// Application service that applies and persists the color theme.
#[derive(Clone)]
pub struct ThemeService {
    store: Arc<dyn KeyValueStore>,
    sink: Arc<dyn ThemeSink>,
}

impl ThemeService {
    /// Creates a theme service.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, sink: Arc<dyn ThemeSink>) -> Self {
        Self { store, sink }
    }

    /// Applies a theme by name and persists the resolved name.
    ///
    /// Unknown names select the default theme.
    pub fn set_theme(&self, name: &str) -> AppResult<Theme> {
        let theme = Theme::from_name(name);
        self.sink.apply(theme, &theme.palette());
        self.store.set(THEME_STORAGE_KEY, theme.as_str())?;
        Ok(theme)
    }

    /// Applies the persisted theme, falling back to the default.
    pub fn load_theme(&self) -> Theme {
        let theme = match self.store.get(THEME_STORAGE_KEY) {
            Ok(name) => name.as_deref().map(Theme::from_name).unwrap_or_default(),
            Err(error) => {
                warn!(error = %error, "failed to read persisted theme");
                Theme::default()
            }
        };

        self.sink.apply(theme, &theme.palette());
        theme
    }
}
