//! Color themes applied as CSS custom properties.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Key under which the selected theme name is persisted.
pub const THEME_STORAGE_KEY: &str = "pulse-theme";

/// Named color theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    /// Blue-to-purple gradient.
    #[default]
    Default,
    /// Navy blue.
    Navy,
    /// Deep purple.
    Purple,
    /// Pink.
    Pink,
    /// Neutral gray.
    Gray,
    /// Light theme.
    White,
}

/// CSS variables and particle colors for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemePalette {
    /// `(property, value)` pairs such as `("--main-bg", "#1e3a8a")`.
    pub css_variables: [(&'static str, &'static str); 7],
    /// Colors handed to the particle background.
    pub particle_colors: [&'static str; 3],
}

impl Theme {
    /// Returns a stable storage value for this theme.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Navy => "navy",
            Self::Purple => "purple",
            Self::Pink => "pink",
            Self::Gray => "gray",
            Self::White => "white",
        }
    }

    /// Returns all themes.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Theme] = &[
            Theme::Default,
            Theme::Navy,
            Theme::Purple,
            Theme::Pink,
            Theme::Gray,
            Theme::White,
        ];

        ALL
    }

    /// Resolves a theme name; unknown names select [`Theme::Default`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        Self::all()
            .iter()
            .copied()
            .find(|theme| theme.as_str() == name)
            .unwrap_or_default()
    }

    /// Returns the palette for this theme.
    #[must_use]
    pub fn palette(&self) -> ThemePalette {
        let (values, particle_colors) = match self {
            Self::Default => (
                [
                    "#7c3aed",
                    "#a855f7",
                    "linear-gradient(135deg, #1e3a8a 0%, #5b21b6 100%)",
                    "#1f2937",
                    "#374151",
                    "#f9fafb",
                    "#d1d5db",
                ],
                ["#7c3aed", "#a855f7", "#FFFFFF"],
            ),
            Self::Navy => (
                [
                    "#3b82f6", "#60a5fa", "#1e3a8a", "#1e40af", "#2563eb", "#eff6ff", "#dbeafe",
                ],
                ["#3b82f6", "#60a5fa", "#FFFFFF"],
            ),
            Self::Purple => (
                [
                    "#9333ea", "#a855f7", "#4c1d95", "#581c87", "#6b21a8", "#f5d0fe", "#e9d5ff",
                ],
                ["#9333ea", "#a855f7", "#FFFFFF"],
            ),
            Self::Pink => (
                [
                    "#ec4899", "#f472b6", "#9d174d", "#831843", "#be185d", "#fce7f3", "#fbcfe8",
                ],
                ["#ec4899", "#f472b6", "#FFFFFF"],
            ),
            Self::Gray => (
                [
                    "#6b7280", "#9ca3af", "#1f2937", "#374151", "#4b5563", "#f9fafb", "#e5e7eb",
                ],
                ["#6b7280", "#9ca3af", "#FFFFFF"],
            ),
            Self::White => (
                [
                    "#7c3aed", "#a855f7", "#ffffff", "#f9fafb", "#e5e7eb", "#111827", "#374151",
                ],
                ["#7c3aed", "#a855f7", "#111827"],
            ),
        };

        ThemePalette {
            css_variables: [
                ("--main-purple", values[0]),
                ("--accent-purple", values[1]),
                ("--main-bg", values[2]),
                ("--main-card", values[3]),
                ("--main-border", values[4]),
                ("--main-text", values[5]),
                ("--accent-text", values[6]),
            ],
            particle_colors,
        }
    }
}

impl Display for Theme {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}
