//! Subject profile rules.

use pulse_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Minimum display name length in characters.
pub const DISPLAY_NAME_MIN_LENGTH: usize = 2;

/// Maximum display name length in characters.
pub const DISPLAY_NAME_MAX_LENGTH: usize = 30;

/// Validated, trimmed display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisplayName(String);

impl DisplayName {
    /// Creates a display name of 2 to 30 characters after trimming.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();
        let length = trimmed.chars().count();

        if length < DISPLAY_NAME_MIN_LENGTH {
            return Err(AppError::Validation(format!(
                "display name must be at least {DISPLAY_NAME_MIN_LENGTH} characters long"
            )));
        }

        if length > DISPLAY_NAME_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "display name must not exceed {DISPLAY_NAME_MAX_LENGTH} characters"
            )));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the validated name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

/// Returns whether a subject still has to choose a display name.
#[must_use]
pub fn requires_display_name(display_name: Option<&str>) -> bool {
    display_name.is_none_or(|name| name.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::{DisplayName, requires_display_name};

    #[test]
    fn display_name_is_trimmed() {
        let name = DisplayName::new("  Ann  ").unwrap_or_else(|_| unreachable!());
        assert_eq!(name.as_str(), "Ann");
    }

    #[test]
    fn display_name_length_is_bounded() {
        assert!(DisplayName::new(" a ").is_err());
        assert!(DisplayName::new("x".repeat(31)).is_err());
        assert!(DisplayName::new("x".repeat(30)).is_ok());
    }

    #[test]
    fn blank_display_names_must_be_replaced() {
        assert!(requires_display_name(None));
        assert!(requires_display_name(Some("   ")));
        assert!(!requires_display_name(Some("Ann")));
    }
}
