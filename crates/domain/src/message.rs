use pulse_core::{AppError, AppResult, SubjectId};

/// Maximum characters in a chat message.
pub const MESSAGE_MAX_LENGTH: usize = 2000;

/// Message fields needed for edit and delete gating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRef {
    /// Messages collection path, for example `channels/general/messages`.
    pub collection_path: String,
    /// Message document id.
    pub message_id: String,
    /// Author of the message.
    pub author: SubjectId,
    /// Current message content.
    pub content: String,
}

/// Fields written when a message is edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRecord {
    /// New content.
    pub content: String,
    /// Always true once edited.
    pub edited: bool,
    /// Edit timestamp in RFC3339.
    pub edited_at: String,
}

/// Validates replacement content for a message.
///
/// Returns `Ok(None)` when the trimmed content equals the current content.
pub fn normalize_edit(current: &str, proposed: &str) -> AppResult<Option<String>> {
    let proposed = proposed.trim();
    if proposed.is_empty() {
        return Err(AppError::Validation(
            "message content must not be empty".to_owned(),
        ));
    }

    if proposed.chars().count() > MESSAGE_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "message content must not exceed {MESSAGE_MAX_LENGTH} characters"
        )));
    }

    if proposed == current.trim() {
        return Ok(None);
    }

    Ok(Some(proposed.to_owned()))
}

/// Returns the marker shown after an edited message, e.g. `(edited 14:05)`.
#[must_use]
pub fn edit_indicator(edited: bool, edited_time: Option<&str>) -> Option<String> {
    if !edited {
        return None;
    }

    Some(match edited_time {
        Some(time) if !time.is_empty() => format!("(edited {time})"),
        _ => "(edited)".to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use pulse_core::AppError;

    use super::{MESSAGE_MAX_LENGTH, edit_indicator, normalize_edit};

    #[test]
    fn normalize_edit_trims_and_detects_changes() {
        let result = normalize_edit("hello", "  hello there  ");
        assert!(matches!(result, Ok(Some(ref value)) if value == "hello there"));

        let unchanged = normalize_edit("hello", " hello ");
        assert!(matches!(unchanged, Ok(None)));
    }

    #[test]
    fn normalize_edit_rejects_blank_and_oversized_content() {
        assert!(matches!(
            normalize_edit("hello", "   "),
            Err(AppError::Validation(_))
        ));

        let oversized = "x".repeat(MESSAGE_MAX_LENGTH + 1);
        assert!(matches!(
            normalize_edit("hello", &oversized),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn edit_indicator_includes_time_when_known() {
        assert_eq!(edit_indicator(false, Some("14:05")), None);
        assert_eq!(
            edit_indicator(true, Some("14:05")).as_deref(),
            Some("(edited 14:05)")
        );
        assert_eq!(edit_indicator(true, None).as_deref(), Some("(edited)"));
    }
}
