use serde::{Deserialize, Serialize};

use crate::SubjectId;

/// Signed-in subject as reported by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectIdentity {
    id: SubjectId,
    display_name: Option<String>,
}

impl SubjectIdentity {
    /// Creates an identity from the provider's subject id and display name.
    #[must_use]
    pub fn new(id: SubjectId, display_name: Option<String>) -> Self {
        Self { id, display_name }
    }

    /// Returns the stable subject identifier.
    #[must_use]
    pub fn id(&self) -> &SubjectId {
        &self.id
    }

    /// Returns the display name, if the subject has set one.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Returns the display name or the subject id when no name is set.
    #[must_use]
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| self.id.as_str())
    }

    /// Returns a copy of this identity with a new display name.
    #[must_use]
    pub fn with_display_name(&self, display_name: impl Into<String>) -> Self {
        Self {
            id: self.id.clone(),
            display_name: Some(display_name.into()),
        }
    }
}
