use std::sync::Arc;

use pulse_core::{AppResult, SubjectIdentity};
use pulse_domain::{DisplayName, requires_display_name};
use tracing::info;

use crate::{AuthProvider, SubjectDirectory};

/// Application service for the signed-in subject's profile.
#[derive(Clone)]
pub struct ProfileService {
    auth_provider: Arc<dyn AuthProvider>,
    directory: Arc<dyn SubjectDirectory>,
}

impl ProfileService {
    /// Creates a profile service.
    #[must_use]
    pub fn new(auth_provider: Arc<dyn AuthProvider>, directory: Arc<dyn SubjectDirectory>) -> Self {
        Self {
            auth_provider,
            directory,
        }
    }

    /// Returns the signed-in subject, if any.
    pub async fn current_subject(&self) -> AppResult<Option<SubjectIdentity>> {
        self.auth_provider.current_subject().await
    }

    /// Returns whether the subject must pick a display name before posting.
    #[must_use]
    pub fn requires_display_name(&self, identity: &SubjectIdentity) -> bool {
        requires_display_name(identity.display_name())
    }

    /// Sets the display name in the auth provider and the subject directory.
    pub async fn set_display_name(
        &self,
        identity: &SubjectIdentity,
        display_name: &str,
    ) -> AppResult<SubjectIdentity> {
        let display_name = DisplayName::new(display_name)?;

        self.auth_provider
            .update_display_name(identity.id(), &display_name)
            .await?;
        self.directory
            .save_display_name(identity.id(), &display_name)
            .await?;

        info!(subject = %identity.id(), "display name updated");
        Ok(identity.with_display_name(display_name))
    }
}
