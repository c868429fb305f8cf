use async_trait::async_trait;
use pulse_application::AuthProvider;
use pulse_core::{AppError, AppResult, SubjectId, SubjectIdentity};
use pulse_domain::DisplayName;
use tokio::sync::RwLock;

/// Auth provider holding one signed-in subject in memory.
#[derive(Debug, Default)]
pub struct InMemoryAuthProvider {
    current: RwLock<Option<SubjectIdentity>>,
}

impl InMemoryAuthProvider {
    /// Creates a provider with an optional signed-in subject.
    #[must_use]
    pub fn new(current: Option<SubjectIdentity>) -> Self {
        Self {
            current: RwLock::new(current),
        }
    }

    /// Replaces the signed-in subject.
    pub async fn sign_in(&self, identity: SubjectIdentity) {
        *self.current.write().await = Some(identity);
    }

    /// Clears the signed-in subject.
    pub async fn sign_out(&self) {
        *self.current.write().await = None;
    }
}

#[async_trait]
impl AuthProvider for InMemoryAuthProvider {
    async fn current_subject(&self) -> AppResult<Option<SubjectIdentity>> {
        Ok(self.current.read().await.clone())
    }

    async fn update_display_name(
        &self,
        subject: &SubjectId,
        display_name: &DisplayName,
    ) -> AppResult<()> {
        let mut current = self.current.write().await;
        match current.as_mut() {
            Some(identity) if identity.id() == subject => {
                *identity = identity.with_display_name(display_name.as_str());
                Ok(())
            }
            _ => Err(AppError::Unauthorized(format!(
                "subject '{subject}' is not signed in"
            ))),
        }
    }
}
