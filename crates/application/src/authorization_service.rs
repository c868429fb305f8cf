mod administration;


use std::collections::BTreeSet;
use std::sync::Arc;

use pulse_core::{AppError, AppResult, SubjectId, SubjectIdentity};
use pulse_domain::{Capability, Role};
use tracing::warn;

use crate::{AuditLogRepository, AuditRepository, RoleAssignmentRepository};

/// Display name that older deployments treated as an administrator marker.
pub const LEGACY_ADMIN_DISPLAY_NAME: &str = "Jah and Co";

/// Startup snapshot of authorization settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationPolicy {
    admin_subjects: BTreeSet<SubjectId>,
    legacy_admin_display_name: Option<String>,
}

impl AuthorizationPolicy {
    /// Creates a policy from configured admin subjects and the legacy marker.
    ///
    /// A blank legacy marker disables the display-name rule.
    #[must_use]
    pub fn new(
        admin_subjects: impl IntoIterator<Item = SubjectId>,
        legacy_admin_display_name: Option<String>,
    ) -> Self {
        Self {
            admin_subjects: admin_subjects.into_iter().collect(),
            legacy_admin_display_name: legacy_admin_display_name
                .filter(|name| !name.trim().is_empty()),
        }
    }

    /// Returns the configured admin subjects.
    #[must_use]
    pub fn admin_subjects(&self) -> &BTreeSet<SubjectId> {
        &self.admin_subjects
    }

    /// Returns the legacy marker, if enabled.
    #[must_use]
    pub fn legacy_admin_display_name(&self) -> Option<&str> {
        self.legacy_admin_display_name.as_deref()
    }

    fn is_configured_admin(&self, subject: &SubjectId) -> bool {
        self.admin_subjects.contains(subject)
    }

    // Display names are not unique, so anyone can claim the marker.
    fn matches_legacy_admin(&self, identity: &SubjectIdentity) -> bool {
        match (
            self.legacy_admin_display_name.as_deref(),
            identity.display_name(),
        ) {
            (Some(marker), Some(display_name)) => marker == display_name,
            _ => false,
        }
    }
}

impl Default for AuthorizationPolicy {
    fn default() -> Self {
        Self::new(Vec::new(), Some(LEGACY_ADMIN_DISPLAY_NAME.to_owned()))
    }
}

/// Application service for role resolution and role administration.
///
/// Checks gate UI actions only; the backend enforces access on its own.
#[derive(Clone)]
pub struct AuthorizationService {
    policy: Arc<AuthorizationPolicy>,
    role_repository: Arc<dyn RoleAssignmentRepository>,
    audit_repository: Arc<dyn AuditRepository>,
    audit_log_repository: Arc<dyn AuditLogRepository>,
}

impl AuthorizationService {
    /// Creates a new authorization service.
    #[must_use]
    pub fn new(
        policy: AuthorizationPolicy,
        role_repository: Arc<dyn RoleAssignmentRepository>,
        audit_repository: Arc<dyn AuditRepository>,
        audit_log_repository: Arc<dyn AuditLogRepository>,
    ) -> Self {
        Self {
            policy: Arc::new(policy),
            role_repository,
            audit_repository,
            audit_log_repository,
        }
    }

    /// Returns the policy snapshot.
    #[must_use]
    pub fn policy(&self) -> &AuthorizationPolicy {
        &self.policy
    }

    /// Answers a capability query for an already-resolved role name.
    #[must_use]
    pub fn has_capability(role: &str, capability: &str) -> bool {
        pulse_domain::has_capability(role, capability)
    }

    /// Reads a subject's role from the role store.
    ///
    /// Missing assignments and store failures both resolve to [`Role::User`].
    pub async fn resolve_role(&self, subject: &SubjectId) -> Role {
        match self.role_repository.find_role(subject).await {
            Ok(role) => role.unwrap_or(Role::User),
            Err(error) => {
                warn!(subject = %subject, error = %error, "failed to resolve role, using user");
                Role::User
            }
        }
    }

    /// Resolves the role used for gating, including configured administrators.
    pub async fn effective_role(&self, identity: &SubjectIdentity) -> Role {
        if self.policy.is_configured_admin(identity.id()) {
            return Role::Admin;
        }

        if self.policy.matches_legacy_admin(identity) {
            warn!(
                subject = %identity.id(),
                "granting admin through legacy display-name marker"
            );
            return Role::Admin;
        }

        self.resolve_role(identity.id()).await
    }

    /// Returns whether the subject is treated as an administrator.
    pub async fn is_admin(&self, identity: &SubjectIdentity) -> bool {
        self.effective_role(identity).await == Role::Admin
    }

    /// Returns whether the subject currently holds a capability.
    pub async fn subject_has_capability(
        &self,
        identity: &SubjectIdentity,
        capability: Capability,
    ) -> bool {
        self.effective_role(identity)
            .await
            .permissions()
            .grants(capability)
    }

    /// Ensures the subject holds a capability and returns the resolved role.
    pub async fn require_capability(
        &self,
        identity: &SubjectIdentity,
        capability: Capability,
    ) -> AppResult<Role> {
        let role = self.effective_role(identity).await;
        if role.permissions().grants(capability) {
            return Ok(role);
        }

        Err(AppError::Forbidden(format!(
            "subject '{}' with role '{role}' is missing capability '{}'",
            identity.id(),
            capability.as_str()
        )))
    }
}
