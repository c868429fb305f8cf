use pulse_core::{AppResult, SubjectId, SubjectIdentity};
use pulse_domain::{AuditAction, Capability, Role};
use tracing::{debug, info, warn};

use crate::{AuditEvent, AuditLogEntry, AuditLogQuery, RoleAssignment};

use super::AuthorizationService;

impl AuthorizationService {
    /// Assigns a role to a subject and appends an audit event.
    ///
    /// The role name is validated before anything else, so a value outside
    /// the closed set never reaches the store. The audit append is
    /// best-effort and does not undo a successful assignment.
    pub async fn assign_role(
        &self,
        actor: &SubjectIdentity,
        target: &SubjectId,
        role: &str,
    ) -> AppResult<()> {
        let role = Role::parse(role)?;
        self.require_capability(actor, Capability::AssignRoles)
            .await?;

        let timestamp = crate::now_timestamp();
        self.role_repository
            .save_assignment(RoleAssignment {
                subject: target.clone(),
                role,
                assigned_by: actor.id().clone(),
                assigned_at: timestamp.clone(),
            })
            .await?;

        info!(actor = %actor.id(), target = %target, role = %role, "role assigned");

        self.append_audit_event(AuditEvent {
            actor: actor.id().clone(),
            action: AuditAction::AssignRole,
            target: target.clone(),
            role: Some(role),
            timestamp,
        })
        .await;

        Ok(())
    }

    /// Removes a subject's role assignment so it resolves to `user` again.
    ///
    /// Revoking from a subject without an assignment writes nothing and
    /// appends no audit event.
    pub async fn revoke_role(&self, actor: &SubjectIdentity, target: &SubjectId) -> AppResult<()> {
        self.require_capability(actor, Capability::AssignRoles)
            .await?;

        let Some(previous) = self.role_repository.find_role(target).await? else {
            debug!(actor = %actor.id(), target = %target, "no role assignment to revoke");
            return Ok(());
        };

        self.role_repository.delete_assignment(target).await?;

        info!(actor = %actor.id(), target = %target, role = %previous, "role revoked");

        self.append_audit_event(AuditEvent {
            actor: actor.id().clone(),
            action: AuditAction::RevokeRole,
            target: target.clone(),
            role: Some(previous),
            timestamp: crate::now_timestamp(),
        })
        .await;

        Ok(())
    }

    /// Returns recent audit entries for subjects allowed to read them.
    pub async fn list_audit_log(
        &self,
        actor: &SubjectIdentity,
        query: AuditLogQuery,
    ) -> AppResult<Vec<AuditLogEntry>> {
        self.require_capability(actor, Capability::ViewAdminLogs)
            .await?;

        self.audit_log_repository.list_recent_entries(query).await
    }

    async fn append_audit_event(&self, event: AuditEvent) {
        let action = event.action;
        let target = event.target.clone();
        if let Err(error) = self.audit_repository.append_event(event).await {
            warn!(
                action = action.as_str(),
                target = %target,
                error = %error,
                "failed to append audit event"
            );
        }
    }
}
