use async_trait::async_trait;
use pulse_core::{AppResult, SubjectId};
use pulse_domain::{AuditAction, Role};
use serde::Serialize;

/// Role assignment as written to the role store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignment {
    /// Subject receiving the role.
    pub subject: SubjectId,
    /// Assigned role.
    pub role: Role,
    /// Subject that made the assignment.
    pub assigned_by: SubjectId,
    /// Assignment timestamp in RFC3339.
    pub assigned_at: String,
}

/// Repository port for subject role assignments.
#[async_trait]
pub trait RoleAssignmentRepository: Send + Sync {
    /// Reads the stored role for a subject.
    ///
    /// Values outside the closed role set are returned as [`Role::User`].
    async fn find_role(&self, subject: &SubjectId) -> AppResult<Option<Role>>;

    /// Creates or overwrites a subject's assignment.
    async fn save_assignment(&self, assignment: RoleAssignment) -> AppResult<()>;

    /// Removes a subject's assignment.
    async fn delete_assignment(&self, subject: &SubjectId) -> AppResult<()>;
}

/// Administrative action appended to the audit log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// Subject that performed the action.
    pub actor: SubjectId,
    /// Stable action identifier.
    pub action: AuditAction,
    /// Subject affected by the action.
    pub target: SubjectId,
    /// Role involved, when the action carries one.
    pub role: Option<Role>,
    /// Event timestamp in RFC3339.
    pub timestamp: String,
}

/// Port for persisting append-only audit events.
#[async_trait]
pub trait AuditRepository: Send + Sync {
    /// Persists one audit event.
    async fn append_event(&self, event: AuditEvent) -> AppResult<()>;
}

/// Audit log entry projection for administrative views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    /// Stable event identifier.
    pub event_id: String,
    /// Actor subject.
    pub actor: String,
    /// Stable action identifier.
    pub action: String,
    /// Target subject.
    pub target: String,
    /// Role involved, if any.
    pub role: Option<String>,
    /// Event timestamp in RFC3339.
    pub timestamp: String,
}

/// Query parameters for audit log listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLogQuery {
    /// Maximum rows returned.
    pub limit: usize,
    /// Optional action filter.
    pub action: Option<AuditAction>,
}

/// Repository port for reading the audit log.
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// Lists the most recent entries, newest first.
    async fn list_recent_entries(&self, query: AuditLogQuery) -> AppResult<Vec<AuditLogEntry>>;
}
