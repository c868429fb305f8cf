use std::sync::Arc;

use async_trait::async_trait;
use pulse_application::{DocumentStore, RoleAssignment, RoleAssignmentRepository};
use pulse_core::{AppResult, SubjectId};
use pulse_domain::Role;
use serde_json::Value;

use crate::document_fields::{document_of, string_field};

const COLLECTION: &str = "userRoles";

/// Role assignments stored as `userRoles/{subject}` documents.
#[derive(Clone)]
pub struct DocumentRoleAssignmentRepository {
    store: Arc<dyn DocumentStore>,
}

impl DocumentRoleAssignmentRepository {
    /// Creates a repository over a document store.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RoleAssignmentRepository for DocumentRoleAssignmentRepository {
    async fn find_role(&self, subject: &SubjectId) -> AppResult<Option<Role>> {
        let document = self.store.get(&format!("{COLLECTION}/{subject}")).await?;

        Ok(document
            .as_ref()
            .and_then(|document| string_field(document, "role"))
            .map(Role::from_stored))
    }

    async fn save_assignment(&self, assignment: RoleAssignment) -> AppResult<()> {
        let document = document_of([
            ("role", Value::from(assignment.role.as_str())),
            ("assignedBy", Value::from(assignment.assigned_by.as_str())),
            ("assignedAt", Value::from(assignment.assigned_at)),
        ]);

        self.store
            .set(&format!("{COLLECTION}/{}", assignment.subject), document, false)
            .await
    }

    async fn delete_assignment(&self, subject: &SubjectId) -> AppResult<()> {
        self.store.delete(&format!("{COLLECTION}/{subject}")).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pulse_application::{DocumentStore, RoleAssignment, RoleAssignmentRepository};
    use pulse_core::SubjectId;
    use pulse_domain::Role;
    use serde_json::json;

    use crate::InMemoryDocumentStore;
    use crate::document_fields::document_of;

    use super::DocumentRoleAssignmentRepository;

    fn subject(id: &str) -> SubjectId {
        SubjectId::new(id).unwrap_or_else(|_| unreachable!())
    }

    #[tokio::test]
    async fn saved_assignment_uses_store_field_names() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let repository = DocumentRoleAssignmentRepository::new(store.clone());

        repository
            .save_assignment(RoleAssignment {
                subject: subject("u1"),
                role: Role::Vip,
                assigned_by: subject("admin"),
                assigned_at: "2026-01-01T00:00:00+00:00".to_owned(),
            })
            .await
            .unwrap_or_else(|_| unreachable!());

        let stored = store
            .get("userRoles/u1")
            .await
            .unwrap_or_else(|_| unreachable!())
            .unwrap_or_else(|| unreachable!());
        assert_eq!(stored.get("role"), Some(&json!("vip")));
        assert_eq!(stored.get("assignedBy"), Some(&json!("admin")));
        assert_eq!(
            repository.find_role(&subject("u1")).await.ok().flatten(),
            Some(Role::Vip)
        );
    }

    #[tokio::test]
    async fn unknown_stored_role_reads_as_user_and_missing_as_none() {
        let store = Arc::new(InMemoryDocumentStore::new());
        store
            .set(
                "userRoles/u2",
                document_of([("role", json!("superuser"))]),
                false,
            )
            .await
            .unwrap_or_else(|_| unreachable!());
        let repository = DocumentRoleAssignmentRepository::new(store);

        assert_eq!(
            repository.find_role(&subject("u2")).await.ok().flatten(),
            Some(Role::User)
        );
        assert_eq!(repository.find_role(&subject("u3")).await.ok().flatten(), None);
    }

    #[tokio::test]
    async fn delete_assignment_removes_the_document() {
        let store = Arc::new(InMemoryDocumentStore::new());
        store
            .set("userRoles/u1", document_of([("role", json!("admin"))]), false)
            .await
            .unwrap_or_else(|_| unreachable!());
        let repository = DocumentRoleAssignmentRepository::new(store.clone());

        repository
            .delete_assignment(&subject("u1"))
            .await
            .unwrap_or_else(|_| unreachable!());

        assert!(store.is_empty().await);
    }
}
