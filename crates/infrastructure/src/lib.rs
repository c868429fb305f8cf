//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod document_audit_repository;
mod document_fields;
mod document_message_repository;
mod document_notification_repository;
mod document_reaction_repository;
mod document_role_assignment_repository;
mod document_subject_directory;
mod in_memory_auth_provider;
mod in_memory_blob_store;
mod in_memory_document_store;
mod in_memory_key_value_store;

pub use document_audit_repository::DocumentAuditRepository;
pub use document_message_repository::DocumentMessageRepository;
pub use document_notification_repository::DocumentNotificationRepository;
pub use document_reaction_repository::DocumentReactionRepository;
pub use document_role_assignment_repository::DocumentRoleAssignmentRepository;
pub use document_subject_directory::{DocumentSubjectDirectory, PREFIX_RANGE_SENTINEL};
pub use in_memory_auth_provider::InMemoryAuthProvider;
pub use in_memory_blob_store::InMemoryBlobStore;
pub use in_memory_document_store::InMemoryDocumentStore;
pub use in_memory_key_value_store::InMemoryKeyValueStore;
