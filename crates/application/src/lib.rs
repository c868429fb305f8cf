//! Application services and ports.

#![forbid(unsafe_code)]

mod attachment_service;
mod authorization_service;
mod content_ports;
mod directory_ports;
mod mention_controller;
mod message_service;
mod notification_service;
mod profile_service;
mod reaction_service;
mod security_ports;
mod store_ports;
mod suggestion_source;
mod surface_ports;
mod theme_service;

pub use attachment_service::{AttachmentService, UploadedAttachment};
pub use authorization_service::{
    AuthorizationPolicy, AuthorizationService, LEGACY_ADMIN_DISPLAY_NAME,
};
pub use content_ports::{
    MessageRepository, NotificationRepository, ReactionRepository, ReactionTarget,
};
pub use directory_ports::{SubjectDirectory, SubjectSummary};
pub use mention_controller::{MentionController, MentionState};
pub use message_service::MessageService;
pub use notification_service::NotificationService;
pub use profile_service::ProfileService;
pub use reaction_service::ReactionService;
pub use security_ports::{
    AuditEvent, AuditLogEntry, AuditLogQuery, AuditLogRepository, AuditRepository,
    RoleAssignment, RoleAssignmentRepository,
};
pub use store_ports::{
    AuthProvider, BlobStore, Document, DocumentQuery, DocumentStore, FieldFilter, FilterOp,
    KeyValueStore, ProgressSender, StoredDocument,
};
pub use suggestion_source::{DEFAULT_SUGGESTION_LIMIT, DirectorySuggestionSource};
pub use surface_ports::{
    InputSnapshot, InputSurface, KeyOutcome, MentionKey, PointerTarget, SuggestionSource,
    SuggestionSurface, ThemeSink,
};
pub use theme_service::ThemeService;

/// Current time as a fixed-width RFC3339 UTC timestamp, which sorts lexicographically.
pub(crate) fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
