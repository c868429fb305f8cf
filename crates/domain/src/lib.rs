//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod attachment;
pub mod mention;
mod message;
mod notification;
mod reaction;
mod security;
mod theme;
mod user;

pub use attachment::{
    ALLOWED_IMAGE_TYPES, ALLOWED_VIDEO_TYPES, AttachmentKind, FileDescriptor, FileRejection,
    FileValidation, MAX_IMAGE_SIZE, MAX_VIDEO_SIZE, UploadProgress, storage_object_name,
    validate_file,
};
pub use mention::{ActiveMention, HighlightedText, MentionSegment};
pub use message::{EditRecord, MESSAGE_MAX_LENGTH, MessageRef, edit_indicator, normalize_edit};
pub use notification::{Notification, NotificationKind};
pub use reaction::{
    Reaction, ReactionEmoji, ReactionSummary, ReactionSummaryEntry, TOOLTIP_NAME_LIMIT,
    reaction_id,
};
pub use security::{
    AuditAction, Capability, CapabilityValue, PermissionSet, Role, RoleBadge, has_capability,
};
pub use theme::{THEME_STORAGE_KEY, Theme, ThemePalette};
pub use user::{
    DISPLAY_NAME_MAX_LENGTH, DISPLAY_NAME_MIN_LENGTH, DisplayName, requires_display_name,
};
