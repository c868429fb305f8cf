use std::fmt::{Display, Formatter};
use std::str::FromStr;

use pulse_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

const MIB: u64 = 1024 * 1024;

/// Authorization tier assigned to a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full administrative access.
    Admin,
    /// Moderation access: delete content and ban subjects.
    Moderator,
    /// Supporter tier with a larger upload ceiling.
    Vip,
    /// Default tier for every subject.
    User,
}

impl Role {
    /// Returns a stable storage value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Moderator => "moderator",
            Self::Vip => "vip",
            Self::User => "user",
        }
    }

    /// Returns all known roles.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Role] = &[Role::Admin, Role::Moderator, Role::Vip, Role::User];

        ALL
    }

    /// Parses caller input, failing for values outside the closed role set.
    pub fn parse(value: &str) -> AppResult<Self> {
        Self::from_str(value)
    }

    /// Maps a value read from an external store, falling back to [`Role::User`].
    #[must_use]
    pub fn from_stored(value: &str) -> Self {
        Self::from_str(value).unwrap_or(Self::User)
    }

    /// Returns the permission set granted to this role.
    #[must_use]
    pub fn permissions(&self) -> PermissionSet {
        match self {
            Self::Admin => PermissionSet {
                can_delete_any_post: true,
                can_edit_any_post: true,
                can_delete_any_message: true,
                can_edit_any_message: true,
                can_create_groups: true,
                can_create_channels: true,
                can_delete_channels: true,
                can_assign_roles: true,
                can_ban_users: true,
                can_view_admin_logs: true,
                can_upload_files: true,
                max_file_size: 50 * MIB,
                can_access_all_groups: true,
            },
            Self::Moderator => PermissionSet {
                can_delete_any_post: true,
                can_delete_any_message: true,
                can_ban_users: true,
                can_upload_files: true,
                max_file_size: 25 * MIB,
                ..PermissionSet::NONE
            },
            Self::Vip => PermissionSet {
                can_upload_files: true,
                max_file_size: 20 * MIB,
                ..PermissionSet::NONE
            },
            Self::User => PermissionSet {
                can_upload_files: true,
                max_file_size: 10 * MIB,
                ..PermissionSet::NONE
            },
        }
    }

    /// Returns the label shown next to a subject's name.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Moderator => "Moderator",
            Self::Vip => "VIP Member",
            Self::User => "Member",
        }
    }

    /// Returns the badge rendered for this role; plain members get none.
    #[must_use]
    pub fn badge(&self) -> Option<RoleBadge> {
        let color_class = match self {
            Self::Admin => "text-admin-gold",
            Self::Moderator => "text-blue-400",
            Self::Vip => "text-purple-400",
            Self::User => return None,
        };

        Some(RoleBadge {
            label: self.display_name(),
            color_class,
        })
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Self::Admin),
            "moderator" => Ok(Self::Moderator),
            "vip" => Ok(Self::Vip),
            "user" => Ok(Self::User),
            _ => Err(AppError::InvalidArgument(format!(
                "unknown role value '{value}'"
            ))),
        }
    }
}

impl Display for Role {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Visual badge for a privileged role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleBadge {
    /// Human-readable role label.
    pub label: &'static str,
    /// Style class applied to the label.
    pub color_class: &'static str,
}

/// Named capability inside a [`PermissionSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// Delete posts written by other subjects.
    #[serde(rename = "canDeleteAnyPost")]
    DeleteAnyPost,
    /// Edit posts written by other subjects.
    #[serde(rename = "canEditAnyPost")]
    EditAnyPost,
    /// Delete chat messages written by other subjects.
    #[serde(rename = "canDeleteAnyMessage")]
    DeleteAnyMessage,
    /// Edit chat messages written by other subjects.
    #[serde(rename = "canEditAnyMessage")]
    EditAnyMessage,
    /// Create groups.
    #[serde(rename = "canCreateGroups")]
    CreateGroups,
    /// Create channels.
    #[serde(rename = "canCreateChannels")]
    CreateChannels,
    /// Delete channels.
    #[serde(rename = "canDeleteChannels")]
    DeleteChannels,
    /// Assign roles to other subjects.
    #[serde(rename = "canAssignRoles")]
    AssignRoles,
    /// Ban subjects.
    #[serde(rename = "canBanUsers")]
    BanUsers,
    /// Read the administrative audit log.
    #[serde(rename = "canViewAdminLogs")]
    ViewAdminLogs,
    /// Upload attachments.
    #[serde(rename = "canUploadFiles")]
    UploadFiles,
    /// Upload ceiling in bytes.
    #[serde(rename = "maxFileSize")]
    MaxFileSize,
    /// Read every group regardless of membership.
    #[serde(rename = "canAccessAllGroups")]
    AccessAllGroups,
}

impl Capability {
    /// Returns the stable capability name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DeleteAnyPost => "canDeleteAnyPost",
            Self::EditAnyPost => "canEditAnyPost",
            Self::DeleteAnyMessage => "canDeleteAnyMessage",
            Self::EditAnyMessage => "canEditAnyMessage",
            Self::CreateGroups => "canCreateGroups",
            Self::CreateChannels => "canCreateChannels",
            Self::DeleteChannels => "canDeleteChannels",
            Self::AssignRoles => "canAssignRoles",
            Self::BanUsers => "canBanUsers",
            Self::ViewAdminLogs => "canViewAdminLogs",
            Self::UploadFiles => "canUploadFiles",
            Self::MaxFileSize => "maxFileSize",
            Self::AccessAllGroups => "canAccessAllGroups",
        }
    }

    /// Returns all known capabilities.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Capability] = &[
            Capability::DeleteAnyPost,
            Capability::EditAnyPost,
            Capability::DeleteAnyMessage,
            Capability::EditAnyMessage,
            Capability::CreateGroups,
            Capability::CreateChannels,
            Capability::DeleteChannels,
            Capability::AssignRoles,
            Capability::BanUsers,
            Capability::ViewAdminLogs,
            Capability::UploadFiles,
            Capability::MaxFileSize,
            Capability::AccessAllGroups,
        ];

        ALL
    }
}

impl FromStr for Capability {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|capability| capability.as_str() == value)
            .ok_or_else(|| AppError::InvalidArgument(format!("unknown capability '{value}'")))
    }
}

/// Value of one capability inside a permission set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityValue {
    /// Boolean permission bit.
    Flag(bool),
    /// Byte ceiling.
    Bytes(u64),
}

impl CapabilityValue {
    /// Returns whether the capability is held; byte ceilings count when non-zero.
    #[must_use]
    pub fn is_granted(&self) -> bool {
        match self {
            Self::Flag(value) => *value,
            Self::Bytes(value) => *value > 0,
        }
    }
}

/// Capabilities granted to one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionSet {
    /// See [`Capability::DeleteAnyPost`].
    pub can_delete_any_post: bool,
    /// See [`Capability::EditAnyPost`].
    pub can_edit_any_post: bool,
    /// See [`Capability::DeleteAnyMessage`].
    pub can_delete_any_message: bool,
    /// See [`Capability::EditAnyMessage`].
    pub can_edit_any_message: bool,
    /// See [`Capability::CreateGroups`].
    pub can_create_groups: bool,
    /// See [`Capability::CreateChannels`].
    pub can_create_channels: bool,
    /// See [`Capability::DeleteChannels`].
    pub can_delete_channels: bool,
    /// See [`Capability::AssignRoles`].
    pub can_assign_roles: bool,
    /// See [`Capability::BanUsers`].
    pub can_ban_users: bool,
    /// See [`Capability::ViewAdminLogs`].
    pub can_view_admin_logs: bool,
    /// See [`Capability::UploadFiles`].
    pub can_upload_files: bool,
    /// Upload ceiling in bytes.
    pub max_file_size: u64,
    /// See [`Capability::AccessAllGroups`].
    pub can_access_all_groups: bool,
}

impl PermissionSet {
    const NONE: Self = Self {
        can_delete_any_post: false,
        can_edit_any_post: false,
        can_delete_any_message: false,
        can_edit_any_message: false,
        can_create_groups: false,
        can_create_channels: false,
        can_delete_channels: false,
        can_assign_roles: false,
        can_ban_users: false,
        can_view_admin_logs: false,
        can_upload_files: false,
        max_file_size: 0,
        can_access_all_groups: false,
    };

    /// Returns the value stored for one capability.
    #[must_use]
    pub fn value(&self, capability: Capability) -> CapabilityValue {
        match capability {
            Capability::DeleteAnyPost => CapabilityValue::Flag(self.can_delete_any_post),
            Capability::EditAnyPost => CapabilityValue::Flag(self.can_edit_any_post),
            Capability::DeleteAnyMessage => CapabilityValue::Flag(self.can_delete_any_message),
            Capability::EditAnyMessage => CapabilityValue::Flag(self.can_edit_any_message),
            Capability::CreateGroups => CapabilityValue::Flag(self.can_create_groups),
            Capability::CreateChannels => CapabilityValue::Flag(self.can_create_channels),
            Capability::DeleteChannels => CapabilityValue::Flag(self.can_delete_channels),
            Capability::AssignRoles => CapabilityValue::Flag(self.can_assign_roles),
            Capability::BanUsers => CapabilityValue::Flag(self.can_ban_users),
            Capability::ViewAdminLogs => CapabilityValue::Flag(self.can_view_admin_logs),
            Capability::UploadFiles => CapabilityValue::Flag(self.can_upload_files),
            Capability::MaxFileSize => CapabilityValue::Bytes(self.max_file_size),
            Capability::AccessAllGroups => CapabilityValue::Flag(self.can_access_all_groups),
        }
    }

    /// Returns whether the capability is granted.
    #[must_use]
    pub fn grants(&self, capability: Capability) -> bool {
        self.value(capability).is_granted()
    }
}

/// Answers a capability query by role and capability name.
///
/// Unknown role values use the [`Role::User`] set; unknown capability names
/// are never granted.
#[must_use]
pub fn has_capability(role: &str, capability: &str) -> bool {
    Capability::from_str(capability)
        .map(|capability| Role::from_stored(role).permissions().grants(capability))
        .unwrap_or(false)
}

/// Stable audit actions emitted by administrative commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditAction {
    /// Emitted when a role is assigned to a subject.
    #[serde(rename = "ASSIGN_ROLE")]
    AssignRole,
    /// Emitted when a subject's role assignment is removed.
    #[serde(rename = "REVOKE_ROLE")]
    RevokeRole,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AssignRole => "ASSIGN_ROLE",
            Self::RevokeRole => "REVOKE_ROLE",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pulse_core::AppError;

    use super::{Capability, CapabilityValue, Role, has_capability};

    #[test]
    fn role_roundtrip_storage_value() {
        for role in Role::all() {
            let restored = Role::from_str(role.as_str());
            assert!(matches!(restored, Ok(value) if value == *role));
        }
    }

    #[test]
    fn unknown_role_is_rejected_as_invalid_argument() {
        let parsed = Role::parse("superuser");
        assert!(matches!(parsed, Err(AppError::InvalidArgument(_))));
    }

    #[test]
    fn stored_unknown_role_falls_back_to_user() {
        assert_eq!(Role::from_stored("owner"), Role::User);
        assert_eq!(Role::from_stored("vip"), Role::Vip);
    }

    #[test]
    fn capability_names_roundtrip() {
        for capability in Capability::all() {
            let restored = Capability::from_str(capability.as_str());
            assert!(matches!(restored, Ok(value) if value == *capability));
        }
    }

    #[test]
    fn only_admin_assigns_roles() {
        assert!(has_capability("admin", "canAssignRoles"));
        assert!(!has_capability("moderator", "canAssignRoles"));
        assert!(!has_capability("vip", "canAssignRoles"));
        assert!(!has_capability("user", "canAssignRoles"));
    }

    #[test]
    fn unknown_role_uses_user_policy() {
        assert!(has_capability("unknown-role", "canUploadFiles"));
        assert!(!has_capability("unknown-role", "canBanUsers"));
    }

    #[test]
    fn unknown_capability_is_never_granted() {
        for role in Role::all() {
            assert!(!has_capability(role.as_str(), "nonexistent"));
        }
        assert!(!has_capability("unknown-role", "nonexistent"));
    }

    #[test]
    fn moderator_deletes_but_does_not_edit() {
        let permissions = Role::Moderator.permissions();
        assert!(permissions.grants(Capability::DeleteAnyMessage));
        assert!(!permissions.grants(Capability::EditAnyMessage));
        assert!(permissions.grants(Capability::BanUsers));
    }

    #[test]
    fn upload_ceilings_follow_role_tier() {
        let ceilings: Vec<CapabilityValue> = Role::all()
            .iter()
            .map(|role| role.permissions().value(Capability::MaxFileSize))
            .collect();

        assert_eq!(
            ceilings,
            vec![
                CapabilityValue::Bytes(50 * 1024 * 1024),
                CapabilityValue::Bytes(25 * 1024 * 1024),
                CapabilityValue::Bytes(20 * 1024 * 1024),
                CapabilityValue::Bytes(10 * 1024 * 1024),
            ]
        );
        assert!(has_capability("user", "maxFileSize"));
    }

    #[test]
    fn plain_members_have_no_badge() {
        assert!(Role::User.badge().is_none());
        assert_eq!(
            Role::Vip.badge().map(|badge| badge.label),
            Some("VIP Member")
        );
    }
}
