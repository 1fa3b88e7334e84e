//! Stable access-error messages.
//!
//! Callers and tests match on these strings, so they must not change.

use hs_access_core::error::AppError;
use hs_access_core::types::EntityKind;

/// The acting user is inactive.
pub const REQUESTER_NOT_ACTIVE: &str = "requester not active";
/// The receiving user or group is inactive.
pub const GRANTEE_NOT_ACTIVE: &str = "Grantee is not active";
/// A group was offered `OWNER` over a resource.
pub const GROUPS_CANNOT_OWN_RESOURCES: &str = "Groups cannot own resources";
/// A group was offered `OWNER` over a community.
pub const GROUPS_CANNOT_OWN_COMMUNITIES: &str = "Groups cannot own communities";
/// `CHANGE` offered over an immutable resource.
pub const IMMUTABLE_CHANGE: &str = "Cannot grant CHANGE on an immutable resource";
/// Resource shared with a group the requester does not belong to.
pub const NOT_GROUP_MEMBER: &str = "Requester is not a member of the group";
/// Requested privilege exceeds the requester's own.
pub const EXCEEDS_OWN_PRIVILEGE: &str = "Cannot grant a privilege stronger than your own";
/// Unshare requested by someone who is neither admin, owner, nor grantee.
pub const INSUFFICIENT_TO_UNSHARE: &str = "Insufficient privilege to unshare";
/// Undo of another grantor's grant by someone who is neither admin nor owner.
pub const NOT_ORIGINAL_GRANTOR: &str =
    "Only owners and administrators may undo another user's grant";
/// Undo of a grant that does not exist.
pub const NO_GRANT_TO_UNDO: &str = "No grant by this grantor to undo";
/// Unshare of a grantee that holds nothing.
pub const NO_PRIVILEGE_TO_REMOVE: &str = "Grantee holds no privilege to remove";

/// Removing the last owner of a target.
pub fn last_owner(kind: EntityKind) -> String {
    format!("Cannot remove last owner of {kind}")
}

/// Sharing a target the requester holds nothing over.
pub fn no_privilege(kind: EntityKind) -> String {
    format!("Requester holds no privilege over {kind}")
}

/// Re-sharing a non-shareable target as a non-owner.
pub fn not_shareable(kind: EntityKind) -> String {
    format!("{} is not shareable", capitalized(kind))
}

/// Acting on an inactive group or community.
pub fn target_not_active(kind: EntityKind) -> String {
    format!("{} is not active", capitalized(kind))
}

/// Sharing a target that only owners may share.
pub fn only_owners_share(kind: EntityKind) -> String {
    format!("Only owners may share a {kind}")
}

/// Changing flags without owning the target.
pub fn cannot_change_flags(kind: EntityKind) -> String {
    format!("Insufficient privilege to change {kind} flags")
}

/// Build an access error from a message.
pub fn denied(message: impl Into<String>) -> AppError {
    AppError::access(message)
}

fn capitalized(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::User => "User",
        EntityKind::Group => "Group",
        EntityKind::Community => "Community",
        EntityKind::Resource => "Resource",
    }
}
