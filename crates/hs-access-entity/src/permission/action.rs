//! Action and principal/target references for generic authorization
//! queries ("can principal P perform action A on object O").

use serde::{Deserialize, Serialize};

use hs_access_core::types::{CommunityId, GroupId, PrivilegeCode, ResourceId, UserId};

/// Actions that can be checked against a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "action", content = "privilege")]
pub enum Action {
    /// Read the target.
    View,
    /// Modify the target's content or metadata.
    Change,
    /// Change the target's flags (public, shareable, active, ...).
    ChangeFlags,
    /// Delete the target.
    Delete,
    /// Share the target at the given privilege.
    Share(PrivilegeCode),
}

impl Action {
    /// Return the action as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Change => "change",
            Self::ChangeFlags => "change_flags",
            Self::Delete => "delete",
            Self::Share(_) => "share",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Share(privilege) => write!(f, "share:{privilege}"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

/// A principal that may hold privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum PrincipalRef {
    /// A user.
    User(UserId),
    /// A group.
    Group(GroupId),
}

/// An object privilege may be held over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum TargetRef {
    /// A resource.
    Resource(ResourceId),
    /// A group.
    Group(GroupId),
    /// A community.
    Community(CommunityId),
}

impl From<ResourceId> for TargetRef {
    fn from(id: ResourceId) -> Self {
        Self::Resource(id)
    }
}

impl From<GroupId> for TargetRef {
    fn from(id: GroupId) -> Self {
        Self::Group(id)
    }
}

impl From<CommunityId> for TargetRef {
    fn from(id: CommunityId) -> Self {
        Self::Community(id)
    }
}

impl From<UserId> for PrincipalRef {
    fn from(id: UserId) -> Self {
        Self::User(id)
    }
}

impl From<GroupId> for PrincipalRef {
    fn from(id: GroupId) -> Self {
        Self::Group(id)
    }
}
