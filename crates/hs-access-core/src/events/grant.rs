//! Grant-related domain events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{PrivilegeCode, UserId};

/// The five legal (grantee, target) pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantRelation {
    /// A user's privilege over a resource.
    UserResource,
    /// A user's privilege over (membership in) a group.
    UserGroup,
    /// A group's privilege over a resource.
    GroupResource,
    /// A user's privilege over a community.
    UserCommunity,
    /// A group's privilege over (membership in) a community.
    GroupCommunity,
}

impl GrantRelation {
    /// Return the relation as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserResource => "user_resource",
            Self::UserGroup => "user_group",
            Self::GroupResource => "group_resource",
            Self::UserCommunity => "user_community",
            Self::GroupCommunity => "group_community",
        }
    }
}

impl std::fmt::Display for GrantRelation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Events related to grant rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GrantEvent {
    /// A grant was created or updated in place.
    Shared {
        /// Which relation the grant belongs to.
        relation: GrantRelation,
        /// The grantee.
        grantee: Uuid,
        /// The target.
        target: Uuid,
        /// The user who made the grant.
        grantor: UserId,
        /// The privilege now held through this grant.
        privilege: PrivilegeCode,
    },
    /// Every grant of a grantee over a target was removed.
    Unshared {
        /// Which relation the grants belonged to.
        relation: GrantRelation,
        /// The grantee.
        grantee: Uuid,
        /// The target.
        target: Uuid,
    },
    /// One grantor's grant was removed.
    Undone {
        /// Which relation the grant belonged to.
        relation: GrantRelation,
        /// The grantee.
        grantee: Uuid,
        /// The target.
        target: Uuid,
        /// The grantor whose grant was removed.
        grantor: UserId,
    },
}
