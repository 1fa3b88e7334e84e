//! Generic grant row.
//!
//! One type serves all five legal (grantee, target) pairs; the pair is
//! fixed by the identifier types `G` and `T`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hs_access_core::types::{CommunityId, EntityId, GroupId, PrivilegeCode, ResourceId, UserId};

/// A privilege granted to `grantee` over `target` by `grantor`.
///
/// At most one row exists per (grantee, target, grantor).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant<G, T> {
    /// The principal receiving the privilege.
    pub grantee: G,
    /// The object the privilege applies to.
    pub target: T,
    /// The user who made the grant.
    pub grantor: UserId,
    /// The privilege level. Never `None` for a stored row.
    pub privilege: PrivilegeCode,
    /// When the row was first created.
    pub start: DateTime<Utc>,
    /// When the privilege was last written.
    pub updated_at: DateTime<Utc>,
}

impl<G: EntityId, T: EntityId> Grant<G, T> {
    /// Build a new row stamped with the current time.
    pub fn new(grantee: G, target: T, grantor: UserId, privilege: PrivilegeCode) -> Self {
        let now = Utc::now();
        Self {
            grantee,
            target,
            grantor,
            privilege,
            start: now,
            updated_at: now,
        }
    }

    /// Whether this row confers ownership.
    pub fn is_owner(&self) -> bool {
        self.privilege == PrivilegeCode::Owner
    }

    /// Whether the row matches every set field of a filter.
    pub fn matches(&self, filter: &GrantFilter<G, T>) -> bool {
        filter.target.is_none_or(|t| t == self.target)
            && filter.grantee.is_none_or(|g| g == self.grantee)
            && filter.grantor.is_none_or(|u| u == self.grantor)
            && filter
                .privilege_lte
                .is_none_or(|p| self.privilege.at_least(p))
    }
}

/// Filter for grant queries. Unset fields match everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantFilter<G, T> {
    /// Restrict to one target.
    pub target: Option<T>,
    /// Restrict to one grantee.
    pub grantee: Option<G>,
    /// Restrict to one grantor.
    pub grantor: Option<UserId>,
    /// Keep rows at least as strong as this privilege.
    pub privilege_lte: Option<PrivilegeCode>,
}

impl<G, T> Default for GrantFilter<G, T> {
    fn default() -> Self {
        Self {
            target: None,
            grantee: None,
            grantor: None,
            privilege_lte: None,
        }
    }
}

impl<G, T> GrantFilter<G, T> {
    /// Match rows over one target.
    pub fn target(target: T) -> Self {
        Self {
            target: Some(target),
            ..Self::default()
        }
    }

    /// Match rows held by one grantee.
    pub fn grantee(grantee: G) -> Self {
        Self {
            grantee: Some(grantee),
            ..Self::default()
        }
    }

    /// Additionally restrict to one grantor.
    pub fn with_grantor(mut self, grantor: UserId) -> Self {
        self.grantor = Some(grantor);
        self
    }

    /// Additionally keep only rows at least as strong as `privilege`.
    pub fn with_privilege_lte(mut self, privilege: PrivilegeCode) -> Self {
        self.privilege_lte = Some(privilege);
        self
    }
}

/// A user's privilege over a resource.
pub type UserResourceGrant = Grant<UserId, ResourceId>;
/// A user's privilege over a group (membership).
pub type UserGroupGrant = Grant<UserId, GroupId>;
/// A group's privilege over a resource.
pub type GroupResourceGrant = Grant<GroupId, ResourceId>;
/// A user's privilege over a community.
pub type UserCommunityGrant = Grant<UserId, CommunityId>;
/// A group's privilege over a community (membership).
pub type GroupCommunityGrant = Grant<GroupId, CommunityId>;
