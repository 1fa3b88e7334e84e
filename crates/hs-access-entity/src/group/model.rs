//! Group entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hs_access_core::types::GroupId;

/// Flags that gate privilege checks on a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupFlags {
    /// Inactive groups convey no resource privilege and cannot be shared.
    pub active: bool,
    /// Anyone may view the group and its member list.
    pub public: bool,
    /// The group is listed to everyone.
    pub discoverable: bool,
    /// Members may invite others within their own privilege.
    pub shareable: bool,
}

impl Default for GroupFlags {
    fn default() -> Self {
        Self {
            active: true,
            public: false,
            discoverable: true,
            shareable: true,
        }
    }
}

/// A partial update of [`GroupFlags`]. `None` leaves a flag unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupFlagsUpdate {
    /// New active flag.
    pub active: Option<bool>,
    /// New public flag.
    pub public: Option<bool>,
    /// New discoverable flag.
    pub discoverable: Option<bool>,
    /// New shareable flag.
    pub shareable: Option<bool>,
}

impl GroupFlags {
    /// Apply an update, returning the new flags.
    pub fn apply(self, update: &GroupFlagsUpdate) -> GroupFlags {
        GroupFlags {
            active: update.active.unwrap_or(self.active),
            public: update.public.unwrap_or(self.public),
            discoverable: update.discoverable.unwrap_or(self.discoverable),
            shareable: update.shareable.unwrap_or(self.shareable),
        }
    }
}

/// A group of users that can itself hold privilege over resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Unique group identifier.
    pub id: GroupId,
    /// Display name.
    pub name: String,
    /// Privilege-gating flags.
    pub flags: GroupFlags,
    /// When the group was created.
    pub created_at: DateTime<Utc>,
}

impl Group {
    /// Whether the group is listed to everyone.
    pub fn is_discoverable(&self) -> bool {
        self.flags.active && (self.flags.discoverable || self.flags.public)
    }

    /// Whether the group is publicly viewable.
    pub fn is_public(&self) -> bool {
        self.flags.active && self.flags.public
    }
}

/// Data required to create a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGroup {
    /// Display name.
    pub name: String,
    /// Initial flags.
    #[serde(default)]
    pub flags: GroupFlags,
}

impl CreateGroup {
    /// A group with default flags.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flags: GroupFlags::default(),
        }
    }

    /// Materialize the entity with a fresh id.
    pub fn into_group(self) -> Group {
        Group {
            id: GroupId::new(),
            name: self.name,
            flags: self.flags,
            created_at: Utc::now(),
        }
    }
}
