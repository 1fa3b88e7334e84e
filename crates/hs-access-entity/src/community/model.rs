//! Community entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hs_access_core::types::CommunityId;

/// Visibility flags of a community.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityFlags {
    /// Inactive communities cannot be shared.
    pub active: bool,
    /// Anyone may view the community.
    pub public: bool,
    /// The community is listed to everyone.
    pub discoverable: bool,
}

impl Default for CommunityFlags {
    fn default() -> Self {
        Self {
            active: true,
            public: false,
            discoverable: true,
        }
    }
}

/// A container of groups sharing the same privilege lattice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Community {
    /// Unique community identifier.
    pub id: CommunityId,
    /// Display name.
    pub name: String,
    /// Visibility flags.
    pub flags: CommunityFlags,
    /// When the community was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a community.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCommunity {
    /// Display name.
    pub name: String,
    /// Initial flags.
    #[serde(default)]
    pub flags: CommunityFlags,
}

impl CreateCommunity {
    /// A community with default flags.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flags: CommunityFlags::default(),
        }
    }

    /// Materialize the entity with a fresh id.
    pub fn into_community(self) -> Community {
        Community {
            id: CommunityId::new(),
            name: self.name,
            flags: self.flags,
            created_at: Utc::now(),
        }
    }
}
