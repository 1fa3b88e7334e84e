//! Resource entity model.
//!
//! Only the flags consulted by privilege checks are kept. Content,
//! metadata and storage belong to the resource collaborator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hs_access_core::types::ResourceId;

/// Flags that gate, but never replace, privilege checks on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceFlags {
    /// Everyone may view the resource.
    pub public: bool,
    /// The resource is listed to everyone.
    pub discoverable: bool,
    /// The resource has been formally published.
    pub published: bool,
    /// Nobody may change the resource, not even owners or admins.
    pub immutable: bool,
    /// Non-owners holding a privilege may re-share within it.
    pub shareable: bool,
}

impl Default for ResourceFlags {
    fn default() -> Self {
        Self {
            public: false,
            discoverable: false,
            published: false,
            immutable: false,
            shareable: true,
        }
    }
}

/// A partial update of [`ResourceFlags`]. `None` leaves a flag unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceFlagsUpdate {
    /// New public flag.
    pub public: Option<bool>,
    /// New discoverable flag.
    pub discoverable: Option<bool>,
    /// New published flag.
    pub published: Option<bool>,
    /// New immutable flag.
    pub immutable: Option<bool>,
    /// New shareable flag.
    pub shareable: Option<bool>,
}

impl ResourceFlags {
    /// Apply an update, returning the new flags.
    pub fn apply(self, update: &ResourceFlagsUpdate) -> ResourceFlags {
        ResourceFlags {
            public: update.public.unwrap_or(self.public),
            discoverable: update.discoverable.unwrap_or(self.discoverable),
            published: update.published.unwrap_or(self.published),
            immutable: update.immutable.unwrap_or(self.immutable),
            shareable: update.shareable.unwrap_or(self.shareable),
        }
    }
}

/// A research resource addressed by its short id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Opaque immutable identifier.
    pub id: ResourceId,
    /// Human-readable title.
    pub title: String,
    /// Privilege-gating flags.
    pub flags: ResourceFlags,
    /// When the resource was created.
    pub created_at: DateTime<Utc>,
}

impl Resource {
    /// The resource's short id.
    pub fn short_id(&self) -> String {
        self.id.short_id()
    }
}

/// Data required to create a resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateResource {
    /// Human-readable title.
    pub title: String,
    /// Initial flags.
    #[serde(default)]
    pub flags: ResourceFlags,
}

impl CreateResource {
    /// A resource with default flags.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            flags: ResourceFlags::default(),
        }
    }

    /// Materialize the entity with a fresh id.
    pub fn into_resource(self) -> Resource {
        Resource {
            id: ResourceId::new(),
            title: self.title,
            flags: self.flags,
            created_at: Utc::now(),
        }
    }
}
