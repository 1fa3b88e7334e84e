//! Newtype wrappers around [`uuid::Uuid`] for all principal and target
//! identifiers.
//!
//! Using distinct types prevents accidentally passing a `GroupId` where a
//! `ResourceId` is expected, which replaces runtime kind checks with the
//! type system. Every id type also implements [`EntityId`] so that generic
//! grant tables can name the kind of their grantee and target.

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of entity an identifier refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// A user account.
    User,
    /// A group of users.
    Group,
    /// A community of groups.
    Community,
    /// A research resource.
    Resource,
}

impl EntityKind {
    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Group => "group",
            Self::Community => "community",
            Self::Resource => "resource",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Common bound for identifiers used as grantee or target of a grant.
pub trait EntityId:
    Copy + Eq + Ord + Hash + fmt::Debug + fmt::Display + Into<Uuid> + Send + Sync + 'static
{
    /// The kind of entity this identifier names.
    const KIND: EntityKind;
}

/// Macro to define a newtype ID wrapper around `Uuid`.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident => $kind:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Create an identifier from an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Return the inner UUID value.
            pub fn into_uuid(self) -> Uuid {
                self.0
            }

            /// Return a reference to the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0.simple())
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Uuid {
                id.0
            }
        }

        impl EntityId for $name {
            const KIND: EntityKind = EntityKind::$kind;
        }
    };
}

define_id!(
    /// Unique identifier for a user.
    UserId => User
);

define_id!(
    /// Unique identifier for a group.
    GroupId => Group
);

define_id!(
    /// Unique identifier for a community.
    CommunityId => Community
);

define_id!(
    /// Opaque, immutable identifier of a resource. Displayed as its
    /// 32-character `short_id`.
    ResourceId => Resource
);

impl ResourceId {
    /// The resource's short id: the UUID in simple (hyphen-free) form.
    pub fn short_id(&self) -> String {
        self.0.simple().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(UserId::new(), UserId::new());
    }

    #[test]
    fn test_short_id_has_no_hyphens() {
        let id = ResourceId::new();
        let short = id.short_id();
        assert_eq!(short.len(), 32);
        assert!(!short.contains('-'));
        assert_eq!(id.to_string(), short);
    }

    #[test]
    fn test_parse_accepts_short_and_hyphenated_forms() {
        let uuid = Uuid::new_v4();
        let from_simple: GroupId = uuid.simple().to_string().parse().expect("simple");
        let from_hyphenated: GroupId = uuid.to_string().parse().expect("hyphenated");
        assert_eq!(from_simple, from_hyphenated);
    }

    #[test]
    fn test_kind_constants() {
        assert_eq!(UserId::KIND, EntityKind::User);
        assert_eq!(GroupId::KIND, EntityKind::Group);
        assert_eq!(CommunityId::KIND, EntityKind::Community);
        assert_eq!(ResourceId::KIND.as_str(), "resource");
    }
}
