//! Shared value types.

pub mod id;
pub mod privilege;

pub use id::{CommunityId, EntityId, EntityKind, GroupId, ResourceId, UserId};
pub use privilege::PrivilegeCode;
