//! Effective privilege resolution and the per-target predicates.

pub mod action;
pub mod checker;
pub mod community;
pub mod group;
pub mod inheritance;
pub mod resolver;
pub mod resource;

pub use action::check;
pub use checker::permitted;
pub use community::{
    can_change_community, can_change_community_flags, can_delete_community, can_share_community,
    can_view_community, owns_community,
};
pub use group::{
    can_change_group, can_change_group_flags, can_delete_group, can_share_group, can_view_group,
    owns_group,
};
pub use resolver::{EffectivePrivilege, PrivilegeSource, effective_privilege};
pub use resource::{
    can_change_resource, can_change_resource_flags, can_delete_resource, can_share_resource,
    can_view_resource, owns_resource,
};
