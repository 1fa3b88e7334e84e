//! Grant entities: the persisted (grantee, target, grantor, privilege) rows.

pub mod model;

pub use model::{
    Grant, GrantFilter, GroupCommunityGrant, GroupResourceGrant, UserCommunityGrant,
    UserGroupGrant, UserResourceGrant,
};
