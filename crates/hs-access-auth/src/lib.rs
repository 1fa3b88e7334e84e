//! # hs-access-auth
//!
//! The authorization engine of the HydroShare access-control system.
//!
//! Everything here is synchronous and operates on an [`AccessState`]
//! borrowed from a store snapshot or transaction. Callers own locking and
//! event dispatch.
//!
//! ## Modules
//!
//! - `acl`: effective privilege resolution and the `can_*` predicates
//! - `share`: share, unshare and undo over the five grant relations
//! - `projector`: the materialized user→resource permission table
//! - `lifecycle`: entity creation with bootstrap ownership, flag updates, cascades
//! - `query`: read-only listings
//! - `messages`: stable access-error messages
//!
//! [`AccessState`]: hs_access_store::AccessState

pub mod acl;
pub mod lifecycle;
pub mod messages;
pub mod projector;
pub mod query;
pub mod share;

pub use acl::{EffectivePrivilege, PrivilegeSource, check, effective_privilege, permitted};
pub use share::{
    GroupCommunity, GroupResource, Mutation, Relation, UserCommunity, UserGroup, UserResource,
};
