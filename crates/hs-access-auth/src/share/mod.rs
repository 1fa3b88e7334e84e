//! Sharing: the five grant relations and the generic share, unshare and
//! undo template that runs over all of them.

pub mod mutation;
pub mod predicates;
pub mod relation;
pub mod template;

pub use mutation::Mutation;
pub use predicates::*;
pub use relation::{GroupCommunity, GroupResource, Relation, UserCommunity, UserGroup, UserResource};
pub use template::{
    can_share, can_undo, can_unshare, check_share, check_undo, check_unshare, share,
    undo_candidates, undo_share, unshare, unshare_candidates,
};
