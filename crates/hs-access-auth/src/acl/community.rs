//! Community predicates.
//!
//! Communities carry no shareable flag: only owners may invite.

use hs_access_core::result::AppResult;
use hs_access_core::types::{CommunityId, EntityKind, PrivilegeCode, UserId};
use hs_access_entity::community::Community;
use hs_access_entity::user::User;
use hs_access_store::AccessState;

use super::checker::{permitted, reject_none, require_active, share_ceiling};
use super::inheritance::conveys;
use super::resolver::community_privilege;
use crate::messages::{self, denied};

fn lookup(
    state: &AccessState,
    user: UserId,
    community: CommunityId,
) -> AppResult<(&User, &Community)> {
    Ok((state.registry.user(user)?, state.registry.community(community)?))
}

/// Whether `user` holds a direct `OWNER` grant over `community`.
pub(crate) fn is_owner(state: &AccessState, user: UserId, community: CommunityId) -> bool {
    state.user_community.privilege(user, community) == PrivilegeCode::Owner
}

fn owner_or_admin(state: &AccessState, user: &User, community: &Community) -> bool {
    user.active && (user.admin || is_owner(state, user.id, community.id))
}

/// Whether an active `user` owns `community`.
pub fn owns_community(
    state: &AccessState,
    user: UserId,
    community: CommunityId,
) -> AppResult<bool> {
    let (user, community) = lookup(state, user, community)?;
    Ok(user.active && is_owner(state, user.id, community.id))
}

/// Whether `user` may view `community`. Members of an active group in the
/// community may view it too.
pub fn can_view_community(
    state: &AccessState,
    user: UserId,
    community: CommunityId,
) -> AppResult<bool> {
    let (user, community) = lookup(state, user, community)?;
    if community_privilege(state, user, community).allows(PrivilegeCode::View) {
        return Ok(true);
    }
    Ok(user.active
        && state.groups_of(user.id).into_iter().any(|group| {
            conveys(state, group) && state.group_community.privilege(group, community.id).is_some()
        }))
}

/// Whether `user` may change `community` metadata.
pub fn can_change_community(
    state: &AccessState,
    user: UserId,
    community: CommunityId,
) -> AppResult<bool> {
    let (user, community) = lookup(state, user, community)?;
    if !user.active {
        return Ok(false);
    }
    Ok(user.admin
        || (community.flags.active
            && state
                .user_community
                .privilege(user.id, community.id)
                .at_least(PrivilegeCode::Change)))
}

/// Whether `user` may change the flags of `community`.
pub fn can_change_community_flags(
    state: &AccessState,
    user: UserId,
    community: CommunityId,
) -> AppResult<bool> {
    let (user, community) = lookup(state, user, community)?;
    Ok(owner_or_admin(state, user, community))
}

/// Whether `user` may delete `community`.
pub fn can_delete_community(
    state: &AccessState,
    user: UserId,
    community: CommunityId,
) -> AppResult<bool> {
    let (user, community) = lookup(state, user, community)?;
    Ok(owner_or_admin(state, user, community))
}

/// Whether `user` may share `community` at `privilege`.
pub fn can_share_community(
    state: &AccessState,
    user: UserId,
    community: CommunityId,
    privilege: PrivilegeCode,
) -> AppResult<bool> {
    reject_none(privilege)?;
    let (user, community) = lookup(state, user, community)?;
    permitted(
        require_active(user)
            .and_then(|()| authorize_share(state, user, community, privilege, false)),
    )
}

/// Authorization of a community share, independent of the grantee.
pub(crate) fn authorize_share(
    state: &AccessState,
    requester: &User,
    community: &Community,
    privilege: PrivilegeCode,
    self_downgrade: bool,
) -> AppResult<()> {
    if requester.admin {
        return Ok(());
    }
    if !community.flags.active {
        return Err(denied(messages::target_not_active(EntityKind::Community)));
    }
    share_ceiling(
        state.user_community.privilege(requester.id, community.id),
        privilege,
        self_downgrade,
        || messages::no_privilege(EntityKind::Community),
        || messages::only_owners_share(EntityKind::Community),
    )
}

/// Whether `user` may remove grants over `community` that others made.
pub(crate) fn may_override_grantor(
    state: &AccessState,
    user: &User,
    community: CommunityId,
) -> bool {
    user.admin || is_owner(state, user.id, community)
}
