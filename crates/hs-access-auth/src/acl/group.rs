//! Group predicates.

use hs_access_core::result::AppResult;
use hs_access_core::types::{EntityKind, GroupId, PrivilegeCode, UserId};
use hs_access_entity::group::Group;
use hs_access_entity::user::User;
use hs_access_store::AccessState;

use super::checker::{permitted, reject_none, require_active, share_ceiling};
use super::resolver::group_privilege;
use crate::messages::{self, denied};

fn lookup(state: &AccessState, user: UserId, group: GroupId) -> AppResult<(&User, &Group)> {
    Ok((state.registry.user(user)?, state.registry.group(group)?))
}

/// Whether `user` holds a direct `OWNER` grant over `group`.
pub(crate) fn is_owner(state: &AccessState, user: UserId, group: GroupId) -> bool {
    state.user_group.privilege(user, group) == PrivilegeCode::Owner
}

fn owner_or_admin(state: &AccessState, user: &User, group: &Group) -> bool {
    user.active && (user.admin || is_owner(state, user.id, group.id))
}

/// Whether an active `user` owns `group`.
pub fn owns_group(state: &AccessState, user: UserId, group: GroupId) -> AppResult<bool> {
    let (user, group) = lookup(state, user, group)?;
    Ok(user.active && is_owner(state, user.id, group.id))
}

/// Whether `user` may view `group`: members, administrators, and anyone
/// when the group is public.
pub fn can_view_group(state: &AccessState, user: UserId, group: GroupId) -> AppResult<bool> {
    let (user, group) = lookup(state, user, group)?;
    Ok(group_privilege(state, user, group).allows(PrivilegeCode::View))
}

/// Whether `user` may change `group` metadata.
pub fn can_change_group(state: &AccessState, user: UserId, group: GroupId) -> AppResult<bool> {
    let (user, group) = lookup(state, user, group)?;
    if !user.active {
        return Ok(false);
    }
    Ok(user.admin
        || (group.flags.active
            && state
                .user_group
                .privilege(user.id, group.id)
                .at_least(PrivilegeCode::Change)))
}

/// Whether `user` may change the flags of `group`.
pub fn can_change_group_flags(
    state: &AccessState,
    user: UserId,
    group: GroupId,
) -> AppResult<bool> {
    let (user, group) = lookup(state, user, group)?;
    Ok(owner_or_admin(state, user, group))
}

/// Whether `user` may delete `group`.
pub fn can_delete_group(state: &AccessState, user: UserId, group: GroupId) -> AppResult<bool> {
    let (user, group) = lookup(state, user, group)?;
    Ok(owner_or_admin(state, user, group))
}

/// Whether `user` may invite others into `group` at `privilege`.
pub fn can_share_group(
    state: &AccessState,
    user: UserId,
    group: GroupId,
    privilege: PrivilegeCode,
) -> AppResult<bool> {
    reject_none(privilege)?;
    let (user, group) = lookup(state, user, group)?;
    permitted(require_active(user).and_then(|()| authorize_share(state, user, group, privilege, false)))
}

/// Authorization of a group share, independent of the grantee.
pub(crate) fn authorize_share(
    state: &AccessState,
    requester: &User,
    group: &Group,
    privilege: PrivilegeCode,
    self_downgrade: bool,
) -> AppResult<()> {
    if requester.admin {
        return Ok(());
    }
    if !group.flags.active {
        return Err(denied(messages::target_not_active(EntityKind::Group)));
    }
    share_ceiling(
        state.user_group.privilege(requester.id, group.id),
        privilege,
        self_downgrade || group.flags.shareable,
        || messages::no_privilege(EntityKind::Group),
        || messages::not_shareable(EntityKind::Group),
    )
}

/// Whether `user` may remove grants over `group` that others made.
pub(crate) fn may_override_grantor(state: &AccessState, user: &User, group: GroupId) -> bool {
    user.admin || is_owner(state, user.id, group)
}
