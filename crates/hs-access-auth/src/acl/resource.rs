//! Resource predicates.

use hs_access_core::result::AppResult;
use hs_access_core::types::{EntityKind, PrivilegeCode, ResourceId, UserId};
use hs_access_entity::resource::Resource;
use hs_access_entity::user::User;
use hs_access_store::AccessState;

use super::checker::{permitted, reject_none, require_active, share_ceiling};
use super::resolver::{granted_resource_privilege, resource_privilege};
use crate::messages::{self, denied};

fn lookup(
    state: &AccessState,
    user: UserId,
    resource: ResourceId,
) -> AppResult<(&User, &Resource)> {
    Ok((state.registry.user(user)?, state.registry.resource(resource)?))
}

/// Whether `user` holds a direct `OWNER` grant over `resource`.
pub(crate) fn is_owner(state: &AccessState, user: UserId, resource: ResourceId) -> bool {
    state.user_resource.privilege(user, resource) == PrivilegeCode::Owner
}

fn owner_or_admin(state: &AccessState, user: &User, resource: &Resource) -> bool {
    user.active && (user.admin || is_owner(state, user.id, resource.id))
}

/// Whether an active `user` owns `resource`. Immutability does not
/// affect ownership.
pub fn owns_resource(state: &AccessState, user: UserId, resource: ResourceId) -> AppResult<bool> {
    let (user, resource) = lookup(state, user, resource)?;
    Ok(user.active && is_owner(state, user.id, resource.id))
}

/// Whether `user` may read `resource`.
pub fn can_view_resource(
    state: &AccessState,
    user: UserId,
    resource: ResourceId,
) -> AppResult<bool> {
    let (user, resource) = lookup(state, user, resource)?;
    Ok(resource_privilege(state, user, resource).allows(PrivilegeCode::View))
}

/// Whether `user` may modify `resource`. Nobody may change an immutable
/// resource, administrators included.
pub fn can_change_resource(
    state: &AccessState,
    user: UserId,
    resource: ResourceId,
) -> AppResult<bool> {
    let (user, resource) = lookup(state, user, resource)?;
    Ok(!resource.flags.immutable
        && resource_privilege(state, user, resource).allows(PrivilegeCode::Change))
}

/// Whether `user` may change the flags of `resource`.
pub fn can_change_resource_flags(
    state: &AccessState,
    user: UserId,
    resource: ResourceId,
) -> AppResult<bool> {
    let (user, resource) = lookup(state, user, resource)?;
    Ok(owner_or_admin(state, user, resource))
}

/// Whether `user` may delete `resource`.
pub fn can_delete_resource(
    state: &AccessState,
    user: UserId,
    resource: ResourceId,
) -> AppResult<bool> {
    let (user, resource) = lookup(state, user, resource)?;
    Ok(owner_or_admin(state, user, resource))
}

/// Whether `user` may share `resource` at `privilege` with anyone.
pub fn can_share_resource(
    state: &AccessState,
    user: UserId,
    resource: ResourceId,
    privilege: PrivilegeCode,
) -> AppResult<bool> {
    reject_none(privilege)?;
    let (user, resource) = lookup(state, user, resource)?;
    permitted(
        require_active(user)
            .and_then(|()| authorize_share(state, user, resource, privilege, false)),
    )
}

/// Authorization of a resource share, independent of the grantee.
///
/// `CHANGE` is never granted over an immutable resource, even by an
/// administrator. A self-downgrade skips the shareable check.
pub(crate) fn authorize_share(
    state: &AccessState,
    requester: &User,
    resource: &Resource,
    privilege: PrivilegeCode,
    self_downgrade: bool,
) -> AppResult<()> {
    if resource.flags.immutable && privilege == PrivilegeCode::Change {
        return Err(denied(messages::IMMUTABLE_CHANGE));
    }
    if requester.admin {
        return Ok(());
    }
    share_ceiling(
        granted_resource_privilege(state, requester, resource),
        privilege,
        self_downgrade || resource.flags.shareable,
        || messages::no_privilege(EntityKind::Resource),
        || messages::not_shareable(EntityKind::Resource),
    )
}

/// Whether `user` may remove grants over `resource` that others made.
pub(crate) fn may_override_grantor(state: &AccessState, user: &User, resource: ResourceId) -> bool {
    user.admin || is_owner(state, user.id, resource)
}
