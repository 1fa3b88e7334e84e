//! Entity lifecycle: registration, bootstrap ownership, flag updates and
//! cascade deletion.
//!
//! Creating a resource, group or community always writes its first `OWNER`
//! grant in the same call, so no target is ever observable without an
//! owner.

use tracing::warn;

use hs_access_core::events::GrantEvent;
use hs_access_core::result::AppResult;
use hs_access_core::types::{
    CommunityId, EntityKind, GroupId, PrivilegeCode, ResourceId, UserId,
};
use hs_access_entity::community::{Community, CreateCommunity};
use hs_access_entity::group::{CreateGroup, Group, GroupFlagsUpdate};
use hs_access_entity::resource::{CreateResource, Resource, ResourceFlagsUpdate};
use hs_access_entity::user::{CreateUser, User};
use hs_access_store::AccessState;

use crate::acl::checker::require_active;
use crate::acl::{
    can_change_group_flags, can_change_resource_flags, can_delete_community, can_delete_group,
    can_delete_resource,
};
use crate::messages::{self, denied};
use crate::projector;
use crate::share::Mutation;
use crate::share::relation::{Relation, UserCommunity, UserGroup, UserResource};

/// Register a new user account.
pub fn register_user(state: &mut AccessState, input: CreateUser) -> AppResult<User> {
    let user = input.into_user();
    state.registry.insert_user(user.clone())?;
    Ok(user)
}

/// Activate or deactivate a user. Inactive users hold no privilege; their
/// grants are kept and apply again on reactivation.
pub fn set_user_active(state: &mut AccessState, user: UserId, active: bool) -> AppResult<User> {
    let user = state.registry.user_mut(user)?;
    user.active = active;
    Ok(user.clone())
}

/// Grant or revoke administrator status.
pub fn set_user_admin(state: &mut AccessState, user: UserId, admin: bool) -> AppResult<User> {
    let user = state.registry.user_mut(user)?;
    user.admin = admin;
    Ok(user.clone())
}

/// Write the bootstrap `OWNER` grant of a freshly created target.
fn bootstrap_owner<R: Relation<Grantee = UserId>>(
    state: &mut AccessState,
    owner: UserId,
    target: R::Target,
) -> Mutation {
    R::table_mut(state).upsert(owner, target, owner, PrivilegeCode::Owner);
    let affected = R::affected(state, target, owner);
    Mutation {
        previous: PrivilegeCode::None,
        grants: vec![GrantEvent::Shared {
            relation: R::KIND,
            grantee: owner.into(),
            target: target.into(),
            grantor: owner,
            privilege: PrivilegeCode::Owner,
        }],
        permissions: projector::project(state, affected),
    }
}

/// Create a resource owned by `owner`.
pub fn create_resource(
    state: &mut AccessState,
    owner: UserId,
    input: CreateResource,
) -> AppResult<(Resource, Mutation)> {
    require_active(state.registry.user(owner)?)?;
    let resource = input.into_resource();
    state.registry.insert_resource(resource.clone());
    let mutation = bootstrap_owner::<UserResource>(state, owner, resource.id);
    Ok((resource, mutation))
}

/// Create a group owned by `owner`.
pub fn create_group(
    state: &mut AccessState,
    owner: UserId,
    input: CreateGroup,
) -> AppResult<(Group, Mutation)> {
    require_active(state.registry.user(owner)?)?;
    let group = input.into_group();
    state.registry.insert_group(group.clone());
    let mutation = bootstrap_owner::<UserGroup>(state, owner, group.id);
    Ok((group, mutation))
}

/// Create a community owned by `owner`.
pub fn create_community(
    state: &mut AccessState,
    owner: UserId,
    input: CreateCommunity,
) -> AppResult<(Community, Mutation)> {
    require_active(state.registry.user(owner)?)?;
    let community = input.into_community();
    state.registry.insert_community(community.clone());
    let mutation = bootstrap_owner::<UserCommunity>(state, owner, community.id);
    Ok((community, mutation))
}

/// Change resource flags. Requires ownership or admin.
///
/// Materialized rows hold grant-derived privilege only, so flag changes
/// never require projection.
pub fn update_resource_flags(
    state: &mut AccessState,
    requester: UserId,
    resource: ResourceId,
    update: &ResourceFlagsUpdate,
) -> AppResult<Resource> {
    require_active(state.registry.user(requester)?)?;
    if !can_change_resource_flags(state, requester, resource)? {
        return Err(denied(messages::cannot_change_flags(EntityKind::Resource)));
    }
    let resource = state.registry.resource_mut(resource)?;
    resource.flags = resource.flags.apply(update);
    Ok(resource.clone())
}

/// Change group flags. Requires ownership or admin. Toggling `active`
/// changes what the group conveys to its members, so its pairs are
/// re-projected.
pub fn update_group_flags(
    state: &mut AccessState,
    requester: UserId,
    group: GroupId,
    update: &GroupFlagsUpdate,
) -> AppResult<(Group, Mutation)> {
    require_active(state.registry.user(requester)?)?;
    if !can_change_group_flags(state, requester, group)? {
        return Err(denied(messages::cannot_change_flags(EntityKind::Group)));
    }
    let entry = state.registry.group_mut(group)?;
    let was_active = entry.flags.active;
    entry.flags = entry.flags.apply(update);
    let updated = entry.clone();

    let mutation = if was_active != updated.flags.active {
        let pairs = projector::group_pairs(state, group);
        Mutation::from_permissions(projector::project(state, pairs))
    } else {
        Mutation::default()
    };
    Ok((updated, mutation))
}

/// Cascade after a resource was deleted by its owning system: drop every
/// grant over it and every materialized row.
pub fn on_resource_deleted(state: &mut AccessState, resource: ResourceId) -> AppResult<Mutation> {
    state.registry.remove_resource(resource)?;
    let users = state.user_resource.purge_target(resource).len();
    let groups = state.group_resource.purge_target(resource).len();
    warn!(resource = %resource, users, groups, "Purged grants of deleted resource");
    Ok(Mutation::from_permissions(projector::purge_resource(
        state, resource,
    )))
}

/// Cascade after a group was deleted: drop memberships and the group's
/// own grants, then re-project what its members lose.
pub fn on_group_deleted(state: &mut AccessState, group: GroupId) -> AppResult<Mutation> {
    state.registry.group(group)?;
    let pairs = projector::group_pairs(state, group);
    let members = state.user_group.purge_target(group).len();
    let resources = state.group_resource.purge_grantee(group).len();
    let communities = state.group_community.purge_grantee(group).len();
    state.registry.remove_group(group)?;
    warn!(
        group = %group,
        members,
        resources,
        communities,
        "Purged grants of deleted group"
    );
    Ok(Mutation::from_permissions(projector::project(state, pairs)))
}

/// Cascade after a community was deleted.
pub fn on_community_deleted(
    state: &mut AccessState,
    community: CommunityId,
) -> AppResult<Mutation> {
    state.registry.remove_community(community)?;
    let users = state.user_community.purge_target(community).len();
    let groups = state.group_community.purge_target(community).len();
    warn!(community = %community, users, groups, "Purged grants of deleted community");
    Ok(Mutation::default())
}

/// Delete a resource on behalf of `requester` (owner or admin).
pub fn delete_resource(
    state: &mut AccessState,
    requester: UserId,
    resource: ResourceId,
) -> AppResult<Mutation> {
    require_active(state.registry.user(requester)?)?;
    if !can_delete_resource(state, requester, resource)? {
        return Err(denied(format!("Insufficient privilege to delete {}", EntityKind::Resource)));
    }
    on_resource_deleted(state, resource)
}

/// Delete a group on behalf of `requester` (owner or admin).
pub fn delete_group(
    state: &mut AccessState,
    requester: UserId,
    group: GroupId,
) -> AppResult<Mutation> {
    require_active(state.registry.user(requester)?)?;
    if !can_delete_group(state, requester, group)? {
        return Err(denied(format!("Insufficient privilege to delete {}", EntityKind::Group)));
    }
    on_group_deleted(state, group)
}

/// Delete a community on behalf of `requester` (owner or admin).
pub fn delete_community(
    state: &mut AccessState,
    requester: UserId,
    community: CommunityId,
) -> AppResult<Mutation> {
    require_active(state.registry.user(requester)?)?;
    if !can_delete_community(state, requester, community)? {
        return Err(denied(format!(
            "Insufficient privilege to delete {}",
            EntityKind::Community
        )));
    }
    on_community_deleted(state, community)
}
