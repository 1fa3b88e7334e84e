//! Read-only listings.

use hs_access_core::result::AppResult;
use hs_access_core::types::{CommunityId, GroupId, PrivilegeCode, ResourceId, UserId};
use hs_access_entity::group::Group;
use hs_access_entity::resource::Resource;
use hs_access_store::AccessState;

use crate::acl::resolver::granted_resource_privilege;

/// Resources `user` owns through a direct grant. Empty while `user` is
/// inactive.
pub fn get_owned_resources(state: &AccessState, user: UserId) -> AppResult<Vec<Resource>> {
    if !state.registry.user(user)?.active {
        return Ok(Vec::new());
    }
    state
        .user_resource
        .targets(user)
        .into_iter()
        .filter(|resource| state.user_resource.privilege(user, *resource) == PrivilegeCode::Owner)
        .map(|resource| state.registry.resource(resource).cloned())
        .collect()
}

/// Resources over which `user` holds at least `privilege` through grants
/// (directly or via an active group). Public resources are not listed.
pub fn get_held_resources(
    state: &AccessState,
    user: UserId,
    privilege: PrivilegeCode,
) -> AppResult<Vec<Resource>> {
    let user = state.registry.user(user)?;
    if !user.active {
        return Ok(Vec::new());
    }
    let mut held = Vec::new();
    for resource in state.permissions.resources_for(user.id, privilege) {
        let resource = state.registry.resource(resource)?;
        if granted_resource_privilege(state, user, resource).at_least(privilege) {
            held.push(resource.clone());
        }
    }
    Ok(held)
}

/// Resources `user` may currently change.
pub fn get_editable_resources(state: &AccessState, user: UserId) -> AppResult<Vec<Resource>> {
    Ok(get_held_resources(state, user, PrivilegeCode::Change)?
        .into_iter()
        .filter(|resource| !resource.flags.immutable)
        .collect())
}

/// Groups `user` owns. Empty while `user` is inactive.
pub fn get_owned_groups(state: &AccessState, user: UserId) -> AppResult<Vec<Group>> {
    if !state.registry.user(user)?.active {
        return Ok(Vec::new());
    }
    state
        .user_group
        .targets(user)
        .into_iter()
        .filter(|group| state.user_group.privilege(user, *group) == PrivilegeCode::Owner)
        .map(|group| state.registry.group(group).cloned())
        .collect()
}

/// Groups `user` is a member of.
pub fn get_held_groups(state: &AccessState, user: UserId) -> AppResult<Vec<Group>> {
    state.registry.user(user)?;
    state
        .groups_of(user)
        .into_iter()
        .map(|group| state.registry.group(group).cloned())
        .collect()
}

/// Active groups that are discoverable or public.
pub fn get_discoverable_groups(state: &AccessState) -> Vec<Group> {
    state
        .registry
        .groups()
        .filter(|group| group.is_discoverable())
        .cloned()
        .collect()
}

/// Active public groups.
pub fn get_public_groups(state: &AccessState) -> Vec<Group> {
    state
        .registry
        .groups()
        .filter(|group| group.is_public())
        .cloned()
        .collect()
}

/// Owners of `resource`.
pub fn get_resource_owners(state: &AccessState, resource: ResourceId) -> AppResult<Vec<UserId>> {
    state.registry.resource(resource)?;
    Ok(state.user_resource.owners(resource).into_iter().collect())
}

/// Members of `group`.
pub fn get_group_members(state: &AccessState, group: GroupId) -> AppResult<Vec<UserId>> {
    state.registry.group(group)?;
    Ok(state.members(group))
}

/// Owners of `group`.
pub fn get_group_owners(state: &AccessState, group: GroupId) -> AppResult<Vec<UserId>> {
    state.registry.group(group)?;
    Ok(state.user_group.owners(group).into_iter().collect())
}

/// Owners of `community`.
pub fn get_community_owners(
    state: &AccessState,
    community: CommunityId,
) -> AppResult<Vec<UserId>> {
    state.registry.community(community)?;
    Ok(state.user_community.owners(community).into_iter().collect())
}

/// Groups belonging to `community`.
pub fn get_community_groups(
    state: &AccessState,
    community: CommunityId,
) -> AppResult<Vec<GroupId>> {
    state.registry.community(community)?;
    Ok(state.group_community.grantees(community).into_iter().collect())
}
