//! Materialized permission projector.
//!
//! Keeps `AccessState::permissions` equal to the grant-derived privilege of
//! every (user, resource) pair. Mutations name the pairs they may have
//! affected and the projector recomputes only those, inside the same
//! transaction as the grant write.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use hs_access_core::events::PermissionEvent;
use hs_access_core::types::{GroupId, ResourceId, UserId};
use hs_access_store::AccessState;

use crate::acl::inheritance::derived_resource_privilege;

/// Recompute the given pairs and return one event per row that changed.
pub fn project<I>(state: &mut AccessState, pairs: I) -> Vec<PermissionEvent>
where
    I: IntoIterator<Item = (UserId, ResourceId)>,
{
    let pairs: BTreeSet<(UserId, ResourceId)> = pairs.into_iter().collect();
    let mut events = Vec::new();
    for (user, resource) in pairs {
        let after = derived_resource_privilege(state, user, resource);
        let before = state.permissions.set(user, resource, after);
        if before != after {
            debug!(
                user = %user,
                resource = %resource,
                before = %before,
                after = %after,
                "Materialized permission changed"
            );
            events.push(PermissionEvent::Changed {
                user,
                resource,
                before,
                after,
            });
        }
    }
    events
}

/// Pairs affected by a change to `group` as a whole (its active flag,
/// or its deletion): every member crossed with every resource it holds.
pub fn group_pairs(state: &AccessState, group: GroupId) -> Vec<(UserId, ResourceId)> {
    let resources = state.resources_of_group(group);
    state
        .members(group)
        .into_iter()
        .flat_map(|user| resources.iter().map(move |resource| (user, *resource)))
        .collect()
}

/// Drop every row of a deleted resource.
pub fn purge_resource(state: &mut AccessState, resource: ResourceId) -> Vec<PermissionEvent> {
    let purged = state.permissions.purge_resource(resource);
    if !purged.is_empty() {
        warn!(resource = %resource, rows = purged.len(), "Purged materialized permissions");
    }
    vec![PermissionEvent::ResourcePurged { resource }]
}

/// Every pair that could hold a row: all direct grants, all
/// member×group-resource combinations, and every existing row.
fn all_pairs(state: &AccessState) -> BTreeSet<(UserId, ResourceId)> {
    let mut pairs: BTreeSet<(UserId, ResourceId)> = state
        .user_resource
        .iter()
        .map(|grant| (grant.grantee, grant.target))
        .collect();
    for group in state.registry.groups() {
        pairs.extend(group_pairs(state, group.id));
    }
    pairs.extend(state.permissions.iter().map(|row| (row.user, row.resource)));
    pairs
}

/// Recompute the whole table from the grant tables.
pub fn rebuild(state: &mut AccessState) -> Vec<PermissionEvent> {
    let pairs = all_pairs(state);
    project(state, pairs)
}

/// Pairs whose stored row disagrees with the grant tables.
///
/// Empty when the table is consistent. Used by tests and diagnostics.
pub fn inconsistencies(state: &AccessState) -> Vec<(UserId, ResourceId)> {
    all_pairs(state)
        .into_iter()
        .filter(|(user, resource)| {
            state.permissions.get(*user, *resource)
                != derived_resource_privilege(state, *user, *resource)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hs_access_core::types::PrivilegeCode;
    use hs_access_entity::group::CreateGroup;

    #[test]
    fn test_project_reports_changes_once() {
        let mut state = AccessState::new();
        let user = UserId::new();
        let resource = ResourceId::new();
        state
            .user_resource
            .upsert(user, resource, user, PrivilegeCode::Owner);

        let events = project(&mut state, [(user, resource), (user, resource)]);
        assert_eq!(events.len(), 1);
        assert_eq!(state.permissions.get(user, resource), PrivilegeCode::Owner);

        assert!(project(&mut state, [(user, resource)]).is_empty());
    }

    #[test]
    fn test_rebuild_matches_incremental() {
        let mut state = AccessState::new();
        let group = CreateGroup::new("watershed").into_group();
        let group_id = group.id;
        state.registry.insert_group(group);
        let user = UserId::new();
        let resource = ResourceId::new();

        state
            .user_group
            .upsert(user, group_id, user, PrivilegeCode::View);
        state
            .group_resource
            .upsert(group_id, resource, user, PrivilegeCode::Change);
        // Stale row with no backing grant.
        state
            .permissions
            .set(UserId::new(), resource, PrivilegeCode::Owner);

        assert_eq!(inconsistencies(&state).len(), 2);
        rebuild(&mut state);
        assert!(inconsistencies(&state).is_empty());
        assert_eq!(state.permissions.get(user, resource), PrivilegeCode::Change);
        assert_eq!(state.permissions.len(), 1);
    }
}
