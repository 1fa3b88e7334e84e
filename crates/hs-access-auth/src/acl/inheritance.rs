//! Group-derived resource privilege.
//!
//! A user's grant-derived privilege over a resource is the strongest of
//! their direct grant and the grants of every *active* group they belong
//! to. Flags such as `public` or `immutable` are not applied here; they
//! are read-time adjustments made by the resolver.

use hs_access_core::types::{GroupId, PrivilegeCode, ResourceId, UserId};
use hs_access_store::AccessState;

/// Whether a group currently conveys privilege to its members.
pub fn conveys(state: &AccessState, group: GroupId) -> bool {
    state
        .registry
        .group(group)
        .is_ok_and(|group| group.flags.active)
}

/// The privilege `user` receives over `resource` through group membership.
pub fn via_groups(state: &AccessState, user: UserId, resource: ResourceId) -> PrivilegeCode {
    PrivilegeCode::combine_all(
        state
            .groups_of(user)
            .into_iter()
            .filter(|group| conveys(state, *group))
            .map(|group| state.group_resource.privilege(group, resource)),
    )
}

/// The grant-derived privilege of `user` over `resource`, computed from the
/// grant tables alone.
pub fn derived_resource_privilege(
    state: &AccessState,
    user: UserId,
    resource: ResourceId,
) -> PrivilegeCode {
    state
        .user_resource
        .privilege(user, resource)
        .combine(via_groups(state, user, resource))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hs_access_entity::group::CreateGroup;

    #[test]
    fn test_strongest_of_direct_and_groups() {
        let mut state = AccessState::new();
        let user = UserId::new();
        let resource = ResourceId::new();
        let group = CreateGroup::new("hydrologists").into_group();
        let group_id = group.id;
        state.registry.insert_group(group);

        state
            .user_resource
            .upsert(user, resource, user, PrivilegeCode::View);
        state
            .user_group
            .upsert(user, group_id, user, PrivilegeCode::View);
        state
            .group_resource
            .upsert(group_id, resource, user, PrivilegeCode::Change);

        assert_eq!(
            derived_resource_privilege(&state, user, resource),
            PrivilegeCode::Change
        );
    }

    #[test]
    fn test_inactive_group_conveys_nothing() {
        let mut state = AccessState::new();
        let user = UserId::new();
        let resource = ResourceId::new();
        let mut group = CreateGroup::new("dormant").into_group();
        group.flags.active = false;
        let group_id = group.id;
        state.registry.insert_group(group);

        state
            .user_group
            .upsert(user, group_id, user, PrivilegeCode::View);
        state
            .group_resource
            .upsert(group_id, resource, user, PrivilegeCode::Change);

        assert!(!conveys(&state, group_id));
        assert_eq!(
            derived_resource_privilege(&state, user, resource),
            PrivilegeCode::None
        );
    }
}
