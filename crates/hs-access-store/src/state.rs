//! The complete access-control state guarded by one store lock.

use hs_access_core::types::{CommunityId, GroupId, PrivilegeCode, ResourceId, UserId};

use crate::repositories::{GrantTable, PermissionTable, Registry};

/// Every table of the engine.
///
/// The five grant tables are the source of truth; `permissions` is derived
/// from them by the projector and must be kept in step inside the same
/// transaction.
#[derive(Debug, Clone, Default)]
pub struct AccessState {
    /// Users, groups, communities and resources.
    pub registry: Registry,
    /// User → resource grants.
    pub user_resource: GrantTable<UserId, ResourceId>,
    /// User → group grants (group membership).
    pub user_group: GrantTable<UserId, GroupId>,
    /// Group → resource grants.
    pub group_resource: GrantTable<GroupId, ResourceId>,
    /// User → community grants.
    pub user_community: GrantTable<UserId, CommunityId>,
    /// Group → community grants (community membership).
    pub group_community: GrantTable<GroupId, CommunityId>,
    /// Materialized user → resource privileges.
    pub permissions: PermissionTable,
}

impl AccessState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `user` is a member of `group` (holds any privilege over it).
    pub fn is_member(&self, user: UserId, group: GroupId) -> bool {
        self.user_group.privilege(user, group).is_some()
    }

    /// Members of `group`.
    pub fn members(&self, group: GroupId) -> Vec<UserId> {
        self.user_group.grantees(group).into_iter().collect()
    }

    /// Groups `user` belongs to.
    pub fn groups_of(&self, user: UserId) -> Vec<GroupId> {
        self.user_group.targets(user).into_iter().collect()
    }

    /// Resources over which `group` holds a grant.
    pub fn resources_of_group(&self, group: GroupId) -> Vec<ResourceId> {
        self.group_resource.targets(group).into_iter().collect()
    }

    /// The direct privilege of a user over a resource.
    pub fn direct_resource_privilege(&self, user: UserId, resource: ResourceId) -> PrivilegeCode {
        self.user_resource.privilege(user, resource)
    }
}
