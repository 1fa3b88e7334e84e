//! Principal & resource registry: users, groups, communities and
//! resources together with their privilege-gating flags.

use std::collections::BTreeMap;

use hs_access_core::error::AppError;
use hs_access_core::result::AppResult;
use hs_access_core::types::{CommunityId, GroupId, ResourceId, UserId};
use hs_access_entity::community::Community;
use hs_access_entity::group::Group;
use hs_access_entity::resource::Resource;
use hs_access_entity::user::User;

/// In-memory registry of every entity known to the engine.
///
/// Lookups of unknown ids fail with a usage error: callers are expected to
/// pass only ids they obtained from this registry.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    users: BTreeMap<UserId, User>,
    groups: BTreeMap<GroupId, Group>,
    communities: BTreeMap<CommunityId, Community>,
    resources: BTreeMap<ResourceId, Resource>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a user.
    pub fn insert_user(&mut self, user: User) -> AppResult<()> {
        if self.users.values().any(|u| u.username == user.username) {
            return Err(AppError::usage(format!(
                "Username '{}' is already registered",
                user.username
            )));
        }
        self.users.insert(user.id, user);
        Ok(())
    }

    /// Insert a group.
    pub fn insert_group(&mut self, group: Group) {
        self.groups.insert(group.id, group);
    }

    /// Insert a community.
    pub fn insert_community(&mut self, community: Community) {
        self.communities.insert(community.id, community);
    }

    /// Insert a resource.
    pub fn insert_resource(&mut self, resource: Resource) {
        self.resources.insert(resource.id, resource);
    }

    /// Look up a user.
    pub fn user(&self, id: UserId) -> AppResult<&User> {
        self.users
            .get(&id)
            .ok_or_else(|| AppError::usage(format!("Unknown user {id}")))
    }

    /// Look up a user for modification.
    pub fn user_mut(&mut self, id: UserId) -> AppResult<&mut User> {
        self.users
            .get_mut(&id)
            .ok_or_else(|| AppError::usage(format!("Unknown user {id}")))
    }

    /// Look up a user by username.
    pub fn user_by_name(&self, username: &str) -> Option<&User> {
        self.users.values().find(|u| u.username == username)
    }

    /// Look up a group.
    pub fn group(&self, id: GroupId) -> AppResult<&Group> {
        self.groups
            .get(&id)
            .ok_or_else(|| AppError::usage(format!("Unknown group {id}")))
    }

    /// Look up a group for modification.
    pub fn group_mut(&mut self, id: GroupId) -> AppResult<&mut Group> {
        self.groups
            .get_mut(&id)
            .ok_or_else(|| AppError::usage(format!("Unknown group {id}")))
    }

    /// Look up a community.
    pub fn community(&self, id: CommunityId) -> AppResult<&Community> {
        self.communities
            .get(&id)
            .ok_or_else(|| AppError::usage(format!("Unknown community {id}")))
    }

    /// Look up a resource.
    pub fn resource(&self, id: ResourceId) -> AppResult<&Resource> {
        self.resources
            .get(&id)
            .ok_or_else(|| AppError::usage(format!("Unknown resource {id}")))
    }

    /// Look up a resource for modification.
    pub fn resource_mut(&mut self, id: ResourceId) -> AppResult<&mut Resource> {
        self.resources
            .get_mut(&id)
            .ok_or_else(|| AppError::usage(format!("Unknown resource {id}")))
    }

    /// Remove a group.
    pub fn remove_group(&mut self, id: GroupId) -> AppResult<Group> {
        self.groups
            .remove(&id)
            .ok_or_else(|| AppError::usage(format!("Unknown group {id}")))
    }

    /// Remove a community.
    pub fn remove_community(&mut self, id: CommunityId) -> AppResult<Community> {
        self.communities
            .remove(&id)
            .ok_or_else(|| AppError::usage(format!("Unknown community {id}")))
    }

    /// Remove a resource.
    pub fn remove_resource(&mut self, id: ResourceId) -> AppResult<Resource> {
        self.resources
            .remove(&id)
            .ok_or_else(|| AppError::usage(format!("Unknown resource {id}")))
    }

    /// All users.
    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    /// All groups.
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    /// All communities.
    pub fn communities(&self) -> impl Iterator<Item = &Community> {
        self.communities.values()
    }

    /// All resources.
    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.resources.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hs_access_entity::user::CreateUser;

    #[test]
    fn test_unknown_ids_are_usage_errors() {
        let registry = Registry::new();
        assert!(registry.user(UserId::new()).unwrap_err().is_usage());
        assert!(registry.group(GroupId::new()).unwrap_err().is_usage());
        assert!(registry.resource(ResourceId::new()).unwrap_err().is_usage());
        assert!(registry.community(CommunityId::new()).unwrap_err().is_usage());
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let mut registry = Registry::new();
        registry
            .insert_user(CreateUser::new("cat").into_user())
            .expect("first");
        let err = registry
            .insert_user(CreateUser::new("cat").into_user())
            .unwrap_err();
        assert!(err.is_usage());
        assert!(registry.user_by_name("cat").is_some());
    }
}
