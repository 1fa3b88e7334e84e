//! Materialized permission repository: (user, resource) → best derived
//! privilege, for fast lookup.

use std::collections::BTreeMap;

use chrono::Utc;

use hs_access_core::types::{PrivilegeCode, ResourceId, UserId};
use hs_access_entity::permission::MaterializedPermission;

/// Denormalized user→resource privilege table.
///
/// Rows are written only by the projector. A missing row means `None`.
#[derive(Debug, Clone, Default)]
pub struct PermissionTable {
    rows: BTreeMap<(UserId, ResourceId), MaterializedPermission>,
}

impl PermissionTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored privilege for a pair, `None` if no row exists.
    pub fn get(&self, user: UserId, resource: ResourceId) -> PrivilegeCode {
        self.rows
            .get(&(user, resource))
            .map(|row| row.privilege)
            .unwrap_or(PrivilegeCode::None)
    }

    /// The stored row for a pair.
    pub fn row(&self, user: UserId, resource: ResourceId) -> Option<&MaterializedPermission> {
        self.rows.get(&(user, resource))
    }

    /// Write the privilege for a pair and return the previous value.
    /// Writing `None` removes the row.
    pub fn set(
        &mut self,
        user: UserId,
        resource: ResourceId,
        privilege: PrivilegeCode,
    ) -> PrivilegeCode {
        let previous = self.get(user, resource);
        if privilege == PrivilegeCode::None {
            self.rows.remove(&(user, resource));
        } else {
            self.rows.insert(
                (user, resource),
                MaterializedPermission {
                    user,
                    resource,
                    privilege,
                    updated_at: Utc::now(),
                },
            );
        }
        previous
    }

    /// Remove every row for a resource.
    pub fn purge_resource(&mut self, resource: ResourceId) -> Vec<MaterializedPermission> {
        let keys: Vec<(UserId, ResourceId)> = self
            .rows
            .keys()
            .filter(|(_, r)| *r == resource)
            .copied()
            .collect();
        keys.into_iter()
            .filter_map(|key| self.rows.remove(&key))
            .collect()
    }

    /// Resources on which `user` holds at least `privilege`.
    pub fn resources_for(&self, user: UserId, privilege: PrivilegeCode) -> Vec<ResourceId> {
        self.rows
            .values()
            .filter(|row| row.user == user && row.privilege.at_least(privilege))
            .map(|row| row.resource)
            .collect()
    }

    /// Users holding at least `privilege` over `resource`.
    pub fn users_for(&self, resource: ResourceId, privilege: PrivilegeCode) -> Vec<UserId> {
        self.rows
            .values()
            .filter(|row| row.resource == resource && row.privilege.at_least(privilege))
            .map(|row| row.user)
            .collect()
    }

    /// Iterate over all rows.
    pub fn iter(&self) -> impl Iterator<Item = &MaterializedPermission> {
        self.rows.values()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_returns_previous_and_none_removes() {
        let mut table = PermissionTable::new();
        let user = UserId::new();
        let resource = ResourceId::new();

        assert_eq!(
            table.set(user, resource, PrivilegeCode::Change),
            PrivilegeCode::None
        );
        assert_eq!(
            table.set(user, resource, PrivilegeCode::View),
            PrivilegeCode::Change
        );
        assert_eq!(table.get(user, resource), PrivilegeCode::View);

        table.set(user, resource, PrivilegeCode::None);
        assert!(table.row(user, resource).is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn test_lookups_by_user_and_resource() {
        let mut table = PermissionTable::new();
        let user = UserId::new();
        let owned = ResourceId::new();
        let viewed = ResourceId::new();
        table.set(user, owned, PrivilegeCode::Owner);
        table.set(user, viewed, PrivilegeCode::View);

        assert_eq!(table.resources_for(user, PrivilegeCode::View).len(), 2);
        assert_eq!(table.resources_for(user, PrivilegeCode::Change), vec![owned]);
        assert_eq!(table.users_for(viewed, PrivilegeCode::View), vec![user]);

        assert_eq!(table.purge_resource(owned).len(), 1);
        assert_eq!(table.len(), 1);
    }
}
