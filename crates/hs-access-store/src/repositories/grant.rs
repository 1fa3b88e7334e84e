//! Grant repository: the persisted ternary relation
//! (grantee, target, grantor) → privilege.
//!
//! This is a dumb persistence layer. It never enforces invariants such as
//! last-owner protection; the engine checks those before writing. The
//! owner-count simulations exist so the engine can ask "what would happen"
//! without mutating anything.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;

use hs_access_core::types::{EntityId, PrivilegeCode, UserId};
use hs_access_entity::grant::{Grant, GrantFilter};

/// Primary key of a grant row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct GrantKey<G, T> {
    target: T,
    grantee: G,
    grantor: UserId,
}

/// Table of grants for one (grantee kind, target kind) pair.
#[derive(Debug, Clone)]
pub struct GrantTable<G, T> {
    rows: BTreeMap<GrantKey<G, T>, Grant<G, T>>,
}

impl<G: EntityId, T: EntityId> Default for GrantTable<G, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: EntityId, T: EntityId> GrantTable<G, T> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }

    /// Insert or update the row for (grantee, target, grantor).
    ///
    /// Returns the previous privilege of that row (`None` if absent).
    /// Writing `PrivilegeCode::None` removes the row, since a `None` grant
    /// is the same as no grant.
    pub fn upsert(
        &mut self,
        grantee: G,
        target: T,
        grantor: UserId,
        privilege: PrivilegeCode,
    ) -> PrivilegeCode {
        if privilege == PrivilegeCode::None {
            return self
                .delete(grantee, target, grantor)
                .map(|row| row.privilege)
                .unwrap_or(PrivilegeCode::None);
        }

        let key = GrantKey {
            target,
            grantee,
            grantor,
        };
        match self.rows.get_mut(&key) {
            Some(row) => {
                let previous = row.privilege;
                row.privilege = privilege;
                row.updated_at = Utc::now();
                previous
            }
            None => {
                self.rows
                    .insert(key, Grant::new(grantee, target, grantor, privilege));
                PrivilegeCode::None
            }
        }
    }

    /// Remove the row for (grantee, target, grantor) if present.
    pub fn delete(&mut self, grantee: G, target: T, grantor: UserId) -> Option<Grant<G, T>> {
        self.rows.remove(&GrantKey {
            target,
            grantee,
            grantor,
        })
    }

    /// Remove every row of `grantee` over `target`, whoever granted it.
    pub fn delete_all_for_grantee_target(&mut self, grantee: G, target: T) -> Vec<Grant<G, T>> {
        self.remove_where(|key| key.grantee == grantee && key.target == target)
    }

    /// Remove every row over `target`. Used when the target is deleted.
    pub fn purge_target(&mut self, target: T) -> Vec<Grant<G, T>> {
        self.remove_where(|key| key.target == target)
    }

    /// Remove every row held by `grantee`. Used when the grantee is deleted.
    pub fn purge_grantee(&mut self, grantee: G) -> Vec<Grant<G, T>> {
        self.remove_where(|key| key.grantee == grantee)
    }

    /// Weaken every row of `grantee` over `target` to at most `ceiling`,
    /// whoever granted it. Returns the number of rows changed.
    pub fn cap(&mut self, grantee: G, target: T, ceiling: PrivilegeCode) -> usize {
        let mut changed = 0;
        for row in self
            .rows
            .values_mut()
            .filter(|row| row.grantee == grantee && row.target == target)
        {
            let capped = row.privilege.weaken_to(ceiling);
            if capped != row.privilege {
                row.privilege = capped;
                row.updated_at = Utc::now();
                changed += 1;
            }
        }
        changed
    }

    fn remove_where<F>(&mut self, predicate: F) -> Vec<Grant<G, T>>
    where
        F: Fn(&GrantKey<G, T>) -> bool,
    {
        let keys: Vec<GrantKey<G, T>> = self
            .rows
            .keys()
            .filter(|key| predicate(key))
            .copied()
            .collect();
        keys.into_iter()
            .filter_map(|key| self.rows.remove(&key))
            .collect()
    }

    /// Look up one row.
    pub fn get(&self, grantee: G, target: T, grantor: UserId) -> Option<&Grant<G, T>> {
        self.rows.get(&GrantKey {
            target,
            grantee,
            grantor,
        })
    }

    /// Filterable read.
    pub fn query(&self, filter: &GrantFilter<G, T>) -> Vec<&Grant<G, T>> {
        self.rows.values().filter(|row| row.matches(filter)).collect()
    }

    /// All rows of `grantee` over `target`, one per grantor.
    pub fn rows_for(&self, grantee: G, target: T) -> impl Iterator<Item = &Grant<G, T>> {
        self.rows
            .values()
            .filter(move |row| row.grantee == grantee && row.target == target)
    }

    /// The combined privilege of `grantee` over `target` across grantors.
    pub fn privilege(&self, grantee: G, target: T) -> PrivilegeCode {
        PrivilegeCode::combine_all(self.rows_for(grantee, target).map(|row| row.privilege))
    }

    /// Distinct grantees holding any privilege over `target`.
    pub fn grantees(&self, target: T) -> BTreeSet<G> {
        self.rows
            .values()
            .filter(|row| row.target == target)
            .map(|row| row.grantee)
            .collect()
    }

    /// Distinct targets `grantee` holds any privilege over.
    pub fn targets(&self, grantee: G) -> BTreeSet<T> {
        self.rows
            .values()
            .filter(|row| row.grantee == grantee)
            .map(|row| row.target)
            .collect()
    }

    /// Distinct grantees holding `Owner` over `target`.
    pub fn owners(&self, target: T) -> BTreeSet<G> {
        self.rows
            .values()
            .filter(|row| row.target == target && row.is_owner())
            .map(|row| row.grantee)
            .collect()
    }

    /// Number of distinct owners of `target`.
    pub fn count_owners(&self, target: T) -> usize {
        self.owners(target).len()
    }

    /// Number of distinct owners of `target` if the row for
    /// (grantee, target, grantor) were written with `privilege`.
    pub fn owners_after_upsert(
        &self,
        grantee: G,
        target: T,
        grantor: UserId,
        privilege: PrivilegeCode,
    ) -> usize {
        let mut owners: BTreeSet<G> = self
            .rows
            .values()
            .filter(|row| row.target == target && row.is_owner())
            .filter(|row| !(row.grantee == grantee && row.grantor == grantor))
            .map(|row| row.grantee)
            .collect();
        if privilege == PrivilegeCode::Owner {
            owners.insert(grantee);
        }
        owners.len()
    }

    /// Number of distinct owners of `target` if the rows of `grantee` made
    /// by `grantor` were removed. `grantor = None` removes every grantor's row.
    pub fn owners_after_delete(&self, grantee: G, target: T, grantor: Option<UserId>) -> usize {
        self.rows
            .values()
            .filter(|row| row.target == target && row.is_owner())
            .filter(|row| {
                !(row.grantee == grantee && grantor.is_none_or(|by| row.grantor == by))
            })
            .map(|row| row.grantee)
            .collect::<BTreeSet<G>>()
            .len()
    }

    /// Number of distinct owners of `target` if `grantee` ended up holding
    /// exactly `privilege`, as after [`cap`](Self::cap) plus an upsert.
    pub fn owners_after_cap(&self, grantee: G, target: T, privilege: PrivilegeCode) -> usize {
        self.owners_after_delete(grantee, target, None)
            + usize::from(privilege == PrivilegeCode::Owner)
    }

    /// Iterate over all rows.
    pub fn iter(&self) -> impl Iterator<Item = &Grant<G, T>> {
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
    use hs_access_core::types::ResourceId;

    fn table() -> (GrantTable<UserId, ResourceId>, UserId, UserId, ResourceId) {
        let mut table = GrantTable::new();
        let cat = UserId::new();
        let dog = UserId::new();
        let holes = ResourceId::new();
        table.upsert(cat, holes, cat, PrivilegeCode::Owner);
        (table, cat, dog, holes)
    }

    #[test]
    fn test_upsert_updates_in_place() {
        let (mut table, cat, dog, holes) = table();
        assert_eq!(
            table.upsert(dog, holes, cat, PrivilegeCode::Change),
            PrivilegeCode::None
        );
        assert_eq!(
            table.upsert(dog, holes, cat, PrivilegeCode::Change),
            PrivilegeCode::Change
        );
        assert_eq!(table.rows_for(dog, holes).count(), 1);

        table.upsert(dog, holes, cat, PrivilegeCode::View);
        assert_eq!(table.privilege(dog, holes), PrivilegeCode::View);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_upsert_none_removes_row() {
        let (mut table, cat, dog, holes) = table();
        table.upsert(dog, holes, cat, PrivilegeCode::View);
        table.upsert(dog, holes, cat, PrivilegeCode::None);
        assert!(table.get(dog, holes, cat).is_none());
        assert_eq!(table.privilege(dog, holes), PrivilegeCode::None);
    }

    #[test]
    fn test_privilege_combines_grantors() {
        let (mut table, cat, dog, holes) = table();
        let bird = UserId::new();
        table.upsert(dog, holes, cat, PrivilegeCode::View);
        table.upsert(dog, holes, bird, PrivilegeCode::Change);
        assert_eq!(table.privilege(dog, holes), PrivilegeCode::Change);

        table.delete(dog, holes, bird);
        assert_eq!(table.privilege(dog, holes), PrivilegeCode::View);
    }

    #[test]
    fn test_cap_weakens_every_grantor() {
        let (mut table, cat, dog, holes) = table();
        let bird = UserId::new();
        table.upsert(dog, holes, cat, PrivilegeCode::Owner);
        table.upsert(dog, holes, bird, PrivilegeCode::View);

        assert_eq!(table.owners_after_cap(dog, holes, PrivilegeCode::View), 1);
        assert_eq!(table.cap(dog, holes, PrivilegeCode::View), 1);
        assert_eq!(table.privilege(dog, holes), PrivilegeCode::View);
        assert_eq!(table.rows_for(dog, holes).count(), 2);
        assert_eq!(table.cap(dog, holes, PrivilegeCode::Owner), 0);
        assert_eq!(table.privilege(cat, holes), PrivilegeCode::Owner);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (mut table, cat, dog, holes) = table();
        assert!(table.delete(dog, holes, cat).is_none());
        assert!(table.delete(dog, holes, cat).is_none());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_delete_all_ignores_grantor() {
        let (mut table, cat, dog, holes) = table();
        table.upsert(dog, holes, cat, PrivilegeCode::View);
        table.upsert(dog, holes, dog, PrivilegeCode::View);
        assert_eq!(table.delete_all_for_grantee_target(dog, holes).len(), 2);
        assert!(table.grantees(holes).contains(&cat));
        assert!(!table.grantees(holes).contains(&dog));
    }

    #[test]
    fn test_owner_simulations() {
        let (mut table, cat, dog, holes) = table();
        assert_eq!(table.count_owners(holes), 1);
        assert_eq!(
            table.owners_after_upsert(cat, holes, cat, PrivilegeCode::View),
            0
        );
        assert_eq!(table.owners_after_delete(cat, holes, None), 0);

        // A second owner row for the same grantee keeps cat an owner.
        table.upsert(cat, holes, dog, PrivilegeCode::Owner);
        assert_eq!(table.count_owners(holes), 1);
        assert_eq!(table.owners_after_delete(cat, holes, Some(cat)), 1);
        assert_eq!(table.owners_after_delete(cat, holes, None), 0);

        table.upsert(dog, holes, cat, PrivilegeCode::Owner);
        assert_eq!(table.count_owners(holes), 2);
        assert_eq!(table.owners_after_delete(cat, holes, None), 1);
    }

    #[test]
    fn test_query_filters() {
        let (mut table, cat, dog, holes) = table();
        let other = ResourceId::new();
        table.upsert(dog, holes, cat, PrivilegeCode::View);
        table.upsert(dog, other, dog, PrivilegeCode::Owner);

        assert_eq!(table.query(&GrantFilter::target(holes)).len(), 2);
        assert_eq!(table.query(&GrantFilter::grantee(dog)).len(), 2);
        assert_eq!(
            table
                .query(&GrantFilter::grantee(dog).with_privilege_lte(PrivilegeCode::Change))
                .len(),
            1
        );
        assert_eq!(
            table
                .query(&GrantFilter::default().with_grantor(cat))
                .len(),
            2
        );
        assert_eq!(table.targets(dog).len(), 2);
    }

    #[test]
    fn test_purges() {
        let (mut table, cat, dog, holes) = table();
        let other = ResourceId::new();
        table.upsert(dog, other, cat, PrivilegeCode::View);
        assert_eq!(table.purge_target(holes).len(), 1);
        assert_eq!(table.purge_grantee(dog).len(), 1);
        assert!(table.is_empty());
    }
}
