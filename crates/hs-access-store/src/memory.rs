//! In-memory transactional store using a Tokio read/write lock.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::trace;

use crate::state::AccessState;

/// In-memory access-control store.
///
/// Every mutation runs inside a [`Transaction`], which holds the write
/// lock for its whole lifetime, so conflicting writers serialize and
/// readers never observe a grant table and the materialized table out of
/// step. Read-only queries take a shared [`Snapshot`].
#[derive(Debug, Clone, Default)]
pub struct MemoryAccessStore {
    /// Protected state.
    state: Arc<RwLock<AccessState>>,
}

impl MemoryAccessStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a shared, read-only view of the state.
    pub async fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            guard: self.state.read().await,
        }
    }

    /// Begin an exclusive transaction.
    ///
    /// The engine validates every precondition before its first write, so
    /// dropping a transaction after a failed check leaves the state
    /// untouched.
    pub async fn transaction(&self) -> Transaction<'_> {
        let guard = self.state.write().await;
        trace!("Access transaction started");
        Transaction {
            guard,
            started: Instant::now(),
        }
    }
}

/// Shared read guard over the state.
#[derive(Debug)]
pub struct Snapshot<'a> {
    guard: RwLockReadGuard<'a, AccessState>,
}

impl Deref for Snapshot<'_> {
    type Target = AccessState;

    fn deref(&self) -> &AccessState {
        &self.guard
    }
}

/// Exclusive write guard over the state.
#[derive(Debug)]
pub struct Transaction<'a> {
    guard: RwLockWriteGuard<'a, AccessState>,
    started: Instant,
}

impl Transaction<'_> {
    /// Release the lock.
    pub fn commit(self) {
        trace!(elapsed_us = self.started.elapsed().as_micros() as u64, "Access transaction committed");
    }
}

impl Deref for Transaction<'_> {
    type Target = AccessState;

    fn deref(&self) -> &AccessState {
        &self.guard
    }
}

impl DerefMut for Transaction<'_> {
    fn deref_mut(&mut self) -> &mut AccessState {
        &mut self.guard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hs_access_core::types::{PrivilegeCode, ResourceId, UserId};

    #[tokio::test]
    async fn test_transaction_writes_are_visible_to_snapshots() {
        let store = MemoryAccessStore::new();
        let user = UserId::new();
        let resource = ResourceId::new();

        {
            let mut tx = store.transaction().await;
            tx.user_resource
                .upsert(user, resource, user, PrivilegeCode::Owner);
            tx.commit();
        }

        let snapshot = store.snapshot().await;
        assert_eq!(
            snapshot.direct_resource_privilege(user, resource),
            PrivilegeCode::Owner
        );
    }

    #[tokio::test]
    async fn test_concurrent_snapshots() {
        let store = MemoryAccessStore::new();
        let first = store.snapshot().await;
        let second = store.snapshot().await;
        assert!(first.user_resource.is_empty());
        assert!(second.permissions.is_empty());
    }
}
