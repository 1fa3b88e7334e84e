//! # hs-access-store
//!
//! The grant store, the principal & resource registry, the materialized
//! permission table, and the transactional in-memory store that guards
//! them. Repositories here are plain persistence: they never enforce
//! access-control invariants.

pub mod memory;
pub mod repositories;
pub mod state;

pub use memory::{MemoryAccessStore, Snapshot, Transaction};
pub use repositories::{GrantTable, PermissionTable, Registry};
pub use state::AccessState;
