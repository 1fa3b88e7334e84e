//! # hs-access-core
//!
//! Core crate for the HydroShare access-control engine. Contains the
//! privilege lattice, typed identifiers, configuration schemas, domain
//! events, the notifier trait, and the unified error system.
//!
//! This crate has **no** internal dependencies on other workspace crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
pub use types::{CommunityId, EntityId, EntityKind, GroupId, PrivilegeCode, ResourceId, UserId};
