//! # hs-access-entity
//!
//! Domain entity models for the access-control engine. Every struct in
//! this crate represents a stored row or a domain value object, and all
//! derive `Debug`, `Clone`, `Serialize` and `Deserialize`.

pub mod community;
pub mod grant;
pub mod group;
pub mod permission;
pub mod resource;
pub mod user;

pub use hs_access_core::types::PrivilegeCode;
