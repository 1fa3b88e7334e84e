//! The `AccessControl` facade.

pub mod query;
pub mod service;
pub mod share;

pub use service::AccessControl;
