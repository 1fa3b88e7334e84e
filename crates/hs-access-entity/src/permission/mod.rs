//! Permission query types and the materialized permission row.

pub mod action;
pub mod model;

pub use action::{Action, PrincipalRef, TargetRef};
pub use model::MaterializedPermission;
