//! Repository implementations for all access-control tables.

pub mod grant;
pub mod permission;
pub mod registry;

pub use grant::GrantTable;
pub use permission::PermissionTable;
pub use registry::Registry;
