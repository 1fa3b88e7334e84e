//! # hs-access-service
//!
//! External interface of the HydroShare access-control engine. The
//! [`AccessControl`] facade wraps the synchronous engine in store
//! transactions, logs committed mutations, and hands the resulting events
//! to a [`PermissionNotifier`] once the write lock is released.
//!
//! [`PermissionNotifier`]: hs_access_core::traits::PermissionNotifier

pub mod access;
pub mod context;
pub mod notification;

pub use access::AccessControl;
pub use context::RequestContext;
pub use hs_access_auth::{EffectivePrivilege, PrivilegeSource};
pub use notification::{BroadcastNotifier, NoopNotifier};
