//! Materialized-permission events.

use serde::{Deserialize, Serialize};

use crate::types::{PrivilegeCode, ResourceId, UserId};

/// Events describing changes to the materialized user→resource table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PermissionEvent {
    /// The derived privilege of a user over a resource changed.
    Changed {
        /// The user.
        user: UserId,
        /// The resource.
        resource: ResourceId,
        /// Derived privilege before the mutation.
        before: PrivilegeCode,
        /// Derived privilege after the mutation.
        after: PrivilegeCode,
    },
    /// A resource was deleted and all its rows purged.
    ResourcePurged {
        /// The deleted resource.
        resource: ResourceId,
    },
}
