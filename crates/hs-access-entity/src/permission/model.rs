//! Materialized user→resource permission row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hs_access_core::types::{PrivilegeCode, ResourceId, UserId};

/// The best grant-derived privilege a user holds over a resource,
/// combining direct grants and grants to every active group the user
/// belongs to.
///
/// Resource flags (`public`, `immutable`) are not folded into the row;
/// they are applied when the row is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterializedPermission {
    /// The user.
    pub user: UserId,
    /// The resource.
    pub resource: ResourceId,
    /// Combined privilege. Never `None` for a stored row.
    pub privilege: PrivilegeCode,
    /// When the row was last recomputed.
    pub updated_at: DateTime<Utc>,
}
