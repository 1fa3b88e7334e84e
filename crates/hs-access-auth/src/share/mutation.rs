//! Outcome of a committed-to-state mutation.

use hs_access_core::events::{DomainEvent, EventPayload, GrantEvent, PermissionEvent};
use hs_access_core::types::{PrivilegeCode, UserId};

/// What a share, unshare, undo or lifecycle call changed.
///
/// Events are kept here until the caller commits its transaction and
/// dispatches them.
#[derive(Debug, Clone, Default)]
pub struct Mutation {
    /// Combined privilege of the grantee over the target before the call.
    pub previous: PrivilegeCode,
    /// Grant-level events.
    pub grants: Vec<GrantEvent>,
    /// Materialized-permission events.
    pub permissions: Vec<PermissionEvent>,
}

impl Mutation {
    /// A mutation that only changed materialized permissions.
    pub fn from_permissions(permissions: Vec<PermissionEvent>) -> Self {
        Self {
            permissions,
            ..Self::default()
        }
    }

    /// Fold another mutation into this one.
    pub fn merge(&mut self, other: Mutation) {
        self.grants.extend(other.grants);
        self.permissions.extend(other.permissions);
    }

    /// Whether nothing observable happened.
    pub fn is_empty(&self) -> bool {
        self.grants.is_empty() && self.permissions.is_empty()
    }

    /// Wrap every event for dispatch.
    pub fn into_events(self, actor: Option<UserId>) -> Vec<DomainEvent> {
        self.grants
            .into_iter()
            .map(EventPayload::Grant)
            .chain(self.permissions.into_iter().map(EventPayload::Permission))
            .map(|payload| DomainEvent::new(actor, payload))
            .collect()
    }
}
