//! Request context carrying the acting user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use hs_access_core::types::UserId;

/// Context for the current request.
///
/// Built by whichever front end authenticated the caller and passed into
/// every mutating method so that each operation knows *who* is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The acting user.
    pub user_id: UserId,
    /// Correlation id for log lines and events.
    pub request_id: Uuid,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context for `user_id`.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            request_id: Uuid::now_v7(),
            request_time: Utc::now(),
        }
    }
}

impl From<UserId> for RequestContext {
    fn from(user_id: UserId) -> Self {
        Self::new(user_id)
    }
}
