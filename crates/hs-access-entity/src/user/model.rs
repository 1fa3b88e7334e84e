//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hs_access_core::types::UserId;

/// A registered user, as seen by the access-control engine.
///
/// Account data (email, password, profile) lives with the account
/// collaborator; only the two flags that gate privilege are kept here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Unique login name.
    pub username: String,
    /// Inactive users hold no effective privilege and cannot act.
    pub active: bool,
    /// Superusers bypass privilege checks, except the group-ownership
    /// rule and resource immutability.
    pub admin: bool,
    /// When the user was registered.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Build a new active, non-admin user.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            username: username.into(),
            active: true,
            admin: false,
            created_at: Utc::now(),
        }
    }

    /// Whether this user bypasses privilege checks. Inactive admins do not.
    pub fn is_effective_admin(&self) -> bool {
        self.active && self.admin
    }
}

/// Data required to register a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Desired username.
    pub username: String,
    /// Initial active flag.
    #[serde(default = "default_true")]
    pub active: bool,
    /// Initial superuser flag.
    #[serde(default)]
    pub admin: bool,
}

impl CreateUser {
    /// An active, non-admin user.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            active: true,
            admin: false,
        }
    }

    /// An active superuser.
    pub fn admin(username: impl Into<String>) -> Self {
        Self {
            admin: true,
            ..Self::new(username)
        }
    }

    /// Materialize the entity with a fresh id.
    pub fn into_user(self) -> User {
        User {
            active: self.active,
            admin: self.admin,
            ..User::new(self.username)
        }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inactive_admin_is_not_effective() {
        let mut user = CreateUser::admin("root").into_user();
        assert!(user.is_effective_admin());
        user.active = false;
        assert!(!user.is_effective_admin());
    }
}
