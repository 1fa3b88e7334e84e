//! Shared checks used by every predicate and mutation.

use hs_access_core::error::AppError;
use hs_access_core::result::AppResult;
use hs_access_core::types::PrivilegeCode;
use hs_access_entity::user::User;

use crate::messages::{self, denied};

/// Fail unless the acting user is active.
pub fn require_active(requester: &User) -> AppResult<()> {
    if requester.active {
        Ok(())
    } else {
        Err(denied(messages::REQUESTER_NOT_ACTIVE))
    }
}

/// Fail unless the receiving user is active.
pub fn require_active_grantee(grantee: &User) -> AppResult<()> {
    if grantee.active {
        Ok(())
    } else {
        Err(denied(messages::GRANTEE_NOT_ACTIVE))
    }
}

/// Sharing `NONE` is a calling-contract violation.
pub fn reject_none(privilege: PrivilegeCode) -> AppResult<()> {
    if privilege.is_some() {
        Ok(())
    } else {
        Err(AppError::usage(
            "Cannot share privilege NONE; use unshare or undo instead",
        ))
    }
}

/// Turn the outcome of an action check into a predicate answer.
///
/// Access errors become `false`; usage errors still propagate.
pub fn permitted<T>(result: AppResult<T>) -> AppResult<bool> {
    match result {
        Ok(_) => Ok(true),
        Err(err) if err.is_access() => Ok(false),
        Err(err) => Err(err),
    }
}

/// Common share ceiling: the requester must hold something, must not
/// grant above their own level, and unless downgrading themselves must
/// own the target or the target must allow re-sharing.
pub(crate) fn share_ceiling(
    held: PrivilegeCode,
    privilege: PrivilegeCode,
    reshare_allowed: bool,
    no_privilege: impl FnOnce() -> String,
    not_shareable: impl FnOnce() -> String,
) -> AppResult<()> {
    if !held.is_some() {
        return Err(denied(no_privilege()));
    }
    if !held.at_least(privilege) {
        return Err(denied(messages::EXCEEDS_OWN_PRIVILEGE));
    }
    if held == PrivilegeCode::Owner || reshare_allowed {
        Ok(())
    } else {
        Err(denied(not_shareable()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permitted_maps_access_only() {
        assert!(permitted(Ok::<(), AppError>(())).expect("ok"));
        assert!(!permitted::<()>(Err(AppError::access("no"))).expect("access"));
        assert!(permitted::<()>(Err(AppError::usage("bad"))).is_err());
    }

    #[test]
    fn test_reject_none() {
        assert!(reject_none(PrivilegeCode::None).unwrap_err().is_usage());
        assert!(reject_none(PrivilegeCode::View).is_ok());
    }

    #[test]
    fn test_share_ceiling() {
        let none = || "none".to_string();
        let closed = || "closed".to_string();
        assert!(share_ceiling(PrivilegeCode::Owner, PrivilegeCode::Owner, false, none, closed).is_ok());
        let err = share_ceiling(PrivilegeCode::View, PrivilegeCode::Change, true, none, closed)
            .unwrap_err();
        assert_eq!(err.message, messages::EXCEEDS_OWN_PRIVILEGE);
        let err =
            share_ceiling(PrivilegeCode::Change, PrivilegeCode::View, false, none, closed).unwrap_err();
        assert_eq!(err.message, "closed");
        let err = share_ceiling(PrivilegeCode::None, PrivilegeCode::View, true, none, closed)
            .unwrap_err();
        assert_eq!(err.message, "none");
    }
}
