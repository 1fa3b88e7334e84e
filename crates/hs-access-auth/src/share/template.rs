//! Share, unshare and undo over any [`Relation`].
//!
//! Each mutation is a `check_*` step that reads the state and a write step
//! that runs only after the check passed, so a failed call leaves the state
//! untouched. The predicates and the candidate listings call the same
//! `check_*` functions as the mutations, so "can" and "do" never disagree.
//!
//! Check order for every mutation:
//! 1. Usage: unknown ids, `NONE` privilege.
//! 2. The requester is active.
//! 3. Relation-specific domain rules and authorization.
//! 4. Last-owner protection, simulated on the post-write state.
//!
//! A share by the grantee itself, by an owner or by an admin sets the
//! grantee's combined privilege: rows from other grantors are capped at the
//! new level. Any other grantor only adds its own row.

use std::collections::BTreeSet;

use tracing::debug;

use hs_access_core::events::GrantEvent;
use hs_access_core::result::AppResult;
use hs_access_core::types::{PrivilegeCode, UserId};
use hs_access_entity::user::User;
use hs_access_entity::grant::GrantFilter;
use hs_access_store::AccessState;

use super::mutation::Mutation;
use super::relation::Relation;
use crate::acl::checker::{permitted, reject_none, require_active};
use crate::messages::{self, denied};
use crate::projector;

/// Fail if a write would leave the target without any owner.
fn guard_last_owner<R: Relation>(
    state: &AccessState,
    target: R::Target,
    owners_after: usize,
) -> AppResult<()> {
    match R::LAST_OWNER_OF {
        Some(kind) if owners_after == 0 && R::table(state).count_owners(target) > 0 => {
            Err(denied(messages::last_owner(kind)))
        }
        _ => Ok(()),
    }
}

/// Whether a share by `requester` caps the grants of other grantors.
fn sets_combined<R: Relation>(
    state: &AccessState,
    requester: &User,
    target: R::Target,
    grantee: R::Grantee,
) -> bool {
    R::is_requester(requester.id, grantee) || R::may_override_grantor(state, requester, target)
}

/// Validate a share of `target` with `grantee` at `privilege`.
pub fn check_share<R: Relation>(
    state: &AccessState,
    requester: UserId,
    target: R::Target,
    grantee: R::Grantee,
    privilege: PrivilegeCode,
) -> AppResult<()> {
    reject_none(privilege)?;
    R::validate_target(state, target)?;
    R::validate_grantee(state, grantee)?;
    let requester = state.registry.user(requester)?;
    require_active(requester)?;
    R::authorize_share(state, requester, target, grantee, privilege)?;
    let table = R::table(state);
    let owners_after = if sets_combined::<R>(state, requester, target, grantee) {
        table.owners_after_cap(grantee, target, privilege)
    } else {
        table.owners_after_upsert(grantee, target, requester.id, privilege)
    };
    guard_last_owner::<R>(state, target, owners_after)
}

/// Grant or update `grantee`'s privilege over `target`, recorded with
/// `requester` as grantor. Re-sharing at the same level is a no-op on state.
/// `previous` is the grantee's combined privilege before the write.
pub fn share<R: Relation>(
    state: &mut AccessState,
    requester: UserId,
    target: R::Target,
    grantee: R::Grantee,
    privilege: PrivilegeCode,
) -> AppResult<Mutation> {
    if let Err(err) = check_share::<R>(state, requester, target, grantee, privilege) {
        debug!(relation = %R::KIND, requester = %requester, error = %err, "Share denied");
        return Err(err);
    }
    let previous = R::table(state).privilege(grantee, target);
    let caps = state
        .registry
        .user(requester)
        .map(|user| sets_combined::<R>(state, user, target, grantee))?;
    let table = R::table_mut(state);
    if caps {
        table.cap(grantee, target, privilege);
    }
    table.upsert(grantee, target, requester, privilege);
    let affected = R::affected(state, target, grantee);
    let permissions = projector::project(state, affected);
    Ok(Mutation {
        previous,
        grants: vec![GrantEvent::Shared {
            relation: R::KIND,
            grantee: grantee.into(),
            target: target.into(),
            grantor: requester,
            privilege,
        }],
        permissions,
    })
}

/// Validate removing every grant of `grantee` over `target`.
pub fn check_unshare<R: Relation>(
    state: &AccessState,
    requester: UserId,
    target: R::Target,
    grantee: R::Grantee,
) -> AppResult<()> {
    R::validate_target(state, target)?;
    R::validate_grantee(state, grantee)?;
    let requester = state.registry.user(requester)?;
    require_active(requester)?;
    if R::table(state).rows_for(grantee, target).next().is_none() {
        return Err(denied(messages::NO_PRIVILEGE_TO_REMOVE));
    }
    R::authorize_unshare(state, requester, target, grantee)?;
    guard_last_owner::<R>(
        state,
        target,
        R::table(state).owners_after_delete(grantee, target, None),
    )
}

/// Remove every grant of `grantee` over `target`, whoever made it.
pub fn unshare<R: Relation>(
    state: &mut AccessState,
    requester: UserId,
    target: R::Target,
    grantee: R::Grantee,
) -> AppResult<Mutation> {
    if let Err(err) = check_unshare::<R>(state, requester, target, grantee) {
        debug!(relation = %R::KIND, requester = %requester, error = %err, "Unshare denied");
        return Err(err);
    }
    let previous = R::table(state).privilege(grantee, target);
    R::table_mut(state).delete_all_for_grantee_target(grantee, target);
    let affected = R::affected(state, target, grantee);
    let permissions = projector::project(state, affected);
    Ok(Mutation {
        previous,
        grants: vec![GrantEvent::Unshared {
            relation: R::KIND,
            grantee: grantee.into(),
            target: target.into(),
        }],
        permissions,
    })
}

/// Validate removing the single grant of `grantee` over `target` made by
/// `grantor` (the requester when `None`). Returns the resolved grantor.
pub fn check_undo<R: Relation>(
    state: &AccessState,
    requester: UserId,
    target: R::Target,
    grantee: R::Grantee,
    grantor: Option<UserId>,
) -> AppResult<UserId> {
    R::validate_target(state, target)?;
    R::validate_grantee(state, grantee)?;
    let requester = state.registry.user(requester)?;
    if let Some(grantor) = grantor {
        state.registry.user(grantor)?;
    }
    require_active(requester)?;
    let grantor = grantor.unwrap_or(requester.id);
    if grantor != requester.id && !R::may_override_grantor(state, requester, target) {
        return Err(denied(messages::NOT_ORIGINAL_GRANTOR));
    }
    if R::table(state).get(grantee, target, grantor).is_none() {
        return Err(denied(messages::NO_GRANT_TO_UNDO));
    }
    guard_last_owner::<R>(
        state,
        target,
        R::table(state).owners_after_delete(grantee, target, Some(grantor)),
    )?;
    Ok(grantor)
}

/// Remove one grantor's grant. Grants from other grantors survive, so the
/// grantee may keep some privilege afterwards.
pub fn undo_share<R: Relation>(
    state: &mut AccessState,
    requester: UserId,
    target: R::Target,
    grantee: R::Grantee,
    grantor: Option<UserId>,
) -> AppResult<Mutation> {
    let grantor = match check_undo::<R>(state, requester, target, grantee, grantor) {
        Ok(grantor) => grantor,
        Err(err) => {
            debug!(relation = %R::KIND, requester = %requester, error = %err, "Undo denied");
            return Err(err);
        }
    };
    let previous = R::table_mut(state)
        .delete(grantee, target, grantor)
        .map(|row| row.privilege)
        .unwrap_or_default();
    let affected = R::affected(state, target, grantee);
    let permissions = projector::project(state, affected);
    Ok(Mutation {
        previous,
        grants: vec![GrantEvent::Undone {
            relation: R::KIND,
            grantee: grantee.into(),
            target: target.into(),
            grantor,
        }],
        permissions,
    })
}

/// Predicate form of [`check_share`].
pub fn can_share<R: Relation>(
    state: &AccessState,
    requester: UserId,
    target: R::Target,
    grantee: R::Grantee,
    privilege: PrivilegeCode,
) -> AppResult<bool> {
    permitted(check_share::<R>(state, requester, target, grantee, privilege))
}

/// Predicate form of [`check_unshare`].
pub fn can_unshare<R: Relation>(
    state: &AccessState,
    requester: UserId,
    target: R::Target,
    grantee: R::Grantee,
) -> AppResult<bool> {
    permitted(check_unshare::<R>(state, requester, target, grantee))
}

/// Predicate form of [`check_undo`].
pub fn can_undo<R: Relation>(
    state: &AccessState,
    requester: UserId,
    target: R::Target,
    grantee: R::Grantee,
    grantor: Option<UserId>,
) -> AppResult<bool> {
    permitted(check_undo::<R>(state, requester, target, grantee, grantor))
}

/// Grantees whose grant over `target` by `grantor` (the requester when
/// `None`) the requester could undo right now.
pub fn undo_candidates<R: Relation>(
    state: &AccessState,
    requester: UserId,
    target: R::Target,
    grantor: Option<UserId>,
) -> AppResult<Vec<R::Grantee>> {
    R::validate_target(state, target)?;
    state.registry.user(requester)?;
    let by = grantor.unwrap_or(requester);
    let candidates: BTreeSet<R::Grantee> = R::table(state)
        .query(&GrantFilter::target(target).with_grantor(by))
        .into_iter()
        .map(|row| row.grantee)
        .collect();

    let mut eligible = Vec::new();
    for grantee in candidates {
        if can_undo::<R>(state, requester, target, grantee, grantor)? {
            eligible.push(grantee);
        }
    }
    Ok(eligible)
}

/// Grantees of `target` the requester could unshare right now.
pub fn unshare_candidates<R: Relation>(
    state: &AccessState,
    requester: UserId,
    target: R::Target,
) -> AppResult<Vec<R::Grantee>> {
    R::validate_target(state, target)?;
    state.registry.user(requester)?;
    let mut eligible = Vec::new();
    for grantee in R::table(state).grantees(target) {
        if can_unshare::<R>(state, requester, target, grantee)? {
            eligible.push(grantee);
        }
    }
    Ok(eligible)
}
