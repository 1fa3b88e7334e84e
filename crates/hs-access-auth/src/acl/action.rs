//! Generic "can user U perform action A on target T" dispatch.

use hs_access_core::result::AppResult;
use hs_access_core::types::UserId;
use hs_access_entity::permission::{Action, TargetRef};
use hs_access_store::AccessState;

use super::{community, group, resource};

/// Answer an action check by routing it to the matching predicate.
pub fn check(
    state: &AccessState,
    user: UserId,
    action: Action,
    target: TargetRef,
) -> AppResult<bool> {
    match target {
        TargetRef::Resource(id) => match action {
            Action::View => resource::can_view_resource(state, user, id),
            Action::Change => resource::can_change_resource(state, user, id),
            Action::ChangeFlags => resource::can_change_resource_flags(state, user, id),
            Action::Delete => resource::can_delete_resource(state, user, id),
            Action::Share(privilege) => resource::can_share_resource(state, user, id, privilege),
        },
        TargetRef::Group(id) => match action {
            Action::View => group::can_view_group(state, user, id),
            Action::Change => group::can_change_group(state, user, id),
            Action::ChangeFlags => group::can_change_group_flags(state, user, id),
            Action::Delete => group::can_delete_group(state, user, id),
            Action::Share(privilege) => group::can_share_group(state, user, id, privilege),
        },
        TargetRef::Community(id) => match action {
            Action::View => community::can_view_community(state, user, id),
            Action::Change => community::can_change_community(state, user, id),
            Action::ChangeFlags => community::can_change_community_flags(state, user, id),
            Action::Delete => community::can_delete_community(state, user, id),
            Action::Share(privilege) => {
                community::can_share_community(state, user, id, privilege)
            }
        },
    }
}
