//! Named share/unshare/undo predicates and candidate listings for each
//! relation. Thin wrappers over the generic template.

use hs_access_core::result::AppResult;
use hs_access_core::types::{CommunityId, GroupId, PrivilegeCode, ResourceId, UserId};
use hs_access_store::AccessState;

use super::relation::{GroupCommunity, GroupResource, UserCommunity, UserGroup, UserResource};
use super::template::{can_share, can_undo, can_unshare, undo_candidates, unshare_candidates};

/// Whether `requester` may share `resource` with `user` at `privilege`.
pub fn can_share_resource_with_user(
    state: &AccessState,
    requester: UserId,
    resource: ResourceId,
    user: UserId,
    privilege: PrivilegeCode,
) -> AppResult<bool> {
    can_share::<UserResource>(state, requester, resource, user, privilege)
}

/// Whether `requester` may share `resource` with `group` at `privilege`.
/// Always `false` for `OWNER`.
pub fn can_share_resource_with_group(
    state: &AccessState,
    requester: UserId,
    resource: ResourceId,
    group: GroupId,
    privilege: PrivilegeCode,
) -> AppResult<bool> {
    can_share::<GroupResource>(state, requester, resource, group, privilege)
}

/// Whether `requester` may invite `user` into `group` at `privilege`.
pub fn can_share_group_with_user(
    state: &AccessState,
    requester: UserId,
    group: GroupId,
    user: UserId,
    privilege: PrivilegeCode,
) -> AppResult<bool> {
    can_share::<UserGroup>(state, requester, group, user, privilege)
}

/// Whether `requester` may share `community` with `user` at `privilege`.
pub fn can_share_community_with_user(
    state: &AccessState,
    requester: UserId,
    community: CommunityId,
    user: UserId,
    privilege: PrivilegeCode,
) -> AppResult<bool> {
    can_share::<UserCommunity>(state, requester, community, user, privilege)
}

/// Whether `requester` may add `group` to `community` at `privilege`.
pub fn can_share_community_with_group(
    state: &AccessState,
    requester: UserId,
    community: CommunityId,
    group: GroupId,
    privilege: PrivilegeCode,
) -> AppResult<bool> {
    can_share::<GroupCommunity>(state, requester, community, group, privilege)
}

/// Whether `requester` may remove every grant of `user` over `resource`.
pub fn can_unshare_resource_with_user(
    state: &AccessState,
    requester: UserId,
    resource: ResourceId,
    user: UserId,
) -> AppResult<bool> {
    can_unshare::<UserResource>(state, requester, resource, user)
}

/// Whether `requester` may remove every grant of `group` over `resource`.
pub fn can_unshare_resource_with_group(
    state: &AccessState,
    requester: UserId,
    resource: ResourceId,
    group: GroupId,
) -> AppResult<bool> {
    can_unshare::<GroupResource>(state, requester, resource, group)
}

/// Whether `requester` may remove `user` from `group`.
pub fn can_unshare_group_with_user(
    state: &AccessState,
    requester: UserId,
    group: GroupId,
    user: UserId,
) -> AppResult<bool> {
    can_unshare::<UserGroup>(state, requester, group, user)
}

/// Whether `requester` may remove every grant of `user` over `community`.
pub fn can_unshare_community_with_user(
    state: &AccessState,
    requester: UserId,
    community: CommunityId,
    user: UserId,
) -> AppResult<bool> {
    can_unshare::<UserCommunity>(state, requester, community, user)
}

/// Whether `requester` may remove `group` from `community`.
pub fn can_unshare_community_with_group(
    state: &AccessState,
    requester: UserId,
    community: CommunityId,
    group: GroupId,
) -> AppResult<bool> {
    can_unshare::<GroupCommunity>(state, requester, community, group)
}

/// Whether `requester` may undo the grant of `user` over `resource` made
/// by `grantor` (the requester when `None`).
pub fn can_undo_share_resource_with_user(
    state: &AccessState,
    requester: UserId,
    resource: ResourceId,
    user: UserId,
    grantor: Option<UserId>,
) -> AppResult<bool> {
    can_undo::<UserResource>(state, requester, resource, user, grantor)
}

/// Whether `requester` may undo the grant of `group` over `resource`.
pub fn can_undo_share_resource_with_group(
    state: &AccessState,
    requester: UserId,
    resource: ResourceId,
    group: GroupId,
    grantor: Option<UserId>,
) -> AppResult<bool> {
    can_undo::<GroupResource>(state, requester, resource, group, grantor)
}

/// Whether `requester` may undo the membership grant of `user` in `group`.
pub fn can_undo_share_group_with_user(
    state: &AccessState,
    requester: UserId,
    group: GroupId,
    user: UserId,
    grantor: Option<UserId>,
) -> AppResult<bool> {
    can_undo::<UserGroup>(state, requester, group, user, grantor)
}

/// Whether `requester` may undo the grant of `user` over `community`.
pub fn can_undo_share_community_with_user(
    state: &AccessState,
    requester: UserId,
    community: CommunityId,
    user: UserId,
    grantor: Option<UserId>,
) -> AppResult<bool> {
    can_undo::<UserCommunity>(state, requester, community, user, grantor)
}

/// Whether `requester` may undo the grant of `group` over `community`.
pub fn can_undo_share_community_with_group(
    state: &AccessState,
    requester: UserId,
    community: CommunityId,
    group: GroupId,
    grantor: Option<UserId>,
) -> AppResult<bool> {
    can_undo::<GroupCommunity>(state, requester, community, group, grantor)
}

/// Users whose grant over `resource` the requester could undo.
pub fn get_resource_undo_users(
    state: &AccessState,
    requester: UserId,
    resource: ResourceId,
    grantor: Option<UserId>,
) -> AppResult<Vec<UserId>> {
    undo_candidates::<UserResource>(state, requester, resource, grantor)
}

/// Groups whose grant over `resource` the requester could undo.
pub fn get_resource_undo_groups(
    state: &AccessState,
    requester: UserId,
    resource: ResourceId,
    grantor: Option<UserId>,
) -> AppResult<Vec<GroupId>> {
    undo_candidates::<GroupResource>(state, requester, resource, grantor)
}

/// Users whose membership in `group` the requester could undo.
pub fn get_group_undo_users(
    state: &AccessState,
    requester: UserId,
    group: GroupId,
    grantor: Option<UserId>,
) -> AppResult<Vec<UserId>> {
    undo_candidates::<UserGroup>(state, requester, group, grantor)
}

/// Users whose grant over `community` the requester could undo.
pub fn get_community_undo_users(
    state: &AccessState,
    requester: UserId,
    community: CommunityId,
    grantor: Option<UserId>,
) -> AppResult<Vec<UserId>> {
    undo_candidates::<UserCommunity>(state, requester, community, grantor)
}

/// Groups whose grant over `community` the requester could undo.
pub fn get_community_undo_groups(
    state: &AccessState,
    requester: UserId,
    community: CommunityId,
    grantor: Option<UserId>,
) -> AppResult<Vec<GroupId>> {
    undo_candidates::<GroupCommunity>(state, requester, community, grantor)
}

/// Users the requester could unshare from `resource`.
pub fn get_resource_unshare_users(
    state: &AccessState,
    requester: UserId,
    resource: ResourceId,
) -> AppResult<Vec<UserId>> {
    unshare_candidates::<UserResource>(state, requester, resource)
}

/// Groups the requester could unshare from `resource`.
pub fn get_resource_unshare_groups(
    state: &AccessState,
    requester: UserId,
    resource: ResourceId,
) -> AppResult<Vec<GroupId>> {
    unshare_candidates::<GroupResource>(state, requester, resource)
}

/// Users the requester could remove from `group`. A sole owner never
/// appears, since removing them would fail.
pub fn get_group_unshare_users(
    state: &AccessState,
    requester: UserId,
    group: GroupId,
) -> AppResult<Vec<UserId>> {
    unshare_candidates::<UserGroup>(state, requester, group)
}

/// Users the requester could unshare from `community`.
pub fn get_community_unshare_users(
    state: &AccessState,
    requester: UserId,
    community: CommunityId,
) -> AppResult<Vec<UserId>> {
    unshare_candidates::<UserCommunity>(state, requester, community)
}

/// Groups the requester could remove from `community`.
pub fn get_community_unshare_groups(
    state: &AccessState,
    requester: UserId,
    community: CommunityId,
) -> AppResult<Vec<GroupId>> {
    unshare_candidates::<GroupCommunity>(state, requester, community)
}
