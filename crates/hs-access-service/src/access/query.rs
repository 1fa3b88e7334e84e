//! Predicates, effective privilege and listings.
//!
//! Every method takes a shared snapshot, so queries run concurrently with
//! each other and never observe a half-applied mutation.

use hs_access_auth::{acl, query, share};
use hs_access_core::result::AppResult;
use hs_access_core::types::{CommunityId, GroupId, PrivilegeCode, ResourceId, UserId};
use hs_access_entity::group::Group;
use hs_access_entity::permission::{Action, PrincipalRef, TargetRef};
use hs_access_entity::resource::Resource;
use hs_access_entity::user::User;

use super::service::AccessControl;
use crate::EffectivePrivilege;

impl AccessControl {
    /// Can `user` perform `action` on `target`?
    pub async fn check(&self, user: UserId, action: Action, target: TargetRef) -> AppResult<bool> {
        self.read(|state| acl::check(state, user, action, target))
            .await
    }

    /// Effective privilege of any principal over any target.
    pub async fn get_effective_privilege(
        &self,
        principal: PrincipalRef,
        target: TargetRef,
    ) -> AppResult<EffectivePrivilege> {
        self.read(|state| acl::effective_privilege(state, principal, target))
            .await
    }

    /// Looks up a user by id.
    pub async fn get_user(&self, user: UserId) -> AppResult<User> {
        self.read(|state| state.registry.user(user).cloned()).await
    }

    /// Looks up a resource by id.
    pub async fn get_resource(&self, resource: ResourceId) -> AppResult<Resource> {
        self.read(|state| state.registry.resource(resource).cloned())
            .await
    }

    /// Looks up a group by id.
    pub async fn get_group(&self, group: GroupId) -> AppResult<Group> {
        self.read(|state| state.registry.group(group).cloned()).await
    }

    // ── Resource predicates ─────────────────────────────────────────

    /// See [`acl::can_view_resource`].
    pub async fn can_view_resource(&self, user: UserId, resource: ResourceId) -> AppResult<bool> {
        self.read(|state| acl::can_view_resource(state, user, resource))
            .await
    }

    /// See [`acl::can_change_resource`].
    pub async fn can_change_resource(&self, user: UserId, resource: ResourceId) -> AppResult<bool> {
        self.read(|state| acl::can_change_resource(state, user, resource))
            .await
    }

    /// See [`acl::can_change_resource_flags`].
    pub async fn can_change_resource_flags(
        &self,
        user: UserId,
        resource: ResourceId,
    ) -> AppResult<bool> {
        self.read(|state| acl::can_change_resource_flags(state, user, resource))
            .await
    }

    /// See [`acl::can_delete_resource`].
    pub async fn can_delete_resource(&self, user: UserId, resource: ResourceId) -> AppResult<bool> {
        self.read(|state| acl::can_delete_resource(state, user, resource))
            .await
    }

    /// See [`acl::can_share_resource`].
    pub async fn can_share_resource(
        &self,
        user: UserId,
        resource: ResourceId,
        privilege: PrivilegeCode,
    ) -> AppResult<bool> {
        self.read(|state| acl::can_share_resource(state, user, resource, privilege))
            .await
    }

    /// Whether `user` owns `resource`.
    pub async fn owns_resource(&self, user: UserId, resource: ResourceId) -> AppResult<bool> {
        self.read(|state| acl::owns_resource(state, user, resource))
            .await
    }

    // ── Group predicates ────────────────────────────────────────────

    /// See [`acl::can_view_group`].
    pub async fn can_view_group(&self, user: UserId, group: GroupId) -> AppResult<bool> {
        self.read(|state| acl::can_view_group(state, user, group))
            .await
    }

    /// See [`acl::can_change_group`].
    pub async fn can_change_group(&self, user: UserId, group: GroupId) -> AppResult<bool> {
        self.read(|state| acl::can_change_group(state, user, group))
            .await
    }

    /// See [`acl::can_change_group_flags`].
    pub async fn can_change_group_flags(&self, user: UserId, group: GroupId) -> AppResult<bool> {
        self.read(|state| acl::can_change_group_flags(state, user, group))
            .await
    }

    /// See [`acl::can_delete_group`].
    pub async fn can_delete_group(&self, user: UserId, group: GroupId) -> AppResult<bool> {
        self.read(|state| acl::can_delete_group(state, user, group))
            .await
    }

    /// See [`acl::can_share_group`].
    pub async fn can_share_group(
        &self,
        user: UserId,
        group: GroupId,
        privilege: PrivilegeCode,
    ) -> AppResult<bool> {
        self.read(|state| acl::can_share_group(state, user, group, privilege))
            .await
    }

    /// Whether `user` owns `group`.
    pub async fn owns_group(&self, user: UserId, group: GroupId) -> AppResult<bool> {
        self.read(|state| acl::owns_group(state, user, group)).await
    }

    // ── Community predicates ────────────────────────────────────────

    /// See [`acl::can_view_community`].
    pub async fn can_view_community(&self, user: UserId, community: CommunityId) -> AppResult<bool> {
        self.read(|state| acl::can_view_community(state, user, community))
            .await
    }

    /// See [`acl::can_change_community`].
    pub async fn can_change_community(
        &self,
        user: UserId,
        community: CommunityId,
    ) -> AppResult<bool> {
        self.read(|state| acl::can_change_community(state, user, community))
            .await
    }

    /// See [`acl::can_delete_community`].
    pub async fn can_delete_community(
        &self,
        user: UserId,
        community: CommunityId,
    ) -> AppResult<bool> {
        self.read(|state| acl::can_delete_community(state, user, community))
            .await
    }

    /// See [`acl::can_share_community`].
    pub async fn can_share_community(
        &self,
        user: UserId,
        community: CommunityId,
        privilege: PrivilegeCode,
    ) -> AppResult<bool> {
        self.read(|state| acl::can_share_community(state, user, community, privilege))
            .await
    }

    /// Whether `user` owns `community`.
    pub async fn owns_community(&self, user: UserId, community: CommunityId) -> AppResult<bool> {
        self.read(|state| acl::owns_community(state, user, community))
            .await
    }

    // ── Share / unshare / undo predicates ───────────────────────────

    /// Whether `requester` may share `resource` with `user` at `privilege`.
    pub async fn can_share_resource_with_user(
        &self,
        requester: UserId,
        resource: ResourceId,
        user: UserId,
        privilege: PrivilegeCode,
    ) -> AppResult<bool> {
        self.read(|state| {
            share::can_share_resource_with_user(state, requester, resource, user, privilege)
        })
        .await
    }

    /// Whether `requester` may share `resource` with `group` at
    /// `privilege`. Always `false` for `OWNER`.
    pub async fn can_share_resource_with_group(
        &self,
        requester: UserId,
        resource: ResourceId,
        group: GroupId,
        privilege: PrivilegeCode,
    ) -> AppResult<bool> {
        self.read(|state| {
            share::can_share_resource_with_group(state, requester, resource, group, privilege)
        })
        .await
    }

    /// Whether `requester` may add `user` to `group` at `privilege`.
    pub async fn can_share_group_with_user(
        &self,
        requester: UserId,
        group: GroupId,
        user: UserId,
        privilege: PrivilegeCode,
    ) -> AppResult<bool> {
        self.read(|state| share::can_share_group_with_user(state, requester, group, user, privilege))
            .await
    }

    /// Whether `requester` may share `community` with `user`.
    pub async fn can_share_community_with_user(
        &self,
        requester: UserId,
        community: CommunityId,
        user: UserId,
        privilege: PrivilegeCode,
    ) -> AppResult<bool> {
        self.read(|state| {
            share::can_share_community_with_user(state, requester, community, user, privilege)
        })
        .await
    }

    /// Whether `requester` may add `group` to `community`.
    pub async fn can_share_community_with_group(
        &self,
        requester: UserId,
        community: CommunityId,
        group: GroupId,
        privilege: PrivilegeCode,
    ) -> AppResult<bool> {
        self.read(|state| {
            share::can_share_community_with_group(state, requester, community, group, privilege)
        })
        .await
    }

    /// Whether `requester` may unshare `resource` with `user`.
    pub async fn can_unshare_resource_with_user(
        &self,
        requester: UserId,
        resource: ResourceId,
        user: UserId,
    ) -> AppResult<bool> {
        self.read(|state| share::can_unshare_resource_with_user(state, requester, resource, user))
            .await
    }

    /// Whether `requester` may unshare `resource` with `group`.
    pub async fn can_unshare_resource_with_group(
        &self,
        requester: UserId,
        resource: ResourceId,
        group: GroupId,
    ) -> AppResult<bool> {
        self.read(|state| share::can_unshare_resource_with_group(state, requester, resource, group))
            .await
    }

    /// Whether `requester` may remove `user` from `group`.
    pub async fn can_unshare_group_with_user(
        &self,
        requester: UserId,
        group: GroupId,
        user: UserId,
    ) -> AppResult<bool> {
        self.read(|state| share::can_unshare_group_with_user(state, requester, group, user))
            .await
    }

    /// Whether `requester` may unshare `community` with `user`.
    pub async fn can_unshare_community_with_user(
        &self,
        requester: UserId,
        community: CommunityId,
        user: UserId,
    ) -> AppResult<bool> {
        self.read(|state| share::can_unshare_community_with_user(state, requester, community, user))
            .await
    }

    /// Whether `requester` may remove `group` from `community`.
    pub async fn can_unshare_community_with_group(
        &self,
        requester: UserId,
        community: CommunityId,
        group: GroupId,
    ) -> AppResult<bool> {
        self.read(|state| {
            share::can_unshare_community_with_group(state, requester, community, group)
        })
        .await
    }

    /// Whether `requester` may undo the grant of `user` over `resource`.
    pub async fn can_undo_share_resource_with_user(
        &self,
        requester: UserId,
        resource: ResourceId,
        user: UserId,
        grantor: Option<UserId>,
    ) -> AppResult<bool> {
        self.read(|state| {
            share::can_undo_share_resource_with_user(state, requester, resource, user, grantor)
        })
        .await
    }

    /// Whether `requester` may undo the grant of `group` over `resource`.
    pub async fn can_undo_share_resource_with_group(
        &self,
        requester: UserId,
        resource: ResourceId,
        group: GroupId,
        grantor: Option<UserId>,
    ) -> AppResult<bool> {
        self.read(|state| {
            share::can_undo_share_resource_with_group(state, requester, resource, group, grantor)
        })
        .await
    }

    /// Whether `requester` may undo the membership grant of `user`.
    pub async fn can_undo_share_group_with_user(
        &self,
        requester: UserId,
        group: GroupId,
        user: UserId,
        grantor: Option<UserId>,
    ) -> AppResult<bool> {
        self.read(|state| {
            share::can_undo_share_group_with_user(state, requester, group, user, grantor)
        })
        .await
    }

    /// Whether `requester` may undo the grant of `user` over `community`.
    pub async fn can_undo_share_community_with_user(
        &self,
        requester: UserId,
        community: CommunityId,
        user: UserId,
        grantor: Option<UserId>,
    ) -> AppResult<bool> {
        self.read(|state| {
            share::can_undo_share_community_with_user(state, requester, community, user, grantor)
        })
        .await
    }

    /// Whether `requester` may undo the grant of `group` over `community`.
    pub async fn can_undo_share_community_with_group(
        &self,
        requester: UserId,
        community: CommunityId,
        group: GroupId,
        grantor: Option<UserId>,
    ) -> AppResult<bool> {
        self.read(|state| {
            share::can_undo_share_community_with_group(state, requester, community, group, grantor)
        })
        .await
    }

    // ── Undo / unshare candidate lists ──────────────────────────────

    /// Users whose grant over `resource` the requester could undo.
    pub async fn get_resource_undo_users(
        &self,
        requester: UserId,
        resource: ResourceId,
        grantor: Option<UserId>,
    ) -> AppResult<Vec<UserId>> {
        self.read(|state| share::get_resource_undo_users(state, requester, resource, grantor))
            .await
    }

    /// Groups whose grant over `resource` the requester could undo.
    pub async fn get_resource_undo_groups(
        &self,
        requester: UserId,
        resource: ResourceId,
        grantor: Option<UserId>,
    ) -> AppResult<Vec<GroupId>> {
        self.read(|state| share::get_resource_undo_groups(state, requester, resource, grantor))
            .await
    }

    /// Users whose membership in `group` the requester could undo.
    pub async fn get_group_undo_users(
        &self,
        requester: UserId,
        group: GroupId,
        grantor: Option<UserId>,
    ) -> AppResult<Vec<UserId>> {
        self.read(|state| share::get_group_undo_users(state, requester, group, grantor))
            .await
    }

    /// Users whose grant over `community` the requester could undo.
    pub async fn get_community_undo_users(
        &self,
        requester: UserId,
        community: CommunityId,
        grantor: Option<UserId>,
    ) -> AppResult<Vec<UserId>> {
        self.read(|state| share::get_community_undo_users(state, requester, community, grantor))
            .await
    }

    /// Groups whose grant over `community` the requester could undo.
    pub async fn get_community_undo_groups(
        &self,
        requester: UserId,
        community: CommunityId,
        grantor: Option<UserId>,
    ) -> AppResult<Vec<GroupId>> {
        self.read(|state| share::get_community_undo_groups(state, requester, community, grantor))
            .await
    }

    /// Users the requester could unshare from `resource`.
    pub async fn get_resource_unshare_users(
        &self,
        requester: UserId,
        resource: ResourceId,
    ) -> AppResult<Vec<UserId>> {
        self.read(|state| share::get_resource_unshare_users(state, requester, resource))
            .await
    }

    /// Groups the requester could unshare from `resource`.
    pub async fn get_resource_unshare_groups(
        &self,
        requester: UserId,
        resource: ResourceId,
    ) -> AppResult<Vec<GroupId>> {
        self.read(|state| share::get_resource_unshare_groups(state, requester, resource))
            .await
    }

    /// Users the requester could remove from `group`.
    pub async fn get_group_unshare_users(
        &self,
        requester: UserId,
        group: GroupId,
    ) -> AppResult<Vec<UserId>> {
        self.read(|state| share::get_group_unshare_users(state, requester, group))
            .await
    }

    /// Users the requester could unshare from `community`.
    pub async fn get_community_unshare_users(
        &self,
        requester: UserId,
        community: CommunityId,
    ) -> AppResult<Vec<UserId>> {
        self.read(|state| share::get_community_unshare_users(state, requester, community))
            .await
    }

    /// Groups the requester could remove from `community`.
    pub async fn get_community_unshare_groups(
        &self,
        requester: UserId,
        community: CommunityId,
    ) -> AppResult<Vec<GroupId>> {
        self.read(|state| share::get_community_unshare_groups(state, requester, community))
            .await
    }

    // ── Listings ────────────────────────────────────────────────────

    /// Resources `user` owns.
    pub async fn get_owned_resources(&self, user: UserId) -> AppResult<Vec<Resource>> {
        self.read(|state| query::get_owned_resources(state, user))
            .await
    }

    /// Resources `user` holds at least `privilege` over through grants.
    pub async fn get_held_resources(
        &self,
        user: UserId,
        privilege: PrivilegeCode,
    ) -> AppResult<Vec<Resource>> {
        self.read(|state| query::get_held_resources(state, user, privilege))
            .await
    }

    /// Resources `user` may change.
    pub async fn get_editable_resources(&self, user: UserId) -> AppResult<Vec<Resource>> {
        self.read(|state| query::get_editable_resources(state, user))
            .await
    }

    /// Groups `user` owns.
    pub async fn get_owned_groups(&self, user: UserId) -> AppResult<Vec<Group>> {
        self.read(|state| query::get_owned_groups(state, user)).await
    }

    /// Groups `user` is a member of.
    pub async fn get_held_groups(&self, user: UserId) -> AppResult<Vec<Group>> {
        self.read(|state| query::get_held_groups(state, user)).await
    }

    /// Active groups that are discoverable or public.
    pub async fn get_discoverable_groups(&self) -> Vec<Group> {
        let snapshot = self.store().snapshot().await;
        query::get_discoverable_groups(&snapshot)
    }

    /// Active public groups.
    pub async fn get_public_groups(&self) -> Vec<Group> {
        let snapshot = self.store().snapshot().await;
        query::get_public_groups(&snapshot)
    }

    /// Owners of `resource`.
    pub async fn get_resource_owners(&self, resource: ResourceId) -> AppResult<Vec<UserId>> {
        self.read(|state| query::get_resource_owners(state, resource))
            .await
    }

    /// Members of `group`.
    pub async fn get_group_members(&self, group: GroupId) -> AppResult<Vec<UserId>> {
        self.read(|state| query::get_group_members(state, group))
            .await
    }

    /// Owners of `group`.
    pub async fn get_group_owners(&self, group: GroupId) -> AppResult<Vec<UserId>> {
        self.read(|state| query::get_group_owners(state, group)).await
    }

    /// Owners of `community`.
    pub async fn get_community_owners(&self, community: CommunityId) -> AppResult<Vec<UserId>> {
        self.read(|state| query::get_community_owners(state, community))
            .await
    }

    /// Groups belonging to `community`.
    pub async fn get_community_groups(&self, community: CommunityId) -> AppResult<Vec<GroupId>> {
        self.read(|state| query::get_community_groups(state, community))
            .await
    }
}
