//! Share, unshare and undo for the five grant relations.

use tracing::info;

use hs_access_auth::share::{
    self as engine, GroupCommunity, GroupResource, Relation, UserCommunity, UserGroup,
    UserResource,
};
use hs_access_core::result::AppResult;
use hs_access_core::types::{CommunityId, GroupId, PrivilegeCode, ResourceId, UserId};

use super::service::AccessControl;
use crate::context::RequestContext;

impl AccessControl {
    async fn share<R: Relation>(
        &self,
        ctx: &RequestContext,
        target: R::Target,
        grantee: R::Grantee,
        privilege: PrivilegeCode,
    ) -> AppResult<()> {
        let requester = ctx.user_id;
        let previous = self
            .mutate(Some(requester), "share", |state| {
                let changes = engine::share::<R>(state, requester, target, grantee, privilege)?;
                Ok((changes.previous, changes))
            })
            .await?;
        info!(
            relation = %R::KIND,
            requester = %requester,
            target = %target,
            grantee = %grantee,
            previous = %previous,
            privilege = %privilege,
            "Privilege shared"
        );
        Ok(())
    }

    async fn unshare<R: Relation>(
        &self,
        ctx: &RequestContext,
        target: R::Target,
        grantee: R::Grantee,
    ) -> AppResult<()> {
        let requester = ctx.user_id;
        let previous = self
            .mutate(Some(requester), "unshare", |state| {
                let changes = engine::unshare::<R>(state, requester, target, grantee)?;
                Ok((changes.previous, changes))
            })
            .await?;
        info!(
            relation = %R::KIND,
            requester = %requester,
            target = %target,
            grantee = %grantee,
            previous = %previous,
            "Privilege unshared"
        );
        Ok(())
    }

    async fn undo_share<R: Relation>(
        &self,
        ctx: &RequestContext,
        target: R::Target,
        grantee: R::Grantee,
        grantor: Option<UserId>,
    ) -> AppResult<()> {
        let requester = ctx.user_id;
        let previous = self
            .mutate(Some(requester), "undo_share", |state| {
                let changes = engine::undo_share::<R>(state, requester, target, grantee, grantor)?;
                Ok((changes.previous, changes))
            })
            .await?;
        info!(
            relation = %R::KIND,
            requester = %requester,
            target = %target,
            grantee = %grantee,
            grantor = ?grantor,
            previous = %previous,
            "Share undone"
        );
        Ok(())
    }

    // ── Resource ↔ user ─────────────────────────────────────────────

    /// Grants `user` `privilege` over `resource`.
    pub async fn share_resource_with_user(
        &self,
        ctx: &RequestContext,
        resource: ResourceId,
        user: UserId,
        privilege: PrivilegeCode,
    ) -> AppResult<()> {
        self.share::<UserResource>(ctx, resource, user, privilege).await
    }

    /// Removes every grant of `user` over `resource`.
    pub async fn unshare_resource_with_user(
        &self,
        ctx: &RequestContext,
        resource: ResourceId,
        user: UserId,
    ) -> AppResult<()> {
        self.unshare::<UserResource>(ctx, resource, user).await
    }

    /// Removes the grant of `user` over `resource` made by `grantor`
    /// (the requester when `None`).
    pub async fn undo_share_resource_with_user(
        &self,
        ctx: &RequestContext,
        resource: ResourceId,
        user: UserId,
        grantor: Option<UserId>,
    ) -> AppResult<()> {
        self.undo_share::<UserResource>(ctx, resource, user, grantor)
            .await
    }

    // ── Resource ↔ group ────────────────────────────────────────────

    /// Grants `group` `privilege` over `resource`. `OWNER` is refused.
    pub async fn share_resource_with_group(
        &self,
        ctx: &RequestContext,
        resource: ResourceId,
        group: GroupId,
        privilege: PrivilegeCode,
    ) -> AppResult<()> {
        self.share::<GroupResource>(ctx, resource, group, privilege)
            .await
    }

    /// Removes every grant of `group` over `resource`.
    pub async fn unshare_resource_with_group(
        &self,
        ctx: &RequestContext,
        resource: ResourceId,
        group: GroupId,
    ) -> AppResult<()> {
        self.unshare::<GroupResource>(ctx, resource, group).await
    }

    /// Removes the grant of `group` over `resource` made by `grantor`.
    pub async fn undo_share_resource_with_group(
        &self,
        ctx: &RequestContext,
        resource: ResourceId,
        group: GroupId,
        grantor: Option<UserId>,
    ) -> AppResult<()> {
        self.undo_share::<GroupResource>(ctx, resource, group, grantor)
            .await
    }

    // ── Group ↔ user (membership) ───────────────────────────────────

    /// Makes `user` a member of `group` at `privilege`.
    pub async fn share_group_with_user(
        &self,
        ctx: &RequestContext,
        group: GroupId,
        user: UserId,
        privilege: PrivilegeCode,
    ) -> AppResult<()> {
        self.share::<UserGroup>(ctx, group, user, privilege).await
    }

    /// Removes `user` from `group`.
    pub async fn unshare_group_with_user(
        &self,
        ctx: &RequestContext,
        group: GroupId,
        user: UserId,
    ) -> AppResult<()> {
        self.unshare::<UserGroup>(ctx, group, user).await
    }

    /// Removes the membership grant of `user` in `group` made by `grantor`.
    pub async fn undo_share_group_with_user(
        &self,
        ctx: &RequestContext,
        group: GroupId,
        user: UserId,
        grantor: Option<UserId>,
    ) -> AppResult<()> {
        self.undo_share::<UserGroup>(ctx, group, user, grantor).await
    }

    // ── Community ↔ user ────────────────────────────────────────────

    /// Grants `user` `privilege` over `community`.
    pub async fn share_community_with_user(
        &self,
        ctx: &RequestContext,
        community: CommunityId,
        user: UserId,
        privilege: PrivilegeCode,
    ) -> AppResult<()> {
        self.share::<UserCommunity>(ctx, community, user, privilege)
            .await
    }

    /// Removes every grant of `user` over `community`.
    pub async fn unshare_community_with_user(
        &self,
        ctx: &RequestContext,
        community: CommunityId,
        user: UserId,
    ) -> AppResult<()> {
        self.unshare::<UserCommunity>(ctx, community, user).await
    }

    /// Removes the grant of `user` over `community` made by `grantor`.
    pub async fn undo_share_community_with_user(
        &self,
        ctx: &RequestContext,
        community: CommunityId,
        user: UserId,
        grantor: Option<UserId>,
    ) -> AppResult<()> {
        self.undo_share::<UserCommunity>(ctx, community, user, grantor)
            .await
    }

    // ── Community ↔ group ───────────────────────────────────────────

    /// Adds `group` to `community` at `privilege`. `OWNER` is refused.
    pub async fn share_community_with_group(
        &self,
        ctx: &RequestContext,
        community: CommunityId,
        group: GroupId,
        privilege: PrivilegeCode,
    ) -> AppResult<()> {
        self.share::<GroupCommunity>(ctx, community, group, privilege)
            .await
    }

    /// Removes `group` from `community`.
    pub async fn unshare_community_with_group(
        &self,
        ctx: &RequestContext,
        community: CommunityId,
        group: GroupId,
    ) -> AppResult<()> {
        self.unshare::<GroupCommunity>(ctx, community, group).await
    }

    /// Removes the grant of `group` over `community` made by `grantor`.
    pub async fn undo_share_community_with_group(
        &self,
        ctx: &RequestContext,
        community: CommunityId,
        group: GroupId,
        grantor: Option<UserId>,
    ) -> AppResult<()> {
        self.undo_share::<GroupCommunity>(ctx, community, group, grantor)
            .await
    }
}
