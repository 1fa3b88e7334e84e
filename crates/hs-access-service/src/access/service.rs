//! The `AccessControl` facade: transaction handling, event dispatch and
//! entity lifecycle.

use std::sync::Arc;

use tracing::{debug, info, warn};

use hs_access_auth::Mutation;
use hs_access_auth::lifecycle;
use hs_access_core::config::access::AccessConfig;
use hs_access_core::result::AppResult;
use hs_access_core::traits::PermissionNotifier;
use hs_access_core::types::{CommunityId, GroupId, ResourceId, UserId};
use hs_access_entity::community::{Community, CreateCommunity};
use hs_access_entity::group::{CreateGroup, Group, GroupFlagsUpdate};
use hs_access_entity::resource::{CreateResource, Resource, ResourceFlagsUpdate};
use hs_access_entity::user::{CreateUser, User};
use hs_access_store::{AccessState, MemoryAccessStore};

use crate::context::RequestContext;
use crate::notification::BroadcastNotifier;

/// Entry point for every access-control operation.
///
/// Each mutating call runs as one store transaction: the engine validates,
/// authorizes, writes grants and re-projects materialized permissions while
/// the write lock is held. Events are dispatched to the notifier only after
/// the lock is released.
#[derive(Debug, Clone)]
pub struct AccessControl {
    /// Backing store.
    store: MemoryAccessStore,
    /// Receives events after each committed mutation.
    notifier: Arc<dyn PermissionNotifier>,
    /// Engine settings.
    config: AccessConfig,
}

impl AccessControl {
    /// Creates a new facade over `store`.
    pub fn new(
        store: MemoryAccessStore,
        notifier: Arc<dyn PermissionNotifier>,
        config: AccessConfig,
    ) -> Self {
        Self {
            store,
            notifier,
            config,
        }
    }

    /// Creates an empty in-memory engine with a broadcast notifier sized
    /// from `config`. The notifier is returned so callers can subscribe.
    pub fn in_memory(config: AccessConfig) -> (Self, BroadcastNotifier) {
        let notifier = BroadcastNotifier::new(config.notify_buffer);
        let control = Self::new(
            MemoryAccessStore::new(),
            Arc::new(notifier.clone()),
            config,
        );
        (control, notifier)
    }

    /// The backing store.
    pub fn store(&self) -> &MemoryAccessStore {
        &self.store
    }

    /// Run a read-only query against a snapshot.
    pub(crate) async fn read<T, F>(&self, query: F) -> AppResult<T>
    where
        F: FnOnce(&AccessState) -> AppResult<T>,
    {
        let snapshot = self.store.snapshot().await;
        query(&*snapshot)
    }

    /// Run a mutation inside one transaction and dispatch its events after
    /// commit. A failed mutation has written nothing.
    pub(crate) async fn mutate<T, F>(
        &self,
        actor: Option<UserId>,
        operation: &'static str,
        mutation: F,
    ) -> AppResult<T>
    where
        F: FnOnce(&mut AccessState) -> AppResult<(T, Mutation)>,
    {
        let mut tx = self.store.transaction().await;
        match mutation(&mut *tx) {
            Ok((value, changes)) => {
                tx.commit();
                self.dispatch(actor, changes).await;
                Ok(value)
            }
            Err(err) => {
                drop(tx);
                if err.is_access() && self.config.log_denials {
                    debug!(operation, actor = ?actor, error = %err, "Access denied");
                }
                Err(err)
            }
        }
    }

    async fn dispatch(&self, actor: Option<UserId>, changes: Mutation) {
        if changes.is_empty() {
            return;
        }
        let events = changes.into_events(actor);
        if let Err(e) = self.notifier.notify(&events).await {
            warn!(error = %e, count = events.len(), "Failed to deliver access events");
        }
    }

    // ── Users ───────────────────────────────────────────────────────

    /// Registers a user account.
    pub async fn register_user(&self, input: CreateUser) -> AppResult<User> {
        let user = self
            .mutate(None, "register_user", |state| {
                Ok((lifecycle::register_user(state, input)?, Mutation::default()))
            })
            .await?;
        info!(user_id = %user.id, username = %user.username, admin = user.admin, "User registered");
        Ok(user)
    }

    /// Activates or deactivates a user.
    pub async fn set_user_active(&self, user: UserId, active: bool) -> AppResult<User> {
        let user = self
            .mutate(None, "set_user_active", |state| {
                Ok((lifecycle::set_user_active(state, user, active)?, Mutation::default()))
            })
            .await?;
        info!(user_id = %user.id, active, "User activity changed");
        Ok(user)
    }

    /// Grants or revokes administrator status.
    pub async fn set_user_admin(&self, user: UserId, admin: bool) -> AppResult<User> {
        let user = self
            .mutate(None, "set_user_admin", |state| {
                Ok((lifecycle::set_user_admin(state, user, admin)?, Mutation::default()))
            })
            .await?;
        info!(user_id = %user.id, admin, "User admin status changed");
        Ok(user)
    }

    /// Looks up a user by username.
    pub async fn find_user(&self, username: &str) -> Option<User> {
        let snapshot = self.store.snapshot().await;
        snapshot.registry.user_by_name(username).cloned()
    }

    // ── Resources, groups, communities ──────────────────────────────

    /// Creates a resource owned by the requester.
    pub async fn create_resource(
        &self,
        ctx: &RequestContext,
        input: CreateResource,
    ) -> AppResult<Resource> {
        let owner = ctx.user_id;
        let resource = self
            .mutate(Some(owner), "create_resource", |state| {
                lifecycle::create_resource(state, owner, input)
            })
            .await?;
        info!(
            resource_id = %resource.id,
            owner = %owner,
            title = %resource.title,
            "Resource created"
        );
        Ok(resource)
    }

    /// Creates a group owned by the requester.
    pub async fn create_group(&self, ctx: &RequestContext, input: CreateGroup) -> AppResult<Group> {
        let owner = ctx.user_id;
        let group = self
            .mutate(Some(owner), "create_group", |state| {
                lifecycle::create_group(state, owner, input)
            })
            .await?;
        info!(group_id = %group.id, owner = %owner, name = %group.name, "Group created");
        Ok(group)
    }

    /// Creates a community owned by the requester.
    pub async fn create_community(
        &self,
        ctx: &RequestContext,
        input: CreateCommunity,
    ) -> AppResult<Community> {
        let owner = ctx.user_id;
        let community = self
            .mutate(Some(owner), "create_community", |state| {
                lifecycle::create_community(state, owner, input)
            })
            .await?;
        info!(
            community_id = %community.id,
            owner = %owner,
            name = %community.name,
            "Community created"
        );
        Ok(community)
    }

    /// Changes resource flags. Requires ownership or admin.
    pub async fn update_resource_flags(
        &self,
        ctx: &RequestContext,
        resource: ResourceId,
        update: ResourceFlagsUpdate,
    ) -> AppResult<Resource> {
        let requester = ctx.user_id;
        let resource = self
            .mutate(Some(requester), "update_resource_flags", |state| {
                let updated = lifecycle::update_resource_flags(state, requester, resource, &update)?;
                Ok((updated, Mutation::default()))
            })
            .await?;
        info!(
            resource_id = %resource.id,
            requester = %requester,
            flags = ?resource.flags,
            "Resource flags updated"
        );
        Ok(resource)
    }

    /// Changes group flags. Requires ownership or admin.
    pub async fn update_group_flags(
        &self,
        ctx: &RequestContext,
        group: GroupId,
        update: GroupFlagsUpdate,
    ) -> AppResult<Group> {
        let requester = ctx.user_id;
        let group = self
            .mutate(Some(requester), "update_group_flags", |state| {
                lifecycle::update_group_flags(state, requester, group, &update)
            })
            .await?;
        info!(
            group_id = %group.id,
            requester = %requester,
            flags = ?group.flags,
            "Group flags updated"
        );
        Ok(group)
    }

    /// Deletes a resource on behalf of its owner or an admin.
    pub async fn delete_resource(&self, ctx: &RequestContext, resource: ResourceId) -> AppResult<()> {
        let requester = ctx.user_id;
        self.mutate(Some(requester), "delete_resource", |state| {
            Ok(((), lifecycle::delete_resource(state, requester, resource)?))
        })
        .await?;
        info!(resource_id = %resource, requester = %requester, "Resource deleted");
        Ok(())
    }

    /// Deletes a group on behalf of its owner or an admin.
    pub async fn delete_group(&self, ctx: &RequestContext, group: GroupId) -> AppResult<()> {
        let requester = ctx.user_id;
        self.mutate(Some(requester), "delete_group", |state| {
            Ok(((), lifecycle::delete_group(state, requester, group)?))
        })
        .await?;
        info!(group_id = %group, requester = %requester, "Group deleted");
        Ok(())
    }

    /// Deletes a community on behalf of its owner or an admin.
    pub async fn delete_community(
        &self,
        ctx: &RequestContext,
        community: CommunityId,
    ) -> AppResult<()> {
        let requester = ctx.user_id;
        self.mutate(Some(requester), "delete_community", |state| {
            Ok(((), lifecycle::delete_community(state, requester, community)?))
        })
        .await?;
        info!(community_id = %community, requester = %requester, "Community deleted");
        Ok(())
    }

    // ── Cascade hooks ───────────────────────────────────────────────

    /// Called by the resource-owning system after it deleted a resource.
    pub async fn on_resource_deleted(&self, resource: ResourceId) -> AppResult<()> {
        self.mutate(None, "on_resource_deleted", |state| {
            Ok(((), lifecycle::on_resource_deleted(state, resource)?))
        })
        .await
    }

    /// Called after a group was deleted elsewhere.
    pub async fn on_group_deleted(&self, group: GroupId) -> AppResult<()> {
        self.mutate(None, "on_group_deleted", |state| {
            Ok(((), lifecycle::on_group_deleted(state, group)?))
        })
        .await
    }

    /// Called after a community was deleted elsewhere.
    pub async fn on_community_deleted(&self, community: CommunityId) -> AppResult<()> {
        self.mutate(None, "on_community_deleted", |state| {
            Ok(((), lifecycle::on_community_deleted(state, community)?))
        })
        .await
    }
}
