//! The five grant relations and their relation-specific rules.
//!
//! Every relation plugs into the same share, unshare and undo template.
//! The trait captures only what differs between them: which table holds
//! the rows, who may share or remove, which domain rule applies to the
//! grantee, and which materialized pairs a write can touch.

use hs_access_core::events::GrantRelation as RelationKind;
use hs_access_core::result::AppResult;
use hs_access_core::types::{
    CommunityId, EntityId, EntityKind, GroupId, PrivilegeCode, ResourceId, UserId,
};
use hs_access_entity::user::User;
use hs_access_store::{AccessState, GrantTable};

use crate::acl::checker::require_active_grantee;
use crate::acl::{community, group, resource};
use crate::messages::{self, denied};

/// A (grantee kind, target kind) pair with its own grant table.
pub trait Relation: Send + Sync + 'static {
    /// Who receives privilege.
    type Grantee: EntityId;
    /// What privilege is held over.
    type Target: EntityId;

    /// Tag used in emitted events.
    const KIND: RelationKind;

    /// Kind of target whose last owner must be protected. `None` when the
    /// grantee can never own the target.
    const LAST_OWNER_OF: Option<EntityKind>;

    /// The relation's table.
    fn table(state: &AccessState) -> &GrantTable<Self::Grantee, Self::Target>;

    /// The relation's table, mutably.
    fn table_mut(state: &mut AccessState) -> &mut GrantTable<Self::Grantee, Self::Target>;

    /// Fail with a usage error unless `target` exists.
    fn validate_target(state: &AccessState, target: Self::Target) -> AppResult<()>;

    /// Fail with a usage error unless `grantee` exists.
    fn validate_grantee(state: &AccessState, grantee: Self::Grantee) -> AppResult<()>;

    /// Domain rules and authorization for a share. Domain rules come
    /// first so administrators cannot bypass them.
    fn authorize_share(
        state: &AccessState,
        requester: &User,
        target: Self::Target,
        grantee: Self::Grantee,
        privilege: PrivilegeCode,
    ) -> AppResult<()>;

    /// Authorization for removing every grant of `grantee` over `target`.
    fn authorize_unshare(
        state: &AccessState,
        requester: &User,
        target: Self::Target,
        grantee: Self::Grantee,
    ) -> AppResult<()>;

    /// Whether `requester` may undo grants over `target` made by others.
    fn may_override_grantor(state: &AccessState, requester: &User, target: Self::Target) -> bool;

    /// Whether `grantee` is the requester itself.
    fn is_requester(_requester: UserId, _grantee: Self::Grantee) -> bool {
        false
    }

    /// Materialized pairs whose value may change after a write of
    /// (`grantee`, `target`).
    fn affected(
        state: &AccessState,
        target: Self::Target,
        grantee: Self::Grantee,
    ) -> Vec<(UserId, ResourceId)>;
}

/// Whether a user grantee is lowering their own existing grant.
fn is_self_downgrade(
    requester: &User,
    grantee: UserId,
    held: PrivilegeCode,
    privilege: PrivilegeCode,
) -> bool {
    requester.id == grantee && held.is_some() && held.at_least(privilege)
}

fn unshare_allowed(allowed: bool) -> AppResult<()> {
    if allowed {
        Ok(())
    } else {
        Err(denied(messages::INSUFFICIENT_TO_UNSHARE))
    }
}

/// User → resource.
#[derive(Debug, Clone, Copy)]
pub struct UserResource;

impl Relation for UserResource {
    type Grantee = UserId;
    type Target = ResourceId;

    const KIND: RelationKind = RelationKind::UserResource;
    const LAST_OWNER_OF: Option<EntityKind> = Some(EntityKind::Resource);

    fn is_requester(requester: UserId, grantee: UserId) -> bool {
        requester == grantee
    }

    fn table(state: &AccessState) -> &GrantTable<UserId, ResourceId> {
        &state.user_resource
    }

    fn table_mut(state: &mut AccessState) -> &mut GrantTable<UserId, ResourceId> {
        &mut state.user_resource
    }

    fn validate_target(state: &AccessState, target: ResourceId) -> AppResult<()> {
        state.registry.resource(target).map(|_| ())
    }

    fn validate_grantee(state: &AccessState, grantee: UserId) -> AppResult<()> {
        state.registry.user(grantee).map(|_| ())
    }

    fn authorize_share(
        state: &AccessState,
        requester: &User,
        target: ResourceId,
        grantee: UserId,
        privilege: PrivilegeCode,
    ) -> AppResult<()> {
        let target = state.registry.resource(target)?;
        require_active_grantee(state.registry.user(grantee)?)?;
        let own = state.user_resource.privilege(requester.id, target.id);
        resource::authorize_share(
            state,
            requester,
            target,
            privilege,
            is_self_downgrade(requester, grantee, own, privilege),
        )
    }

    fn authorize_unshare(
        state: &AccessState,
        requester: &User,
        target: ResourceId,
        grantee: UserId,
    ) -> AppResult<()> {
        unshare_allowed(
            requester.id == grantee || resource::may_override_grantor(state, requester, target),
        )
    }

    fn may_override_grantor(state: &AccessState, requester: &User, target: ResourceId) -> bool {
        resource::may_override_grantor(state, requester, target)
    }

    fn affected(
        _state: &AccessState,
        target: ResourceId,
        grantee: UserId,
    ) -> Vec<(UserId, ResourceId)> {
        vec![(grantee, target)]
    }
}

/// Group → resource.
#[derive(Debug, Clone, Copy)]
pub struct GroupResource;

impl Relation for GroupResource {
    type Grantee = GroupId;
    type Target = ResourceId;

    const KIND: RelationKind = RelationKind::GroupResource;
    const LAST_OWNER_OF: Option<EntityKind> = None;

    fn table(state: &AccessState) -> &GrantTable<GroupId, ResourceId> {
        &state.group_resource
    }

    fn table_mut(state: &mut AccessState) -> &mut GrantTable<GroupId, ResourceId> {
        &mut state.group_resource
    }

    fn validate_target(state: &AccessState, target: ResourceId) -> AppResult<()> {
        state.registry.resource(target).map(|_| ())
    }

    fn validate_grantee(state: &AccessState, grantee: GroupId) -> AppResult<()> {
        state.registry.group(grantee).map(|_| ())
    }

    fn authorize_share(
        state: &AccessState,
        requester: &User,
        target: ResourceId,
        grantee: GroupId,
        privilege: PrivilegeCode,
    ) -> AppResult<()> {
        if privilege == PrivilegeCode::Owner {
            return Err(denied(messages::GROUPS_CANNOT_OWN_RESOURCES));
        }
        let target = state.registry.resource(target)?;
        if !state.registry.group(grantee)?.flags.active {
            return Err(denied(messages::target_not_active(EntityKind::Group)));
        }
        if !requester.admin && !state.is_member(requester.id, grantee) {
            return Err(denied(messages::NOT_GROUP_MEMBER));
        }
        resource::authorize_share(state, requester, target, privilege, false)
    }

    fn authorize_unshare(
        state: &AccessState,
        requester: &User,
        target: ResourceId,
        grantee: GroupId,
    ) -> AppResult<()> {
        unshare_allowed(
            resource::may_override_grantor(state, requester, target)
                || group::is_owner(state, requester.id, grantee),
        )
    }

    fn may_override_grantor(state: &AccessState, requester: &User, target: ResourceId) -> bool {
        resource::may_override_grantor(state, requester, target)
    }

    fn affected(
        state: &AccessState,
        target: ResourceId,
        grantee: GroupId,
    ) -> Vec<(UserId, ResourceId)> {
        state
            .members(grantee)
            .into_iter()
            .map(|user| (user, target))
            .collect()
    }
}

/// User → group (membership).
#[derive(Debug, Clone, Copy)]
pub struct UserGroup;

impl Relation for UserGroup {
    type Grantee = UserId;
    type Target = GroupId;

    const KIND: RelationKind = RelationKind::UserGroup;
    const LAST_OWNER_OF: Option<EntityKind> = Some(EntityKind::Group);

    fn is_requester(requester: UserId, grantee: UserId) -> bool {
        requester == grantee
    }

    fn table(state: &AccessState) -> &GrantTable<UserId, GroupId> {
        &state.user_group
    }

    fn table_mut(state: &mut AccessState) -> &mut GrantTable<UserId, GroupId> {
        &mut state.user_group
    }

    fn validate_target(state: &AccessState, target: GroupId) -> AppResult<()> {
        state.registry.group(target).map(|_| ())
    }

    fn validate_grantee(state: &AccessState, grantee: UserId) -> AppResult<()> {
        state.registry.user(grantee).map(|_| ())
    }

    fn authorize_share(
        state: &AccessState,
        requester: &User,
        target: GroupId,
        grantee: UserId,
        privilege: PrivilegeCode,
    ) -> AppResult<()> {
        let target = state.registry.group(target)?;
        require_active_grantee(state.registry.user(grantee)?)?;
        let own = state.user_group.privilege(requester.id, target.id);
        group::authorize_share(
            state,
            requester,
            target,
            privilege,
            is_self_downgrade(requester, grantee, own, privilege),
        )
    }

    fn authorize_unshare(
        state: &AccessState,
        requester: &User,
        target: GroupId,
        grantee: UserId,
    ) -> AppResult<()> {
        unshare_allowed(
            requester.id == grantee || group::may_override_grantor(state, requester, target),
        )
    }

    fn may_override_grantor(state: &AccessState, requester: &User, target: GroupId) -> bool {
        group::may_override_grantor(state, requester, target)
    }

    fn affected(
        state: &AccessState,
        target: GroupId,
        grantee: UserId,
    ) -> Vec<(UserId, ResourceId)> {
        state
            .resources_of_group(target)
            .into_iter()
            .map(|resource| (grantee, resource))
            .collect()
    }
}

/// User → community.
#[derive(Debug, Clone, Copy)]
pub struct UserCommunity;

impl Relation for UserCommunity {
    type Grantee = UserId;
    type Target = CommunityId;

    const KIND: RelationKind = RelationKind::UserCommunity;
    const LAST_OWNER_OF: Option<EntityKind> = Some(EntityKind::Community);

    fn is_requester(requester: UserId, grantee: UserId) -> bool {
        requester == grantee
    }

    fn table(state: &AccessState) -> &GrantTable<UserId, CommunityId> {
        &state.user_community
    }

    fn table_mut(state: &mut AccessState) -> &mut GrantTable<UserId, CommunityId> {
        &mut state.user_community
    }

    fn validate_target(state: &AccessState, target: CommunityId) -> AppResult<()> {
        state.registry.community(target).map(|_| ())
    }

    fn validate_grantee(state: &AccessState, grantee: UserId) -> AppResult<()> {
        state.registry.user(grantee).map(|_| ())
    }

    fn authorize_share(
        state: &AccessState,
        requester: &User,
        target: CommunityId,
        grantee: UserId,
        privilege: PrivilegeCode,
    ) -> AppResult<()> {
        let target = state.registry.community(target)?;
        require_active_grantee(state.registry.user(grantee)?)?;
        let own = state.user_community.privilege(requester.id, target.id);
        community::authorize_share(
            state,
            requester,
            target,
            privilege,
            is_self_downgrade(requester, grantee, own, privilege),
        )
    }

    fn authorize_unshare(
        state: &AccessState,
        requester: &User,
        target: CommunityId,
        grantee: UserId,
    ) -> AppResult<()> {
        unshare_allowed(
            requester.id == grantee || community::may_override_grantor(state, requester, target),
        )
    }

    fn may_override_grantor(state: &AccessState, requester: &User, target: CommunityId) -> bool {
        community::may_override_grantor(state, requester, target)
    }

    // Community grants never convey resource privilege.
    fn affected(
        _state: &AccessState,
        _target: CommunityId,
        _grantee: UserId,
    ) -> Vec<(UserId, ResourceId)> {
        Vec::new()
    }
}

/// Group → community (membership).
#[derive(Debug, Clone, Copy)]
pub struct GroupCommunity;

impl Relation for GroupCommunity {
    type Grantee = GroupId;
    type Target = CommunityId;

    const KIND: RelationKind = RelationKind::GroupCommunity;
    const LAST_OWNER_OF: Option<EntityKind> = None;

    fn table(state: &AccessState) -> &GrantTable<GroupId, CommunityId> {
        &state.group_community
    }

    fn table_mut(state: &mut AccessState) -> &mut GrantTable<GroupId, CommunityId> {
        &mut state.group_community
    }

    fn validate_target(state: &AccessState, target: CommunityId) -> AppResult<()> {
        state.registry.community(target).map(|_| ())
    }

    fn validate_grantee(state: &AccessState, grantee: GroupId) -> AppResult<()> {
        state.registry.group(grantee).map(|_| ())
    }

    fn authorize_share(
        state: &AccessState,
        requester: &User,
        target: CommunityId,
        grantee: GroupId,
        privilege: PrivilegeCode,
    ) -> AppResult<()> {
        if privilege == PrivilegeCode::Owner {
            return Err(denied(messages::GROUPS_CANNOT_OWN_COMMUNITIES));
        }
        let target = state.registry.community(target)?;
        if !state.registry.group(grantee)?.flags.active {
            return Err(denied(messages::target_not_active(EntityKind::Group)));
        }
        community::authorize_share(state, requester, target, privilege, false)
    }

    fn authorize_unshare(
        state: &AccessState,
        requester: &User,
        target: CommunityId,
        grantee: GroupId,
    ) -> AppResult<()> {
        unshare_allowed(
            community::may_override_grantor(state, requester, target)
                || group::is_owner(state, requester.id, grantee),
        )
    }

    fn may_override_grantor(state: &AccessState, requester: &User, target: CommunityId) -> bool {
        community::may_override_grantor(state, requester, target)
    }

    fn affected(
        _state: &AccessState,
        _target: CommunityId,
        _grantee: GroupId,
    ) -> Vec<(UserId, ResourceId)> {
        Vec::new()
    }
}
