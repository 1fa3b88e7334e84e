//! Effective privilege resolution.
//!
//! Resolution order for a user over a resource:
//! 1. Inactive users hold nothing.
//! 2. Admin bypass: admins hold `OWNER` over everything.
//! 3. Materialized grant-derived privilege (direct or via active groups).
//! 4. Immutable resources weaken `CHANGE` to `VIEW`.
//! 5. Public resources raise `NONE` to `VIEW`.

use serde::{Deserialize, Serialize};

use hs_access_core::error::AppError;
use hs_access_core::result::AppResult;
use hs_access_core::types::PrivilegeCode;
use hs_access_entity::community::Community;
use hs_access_entity::group::Group;
use hs_access_entity::permission::{PrincipalRef, TargetRef};
use hs_access_entity::resource::Resource;
use hs_access_entity::user::User;
use hs_access_store::AccessState;

use super::inheritance::conveys;

/// Result of resolving an effective privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectivePrivilege {
    /// The resolved level.
    pub privilege: PrivilegeCode,
    /// Where the level came from.
    pub source: PrivilegeSource,
}

/// Where an effective privilege was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivilegeSource {
    /// The principal is inactive and holds nothing.
    Inactive,
    /// The user is an administrator.
    AdminBypass,
    /// Direct or group-derived grants.
    Grant,
    /// The target is public.
    Public,
    /// No applicable privilege.
    Denied,
}

impl EffectivePrivilege {
    fn new(privilege: PrivilegeCode, source: PrivilegeSource) -> Self {
        Self { privilege, source }
    }

    fn inactive() -> Self {
        Self::new(PrivilegeCode::None, PrivilegeSource::Inactive)
    }

    fn admin() -> Self {
        Self::new(PrivilegeCode::Owner, PrivilegeSource::AdminBypass)
    }

    /// Grant-derived level with the public floor applied.
    fn from_grants(granted: PrivilegeCode, public: bool) -> Self {
        if granted.is_some() {
            Self::new(granted, PrivilegeSource::Grant)
        } else if public {
            Self::new(PrivilegeCode::View, PrivilegeSource::Public)
        } else {
            Self::new(PrivilegeCode::None, PrivilegeSource::Denied)
        }
    }

    /// Whether the resolved level is at least `required`.
    pub fn allows(&self, required: PrivilegeCode) -> bool {
        self.privilege.at_least(required)
    }
}

/// Weaken `CHANGE` to `VIEW` on immutable resources. `OWNER` is kept so
/// owners can still manage flags and sharing.
fn immutable_ceiling(privilege: PrivilegeCode, resource: &Resource) -> PrivilegeCode {
    if resource.flags.immutable && privilege == PrivilegeCode::Change {
        PrivilegeCode::View
    } else {
        privilege
    }
}

/// The privilege a user holds over a resource through grants alone,
/// after the immutable ceiling. This is what a user may pass on when
/// sharing; the public floor is never shareable.
pub fn granted_resource_privilege(
    state: &AccessState,
    user: &User,
    resource: &Resource,
) -> PrivilegeCode {
    immutable_ceiling(state.permissions.get(user.id, resource.id), resource)
}

/// Effective privilege of a user over a resource.
pub fn resource_privilege(
    state: &AccessState,
    user: &User,
    resource: &Resource,
) -> EffectivePrivilege {
    if !user.active {
        return EffectivePrivilege::inactive();
    }
    if user.admin {
        return EffectivePrivilege::admin();
    }
    EffectivePrivilege::from_grants(
        granted_resource_privilege(state, user, resource),
        resource.flags.public,
    )
}

/// Effective privilege of a user over a group.
pub fn group_privilege(state: &AccessState, user: &User, group: &Group) -> EffectivePrivilege {
    if !user.active {
        return EffectivePrivilege::inactive();
    }
    if user.admin {
        return EffectivePrivilege::admin();
    }
    EffectivePrivilege::from_grants(
        state.user_group.privilege(user.id, group.id),
        group.is_public(),
    )
}

/// Effective privilege of a user over a community.
pub fn community_privilege(
    state: &AccessState,
    user: &User,
    community: &Community,
) -> EffectivePrivilege {
    if !user.active {
        return EffectivePrivilege::inactive();
    }
    if user.admin {
        return EffectivePrivilege::admin();
    }
    EffectivePrivilege::from_grants(
        state.user_community.privilege(user.id, community.id),
        community.flags.active && community.flags.public,
    )
}

/// Effective privilege of a group over a resource.
pub fn group_resource_privilege(
    state: &AccessState,
    group: &Group,
    resource: &Resource,
) -> EffectivePrivilege {
    if !conveys(state, group.id) {
        return EffectivePrivilege::inactive();
    }
    EffectivePrivilege::from_grants(
        immutable_ceiling(state.group_resource.privilege(group.id, resource.id), resource),
        resource.flags.public,
    )
}

/// Effective privilege of a group over a community.
pub fn group_community_privilege(
    state: &AccessState,
    group: &Group,
    community: &Community,
) -> EffectivePrivilege {
    if !group.flags.active {
        return EffectivePrivilege::inactive();
    }
    EffectivePrivilege::from_grants(
        state.group_community.privilege(group.id, community.id),
        community.flags.active && community.flags.public,
    )
}

/// Effective privilege of any principal over any target.
///
/// Groups cannot hold privilege over groups; asking is a usage error.
pub fn effective_privilege(
    state: &AccessState,
    principal: PrincipalRef,
    target: TargetRef,
) -> AppResult<EffectivePrivilege> {
    let registry = &state.registry;
    match (principal, target) {
        (PrincipalRef::User(user), TargetRef::Resource(resource)) => Ok(resource_privilege(
            state,
            registry.user(user)?,
            registry.resource(resource)?,
        )),
        (PrincipalRef::User(user), TargetRef::Group(group)) => Ok(group_privilege(
            state,
            registry.user(user)?,
            registry.group(group)?,
        )),
        (PrincipalRef::User(user), TargetRef::Community(community)) => Ok(community_privilege(
            state,
            registry.user(user)?,
            registry.community(community)?,
        )),
        (PrincipalRef::Group(group), TargetRef::Resource(resource)) => {
            Ok(group_resource_privilege(
                state,
                registry.group(group)?,
                registry.resource(resource)?,
            ))
        }
        (PrincipalRef::Group(group), TargetRef::Community(community)) => {
            Ok(group_community_privilege(
                state,
                registry.group(group)?,
                registry.community(community)?,
            ))
        }
        (PrincipalRef::Group(_), TargetRef::Group(_)) => Err(AppError::usage(
            "Groups cannot hold privilege over groups",
        )),
    }
}
