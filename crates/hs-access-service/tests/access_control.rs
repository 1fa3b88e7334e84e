//! End-to-end behaviour of the `AccessControl` facade.

use hs_access_auth::messages;
use hs_access_auth::projector;
use hs_access_core::config::access::AccessConfig;
use hs_access_core::types::{GroupId, PrivilegeCode, ResourceId, UserId};
use hs_access_entity::community::CreateCommunity;
use hs_access_entity::group::{CreateGroup, GroupFlagsUpdate};
use hs_access_entity::permission::{Action, PrincipalRef, TargetRef};
use hs_access_entity::resource::{CreateResource, ResourceFlagsUpdate};
use hs_access_entity::user::CreateUser;
use hs_access_service::{AccessControl, PrivilegeSource, RequestContext};

struct Fixture {
    control: AccessControl,
    cat: UserId,
    dog: UserId,
    holes: ResourceId,
}

impl Fixture {
    fn ctx(&self, user: UserId) -> RequestContext {
        RequestContext::new(user)
    }

    async fn materialized(&self, user: UserId, resource: ResourceId) -> PrivilegeCode {
        self.control
            .store()
            .snapshot()
            .await
            .permissions
            .get(user, resource)
    }

    async fn user(&self, name: &str) -> UserId {
        self.control
            .register_user(CreateUser::new(name))
            .await
            .expect("register")
            .id
    }

    async fn group(&self, owner: UserId, name: &str) -> GroupId {
        self.control
            .create_group(&self.ctx(owner), CreateGroup::new(name))
            .await
            .expect("group")
            .id
    }
}

async fn fixture() -> Fixture {
    let (control, _notifier) = AccessControl::in_memory(AccessConfig::default());
    let cat = control
        .register_user(CreateUser::new("cat"))
        .await
        .expect("cat")
        .id;
    let dog = control
        .register_user(CreateUser::new("dog"))
        .await
        .expect("dog")
        .id;
    let holes = control
        .create_resource(&RequestContext::new(cat), CreateResource::new("all about dog holes"))
        .await
        .expect("holes")
        .id;
    Fixture {
        control,
        cat,
        dog,
        holes,
    }
}

#[tokio::test]
async fn test_end_to_end_cat_dog_holes() {
    let f = fixture().await;
    let cat = f.ctx(f.cat);

    f.control
        .share_resource_with_user(&cat, f.holes, f.dog, PrivilegeCode::Change)
        .await
        .expect("share change");
    assert!(f.control.can_change_resource(f.dog, f.holes).await.unwrap());
    assert!(!f.control.can_change_resource_flags(f.dog, f.holes).await.unwrap());

    f.control
        .share_resource_with_user(&cat, f.holes, f.dog, PrivilegeCode::View)
        .await
        .expect("downgrade");
    assert!(!f.control.can_change_resource(f.dog, f.holes).await.unwrap());
    assert!(f.control.can_view_resource(f.dog, f.holes).await.unwrap());

    f.control
        .unshare_resource_with_user(&cat, f.holes, f.dog)
        .await
        .expect("unshare");
    assert!(!f.control.can_view_resource(f.dog, f.holes).await.unwrap());
    assert_eq!(f.materialized(f.dog, f.holes).await, PrivilegeCode::None);
}

#[tokio::test]
async fn test_share_twice_keeps_one_row() {
    let f = fixture().await;
    let cat = f.ctx(f.cat);
    for _ in 0..2 {
        f.control
            .share_resource_with_user(&cat, f.holes, f.dog, PrivilegeCode::Change)
            .await
            .expect("share");
    }
    let snapshot = f.control.store().snapshot().await;
    assert_eq!(snapshot.user_resource.rows_for(f.dog, f.holes).count(), 1);
    assert_eq!(
        snapshot.user_resource.privilege(f.dog, f.holes),
        PrivilegeCode::Change
    );
}

#[tokio::test]
async fn test_strongest_privilege_wins() {
    let f = fixture().await;
    let cat = f.ctx(f.cat);
    let diggers = f.group(f.cat, "diggers").await;

    f.control
        .share_resource_with_user(&cat, f.holes, f.dog, PrivilegeCode::View)
        .await
        .expect("direct view");
    f.control
        .share_group_with_user(&cat, diggers, f.dog, PrivilegeCode::View)
        .await
        .expect("join");
    f.control
        .share_resource_with_group(&cat, f.holes, diggers, PrivilegeCode::Change)
        .await
        .expect("group change");

    let effective = f
        .control
        .get_effective_privilege(PrincipalRef::User(f.dog), TargetRef::Resource(f.holes))
        .await
        .expect("effective");
    assert_eq!(effective.privilege, PrivilegeCode::Change);
    assert_eq!(effective.source, PrivilegeSource::Grant);
}

#[tokio::test]
async fn test_last_owner_leaves_store_unchanged() {
    let f = fixture().await;
    let before = f.control.store().snapshot().await.user_resource.clone();

    let err = f
        .control
        .share_resource_with_user(&f.ctx(f.cat), f.holes, f.cat, PrivilegeCode::View)
        .await
        .unwrap_err();
    assert!(err.is_access());
    assert_eq!(err.message, "Cannot remove last owner of resource");

    let after = f.control.store().snapshot().await.user_resource.clone();
    assert_eq!(before.len(), after.len());
    assert_eq!(after.privilege(f.cat, f.holes), PrivilegeCode::Owner);
    assert_eq!(
        f.control.get_resource_owners(f.holes).await.unwrap(),
        vec![f.cat]
    );
}

#[tokio::test]
async fn test_group_cannot_own_resource_even_for_admin() {
    let f = fixture().await;
    let root = f
        .control
        .register_user(CreateUser::admin("root"))
        .await
        .expect("admin")
        .id;
    let diggers = f.group(f.cat, "diggers").await;

    for requester in [f.cat, root] {
        let err = f
            .control
            .share_resource_with_group(&f.ctx(requester), f.holes, diggers, PrivilegeCode::Owner)
            .await
            .unwrap_err();
        assert_eq!(err.message, messages::GROUPS_CANNOT_OWN_RESOURCES);
    }
    assert!(
        !f.control
            .can_share_resource_with_group(f.cat, f.holes, diggers, PrivilegeCode::Owner)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_immutable_toggles_change_but_not_ownership() {
    let f = fixture().await;
    let cat = f.ctx(f.cat);
    let immutable = |value| ResourceFlagsUpdate {
        immutable: Some(value),
        ..Default::default()
    };

    f.control
        .update_resource_flags(&cat, f.holes, immutable(true))
        .await
        .expect("freeze");
    assert!(!f.control.can_change_resource(f.cat, f.holes).await.unwrap());
    assert!(f.control.owns_resource(f.cat, f.holes).await.unwrap());

    f.control
        .update_resource_flags(&cat, f.holes, immutable(false))
        .await
        .expect("thaw");
    assert!(f.control.can_change_resource(f.cat, f.holes).await.unwrap());
}

#[tokio::test]
async fn test_flag_updates_require_ownership() {
    let f = fixture().await;
    f.control
        .share_resource_with_user(&f.ctx(f.cat), f.holes, f.dog, PrivilegeCode::Change)
        .await
        .expect("share");
    let err = f
        .control
        .update_resource_flags(
            &f.ctx(f.dog),
            f.holes,
            ResourceFlagsUpdate {
                public: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_access());
    assert!(!f.control.get_resource(f.holes).await.unwrap().flags.public);
}

#[tokio::test]
async fn test_public_resource_is_viewable_but_not_shareable_by_outsiders() {
    let f = fixture().await;
    let bat = f.user("bat").await;
    f.control
        .update_resource_flags(
            &f.ctx(f.cat),
            f.holes,
            ResourceFlagsUpdate {
                public: Some(true),
                ..Default::default()
            },
        )
        .await
        .expect("publicize");

    let effective = f
        .control
        .get_effective_privilege(PrincipalRef::User(f.dog), TargetRef::Resource(f.holes))
        .await
        .unwrap();
    assert_eq!(effective.source, PrivilegeSource::Public);
    assert!(f.control.can_view_resource(f.dog, f.holes).await.unwrap());

    let err = f
        .control
        .share_resource_with_user(&f.ctx(f.dog), f.holes, bat, PrivilegeCode::View)
        .await
        .unwrap_err();
    assert_eq!(err.message, "Requester holds no privilege over resource");
}

#[tokio::test]
async fn test_undo_and_unshare_lists_match_predicates() {
    let f = fixture().await;
    let cat = f.ctx(f.cat);
    let bat = f.user("bat").await;
    let owl = f.user("owl").await;
    f.control
        .share_resource_with_user(&cat, f.holes, f.dog, PrivilegeCode::Owner)
        .await
        .unwrap();
    f.control
        .share_resource_with_user(&cat, f.holes, bat, PrivilegeCode::Change)
        .await
        .unwrap();
    f.control
        .share_resource_with_user(&f.ctx(bat), f.holes, owl, PrivilegeCode::View)
        .await
        .unwrap();

    let users = [f.cat, f.dog, bat, owl];
    for requester in users {
        let undo = f
            .control
            .get_resource_undo_users(requester, f.holes, None)
            .await
            .unwrap();
        let unshare = f
            .control
            .get_resource_unshare_users(requester, f.holes)
            .await
            .unwrap();
        for grantee in users {
            assert_eq!(
                undo.contains(&grantee),
                f.control
                    .can_undo_share_resource_with_user(requester, f.holes, grantee, None)
                    .await
                    .unwrap()
            );
            assert_eq!(
                unshare.contains(&grantee),
                f.control
                    .can_unshare_resource_with_user(requester, f.holes, grantee)
                    .await
                    .unwrap()
            );
        }
    }

    // bat granted owl, so bat may undo it; dog (an owner) may unshare it.
    assert_eq!(
        f.control
            .get_resource_undo_users(bat, f.holes, None)
            .await
            .unwrap(),
        vec![owl]
    );
    assert!(
        f.control
            .get_resource_unshare_users(f.dog, f.holes)
            .await
            .unwrap()
            .contains(&owl)
    );
}

#[tokio::test]
async fn test_membership_cascade() {
    let f = fixture().await;
    let cat = f.ctx(f.cat);
    let u2 = f.user("u2").await;
    let g1 = f.group(f.cat, "g1").await;
    let g2 = f.group(f.cat, "g2").await;

    f.control
        .share_resource_with_group(&cat, f.holes, g1, PrivilegeCode::View)
        .await
        .unwrap();
    f.control
        .share_resource_with_group(&cat, f.holes, g2, PrivilegeCode::Change)
        .await
        .unwrap();
    f.control
        .share_group_with_user(&cat, g1, u2, PrivilegeCode::View)
        .await
        .unwrap();
    f.control
        .share_group_with_user(&cat, g2, u2, PrivilegeCode::View)
        .await
        .unwrap();
    assert_eq!(f.materialized(u2, f.holes).await, PrivilegeCode::Change);

    f.control
        .unshare_group_with_user(&cat, g2, u2)
        .await
        .unwrap();
    assert_eq!(f.materialized(u2, f.holes).await, PrivilegeCode::View);

    f.control
        .unshare_group_with_user(&cat, g1, u2)
        .await
        .unwrap();
    assert_eq!(f.materialized(u2, f.holes).await, PrivilegeCode::None);

    let snapshot = f.control.store().snapshot().await;
    assert!(projector::inconsistencies(&snapshot).is_empty());
}

#[tokio::test]
async fn test_inactive_group_conveys_nothing_until_reactivated() {
    let f = fixture().await;
    let cat = f.ctx(f.cat);
    let diggers = f.group(f.cat, "diggers").await;
    f.control
        .share_group_with_user(&cat, diggers, f.dog, PrivilegeCode::View)
        .await
        .unwrap();
    f.control
        .share_resource_with_group(&cat, f.holes, diggers, PrivilegeCode::Change)
        .await
        .unwrap();
    assert_eq!(f.materialized(f.dog, f.holes).await, PrivilegeCode::Change);

    let active = |value| GroupFlagsUpdate {
        active: Some(value),
        ..Default::default()
    };
    f.control
        .update_group_flags(&cat, diggers, active(false))
        .await
        .unwrap();
    assert_eq!(f.materialized(f.dog, f.holes).await, PrivilegeCode::None);
    assert!(!f.control.can_view_resource(f.dog, f.holes).await.unwrap());

    f.control
        .update_group_flags(&cat, diggers, active(true))
        .await
        .unwrap();
    assert_eq!(f.materialized(f.dog, f.holes).await, PrivilegeCode::Change);
}

#[tokio::test]
async fn test_admin_bypass_except_immutability() {
    let f = fixture().await;
    let root = f
        .control
        .register_user(CreateUser::admin("root"))
        .await
        .unwrap()
        .id;
    let root_ctx = f.ctx(root);

    f.control
        .share_resource_with_user(&root_ctx, f.holes, f.dog, PrivilegeCode::Owner)
        .await
        .expect("admin shares owner without grants");
    assert!(f.control.owns_resource(f.dog, f.holes).await.unwrap());
    assert!(
        f.control
            .check(root, Action::Delete, TargetRef::Resource(f.holes))
            .await
            .unwrap()
    );

    f.control
        .update_resource_flags(
            &root_ctx,
            f.holes,
            ResourceFlagsUpdate {
                immutable: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(!f.control.can_change_resource(root, f.holes).await.unwrap());
}

#[tokio::test]
async fn test_inactive_user_loses_everything() {
    let f = fixture().await;
    f.control.set_user_active(f.cat, false).await.unwrap();
    assert!(!f.control.can_view_resource(f.cat, f.holes).await.unwrap());
    let err = f
        .control
        .share_resource_with_user(&f.ctx(f.cat), f.holes, f.dog, PrivilegeCode::View)
        .await
        .unwrap_err();
    assert_eq!(err.message, messages::REQUESTER_NOT_ACTIVE);

    f.control.set_user_active(f.cat, true).await.unwrap();
    assert!(f.control.owns_resource(f.cat, f.holes).await.unwrap());
}

#[tokio::test]
async fn test_usage_errors() {
    let f = fixture().await;
    let err = f
        .control
        .share_resource_with_user(&f.ctx(f.cat), f.holes, f.dog, PrivilegeCode::None)
        .await
        .unwrap_err();
    assert!(err.is_usage());

    let err = f
        .control
        .can_view_resource(f.dog, ResourceId::new())
        .await
        .unwrap_err();
    assert!(err.is_usage());

    let group = f.group(f.cat, "diggers").await;
    let err = f
        .control
        .get_effective_privilege(PrincipalRef::Group(group), TargetRef::Group(group))
        .await
        .unwrap_err();
    assert!(err.is_usage());
}

#[tokio::test]
async fn test_resource_deletion_cascades() {
    let f = fixture().await;
    f.control
        .share_resource_with_user(&f.ctx(f.cat), f.holes, f.dog, PrivilegeCode::View)
        .await
        .unwrap();
    f.control.on_resource_deleted(f.holes).await.unwrap();

    let snapshot = f.control.store().snapshot().await;
    assert!(snapshot.user_resource.is_empty());
    assert!(snapshot.permissions.is_empty());
    drop(snapshot);
    assert!(f.control.can_view_resource(f.dog, f.holes).await.unwrap_err().is_usage());
}

#[tokio::test]
async fn test_group_deletion_cascades() {
    let f = fixture().await;
    let cat = f.ctx(f.cat);
    let diggers = f.group(f.cat, "diggers").await;
    f.control
        .share_group_with_user(&cat, diggers, f.dog, PrivilegeCode::View)
        .await
        .unwrap();
    f.control
        .share_resource_with_group(&cat, f.holes, diggers, PrivilegeCode::View)
        .await
        .unwrap();
    assert_eq!(f.materialized(f.dog, f.holes).await, PrivilegeCode::View);

    let err = f.control.delete_group(&f.ctx(f.dog), diggers).await.unwrap_err();
    assert!(err.is_access());

    f.control.delete_group(&cat, diggers).await.unwrap();
    assert_eq!(f.materialized(f.dog, f.holes).await, PrivilegeCode::None);
    assert!(f.control.get_held_groups(f.dog).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_community_membership() {
    let f = fixture().await;
    let cat = f.ctx(f.cat);
    let diggers = f.group(f.dog, "diggers").await;
    let community = f
        .control
        .create_community(&cat, CreateCommunity::new("burrowers"))
        .await
        .unwrap()
        .id;

    let err = f
        .control
        .share_community_with_group(&cat, community, diggers, PrivilegeCode::Owner)
        .await
        .unwrap_err();
    assert_eq!(err.message, messages::GROUPS_CANNOT_OWN_COMMUNITIES);

    f.control
        .share_community_with_group(&cat, community, diggers, PrivilegeCode::View)
        .await
        .unwrap();
    assert_eq!(
        f.control.get_community_groups(community).await.unwrap(),
        vec![diggers]
    );
    assert!(f.control.can_view_community(f.dog, community).await.unwrap());

    let err = f
        .control
        .unshare_community_with_user(&cat, community, f.cat)
        .await
        .unwrap_err();
    assert_eq!(err.message, "Cannot remove last owner of community");
}

#[tokio::test]
async fn test_listings() {
    let f = fixture().await;
    let cat = f.ctx(f.cat);
    let other = f
        .control
        .create_resource(&cat, CreateResource::new("tunnels"))
        .await
        .unwrap();
    f.control
        .share_resource_with_user(&cat, other.id, f.dog, PrivilegeCode::Change)
        .await
        .unwrap();
    f.control
        .share_resource_with_user(&cat, f.holes, f.dog, PrivilegeCode::View)
        .await
        .unwrap();

    assert_eq!(f.control.get_owned_resources(f.cat).await.unwrap().len(), 2);
    assert!(f.control.get_owned_resources(f.dog).await.unwrap().is_empty());
    assert_eq!(
        f.control
            .get_held_resources(f.dog, PrivilegeCode::View)
            .await
            .unwrap()
            .len(),
        2
    );
    let editable = f.control.get_editable_resources(f.dog).await.unwrap();
    assert_eq!(editable.len(), 1);
    assert_eq!(editable[0].id, other.id);

    let diggers = f.group(f.cat, "diggers").await;
    f.control
        .update_group_flags(
            &cat,
            diggers,
            GroupFlagsUpdate {
                public: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(f.control.get_public_groups().await.len(), 1);
    assert_eq!(f.control.get_discoverable_groups().await.len(), 1);
    assert_eq!(f.control.get_owned_groups(f.cat).await.unwrap().len(), 1);
    assert_eq!(f.control.get_group_owners(diggers).await.unwrap(), vec![f.cat]);
    assert!(f.control.can_view_group(f.dog, diggers).await.unwrap());
}

#[tokio::test]
async fn test_inactive_user_lists_nothing_owned() {
    let f = fixture().await;
    let diggers = f.group(f.cat, "diggers").await;
    f.control.set_user_active(f.cat, false).await.unwrap();

    assert!(f.control.get_owned_resources(f.cat).await.unwrap().is_empty());
    assert!(f.control.get_owned_groups(f.cat).await.unwrap().is_empty());
    assert!(
        f.control
            .get_held_resources(f.cat, PrivilegeCode::View)
            .await
            .unwrap()
            .is_empty()
    );

    f.control.set_user_active(f.cat, true).await.unwrap();
    assert_eq!(f.control.get_owned_resources(f.cat).await.unwrap().len(), 1);
    let owned = f.control.get_owned_groups(f.cat).await.unwrap();
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].id, diggers);
}
