//! JSON-lines access scripts.
//!
//! Each line is one [`Step`] naming users, resources, groups and
//! communities by a script-local name. A [`Session`] keeps the name tables
//! and applies steps to an [`AccessControl`] in order.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use hs_access_core::error::AppError;
use hs_access_core::events::GrantRelation;
use hs_access_core::result::AppResult;
use hs_access_core::types::{CommunityId, GroupId, PrivilegeCode, ResourceId, UserId};
use hs_access_entity::community::CreateCommunity;
use hs_access_entity::group::{CreateGroup, GroupFlagsUpdate};
use hs_access_entity::permission::{Action, PrincipalRef, TargetRef};
use hs_access_entity::resource::{CreateResource, ResourceFlagsUpdate};
use hs_access_entity::user::CreateUser;
use hs_access_service::{AccessControl, RequestContext};

/// One scripted operation.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    CreateUser {
        name: String,
        #[serde(default)]
        admin: bool,
    },
    SetActive {
        user: String,
        active: bool,
    },
    SetAdmin {
        user: String,
        admin: bool,
    },
    CreateResource {
        owner: String,
        name: String,
        #[serde(default)]
        flags: ResourceFlagsUpdate,
    },
    CreateGroup {
        owner: String,
        name: String,
    },
    CreateCommunity {
        owner: String,
        name: String,
    },
    ResourceFlags {
        requester: String,
        resource: String,
        flags: ResourceFlagsUpdate,
    },
    GroupFlags {
        requester: String,
        group: String,
        flags: GroupFlagsUpdate,
    },
    Share {
        relation: GrantRelation,
        requester: String,
        target: String,
        grantee: String,
        privilege: PrivilegeCode,
    },
    Unshare {
        relation: GrantRelation,
        requester: String,
        target: String,
        grantee: String,
    },
    Undo {
        relation: GrantRelation,
        requester: String,
        target: String,
        grantee: String,
        #[serde(default)]
        grantor: Option<String>,
    },
    Check {
        user: String,
        action: String,
        target: String,
        #[serde(default)]
        privilege: Option<PrivilegeCode>,
    },
    Privilege {
        principal: String,
        target: String,
    },
    Delete {
        requester: String,
        target: String,
    },
}

impl Step {
    /// Short operation name for reports.
    pub fn op(&self) -> &'static str {
        match self {
            Self::CreateUser { .. } => "create_user",
            Self::SetActive { .. } => "set_active",
            Self::SetAdmin { .. } => "set_admin",
            Self::CreateResource { .. } => "create_resource",
            Self::CreateGroup { .. } => "create_group",
            Self::CreateCommunity { .. } => "create_community",
            Self::ResourceFlags { .. } => "resource_flags",
            Self::GroupFlags { .. } => "group_flags",
            Self::Share { .. } => "share",
            Self::Unshare { .. } => "unshare",
            Self::Undo { .. } => "undo",
            Self::Check { .. } => "check",
            Self::Privilege { .. } => "privilege",
            Self::Delete { .. } => "delete",
        }
    }
}

/// Parse a script, skipping blank lines and `#` comments.
/// Returns each step with its 1-based line number.
pub fn parse(source: &str) -> AppResult<Vec<(usize, Step)>> {
    source
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(index, line)| {
            serde_json::from_str(line)
                .map(|step| (index + 1, step))
                .map_err(|e| AppError::usage(format!("Line {}: {e}", index + 1)))
        })
        .collect()
}

/// The result of one applied step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// A mutation committed.
    Done,
    /// An authorization question was answered.
    Answer { allowed: bool },
    /// An effective privilege was resolved.
    Privilege {
        privilege: PrivilegeCode,
        source: String,
    },
    /// The engine declined the operation.
    Denied { reason: String },
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Done => write!(f, "ok"),
            Self::Answer { allowed } => write!(f, "{allowed}"),
            Self::Privilege { privilege, source } => write!(f, "{privilege} ({source})"),
            Self::Denied { reason } => write!(f, "denied: {reason}"),
        }
    }
}

/// Name tables plus the engine a script runs against.
pub struct Session {
    control: AccessControl,
    users: HashMap<String, UserId>,
    objects: HashMap<String, TargetRef>,
}

impl Session {
    /// Start a session over `control`.
    pub fn new(control: AccessControl) -> Self {
        Self {
            control,
            users: HashMap::new(),
            objects: HashMap::new(),
        }
    }

    /// Apply one step. Access denials become [`Outcome::Denied`]; every
    /// other error, including unknown names, is returned.
    pub async fn apply(&mut self, step: Step) -> AppResult<Outcome> {
        match self.run(step).await {
            Err(err) if err.is_access() => Ok(Outcome::Denied {
                reason: err.message,
            }),
            other => other,
        }
    }

    async fn run(&mut self, step: Step) -> AppResult<Outcome> {
        match step {
            Step::CreateUser { name, admin } => {
                let input = if admin {
                    CreateUser::admin(name.clone())
                } else {
                    CreateUser::new(name.clone())
                };
                let user = self.control.register_user(input).await?;
                self.users.insert(name, user.id);
            }
            Step::SetActive { user, active } => {
                self.control.set_user_active(self.user(&user)?, active).await?;
            }
            Step::SetAdmin { user, admin } => {
                self.control.set_user_admin(self.user(&user)?, admin).await?;
            }
            Step::CreateResource { owner, name, flags } => {
                let ctx = self.ctx(&owner)?;
                let mut input = CreateResource::new(name.clone());
                input.flags = input.flags.apply(&flags);
                let resource = self.control.create_resource(&ctx, input).await?;
                self.bind(name, resource.id.into())?;
            }
            Step::CreateGroup { owner, name } => {
                let ctx = self.ctx(&owner)?;
                let group = self
                    .control
                    .create_group(&ctx, CreateGroup::new(name.clone()))
                    .await?;
                self.bind(name, group.id.into())?;
            }
            Step::CreateCommunity { owner, name } => {
                let ctx = self.ctx(&owner)?;
                let community = self
                    .control
                    .create_community(&ctx, CreateCommunity::new(name.clone()))
                    .await?;
                self.bind(name, community.id.into())?;
            }
            Step::ResourceFlags {
                requester,
                resource,
                flags,
            } => {
                let ctx = self.ctx(&requester)?;
                self.control
                    .update_resource_flags(&ctx, self.resource(&resource)?, flags)
                    .await?;
            }
            Step::GroupFlags {
                requester,
                group,
                flags,
            } => {
                let ctx = self.ctx(&requester)?;
                self.control
                    .update_group_flags(&ctx, self.group(&group)?, flags)
                    .await?;
            }
            Step::Share {
                relation,
                requester,
                target,
                grantee,
                privilege,
            } => self.share(relation, &requester, &target, &grantee, privilege).await?,
            Step::Unshare {
                relation,
                requester,
                target,
                grantee,
            } => self.unshare(relation, &requester, &target, &grantee).await?,
            Step::Undo {
                relation,
                requester,
                target,
                grantee,
                grantor,
            } => {
                let grantor = grantor.map(|name| self.user(&name)).transpose()?;
                self.undo(relation, &requester, &target, &grantee, grantor)
                    .await?
            }
            Step::Check {
                user,
                action,
                target,
                privilege,
            } => {
                let action = parse_action(&action, privilege)?;
                let allowed = self
                    .control
                    .check(self.user(&user)?, action, self.object(&target)?)
                    .await?;
                return Ok(Outcome::Answer { allowed });
            }
            Step::Privilege { principal, target } => {
                let principal = match self.users.get(&principal) {
                    Some(user) => PrincipalRef::User(*user),
                    None => PrincipalRef::Group(self.group(&principal)?),
                };
                let effective = self
                    .control
                    .get_effective_privilege(principal, self.object(&target)?)
                    .await?;
                return Ok(Outcome::Privilege {
                    privilege: effective.privilege,
                    source: format!("{:?}", effective.source).to_lowercase(),
                });
            }
            Step::Delete { requester, target } => {
                let ctx = self.ctx(&requester)?;
                match self.object(&target)? {
                    TargetRef::Resource(id) => self.control.delete_resource(&ctx, id).await?,
                    TargetRef::Group(id) => self.control.delete_group(&ctx, id).await?,
                    TargetRef::Community(id) => self.control.delete_community(&ctx, id).await?,
                }
                self.objects.remove(&target);
            }
        }
        Ok(Outcome::Done)
    }

    async fn share(
        &self,
        relation: GrantRelation,
        requester: &str,
        target: &str,
        grantee: &str,
        privilege: PrivilegeCode,
    ) -> AppResult<()> {
        let ctx = self.ctx(requester)?;
        let control = &self.control;
        match relation {
            GrantRelation::UserResource => {
                control
                    .share_resource_with_user(&ctx, self.resource(target)?, self.user(grantee)?, privilege)
                    .await
            }
            GrantRelation::GroupResource => {
                control
                    .share_resource_with_group(&ctx, self.resource(target)?, self.group(grantee)?, privilege)
                    .await
            }
            GrantRelation::UserGroup => {
                control
                    .share_group_with_user(&ctx, self.group(target)?, self.user(grantee)?, privilege)
                    .await
            }
            GrantRelation::UserCommunity => {
                control
                    .share_community_with_user(&ctx, self.community(target)?, self.user(grantee)?, privilege)
                    .await
            }
            GrantRelation::GroupCommunity => {
                control
                    .share_community_with_group(&ctx, self.community(target)?, self.group(grantee)?, privilege)
                    .await
            }
        }
    }

    async fn unshare(
        &self,
        relation: GrantRelation,
        requester: &str,
        target: &str,
        grantee: &str,
    ) -> AppResult<()> {
        let ctx = self.ctx(requester)?;
        let control = &self.control;
        match relation {
            GrantRelation::UserResource => {
                control
                    .unshare_resource_with_user(&ctx, self.resource(target)?, self.user(grantee)?)
                    .await
            }
            GrantRelation::GroupResource => {
                control
                    .unshare_resource_with_group(&ctx, self.resource(target)?, self.group(grantee)?)
                    .await
            }
            GrantRelation::UserGroup => {
                control
                    .unshare_group_with_user(&ctx, self.group(target)?, self.user(grantee)?)
                    .await
            }
            GrantRelation::UserCommunity => {
                control
                    .unshare_community_with_user(&ctx, self.community(target)?, self.user(grantee)?)
                    .await
            }
            GrantRelation::GroupCommunity => {
                control
                    .unshare_community_with_group(&ctx, self.community(target)?, self.group(grantee)?)
                    .await
            }
        }
    }

    async fn undo(
        &self,
        relation: GrantRelation,
        requester: &str,
        target: &str,
        grantee: &str,
        grantor: Option<UserId>,
    ) -> AppResult<()> {
        let ctx = self.ctx(requester)?;
        let control = &self.control;
        match relation {
            GrantRelation::UserResource => {
                control
                    .undo_share_resource_with_user(&ctx, self.resource(target)?, self.user(grantee)?, grantor)
                    .await
            }
            GrantRelation::GroupResource => {
                control
                    .undo_share_resource_with_group(&ctx, self.resource(target)?, self.group(grantee)?, grantor)
                    .await
            }
            GrantRelation::UserGroup => {
                control
                    .undo_share_group_with_user(&ctx, self.group(target)?, self.user(grantee)?, grantor)
                    .await
            }
            GrantRelation::UserCommunity => {
                control
                    .undo_share_community_with_user(&ctx, self.community(target)?, self.user(grantee)?, grantor)
                    .await
            }
            GrantRelation::GroupCommunity => {
                control
                    .undo_share_community_with_group(&ctx, self.community(target)?, self.group(grantee)?, grantor)
                    .await
            }
        }
    }

    // ── Name resolution ─────────────────────────────────────────────

    fn bind(&mut self, name: String, target: TargetRef) -> AppResult<()> {
        if self.objects.contains_key(&name) {
            return Err(AppError::usage(format!("Name '{name}' is already bound")));
        }
        self.objects.insert(name, target);
        Ok(())
    }

    fn ctx(&self, name: &str) -> AppResult<RequestContext> {
        self.user(name).map(RequestContext::new)
    }

    fn user(&self, name: &str) -> AppResult<UserId> {
        self.users
            .get(name)
            .copied()
            .ok_or_else(|| AppError::usage(format!("Unknown user '{name}'")))
    }

    fn object(&self, name: &str) -> AppResult<TargetRef> {
        self.objects
            .get(name)
            .copied()
            .ok_or_else(|| AppError::usage(format!("Unknown object '{name}'")))
    }

    fn resource(&self, name: &str) -> AppResult<ResourceId> {
        match self.object(name)? {
            TargetRef::Resource(id) => Ok(id),
            _ => Err(AppError::usage(format!("'{name}' is not a resource"))),
        }
    }

    fn group(&self, name: &str) -> AppResult<GroupId> {
        match self.object(name)? {
            TargetRef::Group(id) => Ok(id),
            _ => Err(AppError::usage(format!("'{name}' is not a group"))),
        }
    }

    fn community(&self, name: &str) -> AppResult<CommunityId> {
        match self.object(name)? {
            TargetRef::Community(id) => Ok(id),
            _ => Err(AppError::usage(format!("'{name}' is not a community"))),
        }
    }
}

fn parse_action(action: &str, privilege: Option<PrivilegeCode>) -> AppResult<Action> {
    match action {
        "view" => Ok(Action::View),
        "change" => Ok(Action::Change),
        "change_flags" => Ok(Action::ChangeFlags),
        "delete" => Ok(Action::Delete),
        "share" => privilege
            .map(Action::Share)
            .ok_or_else(|| AppError::usage("Action 'share' needs a privilege")),
        other => Err(AppError::usage(format!("Unknown action '{other}'"))),
    }
}

#[cfg(test)]
mod tests {
    use hs_access_core::config::access::AccessConfig;

    use super::*;

    const SCENARIO: &str = r#"
# cat shares holes with dog
{"op":"create_user","name":"cat"}
{"op":"create_user","name":"dog"}
{"op":"create_resource","owner":"cat","name":"holes"}
{"op":"share","relation":"user_resource","requester":"cat","target":"holes","grantee":"dog","privilege":"change"}
{"op":"check","user":"dog","action":"change","target":"holes"}
{"op":"check","user":"dog","action":"change_flags","target":"holes"}
{"op":"unshare","relation":"user_resource","requester":"cat","target":"holes","grantee":"cat"}
{"op":"privilege","principal":"dog","target":"holes"}
"#;

    #[tokio::test]
    async fn test_replay_scenario() {
        let steps = parse(SCENARIO).expect("parse");
        assert_eq!(steps.len(), 8);
        assert_eq!(steps[0].0, 3);

        let (control, _notifier) = AccessControl::in_memory(AccessConfig::default());
        let mut session = Session::new(control);
        let mut outcomes = Vec::new();
        for (_, step) in steps {
            outcomes.push(session.apply(step).await.expect("apply"));
        }

        assert_eq!(outcomes[4], Outcome::Answer { allowed: true });
        assert_eq!(outcomes[5], Outcome::Answer { allowed: false });
        assert_eq!(
            outcomes[6],
            Outcome::Denied {
                reason: "Cannot remove last owner of resource".to_string()
            }
        );
        assert_eq!(
            outcomes[7],
            Outcome::Privilege {
                privilege: PrivilegeCode::Change,
                source: "grant".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_unknown_names_are_errors() {
        let (control, _notifier) = AccessControl::in_memory(AccessConfig::default());
        let mut session = Session::new(control);
        let err = session
            .apply(Step::SetActive {
                user: "ghost".to_string(),
                active: false,
            })
            .await
            .unwrap_err();
        assert!(err.is_usage());
    }

    #[test]
    fn test_parse_reports_line() {
        let err = parse("\n{\"op\":\"teleport\"}").unwrap_err();
        assert!(err.message.starts_with("Line 2:"));
    }

    #[test]
    fn test_share_action_needs_privilege() {
        assert!(parse_action("share", None).is_err());
        assert_eq!(
            parse_action("share", Some(PrivilegeCode::View)).unwrap(),
            Action::Share(PrivilegeCode::View)
        );
    }
}
