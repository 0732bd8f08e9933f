//! Membership service
//!
//! Enforces the membership invariants on top of a [`MembershipStore`]:
//! who may add, re-role and remove members, and that every organization
//! keeps at least one administrative member at all times.

use async_trait::async_trait;
use std::sync::Arc;
use tenancy_rbac::{Action, ResourceType};
use tracing::{debug, instrument, warn};

use crate::error::{OrgError, OrgResult};
use crate::ids::{OrganizationId, UserId};
use crate::lock::OrgLocks;
use crate::membership::Membership;
use crate::roles::{OrganizationRole, RoleCatalog, RoleOption};
use crate::store::MembershipStore;

/// Caller-facing membership operations.
///
/// The caller id is assumed to be verified by the authentication layer.
#[async_trait]
pub trait MembershipService: Send + Sync {
    /// Roles an organization offers, ordered by ascending privilege.
    ///
    /// Informational; no authorization is required.
    fn list_role_options(&self) -> Vec<RoleOption>;

    /// Members of `org`.
    ///
    /// Fails with `NotFound` for an unknown organization and `Forbidden`
    /// if the caller is not a member.
    async fn list_members(&self, org: &OrganizationId, caller: &UserId) -> OrgResult<Vec<Membership>>;

    /// A single member of `org`, visible to any member.
    async fn membership(
        &self,
        org: &OrganizationId,
        caller: &UserId,
        target: &UserId,
    ) -> OrgResult<Membership>;

    /// Add `target` to `org` with `role`.
    async fn add_member(
        &self,
        org: &OrganizationId,
        caller: &UserId,
        target: &UserId,
        role: OrganizationRole,
    ) -> OrgResult<Membership>;

    /// Replace the role of an existing member.
    async fn change_role(
        &self,
        org: &OrganizationId,
        caller: &UserId,
        target: &UserId,
        new_role: OrganizationRole,
    ) -> OrgResult<Membership>;

    /// Remove a member from `org`.
    async fn remove_member(
        &self,
        org: &OrganizationId,
        caller: &UserId,
        target: &UserId,
    ) -> OrgResult<()>;
}

/// Default [`MembershipService`] backed by a [`MembershipStore`].
///
/// Every write runs its read-check-write sequence under the organization's
/// lock, so the administrator invariant cannot be raced.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use tenancy_org::{
///     MembershipService, MemoryMembershipStore, OrganizationId, OrganizationMembershipService,
///     OrganizationRole, RoleCatalog, UserId,
/// };
///
/// async fn example() {
///     let store = Arc::new(MemoryMembershipStore::new());
///     store.register_organization("acme", "alice").await.unwrap();
///
///     let service = OrganizationMembershipService::new(RoleCatalog::new(), store);
///     let org = OrganizationId::from("acme");
///     service
///         .add_member(&org, &UserId::from("alice"), &UserId::from("bob"), OrganizationRole::Viewer)
///         .await
///         .unwrap();
///
///     let members = service.list_members(&org, &UserId::from("bob")).await.unwrap();
///     assert_eq!(members.len(), 2);
/// }
/// ```
pub struct OrganizationMembershipService {
    catalog: RoleCatalog,
    store: Arc<dyn MembershipStore>,
    locks: OrgLocks,
}

impl std::fmt::Debug for OrganizationMembershipService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrganizationMembershipService")
            .field("catalog", &self.catalog)
            .finish()
    }
}

impl OrganizationMembershipService {
    /// Create the service from its collaborators.
    pub fn new(catalog: RoleCatalog, store: Arc<dyn MembershipStore>) -> Self {
        Self {
            catalog,
            store,
            locks: OrgLocks::new(),
        }
    }

    /// Resolve the caller's membership or reject with `Forbidden`.
    fn caller_membership<'a>(
        members: &'a [Membership],
        org: &OrganizationId,
        caller: &UserId,
    ) -> OrgResult<&'a Membership> {
        find(members, caller).ok_or_else(|| {
            warn!(org = %org, caller = %caller, "Caller is not a member");
            OrgError::Forbidden(format!("{} is not a member of {}", caller, org))
        })
    }

    /// Resolve the target's membership or reject with `NotFound`.
    fn target_membership<'a>(
        members: &'a [Membership],
        org: &OrganizationId,
        target: &UserId,
    ) -> OrgResult<&'a Membership> {
        find(members, target)
            .ok_or_else(|| OrgError::NotFound(format!("{} is not a member of {}", target, org)))
    }

    /// Check that `caller` may move `target` to `new_role` (`None` = remove).
    ///
    /// Anyone may lower or give up their own role. Changing somebody else
    /// needs an administrative role that is at least as high as both the
    /// target's current role and the role being granted.
    fn authorize_change(
        &self,
        caller: &Membership,
        target: &Membership,
        new_role: Option<OrganizationRole>,
    ) -> OrgResult<()> {
        let denied = |reason: String| {
            warn!(
                caller = %caller.user_id,
                target = %target.user_id,
                reason = %reason,
                "Membership change denied"
            );
            Err(OrgError::Forbidden(reason))
        };

        if caller.user_id == target.user_id {
            return match new_role {
                Some(role) if role > caller.role => {
                    denied(format!("{} cannot raise their own role", caller.user_id))
                }
                _ => Ok(()),
            };
        }

        if !self
            .catalog
            .allows(caller.role, ResourceType::Member, Action::Manage)
        {
            return denied(format!("{} cannot manage members", caller.user_id));
        }
        if target.role > caller.role {
            return denied(format!(
                "{} cannot modify {} who holds a higher role",
                caller.user_id, target.user_id
            ));
        }
        if let Some(role) = new_role {
            if role > caller.role {
                return denied(format!(
                    "{} cannot grant {} above their own role",
                    caller.user_id, role
                ));
            }
        }
        Ok(())
    }

    /// Reject a change that would leave the organization without an
    /// administrative member.
    fn ensure_admin_remains(
        &self,
        members: &[Membership],
        target: &Membership,
        new_role: Option<OrganizationRole>,
    ) -> OrgResult<()> {
        let others = members
            .iter()
            .filter(|m| m.user_id != target.user_id)
            .filter(|m| self.catalog.is_administrative(m.role))
            .count();
        let proposed = new_role
            .map(|role| usize::from(self.catalog.is_administrative(role)))
            .unwrap_or(0);

        if others + proposed == 0 {
            warn!(
                org = %target.organization_id,
                target = %target.user_id,
                "Change would leave organization without an administrator"
            );
            return Err(OrgError::InvariantViolation(format!(
                "{} is the last administrator of {}; promote another member first",
                target.user_id, target.organization_id
            )));
        }
        Ok(())
    }
}

fn find<'a>(members: &'a [Membership], user: &UserId) -> Option<&'a Membership> {
    members.iter().find(|m| &m.user_id == user)
}

#[async_trait]
impl MembershipService for OrganizationMembershipService {
    fn list_role_options(&self) -> Vec<RoleOption> {
        self.catalog.list_roles()
    }

    #[instrument(skip_all, fields(org = %org, caller = %caller))]
    async fn list_members(&self, org: &OrganizationId, caller: &UserId) -> OrgResult<Vec<Membership>> {
        let mut members = self.store.list(org).await?;

        let caller_role = Self::caller_membership(&members, org, caller)?.role;
        if !self
            .catalog
            .allows(caller_role, ResourceType::Member, Action::List)
        {
            return Err(OrgError::Forbidden(format!(
                "{} cannot list members of {}",
                caller, org
            )));
        }

        members.sort_by(|a, b| b.role.cmp(&a.role).then_with(|| a.user_id.cmp(&b.user_id)));
        debug!(count = members.len(), "Listed members");
        Ok(members)
    }

    #[instrument(skip_all, fields(org = %org, caller = %caller, target = %target))]
    async fn membership(
        &self,
        org: &OrganizationId,
        caller: &UserId,
        target: &UserId,
    ) -> OrgResult<Membership> {
        let members = self.store.list(org).await?;
        Self::caller_membership(&members, org, caller)?;
        Self::target_membership(&members, org, target).cloned()
    }

    #[instrument(skip_all, fields(org = %org, caller = %caller, target = %target, role = %role))]
    async fn add_member(
        &self,
        org: &OrganizationId,
        caller: &UserId,
        target: &UserId,
        role: OrganizationRole,
    ) -> OrgResult<Membership> {
        let _guard = self.locks.acquire(org).await;
        let members = self.store.list(org).await?;

        let caller_membership = Self::caller_membership(&members, org, caller)?;
        if !self
            .catalog
            .allows(caller_membership.role, ResourceType::Member, Action::Create)
        {
            warn!("Caller cannot add members");
            return Err(OrgError::Forbidden(format!(
                "{} cannot add members to {}",
                caller, org
            )));
        }
        if role > caller_membership.role {
            warn!("Caller cannot grant a role above their own");
            return Err(OrgError::Forbidden(format!(
                "{} cannot grant {} above their own role",
                caller, role
            )));
        }
        if find(&members, target).is_some() {
            return Err(OrgError::Conflict(format!(
                "{} is already a member of {}; change their role instead",
                target, org
            )));
        }

        let membership = Membership::new(org.clone(), target.clone(), role).with_adder(caller.clone());
        let membership = self.store.upsert(membership).await?;

        debug!(membership_id = %membership.id, "Member added");
        Ok(membership)
    }

    #[instrument(skip_all, fields(org = %org, caller = %caller, target = %target, new_role = %new_role))]
    async fn change_role(
        &self,
        org: &OrganizationId,
        caller: &UserId,
        target: &UserId,
        new_role: OrganizationRole,
    ) -> OrgResult<Membership> {
        let _guard = self.locks.acquire(org).await;
        let members = self.store.list(org).await?;

        let caller_membership = Self::caller_membership(&members, org, caller)?;
        let target_membership = Self::target_membership(&members, org, target)?;

        self.ensure_admin_remains(&members, target_membership, Some(new_role))?;
        self.authorize_change(caller_membership, target_membership, Some(new_role))?;

        if target_membership.role == new_role {
            return Ok(target_membership.clone());
        }

        let updated = self
            .store
            .upsert(target_membership.with_role(new_role))
            .await?;

        debug!(from = %target_membership.role, to = %updated.role, "Role changed");
        Ok(updated)
    }

    #[instrument(skip_all, fields(org = %org, caller = %caller, target = %target))]
    async fn remove_member(
        &self,
        org: &OrganizationId,
        caller: &UserId,
        target: &UserId,
    ) -> OrgResult<()> {
        let _guard = self.locks.acquire(org).await;
        let members = self.store.list(org).await?;

        let caller_membership = Self::caller_membership(&members, org, caller)?;
        let target_membership = Self::target_membership(&members, org, target)?;

        self.ensure_admin_remains(&members, target_membership, None)?;
        self.authorize_change(caller_membership, target_membership, None)?;

        self.store.delete(org, target).await?;

        debug!(role = %target_membership.role, "Member removed");
        Ok(())
    }
}
