//! Membership persistence
//!
//! This module provides the store abstraction the membership service reads
//! and writes through, and an in-memory implementation.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::ids::{OrganizationId, UserId};
use crate::membership::Membership;
use crate::roles::OrganizationRole;

/// Durable mapping of (organization, user) to membership.
///
/// Implementations must make writes linearizable per organization:
/// concurrent upserts and deletes on the same organization observe one
/// serial order.
#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// Fetch one membership, `Ok(None)` if the user is not a member.
    async fn get(&self, org: &OrganizationId, user: &UserId) -> StoreResult<Option<Membership>>;

    /// All memberships of an organization, without duplicates.
    ///
    /// Returns `StoreError::NotFound` if the organization is unknown.
    async fn list(&self, org: &OrganizationId) -> StoreResult<Vec<Membership>>;

    /// Atomically insert or replace a membership.
    ///
    /// Rows are matched by `Membership::id`. A row for the same
    /// (organization, user) pair is replaced only if it carries the same
    /// id, as produced by [`Membership::with_role`]; otherwise this returns
    /// `StoreError::Conflict`. Since [`Membership::new`] always generates a
    /// fresh id, upserting a new membership never overwrites an existing
    /// one.
    async fn upsert(&self, membership: Membership) -> StoreResult<Membership>;

    /// Delete a membership.
    ///
    /// Returns `StoreError::NotFound` if the user is not a member.
    async fn delete(&self, org: &OrganizationId, user: &UserId) -> StoreResult<()>;
}

/// In-memory membership store.
///
/// This is suitable for single-process applications and testing.
#[derive(Default)]
pub struct MemoryMembershipStore {
    organizations: RwLock<HashMap<OrganizationId, HashMap<UserId, Membership>>>,
    unavailable: AtomicBool,
}

impl std::fmt::Debug for MemoryMembershipStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryMembershipStore")
            .field("unavailable", &self.unavailable.load(Ordering::Relaxed))
            .finish()
    }
}

impl MemoryMembershipStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an organization with its founding owner.
    ///
    /// Organization creation belongs to an external collaborator; this is
    /// the hook it uses to make the organization known to the store.
    pub async fn register_organization(
        &self,
        org: impl Into<OrganizationId>,
        owner: impl Into<UserId>,
    ) -> StoreResult<Membership> {
        self.check_available()?;
        let membership = Membership::new(org, owner, OrganizationRole::Owner);

        let mut organizations = self.organizations.write().await;
        if organizations.contains_key(&membership.organization_id) {
            return Err(StoreError::Conflict(format!(
                "organization {} already exists",
                membership.organization_id
            )));
        }

        let mut members = HashMap::new();
        members.insert(membership.user_id.clone(), membership.clone());
        organizations.insert(membership.organization_id.clone(), members);

        Ok(membership)
    }

    /// Make every subsequent call fail with `StoreError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "membership store is unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl MembershipStore for MemoryMembershipStore {
    async fn get(&self, org: &OrganizationId, user: &UserId) -> StoreResult<Option<Membership>> {
        self.check_available()?;
        let organizations = self.organizations.read().await;
        Ok(organizations
            .get(org)
            .and_then(|members| members.get(user))
            .cloned())
    }

    async fn list(&self, org: &OrganizationId) -> StoreResult<Vec<Membership>> {
        self.check_available()?;
        let organizations = self.organizations.read().await;
        organizations
            .get(org)
            .map(|members| members.values().cloned().collect())
            .ok_or_else(|| StoreError::NotFound(format!("organization {}", org)))
    }

    async fn upsert(&self, membership: Membership) -> StoreResult<Membership> {
        self.check_available()?;
        let mut organizations = self.organizations.write().await;
        let members = organizations
            .get_mut(&membership.organization_id)
            .ok_or_else(|| {
                StoreError::NotFound(format!("organization {}", membership.organization_id))
            })?;

        if let Some(existing) = members.get(&membership.user_id) {
            if existing.id != membership.id {
                return Err(StoreError::Conflict(format!(
                    "user {} already has a membership in {}",
                    membership.user_id, membership.organization_id
                )));
            }
        }

        members.insert(membership.user_id.clone(), membership.clone());
        Ok(membership)
    }

    async fn delete(&self, org: &OrganizationId, user: &UserId) -> StoreResult<()> {
        self.check_available()?;
        let mut organizations = self.organizations.write().await;
        organizations
            .get_mut(org)
            .and_then(|members| members.remove(user))
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("membership of {} in {}", user, org)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn org() -> OrganizationId {
        OrganizationId::from("acme")
    }

    #[tokio::test]
    async fn test_register_and_get() {
        let store = MemoryMembershipStore::new();
        let owner = store.register_organization("acme", "alice").await.unwrap();
        assert_eq!(owner.role, OrganizationRole::Owner);

        let fetched = store.get(&org(), &UserId::from("alice")).await.unwrap();
        assert_eq!(fetched, Some(owner));
        assert!(store
            .get(&org(), &UserId::from("bob"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_register_twice_conflicts() {
        let store = MemoryMembershipStore::new();
        store.register_organization("acme", "alice").await.unwrap();
        let err = store.register_organization("acme", "bob").await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_list_unknown_organization() {
        let store = MemoryMembershipStore::new();
        let err = store.list(&org()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_upsert_replaces_role() {
        let store = MemoryMembershipStore::new();
        store.register_organization("acme", "alice").await.unwrap();

        let bob = store
            .upsert(Membership::new("acme", "bob", OrganizationRole::Viewer))
            .await
            .unwrap();
        store
            .upsert(bob.with_role(OrganizationRole::Developer))
            .await
            .unwrap();

        let members = store.list(&org()).await.unwrap();
        assert_eq!(members.len(), 2);
        let bob = members
            .iter()
            .find(|m| m.user_id.as_str() == "bob")
            .unwrap();
        assert_eq!(bob.role, OrganizationRole::Developer);
    }

    #[tokio::test]
    async fn test_upsert_of_foreign_row_conflicts() {
        let store = MemoryMembershipStore::new();
        store.register_organization("acme", "alice").await.unwrap();
        store
            .upsert(Membership::new("acme", "bob", OrganizationRole::Viewer))
            .await
            .unwrap();

        let err = store
            .upsert(Membership::new("acme", "bob", OrganizationRole::Owner))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_upsert_into_unknown_organization() {
        let store = MemoryMembershipStore::new();
        let err = store
            .upsert(Membership::new("ghost", "bob", OrganizationRole::Viewer))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryMembershipStore::new();
        store.register_organization("acme", "alice").await.unwrap();
        store
            .upsert(Membership::new("acme", "bob", OrganizationRole::Viewer))
            .await
            .unwrap();

        store.delete(&org(), &UserId::from("bob")).await.unwrap();
        let err = store.delete(&org(), &UserId::from("bob")).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert_eq!(store.list(&org()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unavailable_store() {
        let store = MemoryMembershipStore::new();
        store.register_organization("acme", "alice").await.unwrap();
        store.set_unavailable(true);

        let err = store.list(&org()).await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));

        store.set_unavailable(false);
        assert!(store.list(&org()).await.is_ok());
    }
}
