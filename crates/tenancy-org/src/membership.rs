//! Membership domain models
//!
//! A membership links one user to one organization with exactly one role.
//! Role changes replace the role in place; there is never more than one
//! membership per (organization, user) pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ids::{OrganizationId, UserId};
use crate::roles::OrganizationRole;

/// Organization membership linking a user to an organization.
///
/// # Examples
///
/// ```
/// use tenancy_org::{Membership, OrganizationRole};
///
/// let membership = Membership::new("acme", "alice", OrganizationRole::Developer);
/// assert_eq!(membership.user_id.as_str(), "alice");
/// assert!(!membership.is_administrative());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    /// Unique membership ID
    pub id: Uuid,

    /// Organization ID
    pub organization_id: OrganizationId,

    /// User ID
    pub user_id: UserId,

    /// Role within the organization
    pub role: OrganizationRole,

    /// When the user joined
    pub joined_at: DateTime<Utc>,

    /// When the role last changed
    pub updated_at: DateTime<Utc>,

    /// Who added this user (None for the founding owner)
    pub added_by: Option<UserId>,
}

impl Membership {
    /// Creates a new organization membership.
    ///
    /// The membership is created with a newly generated UUID v7 ID and the
    /// current timestamp for `joined_at` and `updated_at`. The fresh ID is
    /// what makes [`MembershipStore::upsert`](crate::store::MembershipStore::upsert)
    /// reject it as a conflict when the user already has a membership.
    pub fn new(
        organization_id: impl Into<OrganizationId>,
        user_id: impl Into<UserId>,
        role: OrganizationRole,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            organization_id: organization_id.into(),
            user_id: user_id.into(),
            role,
            joined_at: now,
            updated_at: now,
            added_by: None,
        }
    }

    /// Set who added this user.
    pub fn with_adder(mut self, adder: UserId) -> Self {
        self.added_by = Some(adder);
        self
    }

    /// Return a copy carrying `role`, keeping identity and join time.
    pub fn with_role(&self, role: OrganizationRole) -> Self {
        Self {
            role,
            updated_at: Utc::now(),
            ..self.clone()
        }
    }

    /// Check if this membership may manage the organization's members.
    pub fn is_administrative(&self) -> bool {
        self.role.is_administrative()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_creation() {
        let membership = Membership::new("acme", "bob", OrganizationRole::Viewer);

        assert_eq!(membership.organization_id, OrganizationId::from("acme"));
        assert_eq!(membership.user_id, UserId::from("bob"));
        assert_eq!(membership.role, OrganizationRole::Viewer);
        assert_eq!(membership.joined_at, membership.updated_at);
        assert!(membership.added_by.is_none());
    }

    #[test]
    fn test_membership_with_adder() {
        let membership = Membership::new("acme", "bob", OrganizationRole::Viewer)
            .with_adder(UserId::from("alice"));

        assert_eq!(membership.added_by, Some(UserId::from("alice")));
    }

    #[test]
    fn test_new_memberships_never_share_an_id() {
        let first = Membership::new("acme", "bob", OrganizationRole::Viewer);
        let second = Membership::new("acme", "bob", OrganizationRole::Viewer);
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_with_role_keeps_identity() {
        let original = Membership::new("acme", "bob", OrganizationRole::Viewer);
        let promoted = original.with_role(OrganizationRole::Administrator);

        assert_eq!(promoted.id, original.id);
        assert_eq!(promoted.joined_at, original.joined_at);
        assert_eq!(promoted.role, OrganizationRole::Administrator);
        assert_eq!(original.role, OrganizationRole::Viewer);
        assert!(promoted.is_administrative());
    }
}
