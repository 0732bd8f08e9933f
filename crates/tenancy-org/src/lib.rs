//! # Tenancy Organization Membership
//!
//! This crate provides the membership and role authorization core for
//! multi-tenant organizations.
//!
//! ## Overview
//!
//! The tenancy-org crate handles:
//! - **Roles**: The ordered role hierarchy and the static role catalog
//! - **Memberships**: User-organization relationships, one role each
//! - **Store**: The persistence contract memberships are read and written through
//! - **Service**: Add, re-role, remove and list members under the
//!   "at least one administrator" invariant
//!
//! ## Architecture
//!
//! ```text
//! caller (verified UserId)
//!   └─ MembershipService ──→ RoleCatalog (permission checks)
//!          │
//!          └─ per-organization lock ──→ MembershipStore (read-check-write)
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tenancy_org::{
//!     MembershipService, MemoryMembershipStore, OrganizationId, OrganizationMembershipService,
//!     OrganizationRole, RoleCatalog, UserId,
//! };
//!
//! async fn handover() -> tenancy_org::OrgResult<()> {
//!     let store = Arc::new(MemoryMembershipStore::new());
//!     store.register_organization("acme", "alice").await?;
//!
//!     let service = OrganizationMembershipService::new(RoleCatalog::new(), store);
//!     let org = OrganizationId::from("acme");
//!     let (alice, bob) = (UserId::from("alice"), UserId::from("bob"));
//!
//!     service.add_member(&org, &alice, &bob, OrganizationRole::Viewer).await?;
//!     service.change_role(&org, &alice, &bob, OrganizationRole::Owner).await?;
//!     service.remove_member(&org, &bob, &alice).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every operation returns [`OrgResult`]. [`OrgError::kind`] separates
//! denials (`Forbidden`, `InvariantViolation`) from missing entities
//! (`NotFound`), invalid input (`Conflict`, payload errors) and storage
//! failures (`StorageUnavailable`, which also covers backend write
//! conflicts). Nothing is retried inside this crate.

pub mod error;
pub mod ids;
pub mod lock;
pub mod membership;
pub mod roles;
pub mod service;
pub mod store;

// Re-export main types for convenience
pub use error::{ErrorKind, OrgError, OrgResult, StoreError, StoreResult};
pub use ids::{OrganizationId, UserId};
pub use lock::OrgLocks;
pub use membership::Membership;
pub use roles::{OrganizationRole, RoleCatalog, RoleOption};
pub use service::{MembershipService, OrganizationMembershipService};
pub use store::{MembershipStore, MemoryMembershipStore};
