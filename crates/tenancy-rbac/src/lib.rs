//! # Tenancy RBAC (Role-Based Access Control)
//!
//! This crate provides the permission vocabulary that organization roles
//! are expressed in.
//!
//! ## Overview
//!
//! The tenancy-rbac crate handles:
//! - **Resources**: Organization-scoped resource types
//! - **Actions**: Operations that can be performed on resources
//! - **Permissions**: Resource + Action combinations
//! - **Permission Sets**: Collections of permissions granted by a role
//!
//! ## Architecture
//!
//! ```text
//! Permission = Resource + Action
//!
//! Examples:
//!   "member:list"      - See who belongs to the organization
//!   "member:manage"    - Add, remove and re-role members
//!   "logo:import"      - Replace the organization logo
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use tenancy_rbac::{Action, Permission, PermissionSet, ResourceType};
//!
//! let mut set = PermissionSet::new();
//! set.add(Permission::new(ResourceType::Member, Action::Manage));
//!
//! assert!(set.has(&Permission::new(ResourceType::Member, Action::List)));
//! ```
//!
//! ## Action Implications
//!
//! Some actions imply others:
//! - `Manage` implies all actions
//! - `Create`, `Update`, `Delete`, `Import` imply `Read`
//! - `Read` implies `List`

pub mod actions;
pub mod permissions;
pub mod resources;

// Re-export main types for convenience
pub use actions::Action;
pub use permissions::{Permission, PermissionSet};
pub use resources::ResourceType;
