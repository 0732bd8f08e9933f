//! # Permissions
//!
//! Core permission types and sets for the RBAC system.
//! A permission combines a resource type with an action.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::actions::Action;
use crate::resources::ResourceType;

/// A permission is a combination of resource type and action.
///
/// Permissions are always scoped to the organization the role is held in,
/// so there is no per-instance resource id.
///
/// # Example
///
/// ```
/// use tenancy_rbac::permissions::Permission;
/// use tenancy_rbac::resources::ResourceType;
/// use tenancy_rbac::actions::Action;
///
/// let perm = Permission::new(ResourceType::Member, Action::Manage);
/// assert_eq!(perm.to_string(), "member:manage");
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Permission {
    /// The resource type this permission applies to.
    pub resource: ResourceType,
    /// The action allowed on the resource.
    pub action: Action,
}

impl Permission {
    /// Create a new permission.
    pub const fn new(resource: ResourceType, action: Action) -> Self {
        Self { resource, action }
    }

    /// Parse from string (e.g., "member:manage").
    ///
    /// # Returns
    ///
    /// `Some(Permission)` if valid, `None` otherwise
    ///
    /// # Example
    ///
    /// ```
    /// use tenancy_rbac::permissions::Permission;
    /// use tenancy_rbac::resources::ResourceType;
    /// use tenancy_rbac::actions::Action;
    ///
    /// let perm = Permission::parse("logo:upload").unwrap();
    /// assert_eq!(perm.resource, ResourceType::Logo);
    /// assert_eq!(perm.action, Action::Import);
    ///
    /// assert!(Permission::parse("logo").is_none());
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        let (resource, action) = s.split_once(':')?;
        Some(Self {
            resource: ResourceType::parse(resource)?,
            action: Action::parse(action)?,
        })
    }

    /// Check if holding this permission grants `other`.
    ///
    /// Resource types must be equal and this action must equal or imply the
    /// other action.
    pub fn grants(&self, other: &Permission) -> bool {
        self.resource == other.resource
            && (self.action == other.action || self.action.implies(other.action))
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource.as_str(), self.action.as_str())
    }
}

/// A set of permissions that can be assigned to roles.
///
/// Iteration order is stable (sorted by resource, then action).
///
/// # Example
///
/// ```
/// use tenancy_rbac::permissions::{Permission, PermissionSet};
/// use tenancy_rbac::resources::ResourceType;
/// use tenancy_rbac::actions::Action;
///
/// let mut set = PermissionSet::new();
/// set.add(Permission::new(ResourceType::Member, Action::Manage));
///
/// // Manage implies every other action on the same resource
/// assert!(set.has(&Permission::new(ResourceType::Member, Action::Delete)));
/// assert!(!set.has(&Permission::new(ResourceType::Logo, Action::Read)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet {
    permissions: BTreeSet<Permission>,
}

impl PermissionSet {
    /// Create a new empty permission set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a permission to the set.
    pub fn add(&mut self, permission: Permission) {
        self.permissions.insert(permission);
    }

    /// Builder-style variant of [`PermissionSet::add`].
    pub fn with(mut self, resource: ResourceType, action: Action) -> Self {
        self.add(Permission::new(resource, action));
        self
    }

    /// Remove a permission from the set.
    ///
    /// # Returns
    ///
    /// `true` if the permission was present, `false` otherwise
    pub fn remove(&mut self, permission: &Permission) -> bool {
        self.permissions.remove(permission)
    }

    /// Check if the set grants a permission.
    ///
    /// This checks for an exact match first, then for any held permission
    /// whose action implies the requested one (e.g. Manage implies Read).
    pub fn has(&self, permission: &Permission) -> bool {
        self.permissions.contains(permission)
            || self.permissions.iter().any(|held| held.grants(permission))
    }

    /// Shorthand for [`PermissionSet::has`].
    pub fn allows(&self, resource: ResourceType, action: Action) -> bool {
        self.has(&Permission::new(resource, action))
    }

    /// Iterate over the explicitly held permissions.
    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.permissions.iter()
    }

    /// Merge another permission set into this one.
    pub fn merge(&mut self, other: &PermissionSet) {
        self.permissions.extend(other.permissions.iter().copied());
    }

    /// Create from a list of permission strings.
    ///
    /// Unparseable entries are ignored.
    ///
    /// # Example
    ///
    /// ```
    /// use tenancy_rbac::permissions::PermissionSet;
    ///
    /// let set = PermissionSet::from_strings(&["member:list", "logo:read", "bogus"]);
    /// assert_eq!(set.len(), 2);
    /// ```
    pub fn from_strings(perms: &[&str]) -> Self {
        perms.iter().filter_map(|p| Permission::parse(p)).collect()
    }

    /// Get the count of permissions.
    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }

    /// Check if this set grants every permission in another set.
    pub fn contains_all(&self, other: &PermissionSet) -> bool {
        other.iter().all(|perm| self.has(perm))
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = Permission>>(iter: T) -> Self {
        Self {
            permissions: iter.into_iter().collect(),
        }
    }
}
