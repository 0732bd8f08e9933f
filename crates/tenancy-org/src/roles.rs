//! Role-based access control
//!
//! This module defines the organization role hierarchy and the static
//! catalog that maps each role to the permissions it grants.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tenancy_rbac::{Action, PermissionSet, ResourceType};

/// User role within an organization.
///
/// Roles are hierarchical, with each role inheriting the permissions of lower roles.
/// The hierarchy is: Viewer < Developer < Administrator < Owner
///
/// # Permission Model
///
/// - **Viewer**: Read-only access to organization resources
/// - **Developer**: Can build and edit applications
/// - **Administrator**: Can manage members and replace the logo
/// - **Owner**: Full organization control
///
/// # Examples
///
/// ```
/// use tenancy_org::OrganizationRole;
///
/// assert!(OrganizationRole::Owner > OrganizationRole::Administrator);
/// assert!(OrganizationRole::Administrator.is_administrative());
/// assert!(!OrganizationRole::Developer.is_administrative());
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OrganizationRole {
    /// Read-only access to organization resources
    Viewer = 1,

    /// Can create and edit applications
    Developer = 2,

    /// Can manage members and organization branding
    Administrator = 3,

    /// Full organization control
    Owner = 4,
}

impl OrganizationRole {
    /// Numeric permission level; higher is more privileged.
    pub fn level(&self) -> u8 {
        *self as u8
    }

    /// Check if this role can manage organization membership.
    ///
    /// # Returns
    ///
    /// `true` for Administrator and Owner roles
    pub fn is_administrative(&self) -> bool {
        self.permissions()
            .allows(ResourceType::Member, Action::Manage)
    }

    /// The permissions this role grants, including those of lower roles.
    pub fn permissions(&self) -> PermissionSet {
        let viewer = PermissionSet::new()
            .with(ResourceType::Organization, Action::Read)
            .with(ResourceType::Member, Action::List)
            .with(ResourceType::Role, Action::List)
            .with(ResourceType::Logo, Action::Read)
            .with(ResourceType::Application, Action::Read);

        if *self == Self::Viewer {
            return viewer;
        }

        let developer = viewer
            .with(ResourceType::Application, Action::Create)
            .with(ResourceType::Application, Action::Update);

        if *self == Self::Developer {
            return developer;
        }

        let administrator = developer
            .with(ResourceType::Organization, Action::Update)
            .with(ResourceType::Member, Action::Manage)
            .with(ResourceType::Logo, Action::Import)
            .with(ResourceType::Application, Action::Manage);

        if *self == Self::Administrator {
            return administrator;
        }

        administrator.with(ResourceType::Organization, Action::Manage)
    }

    /// Parse role from string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tenancy_org::OrganizationRole;
    ///
    /// assert_eq!(OrganizationRole::parse("admin"), Some(OrganizationRole::Administrator));
    /// assert_eq!(OrganizationRole::parse("VIEWER"), Some(OrganizationRole::Viewer));
    /// assert_eq!(OrganizationRole::parse("guest"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "viewer" | "app_viewer" => Some(Self::Viewer),
            "developer" | "app_developer" => Some(Self::Developer),
            "administrator" | "admin" | "organization_admin" => Some(Self::Administrator),
            "owner" => Some(Self::Owner),
            _ => None,
        }
    }

    /// Get string representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Developer => "developer",
            Self::Administrator => "administrator",
            Self::Owner => "owner",
        }
    }

    /// Get a human-readable display name for the role.
    ///
    /// # Examples
    ///
    /// ```
    /// use tenancy_org::OrganizationRole;
    ///
    /// assert_eq!(OrganizationRole::Developer.display_name(), "Developer");
    /// ```
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Viewer => "Viewer",
            Self::Developer => "Developer",
            Self::Administrator => "Administrator",
            Self::Owner => "Owner",
        }
    }

    /// All roles in ascending privilege order.
    pub fn all() -> [Self; 4] {
        [Self::Viewer, Self::Developer, Self::Administrator, Self::Owner]
    }
}

impl Default for OrganizationRole {
    fn default() -> Self {
        Self::Viewer
    }
}

impl std::fmt::Display for OrganizationRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the role catalog, as offered to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleOption {
    /// The role itself
    pub role: OrganizationRole,

    /// Stable identifier (`OrganizationRole::as_str`)
    pub id: String,

    /// Human-readable name
    pub display_name: String,

    /// Comparable privilege level
    pub permission_level: u8,

    /// Permissions granted by the role
    pub permissions: PermissionSet,
}

impl From<OrganizationRole> for RoleOption {
    fn from(role: OrganizationRole) -> Self {
        Self {
            role,
            id: role.as_str().to_string(),
            display_name: role.display_name().to_string(),
            permission_level: role.level(),
            permissions: role.permissions(),
        }
    }
}

/// Static enumeration of the roles an organization offers.
///
/// The catalog is pure and side-effect free; it exists as a value so the
/// membership service receives it by explicit dependency passing.
///
/// # Examples
///
/// ```
/// use tenancy_org::{OrganizationRole, RoleCatalog};
///
/// let catalog = RoleCatalog::new();
/// let roles = catalog.list_roles();
/// assert_eq!(roles.first().map(|r| r.role), Some(OrganizationRole::Viewer));
/// assert_eq!(roles.last().map(|r| r.role), Some(OrganizationRole::Owner));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleCatalog;

impl RoleCatalog {
    /// Create the catalog.
    pub fn new() -> Self {
        Self
    }

    /// List all roles ordered by ascending permission level.
    pub fn list_roles(&self) -> Vec<RoleOption> {
        OrganizationRole::all()
            .into_iter()
            .map(RoleOption::from)
            .collect()
    }

    /// Map of role id to display name.
    pub fn role_names(&self) -> BTreeMap<String, String> {
        OrganizationRole::all()
            .into_iter()
            .map(|role| (role.as_str().to_string(), role.display_name().to_string()))
            .collect()
    }

    /// Permissions granted by `role`.
    pub fn permissions_for(&self, role: OrganizationRole) -> PermissionSet {
        role.permissions()
    }

    /// Check whether `role` may manage membership.
    pub fn is_administrative(&self, role: OrganizationRole) -> bool {
        role.is_administrative()
    }

    /// Check whether `role` grants `action` on `resource`.
    pub fn allows(&self, role: OrganizationRole, resource: ResourceType, action: Action) -> bool {
        role.permissions().allows(resource, action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_organization_role_hierarchy() {
        assert!(OrganizationRole::Owner > OrganizationRole::Administrator);
        assert!(OrganizationRole::Administrator > OrganizationRole::Developer);
        assert!(OrganizationRole::Developer > OrganizationRole::Viewer);
        assert_eq!(OrganizationRole::Owner.level(), 4);
        assert_eq!(OrganizationRole::Viewer.level(), 1);
    }

    #[test]
    fn test_higher_roles_inherit_permissions() {
        let roles = OrganizationRole::all();
        for pair in roles.windows(2) {
            let lower = pair[0].permissions();
            let higher = pair[1].permissions();
            assert!(higher.contains_all(&lower), "{} < {}", pair[0], pair[1]);
            assert!(!lower.contains_all(&higher), "{} < {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_administrative_roles() {
        assert!(!OrganizationRole::Viewer.is_administrative());
        assert!(!OrganizationRole::Developer.is_administrative());
        assert!(OrganizationRole::Administrator.is_administrative());
        assert!(OrganizationRole::Owner.is_administrative());
    }

    #[test]
    fn test_role_specific_grants() {
        let catalog = RoleCatalog::new();
        use OrganizationRole::*;

        assert!(catalog.allows(Viewer, ResourceType::Member, Action::List));
        assert!(!catalog.allows(Viewer, ResourceType::Application, Action::Create));
        assert!(catalog.allows(Developer, ResourceType::Application, Action::Update));
        assert!(!catalog.allows(Developer, ResourceType::Logo, Action::Import));
        assert!(catalog.allows(Administrator, ResourceType::Logo, Action::Import));
        assert!(!catalog.allows(Administrator, ResourceType::Organization, Action::Delete));
        assert!(catalog.allows(Owner, ResourceType::Organization, Action::Delete));
    }

    #[test]
    fn test_organization_role_parse() {
        assert_eq!(
            OrganizationRole::parse("Administrator"),
            Some(OrganizationRole::Administrator)
        );
        assert_eq!(
            OrganizationRole::parse("app_developer"),
            Some(OrganizationRole::Developer)
        );
        assert_eq!(OrganizationRole::parse("invalid"), None);
        for role in OrganizationRole::all() {
            assert_eq!(OrganizationRole::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn test_catalog_is_ordered_by_level() {
        let levels: Vec<u8> = RoleCatalog::new()
            .list_roles()
            .iter()
            .map(|r| r.permission_level)
            .collect();
        assert_eq!(levels, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_permissions_for_matches_role_grants() {
        let catalog = RoleCatalog::new();
        for role in OrganizationRole::all() {
            assert_eq!(catalog.permissions_for(role), role.permissions());
        }

        let viewer = catalog.permissions_for(OrganizationRole::Viewer);
        assert!(viewer.allows(ResourceType::Logo, Action::Read));
        assert!(!viewer.allows(ResourceType::Logo, Action::Import));
        assert_eq!(viewer.len(), 5);
    }

    #[test]
    fn test_role_names() {
        let names = RoleCatalog::new().role_names();
        assert_eq!(names.len(), 4);
        assert_eq!(names.get("administrator").map(String::as_str), Some("Administrator"));
    }

    #[test]
    fn test_role_serde() {
        let json = serde_json::to_string(&OrganizationRole::Administrator).unwrap();
        assert_eq!(json, "\"administrator\"");
    }
}
