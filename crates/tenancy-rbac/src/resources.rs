//! # Resource Types
//!
//! Defines the organization-scoped resources that roles grant access to.

use serde::{Deserialize, Serialize};

/// Resource types that can have permissions assigned.
///
/// Every resource lives inside a single organization:
/// - **Organization**: the tenant itself (settings, deletion)
/// - **Member**: memberships of users in the organization
/// - **Role**: the role options offered by the organization
/// - **Logo**: the organization's branding asset
/// - **Application**: applications built inside the organization
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    /// The organization itself.
    Organization,
    /// Organization memberships.
    Member,
    /// Role options.
    Role,
    /// Organization logo asset.
    Logo,
    /// Applications owned by the organization.
    Application,
}

impl ResourceType {
    /// Get the string representation of the resource type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Organization => "organization",
            ResourceType::Member => "member",
            ResourceType::Role => "role",
            ResourceType::Logo => "logo",
            ResourceType::Application => "application",
        }
    }

    /// Parse resource type from string representation.
    ///
    /// Accepts the canonical name plus a few plural / alternate spellings.
    ///
    /// # Example
    ///
    /// ```
    /// use tenancy_rbac::resources::ResourceType;
    ///
    /// assert_eq!(ResourceType::parse("members"), Some(ResourceType::Member));
    /// assert_eq!(ResourceType::parse("ORG"), Some(ResourceType::Organization));
    /// assert_eq!(ResourceType::parse("document"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "organization" | "organizations" | "org" => Some(ResourceType::Organization),
            "member" | "members" | "membership" => Some(ResourceType::Member),
            "role" | "roles" => Some(ResourceType::Role),
            "logo" | "logos" => Some(ResourceType::Logo),
            "application" | "applications" | "app" => Some(ResourceType::Application),
            _ => None,
        }
    }

    /// Get all resource types.
    pub fn all() -> Vec<Self> {
        vec![
            ResourceType::Organization,
            ResourceType::Member,
            ResourceType::Role,
            ResourceType::Logo,
            ResourceType::Application,
        ]
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
