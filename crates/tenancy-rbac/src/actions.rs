//! # Actions
//!
//! Defines the actions that can be performed on organization resources.

use serde::{Deserialize, Serialize};

/// Actions that can be performed on resources.
///
/// - **Read**: View resource data
/// - **List**: Browse multiple resources
/// - **Create**: Create new resource instances
/// - **Update**: Modify existing resource data
/// - **Delete**: Remove resource instances
/// - **Import**: Upload binary content (e.g. a logo)
/// - **Manage**: Administer the resource; implies every other action
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Read/view resource.
    Read,

    /// List/query resources.
    List,

    /// Create new resource.
    Create,

    /// Update existing resource.
    Update,

    /// Delete resource.
    Delete,

    /// Upload content into the resource.
    Import,

    /// Administer the resource.
    ///
    /// Grants every other action on the same resource.
    Manage,
}

impl Action {
    /// Get the string representation of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::List => "list",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Import => "import",
            Action::Manage => "manage",
        }
    }

    /// Parse action from string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive, supports aliases)
    ///
    /// # Example
    ///
    /// ```
    /// use tenancy_rbac::actions::Action;
    ///
    /// assert_eq!(Action::parse("read"), Some(Action::Read));
    /// assert_eq!(Action::parse("upload"), Some(Action::Import));
    /// assert_eq!(Action::parse("admin"), Some(Action::Manage));
    /// assert_eq!(Action::parse("approve"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "read" | "view" | "get" => Some(Action::Read),
            "list" | "browse" | "search" => Some(Action::List),
            "create" | "add" | "invite" => Some(Action::Create),
            "update" | "edit" | "write" => Some(Action::Update),
            "delete" | "remove" => Some(Action::Delete),
            "import" | "upload" => Some(Action::Import),
            "manage" | "admin" | "administer" => Some(Action::Manage),
            _ => None,
        }
    }

    /// Get all actions.
    pub fn all() -> Vec<Self> {
        vec![
            Action::Read,
            Action::List,
            Action::Create,
            Action::Update,
            Action::Delete,
            Action::Import,
            Action::Manage,
        ]
    }

    /// Check if this action implies another action.
    ///
    /// - `Manage` implies all other actions
    /// - `Create`, `Update`, `Delete` and `Import` imply `Read`
    /// - `Read` implies `List`
    ///
    /// # Example
    ///
    /// ```
    /// use tenancy_rbac::actions::Action;
    ///
    /// assert!(Action::Manage.implies(Action::Import));
    /// assert!(Action::Import.implies(Action::Read));
    /// assert!(!Action::Read.implies(Action::Update));
    /// ```
    pub fn implies(&self, other: Action) -> bool {
        match self {
            Action::Manage => true,
            Action::Create | Action::Update | Action::Delete | Action::Import => {
                matches!(other, Action::Read | Action::List)
            }
            Action::Read => other == Action::List,
            Action::List => false,
        }
    }

    /// Check if this action modifies the resource.
    pub fn is_write(&self) -> bool {
        !matches!(self, Action::Read | Action::List)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
