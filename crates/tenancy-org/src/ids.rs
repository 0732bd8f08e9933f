//! Opaque identifiers
//!
//! Organizations are created by an external collaborator and users are
//! supplied by the authentication layer, so both are carried as opaque
//! strings and never interpreted here.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

opaque_id!(
    /// Identifier of an organization (tenant).
    ///
    /// # Examples
    ///
    /// ```
    /// use tenancy_org::OrganizationId;
    ///
    /// let org = OrganizationId::from("acme");
    /// assert_eq!(org.as_str(), "acme");
    /// ```
    OrganizationId
);

opaque_id!(
    /// Identifier of a user, as verified by the authentication layer.
    UserId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_serialize_transparently() {
        let user = UserId::new("alice");
        assert_eq!(serde_json::to_string(&user).unwrap(), "\"alice\"");

        let org: OrganizationId = serde_json::from_str("\"acme\"").unwrap();
        assert_eq!(org, OrganizationId::from("acme"));
        assert_eq!(org.to_string(), "acme");
    }
}
