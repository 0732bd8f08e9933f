//! Asset references
//!
//! An asset reference is what callers get back instead of the raw bytes.
//! It is produced once per successful upload and never edited afterwards;
//! a new upload produces a new reference.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tenancy_org::OrganizationId;

/// Reference to a committed object in storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetReference {
    /// Organization the asset belongs to
    pub organization_id: OrganizationId,

    /// Object storage key
    pub key: String,

    /// Canonical content type
    pub content_type: String,

    /// Payload size in bytes
    pub size: usize,

    /// Hex-encoded SHA-256 of the payload
    pub sha256: String,

    /// Public URL, when a base URL is configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// When the object was committed
    pub created_at: DateTime<Utc>,
}
