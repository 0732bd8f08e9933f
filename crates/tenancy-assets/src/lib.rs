//! # Tenancy Assets
//!
//! Organization logo ingestion: a bounded, validated upload path that
//! commits bytes to object storage and hands back an [`AssetReference`].
//!
//! ## Overview
//!
//! The tenancy-assets crate handles:
//! - **Formats**: The image content-type allow-list and magic-byte checks
//! - **Configuration**: Payload ceiling, key prefix and public URL
//! - **Storage**: Object store and logo reference store collaborators
//! - **Ingest**: Authorize, validate, commit, then swap the reference
//!
//! ## Architecture
//!
//! ```text
//! AsyncRead (upload body)
//!   └─ AssetIngestService
//!        ├─ MembershipStore (caller must hold logo:import)
//!        ├─ bounded read (ceiling + 1 bytes) ──→ LogoFormat signature check
//!        ├─ ObjectStore::put({prefix}/{org}/logo/{uuid}.{ext})
//!        └─ per-organization lock ──→ LogoReferenceStore::swap
//! ```
//!
//! Errors are reported as [`tenancy_org::OrgError`], so one error
//! taxonomy covers both membership and upload failures.

pub mod config;
pub mod format;
pub mod ingest;
pub mod reference;
pub mod storage;

// Re-export main types for convenience
pub use config::{ConfigError, IngestConfig, DEFAULT_MAX_LOGO_BYTES};
pub use format::LogoFormat;
pub use ingest::{AssetIngestService, LogoIngestService};
pub use reference::AssetReference;
pub use storage::{
    LogoReferenceStore, MemoryLogoReferenceStore, MemoryObjectStore, ObjectStore, StoredObject,
};
