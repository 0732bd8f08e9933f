//! Logo ingestion
//!
//! Receives an uploaded logo as a bounded byte stream, validates it and
//! commits it to object storage before pointing the organization at it.
//! The reference swap is the last step, so a failed or cancelled upload
//! never leaves a reference to bytes that were not fully committed.

use async_trait::async_trait;
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tenancy_org::{
    Membership, MembershipStore, OrgError, OrgLocks, OrgResult, OrganizationId, RoleCatalog,
    UserId,
};
use tenancy_rbac::{Action, ResourceType};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::config::{ConfigError, IngestConfig};
use crate::format::LogoFormat;
use crate::reference::AssetReference;
use crate::storage::{LogoReferenceStore, ObjectStore};

/// Caller-facing asset operations.
#[async_trait]
pub trait AssetIngestService: Send + Sync {
    /// Upload a new logo for `org`.
    ///
    /// `content` is read at most up to the configured ceiling plus one
    /// byte. On success the organization's logo points at the returned
    /// reference; on any failure the previous reference is left as is.
    async fn ingest_logo(
        &self,
        org: &OrganizationId,
        caller: &UserId,
        content: &mut (dyn AsyncRead + Unpin + Send),
        declared_content_type: &str,
    ) -> OrgResult<AssetReference>;

    /// Current logo of `org`, visible to any member.
    async fn current_logo(
        &self,
        org: &OrganizationId,
        caller: &UserId,
    ) -> OrgResult<Option<AssetReference>>;
}

/// Default [`AssetIngestService`].
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use tenancy_assets::{
///     AssetIngestService, IngestConfig, LogoIngestService, MemoryLogoReferenceStore,
///     MemoryObjectStore,
/// };
/// use tenancy_org::{MemoryMembershipStore, OrganizationId, UserId};
///
/// async fn upload(png: Vec<u8>) -> tenancy_org::OrgResult<()> {
///     let memberships = Arc::new(MemoryMembershipStore::new());
///     memberships.register_organization("acme", "alice").await?;
///
///     let service = LogoIngestService::new(
///         IngestConfig::default(),
///         memberships,
///         Arc::new(MemoryObjectStore::new()),
///         Arc::new(MemoryLogoReferenceStore::new()),
///     )
///     .expect("valid config");
///
///     let mut content = png.as_slice();
///     let reference = service
///         .ingest_logo(
///             &OrganizationId::from("acme"),
///             &UserId::from("alice"),
///             &mut content,
///             "image/png",
///         )
///         .await?;
///     println!("stored at {}", reference.key);
///     Ok(())
/// }
/// ```
pub struct LogoIngestService {
    config: IngestConfig,
    catalog: RoleCatalog,
    memberships: Arc<dyn MembershipStore>,
    objects: Arc<dyn ObjectStore>,
    logos: Arc<dyn LogoReferenceStore>,
    locks: OrgLocks,
}

impl std::fmt::Debug for LogoIngestService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogoIngestService")
            .field("config", &self.config)
            .finish()
    }
}

impl LogoIngestService {
    /// Create the service, rejecting an invalid configuration.
    pub fn new(
        config: IngestConfig,
        memberships: Arc<dyn MembershipStore>,
        objects: Arc<dyn ObjectStore>,
        logos: Arc<dyn LogoReferenceStore>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            catalog: RoleCatalog::new(),
            memberships,
            objects,
            logos,
            locks: OrgLocks::new(),
        })
    }

    /// Resolve the caller's membership and check `logo:<action>`.
    async fn authorize(
        &self,
        org: &OrganizationId,
        caller: &UserId,
        action: Action,
    ) -> OrgResult<Membership> {
        let membership = self.memberships.get(org, caller).await?.ok_or_else(|| {
            warn!(org = %org, caller = %caller, "Caller is not a member");
            OrgError::Forbidden(format!("{} is not a member of {}", caller, org))
        })?;

        if !self
            .catalog
            .allows(membership.role, ResourceType::Logo, action)
        {
            warn!(org = %org, caller = %caller, role = %membership.role, "Logo access denied");
            return Err(OrgError::Forbidden(format!(
                "{} cannot {} the logo of {}",
                caller, action, org
            )));
        }
        Ok(membership)
    }

    /// Object key for a new logo. Never reused.
    fn object_key(&self, org: &OrganizationId, format: LogoFormat) -> String {
        format!(
            "{}/{}/logo/{}.{}",
            self.config.key_prefix.trim_matches('/'),
            org,
            Uuid::now_v7(),
            format.extension()
        )
    }
}

/// Read at most `limit` bytes from `content`.
///
/// One byte past the limit is requested so an oversized payload is
/// detected without buffering the rest of it.
async fn read_bounded(
    content: &mut (dyn AsyncRead + Unpin + Send),
    limit: usize,
) -> OrgResult<Vec<u8>> {
    let ceiling = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);
    let mut buf = Vec::new();

    (&mut *content)
        .take(ceiling)
        .read_to_end(&mut buf)
        .await
        .map_err(|e| OrgError::InvalidPayload(format!("failed to read upload: {}", e)))?;

    if buf.len() > limit {
        return Err(OrgError::PayloadTooLarge { limit });
    }
    if buf.is_empty() {
        return Err(OrgError::InvalidPayload("upload is empty".to_string()));
    }
    Ok(buf)
}

#[async_trait]
impl AssetIngestService for LogoIngestService {
    #[instrument(skip_all, fields(org = %org, caller = %caller, content_type = %declared_content_type))]
    async fn ingest_logo(
        &self,
        org: &OrganizationId,
        caller: &UserId,
        content: &mut (dyn AsyncRead + Unpin + Send),
        declared_content_type: &str,
    ) -> OrgResult<AssetReference> {
        self.authorize(org, caller, Action::Import).await?;

        let format = LogoFormat::from_content_type(declared_content_type).ok_or_else(|| {
            warn!("Rejected unsupported content type");
            OrgError::UnsupportedMediaType(declared_content_type.to_string())
        })?;

        let bytes = read_bounded(content, self.config.max_logo_bytes)
            .await
            .inspect_err(|e| warn!(error = %e, "Rejected upload payload"))?;

        if self.config.verify_signature && !format.matches_signature(&bytes) {
            warn!(format = ?format, "Payload does not match declared content type");
            return Err(OrgError::UnsupportedMediaType(format!(
                "payload is not a valid {}",
                format.content_type()
            )));
        }

        let key = self.object_key(org, format);
        self.objects
            .put(&key, &bytes, format.content_type())
            .await
            .map_err(|e| {
                error!(key = %key, error = %e, "Failed to store logo");
                OrgError::from(e)
            })?;

        let reference = AssetReference {
            organization_id: org.clone(),
            url: self.config.public_url(&key),
            key,
            content_type: format.content_type().to_string(),
            size: bytes.len(),
            sha256: format!("{:x}", Sha256::digest(&bytes)),
            created_at: Utc::now(),
        };

        // Swaps are serialized per organization, so a reference store may
        // implement `swap` as a read followed by a write.
        let previous = {
            let _guard = self.locks.acquire(org).await;
            self.logos
                .swap(org, reference.clone())
                .await
                .map_err(|e| {
                    error!(key = %reference.key, error = %e, "Failed to update logo reference");
                    OrgError::from(e)
                })?
        };

        info!(
            key = %reference.key,
            size = reference.size,
            previous = previous.as_ref().map(|p| p.key.as_str()).unwrap_or("none"),
            "Logo updated"
        );
        Ok(reference)
    }

    #[instrument(skip_all, fields(org = %org, caller = %caller))]
    async fn current_logo(
        &self,
        org: &OrganizationId,
        caller: &UserId,
    ) -> OrgResult<Option<AssetReference>> {
        self.authorize(org, caller, Action::Read).await?;
        let current = self.logos.current(org).await?;
        debug!(present = current.is_some(), "Fetched current logo");
        Ok(current)
    }
}
