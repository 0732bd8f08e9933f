//! Storage collaborators
//!
//! The ingest service writes bytes to an [`ObjectStore`] and records the
//! organization's current logo in a [`LogoReferenceStore`]. Both are
//! external concerns; in-memory implementations are provided for
//! single-process use and tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tenancy_org::{OrganizationId, StoreError, StoreResult};
use tokio::sync::RwLock;

use crate::reference::AssetReference;

/// Durable object storage.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `key`.
    ///
    /// Keys are generated by the caller and never reused.
    async fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> StoreResult<()>;
}

/// Per-organization pointer to the current logo.
#[async_trait]
pub trait LogoReferenceStore: Send + Sync {
    /// Current logo of `org`, if any.
    async fn current(&self, org: &OrganizationId) -> StoreResult<Option<AssetReference>>;

    /// Replace the current logo, returning the previous one.
    ///
    /// The ingest service never runs two swaps for the same organization
    /// at once, so this need not be atomic on its own.
    async fn swap(
        &self,
        org: &OrganizationId,
        reference: AssetReference,
    ) -> StoreResult<Option<AssetReference>>;
}

/// An object held by [`MemoryObjectStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Object bytes
    pub bytes: Vec<u8>,
    /// Content type supplied at write time
    pub content_type: String,
}

/// In-memory object store.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: RwLock<HashMap<String, StoredObject>>,
    puts: AtomicU64,
    unavailable: AtomicBool,
}

impl std::fmt::Debug for MemoryObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryObjectStore")
            .field("puts", &self.puts.load(Ordering::Relaxed))
            .field("unavailable", &self.unavailable.load(Ordering::Relaxed))
            .finish()
    }
}

impl MemoryObjectStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch an object.
    pub async fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects.read().await.get(key).cloned()
    }

    /// Number of stored objects.
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    /// Check if the store holds no objects.
    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }

    /// Number of successful writes.
    pub fn put_count(&self) -> u64 {
        self.puts.load(Ordering::SeqCst)
    }

    /// Make every subsequent write fail with `StoreError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("object store is unavailable".to_string()));
        }

        let mut objects = self.objects.write().await;
        if objects.contains_key(key) {
            return Err(StoreError::Conflict(format!("object {} already exists", key)));
        }
        objects.insert(
            key.to_string(),
            StoredObject {
                bytes: bytes.to_vec(),
                content_type: content_type.to_string(),
            },
        );
        self.puts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// In-memory logo reference store.
#[derive(Debug, Default)]
pub struct MemoryLogoReferenceStore {
    references: RwLock<HashMap<OrganizationId, AssetReference>>,
    unavailable: AtomicBool,
}

impl MemoryLogoReferenceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `StoreError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "logo reference store is unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl LogoReferenceStore for MemoryLogoReferenceStore {
    async fn current(&self, org: &OrganizationId) -> StoreResult<Option<AssetReference>> {
        self.check_available()?;
        Ok(self.references.read().await.get(org).cloned())
    }

    async fn swap(
        &self,
        org: &OrganizationId,
        reference: AssetReference,
    ) -> StoreResult<Option<AssetReference>> {
        self.check_available()?;
        Ok(self.references.write().await.insert(org.clone(), reference))
    }
}
