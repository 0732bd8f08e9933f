//! Concurrency tests for logo ingestion.
//!
//! Scenarios:
//! 1. Concurrent uploads to one organization all commit under distinct keys
//!    and the final reference is one of them
//! 2. Uploads to different organizations never see each other's references
//! 3. A membership change racing an upload either lets it through or
//!    rejects it, never half-applies it
//! 4. Swaps stay serialized against a reference store that reads then writes

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tenancy_assets::{
    AssetIngestService, AssetReference, IngestConfig, LogoIngestService, LogoReferenceStore,
    MemoryLogoReferenceStore, MemoryObjectStore,
};
use tenancy_org::{
    MembershipService, MemoryMembershipStore, OrgError, OrgResult, OrganizationId,
    OrganizationMembershipService, OrganizationRole, RoleCatalog, StoreResult, UserId,
};
use tokio::sync::Mutex;

/// Reference store whose swap is a read, a yield and a write, recording
/// the previous key every swap observed.
#[derive(Default)]
struct ReadThenWriteStore {
    current: Mutex<HashMap<OrganizationId, AssetReference>>,
    observed: Mutex<Vec<Option<String>>>,
}

#[async_trait]
impl LogoReferenceStore for ReadThenWriteStore {
    async fn current(&self, org: &OrganizationId) -> StoreResult<Option<AssetReference>> {
        Ok(self.current.lock().await.get(org).cloned())
    }

    async fn swap(
        &self,
        org: &OrganizationId,
        reference: AssetReference,
    ) -> StoreResult<Option<AssetReference>> {
        let previous = self.current.lock().await.get(org).cloned();
        tokio::task::yield_now().await;
        self.current.lock().await.insert(org.clone(), reference);

        self.observed
            .lock()
            .await
            .push(previous.as_ref().map(|r| r.key.clone()));
        Ok(previous)
    }
}

const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n";

fn png(marker: u8) -> Vec<u8> {
    let mut bytes = PNG_HEADER.to_vec();
    bytes.extend_from_slice(&[marker; 24]);
    bytes
}

/// Test fixture: organizations `acme` and `globex`, owned by `alice` and `gary`.
struct TestFixture {
    memberships: Arc<MemoryMembershipStore>,
    objects: Arc<MemoryObjectStore>,
    logos: Arc<MemoryLogoReferenceStore>,
    service: Arc<LogoIngestService>,
}

impl TestFixture {
    async fn new() -> Self {
        let memberships = Arc::new(MemoryMembershipStore::new());
        memberships
            .register_organization("acme", "alice")
            .await
            .unwrap();
        memberships
            .register_organization("globex", "gary")
            .await
            .unwrap();

        let objects = Arc::new(MemoryObjectStore::new());
        let logos = Arc::new(MemoryLogoReferenceStore::new());
        let service = Arc::new(
            LogoIngestService::new(
                IngestConfig::default(),
                memberships.clone(),
                objects.clone(),
                logos.clone(),
            )
            .unwrap(),
        );

        Self {
            memberships,
            objects,
            logos,
            service,
        }
    }

    fn spawn_upload(
        &self,
        org: &str,
        caller: &str,
        marker: u8,
    ) -> tokio::task::JoinHandle<OrgResult<AssetReference>> {
        let service = self.service.clone();
        let org = OrganizationId::from(org);
        let caller = UserId::from(caller);
        tokio::spawn(async move {
            let bytes = png(marker);
            let mut content = bytes.as_slice();
            service
                .ingest_logo(&org, &caller, &mut content, "image/png")
                .await
        })
    }

    async fn current(&self, org: &str) -> Option<AssetReference> {
        self.logos
            .current(&OrganizationId::from(org))
            .await
            .unwrap()
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_uploads_commit_distinct_objects() {
    let fx = TestFixture::new().await;

    let handles: Vec<_> = (0..16u8)
        .map(|marker| fx.spawn_upload("acme", "alice", marker))
        .collect();

    let mut references = Vec::new();
    for handle in handles {
        references.push(handle.await.unwrap().unwrap());
    }

    let keys: HashSet<_> = references.iter().map(|r| r.key.clone()).collect();
    assert_eq!(keys.len(), 16);
    assert_eq!(fx.objects.len().await, 16);

    let current = fx.current("acme").await.unwrap();
    assert!(references.contains(&current));

    let stored = fx.objects.get(&current.key).await.unwrap();
    assert_eq!(stored.bytes.len(), current.size);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_organizations_are_isolated() {
    let fx = TestFixture::new().await;

    let mut handles = Vec::new();
    for marker in 0..8u8 {
        handles.push(fx.spawn_upload("acme", "alice", marker));
        handles.push(fx.spawn_upload("globex", "gary", marker));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let acme = fx.current("acme").await.unwrap();
    let globex = fx.current("globex").await.unwrap();
    assert!(acme.key.starts_with("organizations/acme/logo/"));
    assert!(globex.key.starts_with("organizations/globex/logo/"));
    assert_eq!(acme.organization_id, OrganizationId::from("acme"));
    assert_eq!(globex.organization_id, OrganizationId::from("globex"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_upload_racing_demotion() {
    let fx = TestFixture::new().await;
    let members =
        OrganizationMembershipService::new(RoleCatalog::new(), fx.memberships.clone());
    let org = OrganizationId::from("acme");
    let (alice, bob) = (UserId::from("alice"), UserId::from("bob"));
    members
        .add_member(&org, &alice, &bob, OrganizationRole::Administrator)
        .await
        .unwrap();

    let upload = fx.spawn_upload("acme", "bob", 1);
    members
        .change_role(&org, &alice, &bob, OrganizationRole::Viewer)
        .await
        .unwrap();

    match upload.await.unwrap() {
        Ok(reference) => {
            assert!(fx.objects.get(&reference.key).await.is_some());
            assert_eq!(fx.current("acme").await, Some(reference));
        }
        Err(err) => {
            assert!(matches!(err, OrgError::Forbidden(_)));
            assert!(fx.objects.is_empty().await);
            assert_eq!(fx.current("acme").await, None);
        }
    }

    let err = fx.spawn_upload("acme", "bob", 2).await.unwrap().unwrap_err();
    assert!(matches!(err, OrgError::Forbidden(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_swaps_are_serialized_per_organization() {
    let memberships = Arc::new(MemoryMembershipStore::new());
    memberships
        .register_organization("acme", "alice")
        .await
        .unwrap();
    let logos = Arc::new(ReadThenWriteStore::default());
    let service = Arc::new(
        LogoIngestService::new(
            IngestConfig::default(),
            memberships,
            Arc::new(MemoryObjectStore::new()),
            logos.clone(),
        )
        .unwrap(),
    );

    let handles: Vec<_> = (0..12u8)
        .map(|marker| {
            let service = service.clone();
            tokio::spawn(async move {
                let bytes = png(marker);
                let mut content = bytes.as_slice();
                service
                    .ingest_logo(
                        &OrganizationId::from("acme"),
                        &UserId::from("alice"),
                        &mut content,
                        "image/png",
                    )
                    .await
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    // Every swap saw a distinct predecessor: exactly one saw none, and no
    // reference was replaced twice.
    let observed = logos.observed.lock().await.clone();
    assert_eq!(observed.len(), 12);
    assert_eq!(observed.iter().filter(|p| p.is_none()).count(), 1);
    let distinct: HashSet<_> = observed.iter().flatten().collect();
    assert_eq!(distinct.len(), 11);
}
