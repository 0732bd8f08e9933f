//! Per-organization write serialization
//!
//! Membership writes and logo swaps run their read-check-write sequence
//! while holding the organization's lock, so two writers on the same
//! organization never interleave. Different organizations never contend.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::ids::OrganizationId;

/// Registry of one async mutex per organization.
#[derive(Debug, Default)]
pub struct OrgLocks {
    locks: Mutex<HashMap<OrganizationId, Arc<Mutex<()>>>>,
}

impl OrgLocks {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for `org`, waiting for any current holder.
    ///
    /// The lock is released when the returned guard is dropped, including
    /// when the awaiting future is cancelled.
    pub async fn acquire(&self, org: &OrganizationId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            // Drop entries nobody is holding or waiting on.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(org.clone()).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Number of organizations with a lock currently held or awaited.
    pub async fn active(&self) -> usize {
        self.locks
            .lock()
            .await
            .values()
            .filter(|lock| Arc::strong_count(lock) > 1)
            .count()
    }
}
