//! Per-company serialization of recalculations.

use std::sync::Arc;

use dashmap::DashMap;
use pipecast_shared::types::CompanyId;
use tokio::sync::{Mutex, OwnedMutexGuard};

type LockTable = DashMap<CompanyId, Arc<Mutex<()>>>;

/// One async mutex per company.
///
/// Holding the guard for a company blocks other recalculations for that
/// company only. An entry lives only while someone holds or waits on it.
#[derive(Debug, Clone, Default)]
pub struct CompanyLocks {
    locks: Arc<LockTable>,
}

impl CompanyLocks {
    /// Create an empty lock table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for and take the company's lock.
    pub async fn acquire(&self, company_id: CompanyId) -> CompanyLockGuard {
        // Clone the Arc out so the shard guard is dropped before awaiting.
        let lock = Arc::clone(self.locks.entry(company_id).or_default().value());
        let guard = lock.lock_owned().await;
        CompanyLockGuard {
            guard: Some(guard),
            locks: Arc::clone(&self.locks),
            company_id,
        }
    }

    /// Number of companies currently locked or awaited.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// True when no company is locked or awaited.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Held lock for one company. Dropping it releases the lock and removes the
/// table entry once nobody else references it.
#[derive(Debug)]
pub struct CompanyLockGuard {
    guard: Option<OwnedMutexGuard<()>>,
    locks: Arc<LockTable>,
    company_id: CompanyId,
}

impl Drop for CompanyLockGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Only the table's Arc left means nobody holds or waits.
        self.locks
            .remove_if(&self.company_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}
