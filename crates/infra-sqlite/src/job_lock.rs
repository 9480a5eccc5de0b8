// Per-job advisory locks
//
// SQLite has no row locks, so offer-set transactions on the same job are
// serialized in-process before a connection is taken from the pool.

use phresh_core::domain::JobId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::trace;

#[derive(Debug, Default)]
pub struct JobLocks {
    locks: Mutex<HashMap<JobId, Arc<AsyncMutex<()>>>>,
}

impl JobLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to a job's offer set
    pub async fn acquire(&self, job_id: JobId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            // Nobody holds or waits on an entry whose only owner is the map
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(job_id).or_default().clone()
        };

        trace!(job_id, "Waiting for job lock");
        lock.lock_owned().await
    }

    /// Number of jobs with a held or awaited lock
    pub fn active(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|lock| Arc::strong_count(lock) > 1)
            .count()
    }
}
