// Job Directory Port
//
// Jobs belong to an external collaborator; the marketplace only registers
// them and looks up their owner.

use crate::domain::{Job, JobId, UserId};
use crate::error::Result;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobDirectory: Send + Sync {
    /// Register a job; the store assigns the id
    async fn register(&self, owner_id: UserId, name: &str) -> Result<Job>;

    async fn find_by_id(&self, job_id: JobId) -> Result<Option<Job>>;
}
