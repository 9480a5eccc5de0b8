// Evaluation Repository Port (read side)

use crate::domain::{Evaluation, EvaluationAggregate, JobId, UserId};
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait EvaluationRepository: Send + Sync {
    async fn find(&self, job_id: JobId, cleaner_id: UserId) -> Result<Option<Evaluation>>;

    async fn list_for_cleaner(&self, cleaner_id: UserId) -> Result<Vec<Evaluation>>;

    /// Rating statistics for a cleaner (all zeros when never evaluated)
    async fn aggregate_for_cleaner(&self, cleaner_id: UserId) -> Result<EvaluationAggregate>;

    async fn count(&self) -> Result<i64>;
}
