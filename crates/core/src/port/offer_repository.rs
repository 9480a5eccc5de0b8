// Offer Repository Port (read side)

use crate::domain::{JobId, Offer, OfferStatus, UserId};
use crate::error::Result;
use async_trait::async_trait;

/// Read access to persisted offers
///
/// Every mutation goes through a `MarketplaceTransaction` so that sibling
/// side effects stay atomic.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OfferRepository: Send + Sync {
    /// Find the offer a candidate made on a job
    async fn find(&self, job_id: JobId, candidate_id: UserId) -> Result<Option<Offer>>;

    /// All offers for a job, in insertion order
    async fn list_for_job(&self, job_id: JobId) -> Result<Vec<Offer>>;

    /// Count offers in a status across all jobs
    async fn count_by_status(&self, status: OfferStatus) -> Result<i64>;
}
