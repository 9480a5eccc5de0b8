// Transaction port for atomic offer/evaluation transitions

use crate::domain::{Evaluation, JobId, Offer, OfferStatus, UserId};
use crate::error::Result;
use async_trait::async_trait;

/// Transaction trait for atomic multi-step operations
///
/// Dropping a transaction without committing rolls it back.
#[async_trait]
pub trait Transaction: Send {
    /// Commit the transaction
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Rollback the transaction
    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// Entry point to the transactional store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransactionalMarketplace: Send + Sync {
    /// Begin a transaction scoped to one job's offer set
    ///
    /// Transactions on the same job are serialized: the returned handle
    /// holds the job's lock until it is committed, rolled back or dropped.
    async fn begin_transaction(&self, job_id: JobId) -> Result<Box<dyn MarketplaceTransaction>>;
}

/// Offer and evaluation operations within a transaction
#[async_trait]
pub trait MarketplaceTransaction: Transaction {
    /// Find offer (within transaction)
    async fn find_offer(&mut self, job_id: JobId, candidate_id: UserId) -> Result<Option<Offer>>;

    /// The accepted offer of a job, if any
    async fn find_accepted_offer(&mut self, job_id: JobId) -> Result<Option<Offer>>;

    /// Insert offer; fails with `DuplicateOffer` if the pair exists
    async fn insert_offer(&mut self, offer: &Offer) -> Result<()>;

    /// Overwrite status and `updated_at` of one offer; `NotFound` if missing
    async fn set_offer_status(
        &mut self,
        job_id: JobId,
        candidate_id: UserId,
        status: OfferStatus,
        now_millis: i64,
    ) -> Result<()>;

    /// Move every other offer of the job from `from` to `to`
    ///
    /// Returns the number of offers changed.
    async fn transition_siblings(
        &mut self,
        job_id: JobId,
        except_candidate: UserId,
        from: OfferStatus,
        to: OfferStatus,
        now_millis: i64,
    ) -> Result<u64>;

    /// Delete one offer; `NotFound` if missing
    async fn delete_offer(&mut self, job_id: JobId, candidate_id: UserId) -> Result<()>;

    /// Insert evaluation (within transaction)
    async fn insert_evaluation(&mut self, evaluation: &Evaluation) -> Result<()>;

    /// Finalize an accepted offer after its evaluation was recorded
    ///
    /// `InvalidState` if the offer is not accepted, `NotFound` if missing.
    async fn mark_offer_completed(
        &mut self,
        job_id: JobId,
        candidate_id: UserId,
        now_millis: i64,
    ) -> Result<()>;
}
