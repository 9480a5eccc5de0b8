// Offer Service - Offer lifecycle use cases
//
// The `execute` functions in the submodules are the store-level operations:
// each one is a single transaction that re-validates the transition. The
// service wraps them with permission checks and the one-shot conflict retry.

pub mod accept;
pub mod cancel;
pub mod create;
pub mod rescind;

use crate::application::policy::MarketplacePolicy;
use crate::application::retry::retry_on_conflict;
use crate::domain::{Job, JobId, Offer, UserId};
use crate::error::{AppError, Result};
use crate::port::{OfferRepository, TimeProvider, TransactionalMarketplace};
use std::sync::Arc;

pub(crate) fn offer_not_found(job_id: JobId, candidate_id: UserId) -> AppError {
    AppError::NotFound(format!(
        "Offer for job {} from user {} not found",
        job_id, candidate_id
    ))
}

pub struct OfferService {
    store: Arc<dyn TransactionalMarketplace>,
    offers: Arc<dyn OfferRepository>,
    policy: Arc<MarketplacePolicy>,
    time_provider: Arc<dyn TimeProvider>,
}

impl OfferService {
    pub fn new(
        store: Arc<dyn TransactionalMarketplace>,
        offers: Arc<dyn OfferRepository>,
        policy: Arc<MarketplacePolicy>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            store,
            offers,
            policy,
            time_provider,
        }
    }

    /// Submit an offer on someone else's job
    pub async fn create(&self, actor: UserId, job_id: JobId) -> Result<Offer> {
        self.policy.check_offer_create(actor, job_id).await?;

        let store = self.store.as_ref();
        let clock = self.time_provider.as_ref();
        retry_on_conflict("offer.create", move || {
            create::execute(store, clock, job_id, actor)
        })
        .await
    }

    /// Every offer on a job (owner only), with the job for response composition
    pub async fn list(&self, actor: UserId, job_id: JobId) -> Result<(Job, Vec<Offer>)> {
        let job = self.policy.check_offer_list(actor, job_id).await?;
        let offers = self.offers.list_for_job(job_id).await?;
        Ok((job, offers))
    }

    /// One offer (owner or the candidate), with its job
    pub async fn get(
        &self,
        actor: UserId,
        job_id: JobId,
        candidate_id: UserId,
    ) -> Result<(Job, Offer)> {
        self.policy
            .check_offer_get(actor, job_id, candidate_id)
            .await
    }

    pub async fn accept(&self, actor: UserId, job_id: JobId, candidate_id: UserId) -> Result<Offer> {
        self.policy
            .check_offer_accept(actor, job_id, candidate_id)
            .await?;

        let store = self.store.as_ref();
        let clock = self.time_provider.as_ref();
        retry_on_conflict("offer.accept", move || {
            accept::execute(store, clock, job_id, candidate_id)
        })
        .await
    }

    /// Cancel the actor's own accepted offer
    pub async fn cancel(&self, actor: UserId, job_id: JobId) -> Result<Offer> {
        self.policy.check_offer_cancel(actor, job_id).await?;

        let store = self.store.as_ref();
        let clock = self.time_provider.as_ref();
        retry_on_conflict("offer.cancel", move || {
            cancel::execute(store, clock, job_id, actor)
        })
        .await
    }

    /// Withdraw the actor's own pending offer
    pub async fn rescind(&self, actor: UserId, job_id: JobId) -> Result<()> {
        self.policy.check_offer_rescind(actor, job_id).await?;

        let store = self.store.as_ref();
        retry_on_conflict("offer.rescind", move || {
            rescind::execute(store, job_id, actor)
        })
        .await
    }
}
