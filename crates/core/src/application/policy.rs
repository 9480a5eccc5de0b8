// Permission checks run before the store is touched
//
// The caller identity (`actor`) is trusted input: authentication happens
// outside the marketplace core. The store re-validates every transition, so
// these checks exist to produce the right error for the caller, not to keep
// the offer set consistent.

use crate::domain::{Job, JobId, Offer, OfferStatus, UserId};
use crate::error::{AppError, Result};
use crate::port::{JobDirectory, OfferRepository};
use std::sync::Arc;

pub struct MarketplacePolicy {
    jobs: Arc<dyn JobDirectory>,
    offers: Arc<dyn OfferRepository>,
}

impl MarketplacePolicy {
    pub fn new(jobs: Arc<dyn JobDirectory>, offers: Arc<dyn OfferRepository>) -> Self {
        Self { jobs, offers }
    }

    /// Load a job or fail with `NotFound`
    pub async fn job(&self, job_id: JobId) -> Result<Job> {
        self.jobs
            .find_by_id(job_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job {} not found", job_id)))
    }

    async fn offer(&self, job_id: JobId, candidate_id: UserId) -> Result<Offer> {
        self.offers
            .find(job_id, candidate_id)
            .await?
            .ok_or_else(|| crate::application::offer::offer_not_found(job_id, candidate_id))
    }

    /// Owners cannot bid on their own job, and nobody bids twice
    pub async fn check_offer_create(&self, actor: UserId, job_id: JobId) -> Result<()> {
        let job = self.job(job_id).await?;
        if job.is_owned_by(actor) {
            return Err(AppError::Forbidden(
                "Users are unable to create offers for jobs they own".to_string(),
            ));
        }
        if self.offers.find(job_id, actor).await?.is_some() {
            return Err(AppError::DuplicateOffer {
                job_id,
                candidate_id: actor,
            });
        }
        Ok(())
    }

    /// Only the owner sees every offer on a job
    pub async fn check_offer_list(&self, actor: UserId, job_id: JobId) -> Result<Job> {
        let job = self.job(job_id).await?;
        if !job.is_owned_by(actor) {
            return Err(AppError::Forbidden("Unable to access offers".to_string()));
        }
        Ok(job)
    }

    /// The owner and the candidate may view a single offer
    pub async fn check_offer_get(
        &self,
        actor: UserId,
        job_id: JobId,
        candidate_id: UserId,
    ) -> Result<(Job, Offer)> {
        let job = self.job(job_id).await?;
        let offer = self.offer(job_id, candidate_id).await?;
        if !job.is_owned_by(actor) && offer.candidate_id != actor {
            return Err(AppError::Forbidden("Unable to access offer".to_string()));
        }
        Ok((job, offer))
    }

    pub async fn check_offer_accept(
        &self,
        actor: UserId,
        job_id: JobId,
        candidate_id: UserId,
    ) -> Result<()> {
        let job = self.job(job_id).await?;
        if !job.is_owned_by(actor) {
            return Err(AppError::Forbidden(
                "Only the owner of the job may accept offers".to_string(),
            ));
        }

        let offer = self.offer(job_id, candidate_id).await?;
        if offer.status != OfferStatus::Pending {
            return Err(AppError::InvalidState(
                "Can only accept offers that are currently pending".to_string(),
            ));
        }

        let siblings = self.offers.list_for_job(job_id).await?;
        if siblings.iter().any(|o| o.status == OfferStatus::Accepted) {
            return Err(AppError::InvalidState(
                "That job already has an accepted offer".to_string(),
            ));
        }
        Ok(())
    }

    /// The candidate cancels their own accepted offer
    pub async fn check_offer_cancel(&self, actor: UserId, job_id: JobId) -> Result<()> {
        self.job(job_id).await?;
        let offer = self.offer(job_id, actor).await?;
        if offer.status != OfferStatus::Accepted {
            return Err(AppError::InvalidState(
                "Can only cancel offers that have been accepted".to_string(),
            ));
        }
        Ok(())
    }

    /// The candidate withdraws their own pending offer
    pub async fn check_offer_rescind(&self, actor: UserId, job_id: JobId) -> Result<()> {
        self.job(job_id).await?;
        let offer = self.offer(job_id, actor).await?;
        if offer.status != OfferStatus::Pending {
            return Err(AppError::InvalidState(
                "Can only rescind currently pending offers".to_string(),
            ));
        }
        Ok(())
    }

    /// Only the owner evaluates, and only the cleaner whose offer was accepted
    pub async fn check_evaluation_create(
        &self,
        actor: UserId,
        job_id: JobId,
        cleaner_id: UserId,
    ) -> Result<()> {
        let job = self.job(job_id).await?;
        if !job.is_owned_by(actor) {
            return Err(AppError::Forbidden(
                "Users are unable to leave evaluations for jobs they do not own".to_string(),
            ));
        }

        let offer = self.offer(job_id, cleaner_id).await?;
        if offer.status != OfferStatus::Accepted {
            return Err(AppError::InvalidState(
                "Only users with accepted offers can be evaluated".to_string(),
            ));
        }
        Ok(())
    }
}
