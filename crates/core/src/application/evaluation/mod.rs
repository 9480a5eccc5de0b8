// Evaluation Service - Owner ratings of cleaners

pub mod create;

use crate::application::policy::MarketplacePolicy;
use crate::application::retry::retry_on_conflict;
use crate::domain::{Evaluation, EvaluationAggregate, EvaluationCreate, JobId, UserId};
use crate::error::{AppError, Result};
use crate::port::{EvaluationRepository, TimeProvider, TransactionalMarketplace};
use std::sync::Arc;

pub struct EvaluationService {
    store: Arc<dyn TransactionalMarketplace>,
    evaluations: Arc<dyn EvaluationRepository>,
    policy: Arc<MarketplacePolicy>,
    time_provider: Arc<dyn TimeProvider>,
}

impl EvaluationService {
    pub fn new(
        store: Arc<dyn TransactionalMarketplace>,
        evaluations: Arc<dyn EvaluationRepository>,
        policy: Arc<MarketplacePolicy>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            store,
            evaluations,
            policy,
            time_provider,
        }
    }

    /// Evaluate the cleaner whose offer on `job_id` was accepted
    ///
    /// The payload is validated before any permission or store access.
    pub async fn create(
        &self,
        actor: UserId,
        job_id: JobId,
        cleaner_id: UserId,
        payload: EvaluationCreate,
    ) -> Result<Evaluation> {
        // Malformed payloads are reported ahead of permission errors
        payload.validate()?;
        self.policy
            .check_evaluation_create(actor, job_id, cleaner_id)
            .await?;

        let store = self.store.as_ref();
        let clock = self.time_provider.as_ref();
        retry_on_conflict("evaluation.create", move || {
            create::execute(store, clock, job_id, cleaner_id, payload.clone())
        })
        .await
    }

    pub async fn get(&self, job_id: JobId, cleaner_id: UserId) -> Result<Evaluation> {
        self.evaluations
            .find(job_id, cleaner_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "No evaluation found for job {} and cleaner {}",
                    job_id, cleaner_id
                ))
            })
    }

    pub async fn list_for_cleaner(&self, cleaner_id: UserId) -> Result<Vec<Evaluation>> {
        self.evaluations.list_for_cleaner(cleaner_id).await
    }

    pub async fn aggregate_for_cleaner(&self, cleaner_id: UserId) -> Result<EvaluationAggregate> {
        self.evaluations.aggregate_for_cleaner(cleaner_id).await
    }
}
