//! RPC Method Handlers
//!
//! Thin adapters from JSON-RPC params to the application services.

use crate::error::to_rpc_error;
use crate::types::{
    AcceptOfferRequest, CleanerRequest, CreateEvaluationRequest, CreateOfferRequest,
    EvaluationResponse, GetEvaluationRequest, GetOfferRequest, ListOffersRequest,
    OfferResponse, OwnOfferRequest, RegisterJobRequest, RescindResponse, StatsResponse,
};
use jsonrpsee::types::ErrorObjectOwned;
use phresh_core::application::{EvaluationService, MarketplacePolicy, OfferService};
use phresh_core::domain::{EvaluationAggregate, Job, OfferStatus};
use phresh_core::port::{
    EvaluationRepository, JobDirectory, OfferRepository, TimeProvider, TransactionalMarketplace,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

type RpcResult<T> = Result<T, ErrorObjectOwned>;

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    jobs: Arc<dyn JobDirectory>,
    offer_repo: Arc<dyn OfferRepository>,
    evaluation_repo: Arc<dyn EvaluationRepository>,
    offers: OfferService,
    evaluations: EvaluationService,
    start_time: std::time::Instant,
}

impl RpcHandler {
    pub fn new(
        store: Arc<dyn TransactionalMarketplace>,
        jobs: Arc<dyn JobDirectory>,
        offer_repo: Arc<dyn OfferRepository>,
        evaluation_repo: Arc<dyn EvaluationRepository>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        let policy = Arc::new(MarketplacePolicy::new(jobs.clone(), offer_repo.clone()));

        Self {
            offers: OfferService::new(
                store.clone(),
                offer_repo.clone(),
                policy.clone(),
                time_provider.clone(),
            ),
            evaluations: EvaluationService::new(
                store,
                evaluation_repo.clone(),
                policy,
                time_provider,
            ),
            jobs,
            offer_repo,
            evaluation_repo,
            start_time: std::time::Instant::now(),
        }
    }

    /// jobs.register.v1
    pub async fn register_job(&self, params: RegisterJobRequest) -> RpcResult<Job> {
        self.jobs
            .register(params.owner_id, &params.name)
            .await
            .map_err(to_rpc_error)
    }

    /// offers.create.v1
    pub async fn create_offer(&self, params: CreateOfferRequest) -> RpcResult<OfferResponse> {
        let offer = self
            .offers
            .create(params.actor_id, params.job_id)
            .await
            .map_err(to_rpc_error)?;
        Ok(offer.into())
    }

    /// offers.list.v1
    pub async fn list_offers(&self, params: ListOffersRequest) -> RpcResult<Vec<OfferResponse>> {
        let (job, offers) = self
            .offers
            .list(params.actor_id, params.job_id)
            .await
            .map_err(to_rpc_error)?;

        let job = params.populate.then_some(&job);
        Ok(offers
            .into_iter()
            .map(|offer| OfferResponse::new(offer, job))
            .collect())
    }

    /// offers.get.v1
    pub async fn get_offer(&self, params: GetOfferRequest) -> RpcResult<OfferResponse> {
        let (job, offer) = self
            .offers
            .get(params.actor_id, params.job_id, params.candidate_id)
            .await
            .map_err(to_rpc_error)?;

        Ok(OfferResponse::new(offer, params.populate.then_some(&job)))
    }

    /// offers.accept.v1
    pub async fn accept_offer(&self, params: AcceptOfferRequest) -> RpcResult<OfferResponse> {
        let offer = self
            .offers
            .accept(params.actor_id, params.job_id, params.candidate_id)
            .await
            .map_err(to_rpc_error)?;
        Ok(offer.into())
    }

    /// offers.cancel.v1
    pub async fn cancel_offer(&self, params: OwnOfferRequest) -> RpcResult<OfferResponse> {
        let offer = self
            .offers
            .cancel(params.actor_id, params.job_id)
            .await
            .map_err(to_rpc_error)?;
        Ok(offer.into())
    }

    /// offers.rescind.v1
    pub async fn rescind_offer(&self, params: OwnOfferRequest) -> RpcResult<RescindResponse> {
        self.offers
            .rescind(params.actor_id, params.job_id)
            .await
            .map_err(to_rpc_error)?;

        Ok(RescindResponse {
            job_id: params.job_id,
            candidate_id: params.actor_id,
            rescinded: true,
        })
    }

    /// evaluations.create.v1
    pub async fn create_evaluation(
        &self,
        params: CreateEvaluationRequest,
    ) -> RpcResult<EvaluationResponse> {
        self.evaluations
            .create(
                params.actor_id,
                params.job_id,
                params.cleaner_id,
                params.evaluation,
            )
            .await
            .map_err(to_rpc_error)
    }

    /// evaluations.get.v1
    pub async fn get_evaluation(
        &self,
        params: GetEvaluationRequest,
    ) -> RpcResult<EvaluationResponse> {
        self.evaluations
            .get(params.job_id, params.cleaner_id)
            .await
            .map_err(to_rpc_error)
    }

    /// evaluations.list.v1
    pub async fn list_evaluations(
        &self,
        params: CleanerRequest,
    ) -> RpcResult<Vec<EvaluationResponse>> {
        self.evaluations
            .list_for_cleaner(params.cleaner_id)
            .await
            .map_err(to_rpc_error)
    }

    /// evaluations.stats.v1
    pub async fn evaluation_stats(&self, params: CleanerRequest) -> RpcResult<EvaluationAggregate> {
        self.evaluations
            .aggregate_for_cleaner(params.cleaner_id)
            .await
            .map_err(to_rpc_error)
    }

    /// admin.stats.v1
    pub async fn stats(&self) -> RpcResult<StatsResponse> {
        let mut offers = BTreeMap::new();
        for status in OfferStatus::ALL {
            let count = self
                .offer_repo
                .count_by_status(status)
                .await
                .map_err(to_rpc_error)?;
            offers.insert(status.as_str().to_string(), count);
        }

        let total_evaluations = self.evaluation_repo.count().await.map_err(to_rpc_error)?;
        let uptime_seconds = self.start_time.elapsed().as_secs() as i64;
        debug!(uptime_seconds, "Stats requested");

        Ok(StatsResponse {
            total_offers: offers.values().sum(),
            offers,
            total_evaluations,
            uptime_seconds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::code;
    use phresh_core::domain::EvaluationCreate;
    use phresh_core::port::SteppingTimeProvider;
    use phresh_infra_sqlite::{
        create_pool, run_migrations, SqliteEvaluationRepository, SqliteJobDirectory,
        SqliteOfferRepository,
    };

    const OWNER: i64 = 1;
    const CLEANER: i64 = 2;

    async fn setup_handler() -> RpcHandler {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();

        let clock: Arc<dyn TimeProvider> = Arc::new(SteppingTimeProvider::new(1_000, 1));
        let offers = Arc::new(SqliteOfferRepository::new(pool.clone()));
        RpcHandler::new(
            offers.clone(),
            Arc::new(SqliteJobDirectory::new(pool.clone(), clock.clone())),
            offers,
            Arc::new(SqliteEvaluationRepository::new(pool)),
            clock,
        )
    }

    async fn register(handler: &RpcHandler) -> Job {
        handler
            .register_job(RegisterJobRequest {
                owner_id: OWNER,
                name: "Move-out clean".to_string(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_offer_flow_through_handler() {
        let handler = setup_handler().await;
        let job = register(&handler).await;

        let created = handler
            .create_offer(CreateOfferRequest {
                actor_id: CLEANER,
                job_id: job.id,
            })
            .await
            .unwrap();
        assert_eq!(created.status, OfferStatus::Pending);
        assert!(created.job.is_none());

        let listed = handler
            .list_offers(ListOffersRequest {
                actor_id: OWNER,
                job_id: job.id,
                populate: true,
            })
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].job.as_ref().map(|j| j.id), Some(job.id));

        let accepted = handler
            .accept_offer(AcceptOfferRequest {
                actor_id: OWNER,
                job_id: job.id,
                candidate_id: CLEANER,
            })
            .await
            .unwrap();
        assert_eq!(accepted.status, OfferStatus::Accepted);

        let stats = handler.stats().await.unwrap();
        assert_eq!(stats.offers["accepted"], 1);
        assert_eq!(stats.total_offers, 1);
        assert_eq!(stats.total_evaluations, 0);
    }

    #[tokio::test]
    async fn test_owner_cannot_offer_on_own_job() {
        let handler = setup_handler().await;
        let job = register(&handler).await;

        let err = handler
            .create_offer(CreateOfferRequest {
                actor_id: OWNER,
                job_id: job.id,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), code::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_invalid_evaluation_maps_to_validation_code() {
        let handler = setup_handler().await;
        let job = register(&handler).await;

        let err = handler
            .create_evaluation(CreateEvaluationRequest {
                actor_id: OWNER,
                job_id: job.id,
                cleaner_id: CLEANER,
                evaluation: EvaluationCreate {
                    overall_rating: 6,
                    ..Default::default()
                },
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), code::VALIDATION_ERROR);
    }

    #[tokio::test]
    async fn test_missing_evaluation_is_not_found() {
        let handler = setup_handler().await;

        let err = handler
            .get_evaluation(GetEvaluationRequest {
                job_id: 1,
                cleaner_id: CLEANER,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), code::NOT_FOUND);
    }
}
