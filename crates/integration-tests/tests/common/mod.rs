//! Shared fixture: services wired to a fresh SQLite store
#![allow(dead_code)]

use std::sync::Arc;

use phresh_core::application::{EvaluationService, MarketplacePolicy, OfferService};
use phresh_core::domain::{EvaluationCreate, Job, JobId, OfferStatus, UserId};
use phresh_core::port::{JobDirectory, OfferRepository, SteppingTimeProvider, TimeProvider};
use phresh_infra_sqlite::{
    create_pool, run_migrations, SqliteEvaluationRepository, SqliteJobDirectory,
    SqliteOfferRepository,
};
use sqlx::SqlitePool;

pub const OWNER: UserId = 1;
pub const A: UserId = 11;
pub const B: UserId = 12;
pub const C: UserId = 13;
pub const D: UserId = 14;
pub const STRANGER: UserId = 99;

pub struct Marketplace {
    pub pool: SqlitePool,
    pub jobs: Arc<SqliteJobDirectory>,
    pub offer_repo: Arc<SqliteOfferRepository>,
    pub evaluation_repo: Arc<SqliteEvaluationRepository>,
    pub offers: OfferService,
    pub evaluations: EvaluationService,
}

impl Marketplace {
    pub async fn in_memory() -> Self {
        Self::open("sqlite::memory:").await
    }

    pub async fn open(database_url: &str) -> Self {
        let pool = create_pool(database_url).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let clock: Arc<dyn TimeProvider> = Arc::new(SteppingTimeProvider::new(1_000, 10));
        let jobs = Arc::new(SqliteJobDirectory::new(pool.clone(), clock.clone()));
        let offer_repo = Arc::new(SqliteOfferRepository::new(pool.clone()));
        let evaluation_repo = Arc::new(SqliteEvaluationRepository::new(pool.clone()));
        let policy = Arc::new(MarketplacePolicy::new(jobs.clone(), offer_repo.clone()));

        Self {
            offers: OfferService::new(
                offer_repo.clone(),
                offer_repo.clone(),
                policy.clone(),
                clock.clone(),
            ),
            evaluations: EvaluationService::new(
                offer_repo.clone(),
                evaluation_repo.clone(),
                policy,
                clock,
            ),
            pool,
            jobs,
            offer_repo,
            evaluation_repo,
        }
    }

    /// Register a job owned by `OWNER`
    pub async fn job(&self) -> Job {
        self.jobs.register(OWNER, "Spring clean").await.unwrap()
    }

    /// Register a job and submit offers from `candidates` in order
    pub async fn job_with_offers(&self, candidates: &[UserId]) -> Job {
        let job = self.job().await;
        for &candidate in candidates {
            self.offers.create(candidate, job.id).await.unwrap();
        }
        job
    }

    /// `(candidate, status)` pairs in insertion order
    pub async fn statuses(&self, job_id: JobId) -> Vec<(UserId, OfferStatus)> {
        self.offer_repo
            .list_for_job(job_id)
            .await
            .unwrap()
            .into_iter()
            .map(|offer| (offer.candidate_id, offer.status))
            .collect()
    }

    pub async fn status(&self, job_id: JobId, candidate_id: UserId) -> Option<OfferStatus> {
        self.offer_repo
            .find(job_id, candidate_id)
            .await
            .unwrap()
            .map(|offer| offer.status)
    }
}

pub fn rating(overall_rating: i32) -> EvaluationCreate {
    EvaluationCreate {
        overall_rating,
        ..Default::default()
    }
}
