// SQLite OfferRepository Implementation

use crate::error::map_sqlx_error;
use crate::{JobLocks, SqliteMarketplaceTransaction};
use async_trait::async_trait;
use phresh_core::domain::{JobId, Offer, OfferStatus, UserId};
use phresh_core::error::Result;
use phresh_core::port::{MarketplaceTransaction, OfferRepository, TransactionalMarketplace};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::debug;

pub(crate) const OFFER_COLUMNS: &str = "job_id, candidate_id, status, created_at, updated_at";

/// Offer store and transaction entry point
///
/// Share one instance (or its `JobLocks`) per database: the job locks only
/// serialize transactions begun through the same lock table.
pub struct SqliteOfferRepository {
    pool: SqlitePool,
    locks: Arc<JobLocks>,
}

impl SqliteOfferRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_locks(pool, Arc::new(JobLocks::new()))
    }

    pub fn with_locks(pool: SqlitePool, locks: Arc<JobLocks>) -> Self {
        Self { pool, locks }
    }

    pub fn locks(&self) -> &Arc<JobLocks> {
        &self.locks
    }
}

#[async_trait]
impl OfferRepository for SqliteOfferRepository {
    async fn find(&self, job_id: JobId, candidate_id: UserId) -> Result<Option<Offer>> {
        let row: Option<OfferRow> = sqlx::query_as(&format!(
            "SELECT {} FROM offers WHERE job_id = ? AND candidate_id = ?",
            OFFER_COLUMNS
        ))
        .bind(job_id)
        .bind(candidate_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(OfferRow::into_offer).transpose()
    }

    async fn list_for_job(&self, job_id: JobId) -> Result<Vec<Offer>> {
        let rows: Vec<OfferRow> = sqlx::query_as(&format!(
            "SELECT {} FROM offers WHERE job_id = ? ORDER BY rowid",
            OFFER_COLUMNS
        ))
        .bind(job_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(OfferRow::into_offer).collect()
    }

    async fn count_by_status(&self, status: OfferStatus) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM offers WHERE status = ?")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }
}

#[async_trait]
impl TransactionalMarketplace for SqliteOfferRepository {
    async fn begin_transaction(&self, job_id: JobId) -> Result<Box<dyn MarketplaceTransaction>> {
        // Lock before taking a connection so a waiting task never pins one
        let guard = self.locks.acquire(job_id).await;
        // IMMEDIATE takes the write lock up front: a writer on another job waits on
        // busy_timeout instead of failing with a stale read snapshot
        let tx = self
            .pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(map_sqlx_error)?;
        debug!(job_id, "Transaction started");

        Ok(Box::new(SqliteMarketplaceTransaction::new(tx, job_id, guard)))
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct OfferRow {
    job_id: i64,
    candidate_id: i64,
    status: String,
    created_at: i64,
    updated_at: i64,
}

impl OfferRow {
    pub(crate) fn into_offer(self) -> Result<Offer> {
        Ok(Offer {
            job_id: self.job_id,
            candidate_id: self.candidate_id,
            status: self.status.parse()?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
