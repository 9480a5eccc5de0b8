// SQLite Transaction Implementation

use crate::error::{is_unique_violation, map_sqlx_error};
use crate::offer_repository::{OfferRow, OFFER_COLUMNS};
use async_trait::async_trait;
use phresh_core::domain::{Evaluation, JobId, Offer, OfferStatus, UserId};
use phresh_core::error::{AppError, Result};
use phresh_core::port::{MarketplaceTransaction, Transaction};
use sqlx::{Sqlite, Transaction as SqlxTransaction};
use tokio::sync::OwnedMutexGuard;
use tracing::debug;

/// One job's offer set, locked for the lifetime of the transaction
pub struct SqliteMarketplaceTransaction {
    // Declared before the guard: the transaction is rolled back before the lock is released
    tx: SqlxTransaction<'static, Sqlite>,
    job_id: JobId,
    _job_lock: OwnedMutexGuard<()>,
}

impl SqliteMarketplaceTransaction {
    pub(crate) fn new(
        tx: SqlxTransaction<'static, Sqlite>,
        job_id: JobId,
        job_lock: OwnedMutexGuard<()>,
    ) -> Self {
        Self {
            tx,
            job_id,
            _job_lock: job_lock,
        }
    }

    fn ensure_scope(&self, job_id: JobId) -> Result<()> {
        if job_id != self.job_id {
            return Err(AppError::Internal(format!(
                "Transaction for job {} used on job {}",
                self.job_id, job_id
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Transaction for SqliteMarketplaceTransaction {
    async fn commit(self: Box<Self>) -> Result<()> {
        let Self { tx, job_id, .. } = *self;
        tx.commit().await.map_err(map_sqlx_error)?;
        debug!(job_id, "Transaction committed");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        let Self { tx, job_id, .. } = *self;
        tx.rollback().await.map_err(map_sqlx_error)?;
        debug!(job_id, "Transaction rolled back");
        Ok(())
    }
}

#[async_trait]
impl MarketplaceTransaction for SqliteMarketplaceTransaction {
    async fn find_offer(&mut self, job_id: JobId, candidate_id: UserId) -> Result<Option<Offer>> {
        self.ensure_scope(job_id)?;
        let row: Option<OfferRow> = sqlx::query_as(&format!(
            "SELECT {} FROM offers WHERE job_id = ? AND candidate_id = ?",
            OFFER_COLUMNS
        ))
        .bind(job_id)
        .bind(candidate_id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        row.map(OfferRow::into_offer).transpose()
    }

    async fn find_accepted_offer(&mut self, job_id: JobId) -> Result<Option<Offer>> {
        self.ensure_scope(job_id)?;
        let row: Option<OfferRow> = sqlx::query_as(&format!(
            "SELECT {} FROM offers WHERE job_id = ? AND status = ? LIMIT 1",
            OFFER_COLUMNS
        ))
        .bind(job_id)
        .bind(OfferStatus::Accepted.as_str())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        row.map(OfferRow::into_offer).transpose()
    }

    async fn insert_offer(&mut self, offer: &Offer) -> Result<()> {
        self.ensure_scope(offer.job_id)?;
        sqlx::query(
            r#"
            INSERT INTO offers (job_id, candidate_id, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(offer.job_id)
        .bind(offer.candidate_id)
        .bind(offer.status.as_str())
        .bind(offer.created_at)
        .bind(offer.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::DuplicateOffer {
                    job_id: offer.job_id,
                    candidate_id: offer.candidate_id,
                }
            } else {
                map_sqlx_error(e)
            }
        })?;

        Ok(())
    }

    async fn set_offer_status(
        &mut self,
        job_id: JobId,
        candidate_id: UserId,
        status: OfferStatus,
        now_millis: i64,
    ) -> Result<()> {
        self.ensure_scope(job_id)?;
        let result = sqlx::query(
            "UPDATE offers SET status = ?, updated_at = ? WHERE job_id = ? AND candidate_id = ?",
        )
        .bind(status.as_str())
        .bind(now_millis)
        .bind(job_id)
        .bind(candidate_id)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| {
            // Partial unique index: one accepted offer per job
            if is_unique_violation(&e) {
                AppError::InvalidState(format!("Job {} already has an accepted offer", job_id))
            } else {
                map_sqlx_error(e)
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Offer not found: job {} candidate {}",
                job_id, candidate_id
            )));
        }

        Ok(())
    }

    async fn transition_siblings(
        &mut self,
        job_id: JobId,
        except_candidate: UserId,
        from: OfferStatus,
        to: OfferStatus,
        now_millis: i64,
    ) -> Result<u64> {
        self.ensure_scope(job_id)?;
        let result = sqlx::query(
            r#"
            UPDATE offers
            SET status = ?, updated_at = ?
            WHERE job_id = ? AND candidate_id != ? AND status = ?
            "#,
        )
        .bind(to.as_str())
        .bind(now_millis)
        .bind(job_id)
        .bind(except_candidate)
        .bind(from.as_str())
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn delete_offer(&mut self, job_id: JobId, candidate_id: UserId) -> Result<()> {
        self.ensure_scope(job_id)?;
        let result = sqlx::query("DELETE FROM offers WHERE job_id = ? AND candidate_id = ?")
            .bind(job_id)
            .bind(candidate_id)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Offer not found: job {} candidate {}",
                job_id, candidate_id
            )));
        }

        Ok(())
    }

    async fn mark_offer_completed(
        &mut self,
        job_id: JobId,
        candidate_id: UserId,
        now_millis: i64,
    ) -> Result<()> {
        self.ensure_scope(job_id)?;
        let result = sqlx::query(
            r#"
            UPDATE offers
            SET status = ?, updated_at = ?
            WHERE job_id = ? AND candidate_id = ? AND status = ?
            "#,
        )
        .bind(OfferStatus::Completed.as_str())
        .bind(now_millis)
        .bind(job_id)
        .bind(candidate_id)
        .bind(OfferStatus::Accepted.as_str())
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return match self.find_offer(job_id, candidate_id).await? {
                Some(offer) => Err(AppError::InvalidState(format!(
                    "Offer for job {} from user {} is {}, only accepted offers can be completed",
                    job_id, candidate_id, offer.status
                ))),
                None => Err(AppError::NotFound(format!(
                    "Offer not found: job {} candidate {}",
                    job_id, candidate_id
                ))),
            };
        }

        Ok(())
    }

    async fn insert_evaluation(&mut self, evaluation: &Evaluation) -> Result<()> {
        self.ensure_scope(evaluation.job_id)?;
        sqlx::query(
            r#"
            INSERT INTO evaluations (
                job_id, cleaner_id, no_show, headline, comment,
                professionalism, completeness, efficiency, overall_rating,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(evaluation.job_id)
        .bind(evaluation.cleaner_id)
        .bind(evaluation.no_show)
        .bind(&evaluation.headline)
        .bind(&evaluation.comment)
        .bind(evaluation.professionalism)
        .bind(evaluation.completeness)
        .bind(evaluation.efficiency)
        .bind(evaluation.overall_rating)
        .bind(evaluation.created_at)
        .bind(evaluation.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::InvalidState(format!(
                    "Cleaner {} was already evaluated for job {}",
                    evaluation.cleaner_id, evaluation.job_id
                ))
            } else {
                map_sqlx_error(e)
            }
        })?;

        Ok(())
    }
}
