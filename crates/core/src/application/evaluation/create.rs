// Create Evaluation Use Case

use crate::domain::{Evaluation, EvaluationCreate, JobId, OfferStatus, UserId};
use crate::error::{AppError, Result};
use crate::port::{TimeProvider, TransactionalMarketplace};
use tracing::info;

/// Record the owner's evaluation and complete the cleaner's offer
///
/// The offer is re-read inside the transaction: a cancel that raced the
/// permission check leaves it no longer accepted and the evaluation is
/// refused with `InvalidState`.
pub async fn execute(
    store: &dyn TransactionalMarketplace,
    time_provider: &dyn TimeProvider,
    job_id: JobId,
    cleaner_id: UserId,
    payload: EvaluationCreate,
) -> Result<Evaluation> {
    payload.validate()?;

    let mut tx = store.begin_transaction(job_id).await?;

    let offer = tx
        .find_offer(job_id, cleaner_id)
        .await?
        .ok_or_else(|| crate::application::offer::offer_not_found(job_id, cleaner_id))?;
    if offer.status != OfferStatus::Accepted {
        return Err(AppError::InvalidState(format!(
            "Offer for job {} from user {} is {}, only accepted offers can be evaluated",
            job_id, cleaner_id, offer.status
        )));
    }

    let now = time_provider.now_millis();
    let evaluation = Evaluation::new(job_id, cleaner_id, payload, now);

    tx.insert_evaluation(&evaluation).await?;
    tx.mark_offer_completed(job_id, cleaner_id, now).await?;
    tx.commit().await?;

    info!(
        job_id = %job_id,
        cleaner_id = %cleaner_id,
        overall_rating = %evaluation.overall_rating,
        no_show = %evaluation.no_show,
        "Evaluation recorded, offer completed"
    );
    Ok(evaluation)
}
