// Accept Offer Use Case

use crate::domain::{JobId, Offer, OfferStatus, UserId};
use crate::error::{AppError, Result};
use crate::port::{TimeProvider, TransactionalMarketplace};
use tracing::info;

/// Accept a pending offer and reject every other pending offer of the job
///
/// Both writes happen in one transaction. Fails with `InvalidState` if the
/// target is not pending or another offer of the job is already accepted.
pub async fn execute(
    store: &dyn TransactionalMarketplace,
    time_provider: &dyn TimeProvider,
    job_id: JobId,
    candidate_id: UserId,
) -> Result<Offer> {
    let mut tx = store.begin_transaction(job_id).await?;

    let mut offer = tx
        .find_offer(job_id, candidate_id)
        .await?
        .ok_or_else(|| super::offer_not_found(job_id, candidate_id))?;

    let now = time_provider.now_millis();
    offer.accept(now)?;

    // Offers created after an acceptance are still pending
    if let Some(accepted) = tx.find_accepted_offer(job_id).await? {
        return Err(AppError::InvalidState(format!(
            "Job {} already has an accepted offer from user {}",
            job_id, accepted.candidate_id
        )));
    }

    tx.set_offer_status(job_id, candidate_id, OfferStatus::Accepted, now)
        .await?;
    let rejected = tx
        .transition_siblings(
            job_id,
            candidate_id,
            OfferStatus::Pending,
            OfferStatus::Rejected,
            now,
        )
        .await?;
    tx.commit().await?;

    info!(
        job_id = %job_id,
        candidate_id = %candidate_id,
        rejected_siblings = %rejected,
        "Offer accepted"
    );
    Ok(offer)
}
