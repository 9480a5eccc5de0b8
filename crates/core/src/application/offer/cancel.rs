// Cancel Offer Use Case

use crate::domain::{JobId, Offer, OfferStatus, UserId};
use crate::error::Result;
use crate::port::{TimeProvider, TransactionalMarketplace};
use tracing::info;

/// Cancel an accepted offer and reopen the job
///
/// Every sibling that was rejected by the acceptance goes back to pending.
/// Siblings in any other status are left alone.
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
    offer.cancel(now)?;

    tx.set_offer_status(job_id, candidate_id, OfferStatus::Cancelled, now)
        .await?;
    let reopened = tx
        .transition_siblings(
            job_id,
            candidate_id,
            OfferStatus::Rejected,
            OfferStatus::Pending,
            now,
        )
        .await?;
    tx.commit().await?;

    info!(
        job_id = %job_id,
        candidate_id = %candidate_id,
        reopened_siblings = %reopened,
        "Offer cancelled"
    );
    Ok(offer)
}
