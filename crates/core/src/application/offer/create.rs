// Create Offer Use Case

use crate::domain::{JobId, Offer, UserId};
use crate::error::{AppError, Result};
use crate::port::{TimeProvider, TransactionalMarketplace};
use tracing::info;

/// Store a new pending offer from `candidate_id` on `job_id`
///
/// The existence check runs inside the job-scoped transaction; the store's
/// uniqueness constraint backs it up.
pub async fn execute(
    store: &dyn TransactionalMarketplace,
    time_provider: &dyn TimeProvider,
    job_id: JobId,
    candidate_id: UserId,
) -> Result<Offer> {
    let mut tx = store.begin_transaction(job_id).await?;

    if tx.find_offer(job_id, candidate_id).await?.is_some() {
        return Err(AppError::DuplicateOffer {
            job_id,
            candidate_id,
        });
    }

    let offer = Offer::new(job_id, candidate_id, time_provider.now_millis());
    tx.insert_offer(&offer).await?;
    tx.commit().await?;

    info!(job_id = %job_id, candidate_id = %candidate_id, "Offer created");
    Ok(offer)
}
