// Rescind Offer Use Case

use crate::domain::{JobId, UserId};
use crate::error::Result;
use crate::port::TransactionalMarketplace;
use tracing::info;

/// Delete a pending offer; any other status is `InvalidState`
pub async fn execute(
    store: &dyn TransactionalMarketplace,
    job_id: JobId,
    candidate_id: UserId,
) -> Result<()> {
    let mut tx = store.begin_transaction(job_id).await?;

    let offer = tx
        .find_offer(job_id, candidate_id)
        .await?
        .ok_or_else(|| super::offer_not_found(job_id, candidate_id))?;
    offer.ensure_rescindable()?;

    tx.delete_offer(job_id, candidate_id).await?;
    tx.commit().await?;

    info!(job_id = %job_id, candidate_id = %candidate_id, "Offer rescinded");
    Ok(())
}
