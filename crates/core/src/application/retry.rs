// Conflict retry for store transactions
use crate::error::Result;
use std::future::Future;
use tracing::warn;

/// A conflicting transaction is retried at most this many times
pub const MAX_CONFLICT_RETRIES: u32 = 1;

/// Run `attempt`, re-running it once if the store reports a conflict
///
/// Only `AppError::TransactionConflict` is retried; every other error, and a
/// second conflict, is returned to the caller unchanged. There is no backoff:
/// the conflicting transaction has already finished by the time we see the
/// error.
///
/// # Example
/// ```text
/// let offer = retry_on_conflict("offer.accept", || {
///     accept::execute(store, clock, job_id, candidate_id)
/// })
/// .await?;
/// ```
pub async fn retry_on_conflict<T, F, Fut>(operation: &str, mut attempt: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut retries = 0;
    loop {
        match attempt().await {
            Err(err) if err.is_retryable() && retries < MAX_CONFLICT_RETRIES => {
                retries += 1;
                warn!(
                    operation = %operation,
                    retry = %retries,
                    error = %err,
                    "Transaction conflict, retrying"
                );
            }
            result => return result,
        }
    }
}
