//! Actor permissions on offers

mod common;

use common::{Marketplace, A, B, OWNER, STRANGER};
use phresh_core::domain::OfferStatus::{Pending, Rejected};
use phresh_core::error::AppError;

#[tokio::test]
async fn test_owner_cannot_offer_on_own_job() {
    let market = Marketplace::in_memory().await;
    let job = market.job().await;

    let err = market.offers.create(OWNER, job.id).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    assert!(market.statuses(job.id).await.is_empty());
}

#[tokio::test]
async fn test_only_owner_lists_offers() {
    let market = Marketplace::in_memory().await;
    let job = market.job_with_offers(&[A, B]).await;

    let (listed_job, offers) = market.offers.list(OWNER, job.id).await.unwrap();
    assert_eq!(listed_job, job);
    assert_eq!(offers.len(), 2);

    for actor in [A, STRANGER] {
        let err = market.offers.list(actor, job.id).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}

#[tokio::test]
async fn test_owner_and_candidate_view_an_offer() {
    let market = Marketplace::in_memory().await;
    let job = market.job_with_offers(&[A, B]).await;

    let (_, offer) = market.offers.get(OWNER, job.id, A).await.unwrap();
    assert_eq!(offer.candidate_id, A);
    let (_, offer) = market.offers.get(A, job.id, A).await.unwrap();
    assert_eq!(offer.status, Pending);

    for actor in [B, STRANGER] {
        let err = market.offers.get(actor, job.id, A).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    let err = market.offers.get(OWNER, job.id, STRANGER).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_only_owner_accepts() {
    let market = Marketplace::in_memory().await;
    let job = market.job_with_offers(&[A, B]).await;

    for actor in [A, B, STRANGER] {
        let err = market.offers.accept(actor, job.id, A).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
    assert_eq!(
        market.statuses(job.id).await,
        vec![(A, Pending), (B, Pending)]
    );
}

#[tokio::test]
async fn test_candidates_act_only_on_their_own_offer() {
    let market = Marketplace::in_memory().await;
    let job = market.job_with_offers(&[A, B]).await;
    market.offers.accept(OWNER, job.id, A).await.unwrap();

    // The owner has no offer of their own to cancel or rescind
    let err = market.offers.cancel(OWNER, job.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    let err = market.offers.rescind(STRANGER, job.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // B's rejected offer can be neither cancelled nor rescinded
    assert!(matches!(
        market.offers.cancel(B, job.id).await.unwrap_err(),
        AppError::InvalidState(_)
    ));
    assert!(matches!(
        market.offers.rescind(B, job.id).await.unwrap_err(),
        AppError::InvalidState(_)
    ));
    assert_eq!(market.status(job.id, B).await, Some(Rejected));
}

#[tokio::test]
async fn test_unknown_job_is_not_found_for_every_operation() {
    let market = Marketplace::in_memory().await;
    const MISSING: i64 = 777;

    let errors = [
        market.offers.list(OWNER, MISSING).await.unwrap_err(),
        market.offers.get(OWNER, MISSING, A).await.unwrap_err(),
        market.offers.accept(OWNER, MISSING, A).await.unwrap_err(),
        market.offers.cancel(A, MISSING).await.unwrap_err(),
        market.offers.rescind(A, MISSING).await.unwrap_err(),
    ];
    for err in errors {
        assert!(matches!(err, AppError::NotFound(_)), "got {:?}", err);
    }
}
