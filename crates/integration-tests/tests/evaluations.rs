//! Evaluations: completion of accepted offers and cleaner statistics

mod common;

use common::{rating, Marketplace, A, B, OWNER, STRANGER};
use phresh_core::domain::EvaluationCreate;
use phresh_core::domain::OfferStatus::{Accepted, Completed, Pending, Rejected};
use phresh_core::error::AppError;
use phresh_core::port::EvaluationRepository;

#[tokio::test]
async fn test_evaluation_completes_accepted_offer() {
    let market = Marketplace::in_memory().await;
    let job = market.job_with_offers(&[A, B]).await;
    market.offers.accept(OWNER, job.id, A).await.unwrap();

    let evaluation = market
        .evaluations
        .create(
            OWNER,
            job.id,
            A,
            EvaluationCreate {
                headline: Some("Sparkling".to_string()),
                comment: Some("Even cleaned behind the fridge.".to_string()),
                professionalism: Some(5),
                completeness: Some(4),
                efficiency: Some(5),
                overall_rating: 5,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(evaluation.job_id, job.id);
    assert_eq!(evaluation.cleaner_id, A);
    assert_eq!(
        market.statuses(job.id).await,
        vec![(A, Completed), (B, Rejected)]
    );

    let stored = market.evaluations.get(job.id, A).await.unwrap();
    assert_eq!(stored, evaluation);

    println!("✅ Evaluation stored and offer completed");
}

#[tokio::test]
async fn test_second_evaluation_fails() {
    let market = Marketplace::in_memory().await;
    let job = market.job_with_offers(&[A]).await;
    market.offers.accept(OWNER, job.id, A).await.unwrap();
    market
        .evaluations
        .create(OWNER, job.id, A, rating(4))
        .await
        .unwrap();

    let err = market
        .evaluations
        .create(OWNER, job.id, A, rating(1))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));

    assert_eq!(market.evaluation_repo.count().await.unwrap(), 1);
    assert_eq!(market.evaluations.get(job.id, A).await.unwrap().overall_rating, 4);
}

#[tokio::test]
async fn test_out_of_range_rating_changes_nothing() {
    let market = Marketplace::in_memory().await;
    let job = market.job_with_offers(&[A]).await;
    market.offers.accept(OWNER, job.id, A).await.unwrap();

    let err = market
        .evaluations
        .create(OWNER, job.id, A, rating(6))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = market
        .evaluations
        .create(
            OWNER,
            job.id,
            A,
            EvaluationCreate {
                efficiency: Some(-1),
                ..rating(3)
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    assert_eq!(market.status(job.id, A).await, Some(Accepted));
    assert_eq!(market.evaluation_repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_invalid_rating_reported_before_permission() {
    let market = Marketplace::in_memory().await;
    let job = market.job_with_offers(&[A]).await;
    market.offers.accept(OWNER, job.id, A).await.unwrap();

    let err = market
        .evaluations
        .create(STRANGER, job.id, A, rating(9))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "got {:?}", err);

    let err = market
        .evaluations
        .create(STRANGER, job.id, A, rating(4))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)), "got {:?}", err);
    assert_eq!(market.status(job.id, A).await, Some(Accepted));
}

#[tokio::test]
async fn test_overlong_headline_is_rejected() {
    let market = Marketplace::in_memory().await;
    let job = market.job_with_offers(&[A]).await;
    market.offers.accept(OWNER, job.id, A).await.unwrap();

    let err = market
        .evaluations
        .create(
            OWNER,
            job.id,
            A,
            EvaluationCreate {
                headline: Some("x".repeat(201)),
                ..rating(3)
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(market.status(job.id, A).await, Some(Accepted));
}

#[tokio::test]
async fn test_only_accepted_offers_can_be_evaluated() {
    let market = Marketplace::in_memory().await;
    let job = market.job_with_offers(&[A, B]).await;

    let err = market
        .evaluations
        .create(OWNER, job.id, A, rating(3))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));

    market.offers.accept(OWNER, job.id, A).await.unwrap();
    let err = market
        .evaluations
        .create(OWNER, job.id, B, rating(3))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));

    let err = market
        .evaluations
        .create(OWNER, job.id, STRANGER, rating(3))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_only_owner_can_evaluate() {
    let market = Marketplace::in_memory().await;
    let job = market.job_with_offers(&[A]).await;
    market.offers.accept(OWNER, job.id, A).await.unwrap();

    for actor in [A, STRANGER] {
        let err = market
            .evaluations
            .create(actor, job.id, A, rating(5))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
    assert_eq!(market.status(job.id, A).await, Some(Accepted));
}

#[tokio::test]
async fn test_cleaner_statistics() {
    let market = Marketplace::in_memory().await;

    let evaluations = [
        EvaluationCreate {
            professionalism: Some(5),
            ..rating(5)
        },
        EvaluationCreate {
            professionalism: Some(3),
            efficiency: Some(4),
            ..rating(4)
        },
        rating(4),
        EvaluationCreate {
            no_show: true,
            ..rating(0)
        },
        EvaluationCreate {
            no_show: true,
            ..rating(1)
        },
    ];

    for payload in evaluations {
        let job = market.job_with_offers(&[A, B]).await;
        market.offers.accept(OWNER, job.id, A).await.unwrap();
        market
            .evaluations
            .create(OWNER, job.id, A, payload)
            .await
            .unwrap();
    }

    let stats = market.evaluations.aggregate_for_cleaner(A).await.unwrap();
    assert_eq!(stats.total_evaluations, 5);
    assert!((stats.avg_overall_rating - 2.8).abs() < 1e-9);
    assert_eq!(stats.max_overall_rating, 5);
    assert_eq!(stats.min_overall_rating, 0);
    // Zero-star ratings are counted in the total but in no star bucket
    assert_eq!(
        (
            stats.one_stars,
            stats.two_stars,
            stats.three_stars,
            stats.four_stars,
            stats.five_stars
        ),
        (1, 0, 0, 2, 1)
    );
    assert_eq!(stats.total_no_show, 2);
    assert!((stats.avg_professionalism - 4.0).abs() < 1e-9);
    assert!((stats.avg_efficiency - 4.0).abs() < 1e-9);
    assert_eq!(stats.avg_completeness, 0.0);

    assert_eq!(market.evaluations.list_for_cleaner(A).await.unwrap().len(), 5);

    // B was never evaluated
    let empty = market.evaluations.aggregate_for_cleaner(B).await.unwrap();
    assert_eq!(empty.total_evaluations, 0);
    assert_eq!(empty.avg_overall_rating, 0.0);
    assert!(market.evaluations.list_for_cleaner(B).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_evaluation_is_not_found() {
    let market = Marketplace::in_memory().await;
    let job = market.job_with_offers(&[A]).await;

    let err = market.evaluations.get(job.id, A).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(market.status(job.id, A).await, Some(Pending));
}
