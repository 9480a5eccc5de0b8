// Domain Layer - Pure business logic and entities

pub mod error;
pub mod evaluation;
pub mod job;
pub mod offer;

// Re-exports
pub use error::DomainError;
pub use evaluation::{Evaluation, EvaluationAggregate, EvaluationCreate};
pub use job::{Job, JobId, UserId};
pub use offer::{Offer, OfferStatus};
