// Port Layer - Interfaces for external dependencies

pub mod evaluation_repository;
pub mod job_directory;
pub mod offer_repository;
pub mod time_provider;
pub mod transaction;

// Re-exports
pub use evaluation_repository::EvaluationRepository;
pub use job_directory::JobDirectory;
pub use offer_repository::OfferRepository;
pub use time_provider::{SteppingTimeProvider, SystemTimeProvider, TimeProvider};
pub use transaction::{MarketplaceTransaction, Transaction, TransactionalMarketplace};
