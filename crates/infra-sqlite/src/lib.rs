// Phresh Infrastructure - SQLite Adapter
// Implements: TransactionalMarketplace, OfferRepository, EvaluationRepository, JobDirectory

mod connection;
mod error;
mod evaluation_repository;
mod job_directory;
mod job_lock;
mod migration;
mod offer_repository;
mod transaction;

pub use connection::create_pool;
pub use evaluation_repository::SqliteEvaluationRepository;
pub use job_directory::SqliteJobDirectory;
pub use job_lock::JobLocks;
pub use migration::run_migrations;
pub use offer_repository::SqliteOfferRepository;
pub use transaction::SqliteMarketplaceTransaction;

// Note: sqlx::Error conversion is handled by `error::map_sqlx_error`
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)
