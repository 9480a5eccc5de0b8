// Application Layer - Use Cases and Business Logic

pub mod evaluation;
pub mod offer;
pub mod policy;
pub mod retry;

// Re-exports
pub use evaluation::EvaluationService;
pub use offer::OfferService;
pub use policy::MarketplacePolicy;
pub use retry::retry_on_conflict;
