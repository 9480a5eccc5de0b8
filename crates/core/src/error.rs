// Central Error Type for the Application

use crate::domain::{DomainError, JobId, UserId};
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Offer already exists for job {job_id} from user {candidate_id}")]
    DuplicateOffer { job_id: JobId, candidate_id: UserId },

    #[error("Transaction conflict: {0}")]
    TransactionConflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Only a conflicting concurrent transaction may be retried
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::TransactionConflict(_))
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidStateTransition { .. } => AppError::InvalidState(err.to_string()),
            DomainError::ValidationError(msg) => AppError::Validation(msg),
            // A status we cannot parse came out of the store
            DomainError::UnknownStatus(_) => AppError::Database(err.to_string()),
        }
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

// Note: sqlx::Error conversion is handled in the infra-sqlite crate
// by mapping into AppError there (orphan rules)

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_transition_error_maps_to_invalid_state() {
        let err: AppError = DomainError::InvalidStateTransition {
            from: "pending".to_string(),
            to: "cancelled".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::InvalidState(_)));
        assert!(err.to_string().contains("pending -> cancelled"));
    }

    #[test]
    fn test_domain_validation_error_maps_to_validation() {
        let err: AppError = DomainError::ValidationError("bad rating".to_string()).into();
        assert!(matches!(err, AppError::Validation(msg) if msg == "bad rating"));
    }

    #[test]
    fn test_only_conflicts_are_retryable() {
        assert!(AppError::TransactionConflict("busy".to_string()).is_retryable());
        assert!(!AppError::InvalidState("x".to_string()).is_retryable());
        assert!(!AppError::Database("x".to_string()).is_retryable());
    }
}
