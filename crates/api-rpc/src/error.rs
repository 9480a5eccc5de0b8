//! RPC Error Types
//!
//! Maps application errors to JSON-RPC error codes.

use jsonrpsee::types::ErrorObjectOwned;
use phresh_core::error::AppError;
use serde_json::json;
use tracing::warn;

/// RPC Error Codes
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const NOT_FOUND: i32 = 4001;
    pub const INVALID_STATE: i32 = 4002;
    pub const DUPLICATE_OFFER: i32 = 4003;
    pub const FORBIDDEN: i32 = 4004;
    pub const TRANSACTION_CONFLICT: i32 = 4009;
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const DB_ERROR: i32 = 5001;
}

/// Convert AppError to JSON-RPC ErrorObject
pub fn to_rpc_error(err: AppError) -> ErrorObjectOwned {
    match err {
        AppError::Validation(msg) => {
            ErrorObjectOwned::owned(code::VALIDATION_ERROR, msg, None::<()>)
        }
        AppError::NotFound(msg) => ErrorObjectOwned::owned(code::NOT_FOUND, msg, None::<()>),
        AppError::InvalidState(msg) => {
            ErrorObjectOwned::owned(code::INVALID_STATE, msg, None::<()>)
        }
        AppError::DuplicateOffer {
            job_id,
            candidate_id,
        } => ErrorObjectOwned::owned(
            code::DUPLICATE_OFFER,
            format!(
                "Candidate {} already has an offer for job {}",
                candidate_id, job_id
            ),
            Some(json!({ "job_id": job_id, "candidate_id": candidate_id })),
        ),
        AppError::Forbidden(msg) => ErrorObjectOwned::owned(code::FORBIDDEN, msg, None::<()>),
        AppError::TransactionConflict(msg) => {
            ErrorObjectOwned::owned(code::TRANSACTION_CONFLICT, msg, None::<()>)
        }
        AppError::Serialization(e) => {
            ErrorObjectOwned::owned(code::VALIDATION_ERROR, e.to_string(), None::<()>)
        }
        AppError::Database(msg) => {
            warn!(error = %msg, "Database error surfaced to RPC client");
            ErrorObjectOwned::owned(code::DB_ERROR, msg, None::<()>)
        }
        AppError::Config(msg) | AppError::Internal(msg) => {
            warn!(error = %msg, "Internal error surfaced to RPC client");
            ErrorObjectOwned::owned(code::INTERNAL_ERROR, msg, None::<()>)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let cases = [
            (AppError::Validation("x".into()), code::VALIDATION_ERROR),
            (AppError::NotFound("x".into()), code::NOT_FOUND),
            (AppError::InvalidState("x".into()), code::INVALID_STATE),
            (AppError::Forbidden("x".into()), code::FORBIDDEN),
            (AppError::TransactionConflict("x".into()), code::TRANSACTION_CONFLICT),
            (AppError::Database("x".into()), code::DB_ERROR),
            (AppError::Internal("x".into()), code::INTERNAL_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(to_rpc_error(err).code(), expected);
        }
    }

    #[test]
    fn test_duplicate_offer_carries_key() {
        let err = to_rpc_error(AppError::DuplicateOffer {
            job_id: 3,
            candidate_id: 9,
        });
        assert_eq!(err.code(), code::DUPLICATE_OFFER);
        let data = err.data().map(|raw| raw.get().to_string()).unwrap();
        assert!(data.contains("\"candidate_id\":9"));
    }
}
