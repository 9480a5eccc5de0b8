// sqlx::Error -> AppError mapping

use phresh_core::error::AppError;

// SQLite extended result codes that mean another transaction got there first:
// https://www.sqlite.org/rescode.html
const SQLITE_BUSY: &str = "5";
const SQLITE_LOCKED: &str = "6";
const SQLITE_BUSY_RECOVERY: &str = "261";
const SQLITE_LOCKED_SHAREDCACHE: &str = "262";
const SQLITE_BUSY_SNAPSHOT: &str = "517";

/// Convert sqlx::Error to AppError
///
/// Lock contention becomes `TransactionConflict` (retryable). Constraint
/// violations that carry meaning for a specific statement are handled by the
/// caller through `is_unique_violation` before falling back to this.
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            Some(
                SQLITE_BUSY
                | SQLITE_LOCKED
                | SQLITE_BUSY_RECOVERY
                | SQLITE_LOCKED_SHAREDCACHE
                | SQLITE_BUSY_SNAPSHOT,
            ) => AppError::TransactionConflict(db_err.message().to_string()),
            Some(code) => {
                AppError::Database(format!("Database error [{}]: {}", code, db_err.message()))
            }
            None => AppError::Database(format!("Database error: {}", db_err.message())),
        },
        sqlx::Error::RowNotFound => AppError::Database("Row not found".to_string()),
        sqlx::Error::ColumnNotFound(col) => {
            AppError::Database(format!("Column not found: {}", col))
        }
        // Connection, pool, protocol errors
        _ => AppError::Database(err.to_string()),
    }
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}
