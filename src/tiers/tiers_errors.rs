use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

/// Custom error type for price tier operations
#[derive(Debug, Error)]
pub enum TierError {
    #[error("A price tier named '{0}' already exists")]
    DuplicateName(String),
    #[error("Price tier not found: {0}")]
    NotFound(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<DieselError> for TierError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => TierError::NotFound("Record not found".to_string()),
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                TierError::DuplicateName(info.message().to_string())
            }
            _ => TierError::DatabaseError(err.to_string()),
        }
    }
}
