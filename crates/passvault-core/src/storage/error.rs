//! Storage collaborator errors

use thiserror::Error;

/// Errors reported by repository implementations
///
/// `Conflict` is the uniqueness signal. It is the only storage outcome the
/// services translate into a domain error; everything else is unexpected.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Unique constraint violated: {0}")]
    Conflict(String),

    #[error("Row not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Corrupt row: {0}")]
    Corrupt(String),
}

impl StoreError {
    /// Classify a sqlx error raised while running `operation`
    pub fn from_sqlx(operation: &str, error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::Conflict(format!("{}: {}", operation, db.message()))
            }
            sqlx::Error::RowNotFound => Self::NotFound(operation.to_string()),
            _ => Self::Database(format!("{}: {}", operation, error)),
        }
    }

    /// Whether this is the uniqueness signal
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}
