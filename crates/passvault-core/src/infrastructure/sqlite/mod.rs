//! SQLite repository implementations

pub mod accounts;
pub mod records;

pub use accounts::SqliteAccountRepository;
pub use records::{SqliteRecord, SqliteRecordRepository};

use sqlx::sqlite::SqliteRow;
use sqlx::{Decode, Row, Sqlite, Type};

use crate::storage::StoreError;

/// Read one column, reporting a type mismatch as a corrupt row
pub(crate) fn column<'r, T>(row: &'r SqliteRow, name: &str) -> Result<T, StoreError>
where
    T: Decode<'r, Sqlite> + Type<Sqlite>,
{
    row.try_get(name)
        .map_err(|e| StoreError::Corrupt(format!("column {}: {}", name, e)))
}
