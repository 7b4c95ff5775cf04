//! Infrastructure layer
//!
//! Repository implementations: SQLite for the running service and an
//! in-memory store for tests.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::{SqliteAccountRepository, SqliteRecordRepository};
