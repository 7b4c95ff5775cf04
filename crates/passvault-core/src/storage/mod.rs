//! Storage layer - SQLite
//!
//! Provides database management and migrations for passvault.
//!
//! # Architecture
//!
//! - `database`: Connection pool management and initialization
//! - `migrations`: Schema versioning and automatic migration
//! - `error`: The error type every repository implementation reports
//!
//! # Usage
//!
//! ```ignore
//! use passvault_core::storage::{Database, DatabaseConfig};
//!
//! // Create an in-memory database for testing
//! let db = Database::in_memory().await?;
//!
//! // Or open a file database
//! let db = Database::new(DatabaseConfig::with_path("vault.db")).await?;
//! ```

pub mod database;
pub mod error;
pub mod migrations;

pub use database::{Database, DatabaseConfig};
pub use error::StoreError;
pub use migrations::{migration_status, run_migrations, MigrationStatus, CURRENT_VERSION};
