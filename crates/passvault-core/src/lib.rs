//! Passvault Core Library
//!
//! This crate provides the core of Passvault, a personal vault for login
//! credentials, payment cards and notes:
//! - Accounts with Argon2id password hashes and signed bearer tokens
//! - An access guard resolving the caller from an `Authorization` header
//! - One resource service pattern shared by every record kind, with strict
//!   per-owner access and AES-256-GCM encryption of secret fields
//! - Storage (SQLite with migrations, in-memory store for tests)
//! - Configuration (TOML file, secret from the environment)

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod storage;

#[cfg(test)]
mod error_tests;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::application::{AccountValidator, DraftValidator, Vault};
    pub use crate::config::Config;
    pub use crate::domain::records::{RecordKind, SecretRecord};
    pub use crate::domain::security::Identity;
    pub use crate::error::{Error, Result};
}
