//! Error types for Passvault

use crate::domain::security::{CipherError, TokenError};
use crate::storage::StoreError;
use thiserror::Error;

/// Result type alias using Passvault's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Passvault error types
///
/// The first groups are the domain outcomes callers are expected to act on.
/// Everything from the storage group down is unexpected and must not be
/// surfaced to a remote caller with detail.
#[derive(Error, Debug)]
pub enum Error {
    // Access errors (E001-E099)
    #[error("Invalid credentials or token")]
    Unauthorized,

    #[error("Access to {0} is forbidden")]
    Forbidden(String),

    // Entity errors (E100-E199)
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} already exists")]
    Conflict(String),

    // Input errors (E200-E299)
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    // Storage errors (E400-E499)
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    // Crypto errors (E500-E599)
    #[error("Cipher error: {0}")]
    Cipher(#[from] CipherError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    // Config errors (E600-E699)
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl Error {
    /// Create a validation error for a named input field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "E001",
            Self::Forbidden(_) => "E002",
            Self::NotFound(_) => "E100",
            Self::Conflict(_) => "E101",
            Self::Validation { .. } => "E200",
            Self::Storage(_) => "E400",
            Self::Cipher(_) => "E500",
            Self::Token(_) => "E501",
            Self::PasswordHash(_) => "E502",
            Self::ConfigError(_) => "E600",
        }
    }

    /// Whether this error is outside the domain taxonomy
    ///
    /// Unexpected errors are answered with a generic internal error.
    pub fn is_unexpected(&self) -> bool {
        !matches!(
            self,
            Self::Unauthorized
                | Self::Forbidden(_)
                | Self::NotFound(_)
                | Self::Conflict(_)
                | Self::Validation { .. }
        )
    }
}
