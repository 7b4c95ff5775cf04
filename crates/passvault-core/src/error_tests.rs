//! Error module tests

use crate::domain::security::{CipherError, TokenError};
use crate::error::Error;
use crate::storage::StoreError;

#[test]
fn test_unauthorized_error() {
    let error = Error::Unauthorized;
    assert_eq!(error.code(), "E001");
    assert!(!error.is_unexpected());
}

#[test]
fn test_forbidden_error() {
    let error = Error::Forbidden("credential 7".to_string());
    assert_eq!(error.code(), "E002");
    assert!(!error.is_unexpected());
    assert!(error.to_string().contains("credential 7"));
}

#[test]
fn test_not_found_error() {
    let error = Error::NotFound("card 3".to_string());
    assert_eq!(error.code(), "E100");
    assert!(!error.is_unexpected());
    assert_eq!(error.to_string(), "card 3 not found");
}

#[test]
fn test_conflict_error() {
    let error = Error::Conflict("note 'groceries'".to_string());
    assert_eq!(error.code(), "E101");
    assert!(!error.is_unexpected());
    assert!(error.to_string().contains("already exists"));
}

#[test]
fn test_validation_error() {
    let error = Error::validation("email", "must be a valid email address");
    assert_eq!(error.code(), "E200");
    assert!(!error.is_unexpected());
    assert_eq!(
        error.to_string(),
        "Invalid email: must be a valid email address"
    );
}

#[test]
fn test_storage_error_is_unexpected() {
    let error = Error::from(StoreError::Database("disk I/O error".to_string()));
    assert_eq!(error.code(), "E400");
    assert!(error.is_unexpected());
}

#[test]
fn test_cipher_error_is_unexpected() {
    let error = Error::from(CipherError::MalformedCiphertext("truncated".to_string()));
    assert_eq!(error.code(), "E500");
    assert!(error.is_unexpected());
}

#[test]
fn test_token_error_is_unexpected() {
    let error = Error::from(TokenError::Signing("expiry is out of range".to_string()));
    assert_eq!(error.code(), "E501");
    assert!(error.is_unexpected());
}

#[test]
fn test_config_error() {
    let error = Error::ConfigError("secret is not set".to_string());
    assert_eq!(error.code(), "E600");
    assert!(error.is_unexpected());
}
