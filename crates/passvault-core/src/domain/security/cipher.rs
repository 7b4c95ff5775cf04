//! Field cipher
//!
//! Encrypts single secret strings with AES-256-GCM. The key is derived once
//! from the process-wide secret with Argon2id and then shared read-only by
//! every resource service.

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use argon2::Argon2;
use base64::{engine::general_purpose::STANDARD, Engine};
use thiserror::Error;
use zeroize::Zeroizing;

/// Size of AES-256 key in bytes
const AES_KEY_SIZE: usize = 32;

/// Size of AES-GCM nonce in bytes
const NONCE_SIZE: usize = 12;

/// Size of the AES-GCM authentication tag in bytes
const TAG_SIZE: usize = 16;

/// Application salt for key derivation. The secret is the only input that
/// varies between deployments.
const KEY_DERIVATION_SALT: &[u8] = b"passvault.field-cipher.v1";

/// Errors that can occur during field encryption
#[derive(Debug, Error)]
pub enum CipherError {
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Malformed ciphertext: {0}")]
    MalformedCiphertext(String),

    #[error("Decryption failed (invalid key or corrupted data)")]
    DecryptionFailed,
}

/// Symmetric cipher for secret fields
///
/// Ciphertext tokens are `base64(nonce || ciphertext || tag)` with a fresh
/// random nonce per call, so encrypting the same plaintext twice yields two
/// different tokens that both decrypt to it.
#[derive(Clone)]
pub struct VaultCipher {
    cipher: Aes256Gcm,
}

impl VaultCipher {
    /// Derive the field key from the process-wide secret
    ///
    /// This is deliberately expensive; build one instance at startup and
    /// share it.
    pub fn from_secret(secret: &str) -> Result<Self, CipherError> {
        if secret.is_empty() {
            return Err(CipherError::KeyDerivation("secret is empty".to_string()));
        }

        let mut key = Zeroizing::new([0u8; AES_KEY_SIZE]);
        Argon2::default()
            .hash_password_into(secret.as_bytes(), KEY_DERIVATION_SALT, key.as_mut())
            .map_err(|e| CipherError::KeyDerivation(e.to_string()))?;

        Self::from_key(key.as_ref())
    }

    /// Build a cipher from raw key bytes
    pub fn from_key(key: &[u8]) -> Result<Self, CipherError> {
        if key.len() != AES_KEY_SIZE {
            return Err(CipherError::KeyDerivation(format!(
                "invalid key length: expected {}, got {}",
                AES_KEY_SIZE,
                key.len()
            )));
        }
        let cipher = Aes256Gcm::new_from_slice(key)
            .map_err(|e| CipherError::KeyDerivation(e.to_string()))?;
        Ok(Self { cipher })
    }

    /// Encrypt a plaintext secret into a ciphertext token
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CipherError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;

        let mut sealed = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);
        Ok(STANDARD.encode(sealed))
    }

    /// Decrypt a ciphertext token produced by [`VaultCipher::encrypt`]
    pub fn decrypt(&self, token: &str) -> Result<String, CipherError> {
        let sealed = STANDARD
            .decode(token)
            .map_err(|e| CipherError::MalformedCiphertext(format!("invalid base64: {}", e)))?;

        if sealed.len() < NONCE_SIZE + TAG_SIZE {
            return Err(CipherError::MalformedCiphertext(format!(
                "expected at least {} bytes, got {}",
                NONCE_SIZE + TAG_SIZE,
                sealed.len()
            )));
        }

        let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_SIZE);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| CipherError::DecryptionFailed)?;

        String::from_utf8(plaintext)
            .map_err(|e| CipherError::MalformedCiphertext(format!("invalid UTF-8: {}", e)))
    }
}

impl std::fmt::Debug for VaultCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultCipher")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cipher() -> VaultCipher {
        VaultCipher::from_key(&[7u8; AES_KEY_SIZE]).unwrap()
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let cipher = cipher();
        for plaintext in ["S3nhaF@rt&", "", "ünïcødé 🔐", &"x".repeat(4096)] {
            let token = cipher.encrypt(plaintext).unwrap();
            assert_eq!(cipher.decrypt(&token).unwrap(), plaintext);
        }
    }

    #[test]
    fn test_ciphertext_does_not_contain_plaintext() {
        let cipher = cipher();
        let token = cipher.encrypt("hunter2hunter2").unwrap();
        assert!(!token.contains("hunter2"));
    }

    #[test]
    fn test_fresh_nonce_per_encryption() {
        let cipher = cipher();
        let a = cipher.encrypt("same").unwrap();
        let b = cipher.encrypt("same").unwrap();
        assert_ne!(a, b);
        assert_eq!(cipher.decrypt(&a).unwrap(), cipher.decrypt(&b).unwrap());
    }

    #[test]
    fn test_same_secret_derives_same_key() {
        let first = VaultCipher::from_secret("process-secret").unwrap();
        let second = VaultCipher::from_secret("process-secret").unwrap();

        let token = first.encrypt("card pin").unwrap();
        assert_eq!(second.decrypt(&token).unwrap(), "card pin");
    }

    #[test]
    fn test_decrypt_with_wrong_key_fails() {
        let token = VaultCipher::from_secret("one").unwrap().encrypt("x").unwrap();
        let result = VaultCipher::from_secret("two").unwrap().decrypt(&token);
        assert!(matches!(result, Err(CipherError::DecryptionFailed)));
    }

    #[test]
    fn test_malformed_ciphertext_fails_loudly() {
        let cipher = cipher();

        assert!(matches!(
            cipher.decrypt("not base64 at all!"),
            Err(CipherError::MalformedCiphertext(_))
        ));
        assert!(matches!(
            cipher.decrypt(&STANDARD.encode([1u8; 8])),
            Err(CipherError::MalformedCiphertext(_))
        ));

        let mut tampered = STANDARD.decode(cipher.encrypt("secret").unwrap()).unwrap();
        let last = tampered.len() - 1;
        tampered[last] ^= 0x01;
        assert!(matches!(
            cipher.decrypt(&STANDARD.encode(tampered)),
            Err(CipherError::DecryptionFailed)
        ));
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(matches!(
            VaultCipher::from_secret(""),
            Err(CipherError::KeyDerivation(_))
        ));
    }

    #[test]
    fn test_invalid_key_length() {
        assert!(VaultCipher::from_key(&[0u8; 16]).is_err());
    }

    #[test]
    fn test_debug_redacted() {
        let debug = format!("{:?}", cipher());
        assert!(debug.contains("[REDACTED]"));
    }
}
