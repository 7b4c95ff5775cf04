//! Security primitives
//!
//! - `cipher`: AES-256-GCM field encryption with a key derived from the
//!   process-wide secret
//! - `password`: Argon2id account password hashing
//! - `token`: signed, time-bound identity tokens

pub mod cipher;
pub mod password;
pub mod token;

pub use cipher::{CipherError, VaultCipher};
pub use password::{hash_password, verify_password};
pub use token::{
    Identity, TokenError, TokenIssuer, DEFAULT_ISSUER, DEFAULT_TOKEN_TTL_SECS,
    MAX_TOKEN_TTL_SECS,
};
