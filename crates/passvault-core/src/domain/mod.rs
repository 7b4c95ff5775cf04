//! Domain layer
//!
//! - `security`: cipher, password hashing, identity tokens
//! - `accounts`: account lifecycle and the identity service
//! - `guard`: bearer-token access guard
//! - `records`: the owned secret resource pattern for credentials, cards
//!   and notes

pub mod accounts;
pub mod guard;
pub mod records;
pub mod security;

pub use guard::AccessGuard;
