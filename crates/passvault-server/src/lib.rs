//! Passvault HTTP server
//!
//! Exposes the vault over HTTP: public sign-up and sign-in, everything else
//! behind the bearer auth middleware.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod server;

pub use error::ApiError;
pub use server::build_router;
