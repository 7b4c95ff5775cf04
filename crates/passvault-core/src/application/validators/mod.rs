//! Application validators
//!
//! Input validation run before requests reach the services.

pub mod account_validator;
pub mod record_validator;

pub use account_validator::AccountValidator;
pub use record_validator::{DraftValidator, RecordValidator};
