//! Application layer
//!
//! Input validators and the wiring that assembles a running vault.

pub mod validators;
pub mod vault;

pub use validators::{AccountValidator, DraftValidator, RecordValidator};
pub use vault::{Vault, VaultStores};
