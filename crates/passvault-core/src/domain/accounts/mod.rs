//! Accounts domain
//!
//! - **Entities**: `Account`, `NewAccount`, `AccountView`, `ErasedAccount`
//! - **Repository**: `AccountRepository`
//! - **Service**: `IdentityService` for sign-up, sign-in, token validation
//!   and erasure

pub mod entity;
pub mod repository;
pub mod service;

pub use entity::{Account, AccountView, ErasedAccount, NewAccount, SignInResponse};
pub use repository::AccountRepository;
pub use service::IdentityService;
