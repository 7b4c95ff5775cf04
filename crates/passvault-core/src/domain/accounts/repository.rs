//! Repository trait for account persistence

use async_trait::async_trait;

use super::entity::{Account, NewAccount};
use crate::storage::StoreError;

/// Storage collaborator for accounts
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Persist a new account; a taken email is [`StoreError::Conflict`]
    async fn create(&self, account: &NewAccount) -> Result<Account, StoreError>;

    /// Look up an account by exact email
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    /// Delete an account and every secret record it owns
    async fn delete(&self, id: i64) -> Result<Account, StoreError>;
}
