//! Repository trait for secret record persistence

use async_trait::async_trait;

use super::kind::SecretRecord;
use crate::storage::StoreError;

/// Storage collaborator for one record kind
///
/// Implementations must enforce `(owner_id, title)` uniqueness and report
/// a violation as [`StoreError::Conflict`], distinct from every other
/// failure.
#[async_trait]
pub trait RecordRepository<R: SecretRecord>: Send + Sync {
    /// Persist a draft for `owner_id`, returning the stored record
    async fn create(&self, owner_id: i64, draft: &R::Draft) -> Result<R, StoreError>;

    /// All records of `owner_id`, oldest first
    async fn find_many(&self, owner_id: i64) -> Result<Vec<R>, StoreError>;

    /// The record with `id`, whoever owns it
    async fn find_first(&self, id: i64) -> Result<Option<R>, StoreError>;

    /// Hard delete by id, returning the deleted row
    async fn delete(&self, id: i64) -> Result<R, StoreError>;

    /// Number of records of `owner_id`
    async fn count_for_owner(&self, owner_id: i64) -> Result<i64, StoreError>;
}
