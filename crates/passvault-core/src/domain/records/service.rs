//! Resource service
//!
//! One service implementation shared by every record kind. It attaches the
//! owner on create, keeps secret fields encrypted in storage, and enforces
//! ownership on every single-record access.

use std::sync::Arc;

use super::entity::{Card, Credential, Note};
use super::kind::SecretRecord;
use super::repository::RecordRepository;
use crate::domain::security::{Identity, VaultCipher};
use crate::error::{Error, Result};
use crate::storage::StoreError;

pub type CredentialService = ResourceService<Credential>;
pub type CardService = ResourceService<Card>;
pub type NoteService = ResourceService<Note>;

/// Owned secret resource service for record kind `R`
pub struct ResourceService<R: SecretRecord> {
    repository: Arc<dyn RecordRepository<R>>,
    cipher: Arc<VaultCipher>,
}

impl<R: SecretRecord> Clone for ResourceService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            cipher: Arc::clone(&self.cipher),
        }
    }
}

impl<R: SecretRecord> ResourceService<R> {
    pub fn new(repository: Arc<dyn RecordRepository<R>>, cipher: Arc<VaultCipher>) -> Self {
        Self { repository, cipher }
    }

    /// Create a record owned by `owner`
    ///
    /// The secret field is encrypted before it reaches storage. A duplicate
    /// title for the same owner is a `Conflict`; any other storage failure
    /// is returned as is.
    pub async fn create(&self, mut draft: R::Draft, owner: &Identity) -> Result<R::Created> {
        if let Some(secret) = R::draft_secret_mut(&mut draft) {
            *secret = self.cipher.encrypt(secret)?;
        }

        match self.repository.create(owner.id, &draft).await {
            Ok(record) => {
                tracing::info!(
                    kind = %R::KIND,
                    record_id = record.id(),
                    owner_id = owner.id,
                    "Record created"
                );
                Ok(record.into_created())
            }
            Err(StoreError::Conflict(_)) => {
                tracing::debug!(kind = %R::KIND, owner_id = owner.id, "Duplicate title");
                Err(Error::Conflict(format!(
                    "{} titled '{}'",
                    R::KIND,
                    R::draft_title(&draft)
                )))
            }
            Err(e) => {
                tracing::error!(kind = %R::KIND, owner_id = owner.id, error = %e, "Failed to create record");
                Err(e.into())
            }
        }
    }

    /// Every record of `owner_id` with its secret decrypted
    pub async fn find_all(&self, owner_id: i64) -> Result<Vec<R>> {
        let records = self.repository.find_many(owner_id).await?;
        records
            .into_iter()
            .map(|record| self.reveal(record))
            .collect()
    }

    /// A single record, visible only to its owner
    ///
    /// A missing id is `NotFound` for every requester. An existing record
    /// owned by someone else is `Forbidden`.
    pub async fn find_one(&self, id: i64, requester_id: i64) -> Result<R> {
        let record = self.owned(id, requester_id).await?;
        self.reveal(record)
    }

    /// Hard delete a record after the same checks as [`Self::find_one`]
    pub async fn remove(&self, id: i64, requester_id: i64) -> Result<R::Removed> {
        let record = self.find_one(id, requester_id).await?;

        let deleted = match self.repository.delete(record.id()).await {
            Ok(deleted) => deleted,
            Err(StoreError::NotFound(_)) => {
                return Err(Error::NotFound(format!("{} {}", R::KIND, id)));
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(kind = %R::KIND, record_id = id, owner_id = requester_id, "Record removed");
        Ok(deleted.into_removed())
    }

    /// Number of records of this kind owned by `owner_id`
    pub async fn count_for_owner(&self, owner_id: i64) -> Result<i64> {
        Ok(self.repository.count_for_owner(owner_id).await?)
    }

    async fn owned(&self, id: i64, requester_id: i64) -> Result<R> {
        let record = self
            .repository
            .find_first(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("{} {}", R::KIND, id)))?;

        if record.owner_id() != requester_id {
            tracing::warn!(
                kind = %R::KIND,
                record_id = id,
                requester_id = requester_id,
                "Access to record of another owner denied"
            );
            return Err(Error::Forbidden(format!("{} {}", R::KIND, id)));
        }

        Ok(record)
    }

    fn reveal(&self, mut record: R) -> Result<R> {
        if let Some(secret) = record.secret_mut() {
            *secret = self.cipher.decrypt(secret)?;
        }
        Ok(record)
    }
}
