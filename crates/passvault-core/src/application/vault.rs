//! Vault wiring
//!
//! Builds the process-wide cipher and token issuer once and hands them to
//! every service. Key derivation failure here is fatal to startup.

use std::sync::Arc;

use crate::config::Config;
use crate::domain::accounts::{AccountRepository, IdentityService};
use crate::domain::guard::AccessGuard;
use crate::domain::records::{
    Card, CardService, Credential, CredentialService, Note, NoteService, RecordRepository,
};
use crate::domain::security::{TokenIssuer, VaultCipher};
use crate::error::{Error, Result};
use crate::infrastructure::{MemoryStore, SqliteAccountRepository, SqliteRecordRepository};
use crate::storage::Database;

/// Repositories backing a vault
pub struct VaultStores {
    pub accounts: Arc<dyn AccountRepository>,
    pub credentials: Arc<dyn RecordRepository<Credential>>,
    pub cards: Arc<dyn RecordRepository<Card>>,
    pub notes: Arc<dyn RecordRepository<Note>>,
}

impl VaultStores {
    /// SQLite repositories sharing one pool
    pub fn sqlite(database: &Database) -> Self {
        let pool = database.pool().clone();
        Self {
            accounts: Arc::new(SqliteAccountRepository::new(pool.clone())),
            credentials: Arc::new(SqliteRecordRepository::<Credential>::new(pool.clone())),
            cards: Arc::new(SqliteRecordRepository::<Card>::new(pool.clone())),
            notes: Arc::new(SqliteRecordRepository::<Note>::new(pool)),
        }
    }

    /// All repositories over one in-memory store
    pub fn memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        let credentials: Arc<dyn RecordRepository<Credential>> = store.clone();
        let cards: Arc<dyn RecordRepository<Card>> = store.clone();
        let notes: Arc<dyn RecordRepository<Note>> = store.clone();
        Self {
            accounts: store,
            credentials,
            cards,
            notes,
        }
    }
}

/// Every service of a running vault
#[derive(Clone)]
pub struct Vault {
    pub identity: Arc<IdentityService>,
    pub guard: AccessGuard,
    pub credentials: CredentialService,
    pub cards: CardService,
    pub notes: NoteService,
}

impl Vault {
    /// Build a vault from configuration and an open database
    pub fn open(config: &Config, database: &Database) -> Result<Self> {
        let secret = config
            .auth
            .resolved_secret()
            .map_err(|e| Error::ConfigError(e.to_string()))?;
        Self::build(&secret, config, VaultStores::sqlite(database))
    }

    /// Build a vault over in-memory storage
    pub fn in_memory(secret: &str, config: &Config) -> Result<Self> {
        Self::build(secret, config, VaultStores::memory())
    }

    /// Build a vault over the given repositories
    pub fn build(secret: &str, config: &Config, stores: VaultStores) -> Result<Self> {
        config
            .validate()
            .map_err(|e| Error::ConfigError(e.to_string()))?;

        let ttl = config
            .auth
            .token_ttl()
            .map_err(|e| Error::ConfigError(e.to_string()))?;

        let cipher = Arc::new(VaultCipher::from_secret(secret)?);
        let tokens = Arc::new(TokenIssuer::new(secret, config.auth.issuer.clone(), ttl)?);

        let identity = Arc::new(IdentityService::new(stores.accounts, tokens));
        let guard = AccessGuard::new(identity.clone());

        tracing::debug!(issuer = %config.auth.issuer, "Vault services initialized");

        Ok(Self {
            identity,
            guard,
            credentials: CredentialService::new(stores.credentials, cipher.clone()),
            cards: CardService::new(stores.cards, cipher.clone()),
            notes: NoteService::new(stores.notes, cipher),
        })
    }
}

impl std::fmt::Debug for Vault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vault")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}
