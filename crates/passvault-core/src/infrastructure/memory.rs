//! In-memory storage for tests
//!
//! One store implements every repository over a shared table set so that
//! account erasure can cascade. It enforces the same rules as the SQLite
//! schema: unique emails, unique `(owner, title)` per kind, records must
//! reference an existing account.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::accounts::{Account, AccountRepository, NewAccount};
use crate::domain::records::{Card, Credential, Note, RecordRepository, SecretRecord};
use crate::storage::StoreError;

#[derive(Debug)]
struct Table<T> {
    rows: Vec<T>,
    last_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            last_id: 0,
        }
    }
}

impl<T> Table<T> {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

#[derive(Debug, Default)]
struct Tables {
    accounts: Table<Account>,
    credentials: Table<Credential>,
    cards: Table<Card>,
    notes: Table<Note>,
}

/// Record kinds the in-memory store can hold
trait MemoryRecord: SecretRecord {
    fn table(tables: &mut Tables) -> &mut Table<Self>;

    fn materialize(id: i64, owner_id: i64, draft: &Self::Draft, now: DateTime<Utc>) -> Self;
}

impl MemoryRecord for Credential {
    fn table(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.credentials
    }

    fn materialize(id: i64, owner_id: i64, draft: &Self::Draft, now: DateTime<Utc>) -> Self {
        Credential {
            id,
            owner_id,
            title: draft.title.clone(),
            url: draft.url.clone(),
            username: draft.username.clone(),
            password: draft.password.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl MemoryRecord for Card {
    fn table(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.cards
    }

    fn materialize(id: i64, owner_id: i64, draft: &Self::Draft, now: DateTime<Utc>) -> Self {
        Card {
            id,
            owner_id,
            title: draft.title.clone(),
            number: draft.number.clone(),
            name: draft.name.clone(),
            expiration_date: draft.expiration_date,
            password: draft.password.clone(),
            secure_code: draft.secure_code.clone(),
            is_virtual: draft.is_virtual,
            card_type: draft.card_type,
            created_at: now,
            updated_at: now,
        }
    }
}

impl MemoryRecord for Note {
    fn table(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.notes
    }

    fn materialize(id: i64, owner_id: i64, draft: &Self::Draft, now: DateTime<Utc>) -> Self {
        Note {
            id,
            owner_id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// In-memory implementation of every repository
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Database("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl AccountRepository for MemoryStore {
    async fn create(&self, account: &NewAccount) -> Result<Account, StoreError> {
        let mut tables = self.tables()?;
        if tables.accounts.rows.iter().any(|a| a.email == account.email) {
            return Err(StoreError::Conflict("users.email".to_string()));
        }

        let now = Utc::now();
        let created = Account {
            id: tables.accounts.next_id(),
            email: account.email.clone(),
            password_hash: account.password_hash.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.accounts.rows.push(created.clone());
        Ok(created)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let tables = self.tables()?;
        Ok(tables.accounts.rows.iter().find(|a| a.email == email).cloned())
    }

    async fn delete(&self, id: i64) -> Result<Account, StoreError> {
        let mut tables = self.tables()?;
        let position = tables
            .accounts
            .rows
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("account {}", id)))?;

        let account = tables.accounts.rows.remove(position);
        tables.credentials.rows.retain(|r| r.owner_id != id);
        tables.cards.rows.retain(|r| r.owner_id != id);
        tables.notes.rows.retain(|r| r.owner_id != id);
        Ok(account)
    }
}

#[async_trait]
impl<R: MemoryRecord> RecordRepository<R> for MemoryStore {
    async fn create(&self, owner_id: i64, draft: &R::Draft) -> Result<R, StoreError> {
        let mut tables = self.tables()?;
        if !tables.accounts.rows.iter().any(|a| a.id == owner_id) {
            return Err(StoreError::Database(
                "FOREIGN KEY constraint failed".to_string(),
            ));
        }

        let table = R::table(&mut tables);
        let title = R::draft_title(draft);
        if table
            .rows
            .iter()
            .any(|r| r.owner_id() == owner_id && r.title() == title)
        {
            return Err(StoreError::Conflict(format!("{}.author_id, title", R::KIND.plural())));
        }

        let id = table.next_id();
        let record = R::materialize(id, owner_id, draft, Utc::now());
        table.rows.push(record.clone());
        Ok(record)
    }

    async fn find_many(&self, owner_id: i64) -> Result<Vec<R>, StoreError> {
        let mut tables = self.tables()?;
        Ok(R::table(&mut tables)
            .rows
            .iter()
            .filter(|r| r.owner_id() == owner_id)
            .cloned()
            .collect())
    }

    async fn find_first(&self, id: i64) -> Result<Option<R>, StoreError> {
        let mut tables = self.tables()?;
        Ok(R::table(&mut tables).rows.iter().find(|r| r.id() == id).cloned())
    }

    async fn delete(&self, id: i64) -> Result<R, StoreError> {
        let mut tables = self.tables()?;
        let table = R::table(&mut tables);
        let position = table
            .rows
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| StoreError::NotFound(format!("{} {}", R::KIND, id)))?;
        Ok(table.rows.remove(position))
    }

    async fn count_for_owner(&self, owner_id: i64) -> Result<i64, StoreError> {
        let mut tables = self.tables()?;
        let count = R::table(&mut tables)
            .rows
            .iter()
            .filter(|r| r.owner_id() == owner_id)
            .count();
        Ok(count as i64)
    }
}
