//! SQLite-backed account repository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::SqlitePool;

use super::column;
use crate::domain::accounts::{Account, AccountRepository, NewAccount};
use crate::storage::StoreError;

/// SQLite-backed implementation of [`AccountRepository`]
///
/// Erasure relies on `ON DELETE CASCADE` from every record table to
/// `users`, so the pool must have foreign keys enabled.
#[derive(Debug, Clone)]
pub struct SqliteAccountRepository {
    pool: SqlitePool,
}

impl SqliteAccountRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_account(row: &SqliteRow) -> Result<Account, StoreError> {
        Ok(Account {
            id: column(row, "id")?,
            email: column(row, "email")?,
            password_hash: column(row, "password")?,
            created_at: column(row, "created_at")?,
            updated_at: column(row, "updated_at")?,
        })
    }
}

#[async_trait]
impl AccountRepository for SqliteAccountRepository {
    async fn create(&self, account: &NewAccount) -> Result<Account, StoreError> {
        let now = Utc::now();
        let row = sqlx::query(
            r#"
            INSERT INTO users (email, password, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx("insert account", e))?;

        Self::row_to_account(&row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx("get account by email", e))?;

        row.as_ref().map(Self::row_to_account).transpose()
    }

    async fn delete(&self, id: i64) -> Result<Account, StoreError> {
        let row = sqlx::query("DELETE FROM users WHERE id = ? RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx("delete account", e))?
            .ok_or_else(|| StoreError::NotFound(format!("account {}", id)))?;

        Self::row_to_account(&row)
    }
}
