//! SQLite-backed secret record repository
//!
//! One generic repository serves all three kinds. Each kind supplies its
//! table, insert statement, draft bindings and row mapping through
//! [`SqliteRecord`].

use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Sqlite, SqlitePool};

use super::column;
use crate::domain::records::{
    Card, CardType, Credential, NewCard, NewCredential, NewNote, Note, RecordRepository,
    SecretRecord,
};
use crate::storage::StoreError;

type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

/// Table mapping for a record kind
pub trait SqliteRecord: SecretRecord {
    const TABLE: &'static str;

    /// Insert binding `author_id`, the draft columns, then both timestamps.
    /// Must end in `RETURNING *`.
    const INSERT_SQL: &'static str;

    fn bind_draft<'q>(query: SqliteQuery<'q>, draft: &'q Self::Draft) -> SqliteQuery<'q>;

    fn from_row(row: &SqliteRow) -> Result<Self, StoreError>;
}

impl SqliteRecord for Credential {
    const TABLE: &'static str = "credentials";

    const INSERT_SQL: &'static str = r#"
        INSERT INTO credentials (author_id, title, url, username, password, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING *
    "#;

    fn bind_draft<'q>(query: SqliteQuery<'q>, draft: &'q NewCredential) -> SqliteQuery<'q> {
        query
            .bind(draft.title.as_str())
            .bind(draft.url.as_str())
            .bind(draft.username.as_str())
            .bind(draft.password.as_str())
    }

    fn from_row(row: &SqliteRow) -> Result<Self, StoreError> {
        Ok(Credential {
            id: column(row, "id")?,
            owner_id: column(row, "author_id")?,
            title: column(row, "title")?,
            url: column(row, "url")?,
            username: column(row, "username")?,
            password: column(row, "password")?,
            created_at: column(row, "created_at")?,
            updated_at: column(row, "updated_at")?,
        })
    }
}

impl SqliteRecord for Card {
    const TABLE: &'static str = "cards";

    const INSERT_SQL: &'static str = r#"
        INSERT INTO cards (
            author_id, title, number, name, expiration_date,
            password, secure_code, is_virtual, card_type,
            created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
    "#;

    fn bind_draft<'q>(query: SqliteQuery<'q>, draft: &'q NewCard) -> SqliteQuery<'q> {
        query
            .bind(draft.title.as_str())
            .bind(draft.number.as_str())
            .bind(draft.name.as_str())
            .bind(draft.expiration_date)
            .bind(draft.password.as_str())
            .bind(draft.secure_code.as_str())
            .bind(draft.is_virtual)
            .bind(draft.card_type.as_str())
    }

    fn from_row(row: &SqliteRow) -> Result<Self, StoreError> {
        let card_type: String = column(row, "card_type")?;
        let card_type = card_type.parse::<CardType>().map_err(StoreError::Corrupt)?;

        Ok(Card {
            id: column(row, "id")?,
            owner_id: column(row, "author_id")?,
            title: column(row, "title")?,
            number: column(row, "number")?,
            name: column(row, "name")?,
            expiration_date: column(row, "expiration_date")?,
            password: column(row, "password")?,
            secure_code: column(row, "secure_code")?,
            is_virtual: column(row, "is_virtual")?,
            card_type,
            created_at: column(row, "created_at")?,
            updated_at: column(row, "updated_at")?,
        })
    }
}

impl SqliteRecord for Note {
    const TABLE: &'static str = "notes";

    const INSERT_SQL: &'static str = r#"
        INSERT INTO notes (author_id, title, description, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING *
    "#;

    fn bind_draft<'q>(query: SqliteQuery<'q>, draft: &'q NewNote) -> SqliteQuery<'q> {
        query
            .bind(draft.title.as_str())
            .bind(draft.description.as_str())
    }

    fn from_row(row: &SqliteRow) -> Result<Self, StoreError> {
        Ok(Note {
            id: column(row, "id")?,
            owner_id: column(row, "author_id")?,
            title: column(row, "title")?,
            description: column(row, "description")?,
            created_at: column(row, "created_at")?,
            updated_at: column(row, "updated_at")?,
        })
    }
}

/// SQLite-backed implementation of [`RecordRepository`]
pub struct SqliteRecordRepository<R> {
    pool: SqlitePool,
    _kind: PhantomData<fn() -> R>,
}

impl<R> SqliteRecordRepository<R> {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            _kind: PhantomData,
        }
    }
}

impl<R> Clone for SqliteRecordRepository<R> {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}

impl<R> std::fmt::Debug for SqliteRecordRepository<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteRecordRepository")
            .field("pool", &self.pool)
            .finish()
    }
}

#[async_trait]
impl<R: SqliteRecord> RecordRepository<R> for SqliteRecordRepository<R> {
    async fn create(&self, owner_id: i64, draft: &R::Draft) -> Result<R, StoreError> {
        let now = Utc::now();
        let query = R::bind_draft(sqlx::query(R::INSERT_SQL).bind(owner_id), draft)
            .bind(now)
            .bind(now);

        let row = query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx(&format!("insert into {}", R::TABLE), e))?;

        R::from_row(&row)
    }

    async fn find_many(&self, owner_id: i64) -> Result<Vec<R>, StoreError> {
        let sql = format!("SELECT * FROM {} WHERE author_id = ? ORDER BY id", R::TABLE);
        let rows = sqlx::query(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx(&format!("list {}", R::TABLE), e))?;

        rows.iter().map(R::from_row).collect()
    }

    async fn find_first(&self, id: i64) -> Result<Option<R>, StoreError> {
        let sql = format!("SELECT * FROM {} WHERE id = ?", R::TABLE);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx(&format!("get from {}", R::TABLE), e))?;

        row.as_ref().map(R::from_row).transpose()
    }

    async fn delete(&self, id: i64) -> Result<R, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = ? RETURNING *", R::TABLE);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx(&format!("delete from {}", R::TABLE), e))?
            .ok_or_else(|| StoreError::NotFound(format!("{} {}", R::KIND, id)))?;

        R::from_row(&row)
    }

    async fn count_for_owner(&self, owner_id: i64) -> Result<i64, StoreError> {
        let sql = format!("SELECT COUNT(*) FROM {} WHERE author_id = ?", R::TABLE);
        sqlx::query_scalar::<_, i64>(&sql)
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx(&format!("count {}", R::TABLE), e))
    }
}
