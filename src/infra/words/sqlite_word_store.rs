// SQLite-backed word store for the banned-phrase list.
//
// Table (default name `blocked_words`):
// - id: row id
// - word: the banned phrase, lowercase, unique
// - created: RFC 3339 insertion timestamp

use crate::core::words::{BannedWord, WordFilterError, WordStore};
use crate::infra::table_names::resolve_table_name;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Row, Sqlite};

const DEFAULT_TABLE: &str = "blocked_words";

pub struct SqliteWordStore {
    pool: Pool<Sqlite>,
    table: String,
}

impl SqliteWordStore {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self {
            pool,
            table: DEFAULT_TABLE.to_string(),
        }
    }

    /// Override the table name. Invalid identifiers keep the default.
    pub fn with_table(mut self, table: &str) -> Self {
        self.table = resolve_table_name(table, DEFAULT_TABLE);
        self
    }

    /// The table name this instance reads and writes.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Run database migrations to create the required table.
    pub async fn migrate(&self) -> Result<(), WordFilterError> {
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                word TEXT NOT NULL UNIQUE,
                created TEXT NOT NULL
            );
            "#,
            self.table
        ))
        .execute(&self.pool)
        .await
        .map_err(|e| WordFilterError::StorageError(e.to_string()))?;

        Ok(())
    }
}

fn row_to_word(row: &sqlx::sqlite::SqliteRow) -> BannedWord {
    let created_str: String = row.get("created");
    let created = DateTime::parse_from_rfc3339(&created_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now());

    BannedWord {
        id: row.get("id"),
        word: row.get("word"),
        created,
    }
}

#[async_trait]
impl WordStore for SqliteWordStore {
    async fn count_word(&self, word: &str) -> Result<u64, WordFilterError> {
        let row = sqlx::query(&format!(
            "SELECT COUNT(*) AS cnt FROM {} WHERE word = ?",
            self.table
        ))
        .bind(word)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| WordFilterError::StorageError(e.to_string()))?;

        let count: i64 = row.get("cnt");
        Ok(count as u64)
    }

    async fn insert_word(&self, word: &str) -> Result<i64, WordFilterError> {
        let result = sqlx::query(&format!(
            "INSERT INTO {} (word, created) VALUES (?, ?)",
            self.table
        ))
        .bind(word)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| WordFilterError::StorageError(e.to_string()))?;

        Ok(result.last_insert_rowid())
    }

    async fn all_words(&self, search: Option<&str>) -> Result<Vec<BannedWord>, WordFilterError> {
        let rows = match search {
            Some(search) => {
                // LIKE is ASCII case-insensitive in SQLite; instr() keeps the
                // substring filter case-sensitive, matching the in-memory
                // store.
                sqlx::query(&format!(
                    "SELECT id, word, created FROM {} WHERE instr(word, ?) > 0 ORDER BY id",
                    self.table
                ))
                .bind(search)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(&format!(
                    "SELECT id, word, created FROM {} ORDER BY id",
                    self.table
                ))
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| WordFilterError::StorageError(e.to_string()))?;

        Ok(rows.iter().map(row_to_word).collect())
    }

    async fn delete_word(&self, id: i64) -> Result<bool, WordFilterError> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = ?", self.table))
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| WordFilterError::StorageError(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
