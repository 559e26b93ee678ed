// SQLite-backed address store for the three address rule sets.
//
// Tables (default names):
// - blocked_addresses: single literal addresses, canonical text
// - blocked_ranges: inclusive encoded ranges
// - blocked_countries: 2-letter uppercase ISO codes
//
// SQLite INTEGER cannot hold a u128, so range bounds persist as zero-padded
// 32-digit lowercase hex TEXT. Fixed-width hex compares lexicographically in
// the same order as the underlying integers, which keeps the containment
// query (`ip_start <= x AND ip_end >= x`) inside the database.

use crate::core::addresses::{
    AddressFilterError, AddressStore, BlockedAddress, BlockedCountry, BlockedRange,
};
use crate::infra::table_names::resolve_table_name;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Row, Sqlite};

const DEFAULT_ADDRESSES_TABLE: &str = "blocked_addresses";
const DEFAULT_RANGES_TABLE: &str = "blocked_ranges";
const DEFAULT_COUNTRIES_TABLE: &str = "blocked_countries";

pub struct SqliteAddressStore {
    pool: Pool<Sqlite>,
    addresses_table: String,
    ranges_table: String,
    countries_table: String,
}

fn encode_hex(value: u128) -> String {
    format!("{value:032x}")
}

fn decode_hex(text: &str) -> Result<u128, AddressFilterError> {
    u128::from_str_radix(text, 16).map_err(|_| {
        AddressFilterError::StorageError(format!("corrupt range bound in storage: {text:?}"))
    })
}

fn parse_created(text: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

impl SqliteAddressStore {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self {
            pool,
            addresses_table: DEFAULT_ADDRESSES_TABLE.to_string(),
            ranges_table: DEFAULT_RANGES_TABLE.to_string(),
            countries_table: DEFAULT_COUNTRIES_TABLE.to_string(),
        }
    }

    /// Override the exact-address table name. Invalid identifiers keep the
    /// default.
    pub fn with_addresses_table(mut self, table: &str) -> Self {
        self.addresses_table = resolve_table_name(table, DEFAULT_ADDRESSES_TABLE);
        self
    }

    /// Override the range table name.
    pub fn with_ranges_table(mut self, table: &str) -> Self {
        self.ranges_table = resolve_table_name(table, DEFAULT_RANGES_TABLE);
        self
    }

    /// Override the country table name.
    pub fn with_countries_table(mut self, table: &str) -> Self {
        self.countries_table = resolve_table_name(table, DEFAULT_COUNTRIES_TABLE);
        self
    }

    pub fn addresses_table(&self) -> &str {
        &self.addresses_table
    }

    pub fn ranges_table(&self) -> &str {
        &self.ranges_table
    }

    pub fn countries_table(&self) -> &str {
        &self.countries_table
    }

    /// Run database migrations to create the required tables.
    pub async fn migrate(&self) -> Result<(), AddressFilterError> {
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                address TEXT NOT NULL UNIQUE,
                created TEXT NOT NULL
            );
            "#,
            self.addresses_table
        ))
        .execute(&self.pool)
        .await
        .map_err(|e| AddressFilterError::StorageError(e.to_string()))?;

        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {t} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                ip_start TEXT NOT NULL,
                ip_end TEXT NOT NULL,
                created TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_{t}_bounds ON {t}(ip_start, ip_end);
            "#,
            t = self.ranges_table
        ))
        .execute(&self.pool)
        .await
        .map_err(|e| AddressFilterError::StorageError(e.to_string()))?;

        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                iso TEXT NOT NULL UNIQUE,
                created TEXT NOT NULL
            );
            "#,
            self.countries_table
        ))
        .execute(&self.pool)
        .await
        .map_err(|e| AddressFilterError::StorageError(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl AddressStore for SqliteAddressStore {
    async fn contains_address(&self, address: &str) -> Result<bool, AddressFilterError> {
        let row = sqlx::query(&format!(
            "SELECT 1 AS hit FROM {} WHERE address = ? LIMIT 1",
            self.addresses_table
        ))
        .bind(address)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AddressFilterError::StorageError(e.to_string()))?;

        Ok(row.is_some())
    }

    async fn insert_address(&self, address: &str) -> Result<i64, AddressFilterError> {
        let result = sqlx::query(&format!(
            "INSERT INTO {} (address, created) VALUES (?, ?)",
            self.addresses_table
        ))
        .bind(address)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AddressFilterError::StorageError(e.to_string()))?;

        Ok(result.last_insert_rowid())
    }

    async fn delete_address(&self, address: &str) -> Result<bool, AddressFilterError> {
        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE address = ?",
            self.addresses_table
        ))
        .bind(address)
        .execute(&self.pool)
        .await
        .map_err(|e| AddressFilterError::StorageError(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn all_addresses(&self) -> Result<Vec<BlockedAddress>, AddressFilterError> {
        let rows = sqlx::query(&format!(
            "SELECT id, address, created FROM {} ORDER BY id",
            self.addresses_table
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AddressFilterError::StorageError(e.to_string()))?;

        Ok(rows
            .iter()
            .map(|row| BlockedAddress {
                id: row.get("id"),
                address: row.get("address"),
                created: parse_created(&row.get::<String, _>("created")),
            })
            .collect())
    }

    async fn range_containing(&self, encoded: u128) -> Result<bool, AddressFilterError> {
        let hex = encode_hex(encoded);
        let row = sqlx::query(&format!(
            "SELECT 1 AS hit FROM {} WHERE ip_start <= ? AND ip_end >= ? LIMIT 1",
            self.ranges_table
        ))
        .bind(&hex)
        .bind(&hex)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AddressFilterError::StorageError(e.to_string()))?;

        Ok(row.is_some())
    }

    async fn range_exists(&self, start: u128, end: u128) -> Result<bool, AddressFilterError> {
        let row = sqlx::query(&format!(
            "SELECT 1 AS hit FROM {} WHERE ip_start = ? AND ip_end = ? LIMIT 1",
            self.ranges_table
        ))
        .bind(encode_hex(start))
        .bind(encode_hex(end))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AddressFilterError::StorageError(e.to_string()))?;

        Ok(row.is_some())
    }

    async fn insert_range(&self, start: u128, end: u128) -> Result<i64, AddressFilterError> {
        let result = sqlx::query(&format!(
            "INSERT INTO {} (ip_start, ip_end, created) VALUES (?, ?, ?)",
            self.ranges_table
        ))
        .bind(encode_hex(start))
        .bind(encode_hex(end))
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AddressFilterError::StorageError(e.to_string()))?;

        Ok(result.last_insert_rowid())
    }

    async fn delete_range_by_id(&self, id: i64) -> Result<bool, AddressFilterError> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = ?", self.ranges_table))
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AddressFilterError::StorageError(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_range_by_bounds(
        &self,
        start: u128,
        end: u128,
    ) -> Result<bool, AddressFilterError> {
        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE ip_start = ? AND ip_end = ?",
            self.ranges_table
        ))
        .bind(encode_hex(start))
        .bind(encode_hex(end))
        .execute(&self.pool)
        .await
        .map_err(|e| AddressFilterError::StorageError(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn all_ranges(&self) -> Result<Vec<BlockedRange>, AddressFilterError> {
        let rows = sqlx::query(&format!(
            "SELECT id, ip_start, ip_end, created FROM {} ORDER BY id",
            self.ranges_table
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AddressFilterError::StorageError(e.to_string()))?;

        rows.iter()
            .map(|row| {
                Ok(BlockedRange {
                    id: row.get("id"),
                    start: decode_hex(&row.get::<String, _>("ip_start"))?,
                    end: decode_hex(&row.get::<String, _>("ip_end"))?,
                    created: parse_created(&row.get::<String, _>("created")),
                })
            })
            .collect()
    }

    async fn contains_country(&self, iso: &str) -> Result<bool, AddressFilterError> {
        let row = sqlx::query(&format!(
            "SELECT 1 AS hit FROM {} WHERE iso = ? LIMIT 1",
            self.countries_table
        ))
        .bind(iso)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AddressFilterError::StorageError(e.to_string()))?;

        Ok(row.is_some())
    }

    async fn insert_country(&self, iso: &str) -> Result<i64, AddressFilterError> {
        let result = sqlx::query(&format!(
            "INSERT INTO {} (iso, created) VALUES (?, ?)",
            self.countries_table
        ))
        .bind(iso)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AddressFilterError::StorageError(e.to_string()))?;

        Ok(result.last_insert_rowid())
    }

    async fn delete_country(&self, iso: &str) -> Result<bool, AddressFilterError> {
        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE iso = ?",
            self.countries_table
        ))
        .bind(iso)
        .execute(&self.pool)
        .await
        .map_err(|e| AddressFilterError::StorageError(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn all_countries(&self) -> Result<Vec<BlockedCountry>, AddressFilterError> {
        let rows = sqlx::query(&format!(
            "SELECT id, iso, created FROM {} ORDER BY id",
            self.countries_table
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AddressFilterError::StorageError(e.to_string()))?;

        Ok(rows
            .iter()
            .map(|row| BlockedCountry {
                id: row.get("id"),
                iso: row.get("iso"),
                created: parse_created(&row.get::<String, _>("created")),
            })
            .collect())
    }
}
