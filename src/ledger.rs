use crate::types::{InsertOutcome, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tracing::{debug, info};

/// Persistent record of already-processed entries, keyed by
/// `(scope_key, entry_key)`. Rows are write-once: no update, no expiry,
/// no deletion API.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Pure membership lookup, no side effect.
    async fn exists(&self, scope_key: &str, entry_key: &str) -> Result<bool>;

    /// Atomic insert-if-absent. Concurrent inserts of the same pair see
    /// exactly one `Created`; the rest get `AlreadyExists`.
    async fn insert(&self, scope_key: &str, entry_key: &str) -> Result<InsertOutcome>;
}

pub struct SqliteLedger {
    db: SqlitePool,
}

impl SqliteLedger {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true);
        let db = SqlitePool::connect_with(options).await?;
        let ledger = Self { db };
        ledger.init_schema().await?;
        info!("Opened dedup ledger at {}", path.as_ref().display());
        Ok(ledger)
    }

    /// Ledger backed by a private in-memory database. Used by tests; the
    /// single connection keeps the database alive for the pool's lifetime.
    pub async fn in_memory() -> Result<Self> {
        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(SqliteConnectOptions::new().in_memory(true))
            .await?;
        let ledger = Self { db };
        ledger.init_schema().await?;
        Ok(ledger)
    }

    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS seen_entries (
                scope_key TEXT NOT NULL,
                entry_key TEXT NOT NULL,
                first_seen TEXT NOT NULL,
                PRIMARY KEY (scope_key, entry_key)
            )
            "#,
        )
        .execute(&self.db)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl Ledger for SqliteLedger {
    async fn exists(&self, scope_key: &str, entry_key: &str) -> Result<bool> {
        let row = sqlx::query(
            "SELECT 1 FROM seen_entries WHERE scope_key = ? AND entry_key = ?",
        )
        .bind(scope_key)
        .bind(entry_key)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.is_some())
    }

    async fn insert(&self, scope_key: &str, entry_key: &str) -> Result<InsertOutcome> {
        let result = sqlx::query(
            r#"
            INSERT INTO seen_entries (scope_key, entry_key, first_seen)
            VALUES (?, ?, ?)
            ON CONFLICT (scope_key, entry_key) DO NOTHING
            "#,
        )
        .bind(scope_key)
        .bind(entry_key)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.db)
        .await?;

        if result.rows_affected() > 0 {
            debug!("Recorded entry {} under scope {}", entry_key, scope_key);
            Ok(InsertOutcome::Created)
        } else {
            Ok(InsertOutcome::AlreadyExists)
        }
    }
}
