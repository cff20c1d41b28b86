//! SQLite strategy store.
//!
//! File-backed persistence for single-process deployments - the usual
//! production shape for this engine, where one bot process owns one
//! strategy database.

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;

use crate::error::{HealingError, Result};
use crate::traits::store::{StrategyStore, MAX_FAILURES};
use crate::types::strategy::{ExtractionStrategy, StrategySource};

/// SQLite-backed strategy store.
pub struct SqliteStrategyStore {
    pool: SqlitePool,
}

impl SqliteStrategyStore {
    /// Open (or create) a store at the given connection URL.
    ///
    /// # Example URLs
    /// - `sqlite::memory:` - in-memory database (ephemeral)
    /// - `sqlite:./strategies.db?mode=rwc` - create if not exists
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(|e| HealingError::Storage(e.to_string().into()))?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Create an in-memory store (for testing).
    pub async fn in_memory() -> Result<Self> {
        Self::new("sqlite::memory:").await
    }

    /// Run database migrations.
    async fn run_migrations(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS strategies (
                task_id TEXT PRIMARY KEY,
                js_code TEXT NOT NULL,
                version INTEGER NOT NULL,
                source TEXT NOT NULL,
                created_at TEXT NOT NULL,
                last_used TEXT,
                success_count INTEGER NOT NULL DEFAULT 0,
                fail_count INTEGER NOT NULL DEFAULT 0
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| HealingError::Storage(e.to_string().into()))?;

        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[derive(Debug, FromRow)]
struct StrategyRow {
    task_id: String,
    js_code: String,
    version: i64,
    source: String,
    created_at: String,
    last_used: Option<String>,
    success_count: i64,
    fail_count: i64,
}

impl StrategyRow {
    fn into_strategy(self) -> Result<ExtractionStrategy> {
        let created_at = chrono::DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| HealingError::Storage(format!("invalid date: {}", e).into()))?
            .with_timezone(&chrono::Utc);

        let last_used = self
            .last_used
            .map(|ts| {
                chrono::DateTime::parse_from_rfc3339(&ts)
                    .map(|dt| dt.with_timezone(&chrono::Utc))
                    .map_err(|e| HealingError::Storage(format!("invalid date: {}", e).into()))
            })
            .transpose()?;

        let source = StrategySource::parse(&self.source).ok_or_else(|| {
            HealingError::Storage(format!("unknown strategy source: {}", self.source).into())
        })?;

        Ok(ExtractionStrategy {
            task_id: self.task_id,
            js_code: self.js_code,
            version: self.version,
            source,
            created_at,
            last_used,
            success_count: self.success_count,
            fail_count: self.fail_count,
        })
    }
}

#[async_trait]
impl StrategyStore for SqliteStrategyStore {
    async fn get_strategy(&self, task_id: &str) -> Result<Option<ExtractionStrategy>> {
        let row = sqlx::query_as::<_, StrategyRow>(
            "SELECT task_id, js_code, version, source, created_at, last_used, success_count, fail_count FROM strategies WHERE task_id = ?",
        )
        .bind(task_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| HealingError::Storage(e.to_string().into()))?;

        match row {
            Some(r) => Ok(Some(r.into_strategy()?)),
            None => Ok(None),
        }
    }

    async fn save_strategy(&self, strategy: &ExtractionStrategy) -> Result<()> {
        // On conflict the success_count and last_used columns are left
        // untouched: success history survives replacement
        sqlx::query(
            r#"
            INSERT INTO strategies (task_id, js_code, version, source, created_at, last_used, success_count, fail_count)
            VALUES (?, ?, ?, ?, ?, ?, 0, 0)
            ON CONFLICT(task_id) DO UPDATE SET
                js_code = excluded.js_code,
                version = excluded.version,
                source = excluded.source,
                created_at = excluded.created_at,
                fail_count = 0
            "#,
        )
        .bind(&strategy.task_id)
        .bind(&strategy.js_code)
        .bind(strategy.version)
        .bind(strategy.source.as_str())
        .bind(strategy.created_at.to_rfc3339())
        .bind(strategy.last_used.map(|t| t.to_rfc3339()))
        .execute(&self.pool)
        .await
        .map_err(|e| HealingError::Storage(e.to_string().into()))?;

        Ok(())
    }

    async fn record_success(&self, task_id: &str) -> Result<()> {
        sqlx::query(
            "UPDATE strategies SET success_count = success_count + 1, fail_count = 0, last_used = ? WHERE task_id = ?",
        )
        .bind(chrono::Utc::now().to_rfc3339())
        .bind(task_id)
        .execute(&self.pool)
        .await
        .map_err(|e| HealingError::Storage(e.to_string().into()))?;

        Ok(())
    }

    async fn record_failure(&self, task_id: &str) -> Result<()> {
        sqlx::query("UPDATE strategies SET fail_count = fail_count + 1 WHERE task_id = ?")
            .bind(task_id)
            .execute(&self.pool)
            .await
            .map_err(|e| HealingError::Storage(e.to_string().into()))?;

        sqlx::query("DELETE FROM strategies WHERE task_id = ? AND fail_count >= ?")
            .bind(task_id)
            .bind(MAX_FAILURES)
            .execute(&self.pool)
            .await
            .map_err(|e| HealingError::Storage(e.to_string().into()))?;

        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}
