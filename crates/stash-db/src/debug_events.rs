//! Debug-event repository: append-only diagnostic log rows.
//!
//! Rows are written by the suggestion pipeline and never read back here;
//! an external dashboard consumes them. Callers treat the append as
//! fire-and-forget — a failed write must never change a handler's outcome.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use stash_core::{DebugEventRepository, Error, Result};

/// PostgreSQL implementation of DebugEventRepository.
pub struct PgDebugEventRepository {
    pool: Pool<Postgres>,
}

impl PgDebugEventRepository {
    /// Create a new PgDebugEventRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DebugEventRepository for PgDebugEventRepository {
    async fn append(
        &self,
        device_id: Option<&str>,
        stage: &str,
        payload: serde_json::Value,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO debug_events (device_id, stage, payload)
             VALUES ($1, $2, $3)",
        )
        .bind(device_id)
        .bind(stage)
        .bind(payload)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(())
    }
}
