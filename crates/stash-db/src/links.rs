//! Saved-link repository implementation.

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};

use stash_core::{Error, Result, SavedLinkRepository};

/// PostgreSQL implementation of SavedLinkRepository.
pub struct PgSavedLinkRepository {
    pool: Pool<Postgres>,
}

impl PgSavedLinkRepository {
    /// Create a new PgSavedLinkRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SavedLinkRepository for PgSavedLinkRepository {
    async fn titles_for_folder(&self, folder_id: i64, limit: i64) -> Result<Vec<String>> {
        let rows = sqlx::query(
            "SELECT title
             FROM saved_links
             WHERE folder_id = $1
             ORDER BY id
             LIMIT $2",
        )
        .bind(folder_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.into_iter().map(|r| r.get("title")).collect())
    }
}
