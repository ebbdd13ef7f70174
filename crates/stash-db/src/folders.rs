//! Folder repository implementation.

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;

use stash_core::{Error, Folder, FolderRepository, Result};

/// PostgreSQL implementation of FolderRepository.
pub struct PgFolderRepository {
    pool: Pool<Postgres>,
}

impl PgFolderRepository {
    /// Create a new PgFolderRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FolderRepository for PgFolderRepository {
    async fn list_unclassified(&self, limit: i64) -> Result<Vec<Folder>> {
        let rows = sqlx::query(
            "SELECT id, name, system_category
             FROM folders
             WHERE system_category IS NULL
             ORDER BY id
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows
            .into_iter()
            .map(|r| Folder {
                id: r.get("id"),
                name: r.get("name"),
                system_category: r.get("system_category"),
            })
            .collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Folder>> {
        let row = sqlx::query(
            "SELECT id, name, system_category
             FROM folders
             WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(|r| Folder {
            id: r.get("id"),
            name: r.get("name"),
            system_category: r.get("system_category"),
        }))
    }

    async fn set_category_if_unclassified(&self, id: i64, category: &str) -> Result<bool> {
        // The IS NULL guard makes the read-then-write sequence safe against
        // concurrent triggers for the same folder: exactly one writer wins.
        let result = sqlx::query(
            "UPDATE folders
             SET system_category = $1
             WHERE id = $2 AND system_category IS NULL",
        )
        .bind(category)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        let updated = result.rows_affected() > 0;
        debug!(
            subsystem = "db",
            component = "folders",
            op = "set_category",
            folder_id = id,
            success = updated,
            "Conditional category write"
        );
        Ok(updated)
    }
}
