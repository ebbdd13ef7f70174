//! # stash-db
//!
//! PostgreSQL database layer for linkstash.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for folders, saved links, and debug events
//!
//! ## Example
//!
//! ```rust,ignore
//! use stash_core::FolderRepository;
//! use stash_db::Database;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/linkstash").await?;
//!     let batch = db.folders.list_unclassified(20).await?;
//!     println!("{} folders awaiting classification", batch.len());
//!     Ok(())
//! }
//! ```

pub mod debug_events;
pub mod folders;
pub mod links;
pub mod pool;

pub use debug_events::PgDebugEventRepository;
pub use folders::PgFolderRepository;
pub use links::PgSavedLinkRepository;
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};

// Re-export core types
pub use stash_core::*;

/// Combined database context with all repositories.
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Folder repository (reads + the conditional category write).
    pub folders: PgFolderRepository,
    /// Saved-link repository (title context reads).
    pub links: PgSavedLinkRepository,
    /// Debug-event repository (append-only diagnostics).
    pub debug_events: PgDebugEventRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            folders: PgFolderRepository::new(pool.clone()),
            links: PgSavedLinkRepository::new(pool.clone()),
            debug_events: PgDebugEventRepository::new(pool.clone()),
            pool,
        }
    }

    /// Connect to the database with default pool configuration.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = create_pool(database_url).await?;
        Ok(Self::new(pool))
    }

    /// Connect to the database with custom pool configuration.
    pub async fn connect_with_config(database_url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(database_url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Internal(format!("Migration failed: {}", e)))?;
        Ok(())
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}
