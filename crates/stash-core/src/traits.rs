//! Core trait definitions for linkstash.
//!
//! Repositories are implemented by `stash-db` against PostgreSQL; the
//! generation backend by `stash-inference` against the Gemini API. The
//! service layer in `stash-api` depends only on these traits, so tests can
//! substitute in-memory fakes.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Folder;

// =============================================================================
// REPOSITORY TRAITS
// =============================================================================

/// Read/update access to the `folders` table.
#[async_trait]
pub trait FolderRepository: Send + Sync {
    /// Fetch up to `limit` folders whose `system_category` is null.
    async fn list_unclassified(&self, limit: i64) -> Result<Vec<Folder>>;

    /// Fetch a folder by id.
    async fn get(&self, id: i64) -> Result<Option<Folder>>;

    /// Conditionally assign a category: the write only lands if the folder
    /// is still unclassified. Returns true if a row was updated.
    ///
    /// This is the classify-once guard: two concurrent triggers for the
    /// same folder cannot both win, without any explicit locking.
    async fn set_category_if_unclassified(&self, id: i64, category: &str) -> Result<bool>;
}

/// Read access to the `saved_links` table.
#[async_trait]
pub trait SavedLinkRepository: Send + Sync {
    /// Fetch up to `limit` link titles belonging to a folder, used as
    /// classification/suggestion context.
    async fn titles_for_folder(&self, folder_id: i64, limit: i64) -> Result<Vec<String>>;
}

/// Append-only access to the `debug_events` table.
#[async_trait]
pub trait DebugEventRepository: Send + Sync {
    /// Append one diagnostic event row.
    async fn append(
        &self,
        device_id: Option<&str>,
        stage: &str,
        payload: serde_json::Value,
    ) -> Result<()>;
}

// =============================================================================
// INFERENCE TRAITS
// =============================================================================

/// Text generation backend.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate text given a prompt. Single-shot, no internal retry;
    /// retry policy belongs to the caller.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}
