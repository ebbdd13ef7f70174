//! Service layer: the three processing pipelines.

pub mod backfill;
pub mod classification;
pub mod suggestion;

pub use backfill::BackfillService;
pub use classification::ClassificationService;
pub use suggestion::{SuggestionResponse, SuggestionService};

use std::sync::Arc;

use tracing::warn;

use stash_core::{defaults, SavedLinkRepository};

/// Fetch up to [`defaults::CONTEXT_TITLE_LIMIT`] link titles for a folder.
///
/// Context is a nice-to-have: a failed read degrades to an empty context
/// instead of failing the classification, so a broken link query can never
/// block a folder from being classified by name alone.
pub(crate) async fn context_titles(
    links: &Arc<dyn SavedLinkRepository>,
    folder_id: i64,
) -> Vec<String> {
    match links
        .titles_for_folder(folder_id, defaults::CONTEXT_TITLE_LIMIT)
        .await
    {
        Ok(titles) => titles,
        Err(e) => {
            warn!(
                subsystem = "api",
                folder_id,
                error = %e,
                "Failed to fetch link titles, classifying without context"
            );
            Vec::new()
        }
    }
}
