//! Batch backfill orchestrator.
//!
//! Drains the backlog of unclassified folders one fixed-size page per
//! invocation. The external scheduler re-invokes until a page comes back
//! fully processed; there is no internal loop or re-invocation here.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use stash_core::{
    defaults, BackfillFailure, BackfillReport, Folder, FolderRepository, Result,
    SavedLinkRepository,
};
use stash_inference::FolderClassifier;

use super::context_titles;

/// Orchestrates one page of backfill classification.
#[derive(Clone)]
pub struct BackfillService {
    folders: Arc<dyn FolderRepository>,
    links: Arc<dyn SavedLinkRepository>,
    classifier: FolderClassifier,
}

impl BackfillService {
    pub fn new(
        folders: Arc<dyn FolderRepository>,
        links: Arc<dyn SavedLinkRepository>,
        classifier: FolderClassifier,
    ) -> Self {
        Self {
            folders,
            links,
            classifier,
        }
    }

    /// Run one backfill batch.
    ///
    /// Per-folder failures are isolated: they are recorded in the report's
    /// `failures` list and processing continues with the next folder. Only
    /// the initial page query can fail the whole invocation.
    ///
    /// Every fetched folder is accounted for exactly once:
    /// `processed + failures.len() == fetched`.
    #[instrument(skip(self), fields(subsystem = "api", component = "backfill", op = "run_batch"))]
    pub async fn run_batch(&self) -> Result<BackfillReport> {
        let batch = self
            .folders
            .list_unclassified(defaults::BACKFILL_BATCH_SIZE)
            .await?;

        if batch.is_empty() {
            info!("No unclassified folders found");
            return Ok(BackfillReport {
                message: "No unclassified folders found.".to_string(),
                processed: 0,
                remaining: 0,
                failures: Vec::new(),
            });
        }

        let fetched = batch.len();
        let mut processed = 0;
        let mut failures = Vec::new();

        for folder in batch {
            let folder_id = folder.id;
            match self.classify_one(folder).await {
                Ok(()) => processed += 1,
                Err(e) => {
                    warn!(
                        folder_id,
                        error = %e,
                        "Failed to classify folder, continuing batch"
                    );
                    failures.push(BackfillFailure {
                        folder_id,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            result_count = fetched,
            processed,
            failed = failures.len(),
            "Backfill batch complete"
        );

        Ok(BackfillReport {
            message: "Batch complete".to_string(),
            processed,
            remaining: fetched - processed,
            failures,
        })
    }

    async fn classify_one(&self, folder: Folder) -> Result<()> {
        let titles = context_titles(&self.links, folder.id).await;
        let category = self.classifier.classify(&folder.name, &titles).await?;

        let updated = self
            .folders
            .set_category_if_unclassified(folder.id, &category)
            .await?;
        if !updated {
            // A concurrent trigger classified this folder first. It is
            // classified either way, so the batch counts it as done.
            debug!(
                folder_id = folder.id,
                "Folder classified concurrently, conditional write skipped"
            );
        }
        Ok(())
    }
}
