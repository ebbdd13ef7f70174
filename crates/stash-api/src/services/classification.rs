//! Webhook classification router.
//!
//! Interprets heterogeneous change-notification payloads, resolves them to
//! a target folder, and classifies it at most once. Unrecognized payloads
//! are ignored with a success message (upstream webhook senders retry on
//! error status, and an ignore must never look retryable); classification
//! failures on a resolved target propagate as real errors.

use std::sync::Arc;

use tracing::{info, instrument};

use stash_core::{
    ChangeNotification, ClassifyResponse, Error, FolderRepository, Result, RowEvent,
    SavedLinkRepository,
};
use stash_inference::FolderClassifier;

use super::context_titles;

/// Normalized classification target resolved from a payload.
struct Target {
    /// Persisted folder id; None for the direct-invocation shape, which
    /// classifies without a store write.
    id: Option<i64>,
    name: String,
}

/// Routes change notifications into the classification pipeline.
#[derive(Clone)]
pub struct ClassificationService {
    folders: Arc<dyn FolderRepository>,
    links: Arc<dyn SavedLinkRepository>,
    classifier: FolderClassifier,
}

impl ClassificationService {
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

    /// Handle one change notification.
    #[instrument(skip(self, payload), fields(subsystem = "api", component = "classify", op = "handle_notification"))]
    pub async fn handle(&self, payload: ChangeNotification) -> Result<ClassifyResponse> {
        let target = match self.resolve(payload).await? {
            Resolution::Target(target) => target,
            Resolution::ShortCircuit(response) => return Ok(response),
        };

        let titles = match target.id {
            Some(id) => context_titles(&self.links, id).await,
            None => Vec::new(),
        };

        // Classification is load-bearing on this path: a backend failure
        // propagates instead of degrading, unlike suggestions.
        let category = self.classifier.classify(&target.name, &titles).await?;

        let updated = match target.id {
            Some(id) => {
                self.folders
                    .set_category_if_unclassified(id, &category)
                    .await?
            }
            None => false,
        };

        info!(
            folder_id = target.id.unwrap_or(-1),
            success = updated,
            "Folder classification complete"
        );
        Ok(ClassifyResponse::Classified { category, updated })
    }

    async fn resolve(&self, payload: ChangeNotification) -> Result<Resolution> {
        match payload {
            ChangeNotification::Row(RowEvent::Folders { record }) => {
                if record.system_category.is_some() {
                    return Ok(Resolution::ShortCircuit(
                        ClassifyResponse::already_classified(),
                    ));
                }
                Ok(Resolution::Target(Target {
                    id: Some(record.id),
                    name: record.name,
                }))
            }
            ChangeNotification::Row(RowEvent::SavedLinks { record }) => {
                let Some(folder_id) = record.folder_id else {
                    // An unfiled link has nothing to classify.
                    return Ok(Resolution::ShortCircuit(ClassifyResponse::Message {
                        message: "No folder_id".to_string(),
                    }));
                };

                let folder = self
                    .folders
                    .get(folder_id)
                    .await?
                    .ok_or(Error::FolderNotFound(folder_id))?;

                if folder.system_category.is_some() {
                    return Ok(Resolution::ShortCircuit(
                        ClassifyResponse::already_classified(),
                    ));
                }
                Ok(Resolution::Target(Target {
                    id: Some(folder.id),
                    name: folder.name,
                }))
            }
            ChangeNotification::Direct { folder_name } => Ok(Resolution::Target(Target {
                id: None,
                name: folder_name,
            })),
            ChangeNotification::Unrecognized(_) => {
                Ok(Resolution::ShortCircuit(ClassifyResponse::ignored()))
            }
        }
    }
}

enum Resolution {
    Target(Target),
    ShortCircuit(ClassifyResponse),
}
