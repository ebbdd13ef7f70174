//! Folder classification client.
//!
//! Builds the single-label classification prompt from a folder name plus
//! sample link titles, delegates to the generation backend, and validates
//! that a usable label came back. Callers own the retry/degradation policy.

use std::sync::Arc;

use tracing::debug;

use stash_core::{defaults, Error, GenerationBackend, Result};

/// AI classifier: one folder in, one short category label out.
#[derive(Clone)]
pub struct FolderClassifier {
    backend: Arc<dyn GenerationBackend>,
}

impl FolderClassifier {
    /// Create a classifier over the given generation backend.
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    /// Classify a folder into a single category label.
    ///
    /// At most [`defaults::CONTEXT_TITLE_LIMIT`] sample titles are included
    /// in the prompt. A response that trims to nothing is an error distinct
    /// from transport failure: the call succeeded but produced no label.
    pub async fn classify(&self, folder_name: &str, sample_titles: &[String]) -> Result<String> {
        let prompt = build_classification_prompt(folder_name, sample_titles);
        debug!(
            subsystem = "inference",
            component = "classify",
            prompt_len = prompt.len(),
            "Requesting folder classification"
        );

        let category = self.backend.generate(&prompt).await?;
        let category = category.trim();
        if category.is_empty() {
            return Err(Error::Inference("No category returned by AI".to_string()));
        }
        Ok(category.to_string())
    }
}

/// Build the deterministic classification prompt.
fn build_classification_prompt(folder_name: &str, sample_titles: &[String]) -> String {
    let context: Vec<String> = sample_titles
        .iter()
        .take(defaults::CONTEXT_TITLE_LIMIT as usize)
        .cloned()
        .collect();
    let contents = serde_json::Value::from(context).to_string();

    format!(
        "Classify this folder into ONE category.\n\
         Folder: \"{}\"\n\
         Contents: {}\n\
         Rules: One word/phrase only. If unclear, \"{}\".",
        folder_name,
        contents,
        defaults::FALLBACK_CATEGORY
    )
}
