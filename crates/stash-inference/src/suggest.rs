//! Folder-name suggestion client.
//!
//! Asks the model for 2-3 concise folder names for a newly saved link and
//! parses them out of a JSON array that may arrive wrapped in a markdown
//! code fence. Suggestions are a convenience feature: every failure mode
//! degrades to an empty list, never an error.

use std::sync::Arc;

use tracing::{debug, warn};

use stash_core::{defaults, GenerationBackend};

/// AI suggester: one link caption in, up to three folder names out.
#[derive(Clone)]
pub struct NameSuggester {
    backend: Arc<dyn GenerationBackend>,
}

impl NameSuggester {
    /// Create a suggester over the given generation backend.
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    /// Suggest folder names for a link caption. Never fails outward.
    pub async fn suggest(&self, caption: &str) -> Vec<String> {
        let prompt = build_suggestion_prompt(caption);

        let text = match self.backend.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!(
                    subsystem = "inference",
                    component = "suggest",
                    error = %e,
                    "Suggestion generation failed, returning empty list"
                );
                return Vec::new();
            }
        };

        let suggestions = parse_suggestions(&text);
        debug!(
            subsystem = "inference",
            component = "suggest",
            result_count = suggestions.len(),
            "Suggestions parsed"
        );
        suggestions
    }
}

/// Build the suggestion prompt for one caption.
fn build_suggestion_prompt(caption: &str) -> String {
    format!(
        "Suggest 2-3 concise folder names for saving a link with this caption.\n\
         Caption: \"{}\"\n\
         Rules:\n\
         1. Return JSON array of strings ONLY. Example: [\"Food\", \"Travel\"]\n\
         2. Max {} suggestions.\n\
         3. Capitalized, clean strings (no emojis).\n\
         4. Single word or short phrase categories.",
        caption,
        defaults::MAX_SUGGESTIONS
    )
}

/// Extract suggestions from raw model output.
///
/// Strips markdown code-fence markers, strict-parses the remainder as a
/// JSON array, then trims entries, drops empties, de-duplicates preserving
/// first-seen order, and truncates to [`defaults::MAX_SUGGESTIONS`].
/// Anything unparseable yields an empty list.
fn parse_suggestions(text: &str) -> Vec<String> {
    let clean = strip_code_fences(text);
    if clean.is_empty() {
        return Vec::new();
    }

    let parsed: serde_json::Value = match serde_json::from_str(&clean) {
        Ok(value) => value,
        Err(e) => {
            warn!(
                subsystem = "inference",
                component = "suggest",
                error = %e,
                "Model response was not valid JSON"
            );
            return Vec::new();
        }
    };

    let serde_json::Value::Array(items) = parsed else {
        warn!(
            subsystem = "inference",
            component = "suggest",
            "Model response was not a JSON array"
        );
        return Vec::new();
    };

    let mut suggestions: Vec<String> = Vec::new();
    for item in items {
        let entry = match item {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
        let entry = entry.trim().to_string();
        if entry.is_empty() || suggestions.contains(&entry) {
            continue;
        }
        suggestions.push(entry);
        if suggestions.len() == defaults::MAX_SUGGESTIONS {
            break;
        }
    }
    suggestions
}

/// Remove markdown code-fence markers the model sometimes wraps JSON in.
fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}
