//! Suggestion request handler.
//!
//! The one pipeline with a "never fail the caller" contract: a missing
//! suggestion is a degraded-but-usable outcome for the client, while an
//! error status would be treated as a hard failure. Every failure mode
//! collapses into an empty suggestion list on a success response.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument, warn};

use stash_core::DebugEventRepository;
use stash_inference::NameSuggester;

/// Debug-event stage recorded when a request arrives.
pub const STAGE_RECEIVED: &str = "backend_received";

/// Debug-event stage recorded after the model responds.
pub const STAGE_RESPONSE: &str = "backend_gemini_response";

/// Response body for the suggestion surface. Always delivered with a
/// success status; `error` carries diagnostic detail when the list is
/// empty because something broke rather than because the model had no
/// ideas.
#[derive(Debug, Clone, Serialize)]
pub struct SuggestionResponse {
    pub suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SuggestionResponse {
    pub fn empty() -> Self {
        Self {
            suggestions: Vec::new(),
            error: None,
        }
    }

    pub fn degraded(error: String) -> Self {
        Self {
            suggestions: Vec::new(),
            error: Some(error),
        }
    }
}

/// Handles folder-name suggestion requests.
#[derive(Clone)]
pub struct SuggestionService {
    suggester: NameSuggester,
    debug_events: Arc<dyn DebugEventRepository>,
}

impl SuggestionService {
    pub fn new(suggester: NameSuggester, debug_events: Arc<dyn DebugEventRepository>) -> Self {
        Self {
            suggester,
            debug_events,
        }
    }

    /// Handle one suggestion request. Infallible by contract.
    #[instrument(skip(self, caption), fields(subsystem = "api", component = "suggest", op = "handle_request", device_id = device_id.as_deref().unwrap_or("")))]
    pub async fn handle(
        &self,
        caption: Option<String>,
        device_id: Option<String>,
    ) -> SuggestionResponse {
        self.log_event(
            device_id.as_deref(),
            STAGE_RECEIVED,
            serde_json::json!({ "caption": caption }),
        )
        .await;

        let caption = caption.unwrap_or_default();
        let caption = caption.trim();
        if caption.is_empty() {
            // Nothing to suggest from; not an error, and no model call.
            return SuggestionResponse::empty();
        }

        let suggestions = self.suggester.suggest(caption).await;
        info!(result_count = suggestions.len(), "Suggestions generated");

        self.log_event(
            device_id.as_deref(),
            STAGE_RESPONSE,
            serde_json::json!({ "suggestions": suggestions }),
        )
        .await;

        SuggestionResponse {
            suggestions,
            error: None,
        }
    }

    /// Fire-and-forget debug-event append. A failed write is logged and
    /// discarded; it must never change the handler's outcome.
    async fn log_event(&self, device_id: Option<&str>, stage: &str, payload: serde_json::Value) {
        if let Err(e) = self.debug_events.append(device_id, stage, payload).await {
            warn!(
                stage,
                device_id = device_id.unwrap_or(""),
                error = %e,
                "Failed to append debug event"
            );
        }
    }
}
