//! HTTP route handlers for the three trigger surfaces.

use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;
use tracing::error;

use stash_core::{ChangeNotification, ClassifyResponse};

use crate::services::SuggestionResponse;
use crate::{ApiError, AppState};

/// Health check endpoint.
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `POST /functions/backfill-classifications`
///
/// No request body. Classifies one page of unclassified folders; only a
/// failure before the batch starts surfaces as an error status.
pub async fn run_backfill(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let report = state.backfill.run_batch().await?;
    Ok(Json(report))
}

/// `POST /functions/classify-folder`
///
/// Database change-notification webhook. A body that is not JSON at all is
/// treated like an unrecognized payload shape: the sender may retry errors
/// and must not see one for garbage input.
pub async fn classify_folder(
    State(state): State<AppState>,
    payload: Option<Json<ChangeNotification>>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(Json(payload)) = payload else {
        return Ok(Json(ClassifyResponse::ignored()));
    };
    let response = state.classification.handle(payload).await?;
    Ok(Json(response))
}

/// Request body for the suggestion surface. A non-string caption fails
/// deserialization and is handled as a missing caption.
#[derive(Debug, Default, Deserialize)]
pub struct SuggestRequest {
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub device_id: Option<String>,
}

/// `POST /functions/suggest-folders`
///
/// Always answers with a success status: the calling application treats an
/// empty suggestion list as a usable outcome but an error status as a hard
/// failure. The pipeline runs on a separate task so that even a panic is
/// converted into an empty-suggestions response.
pub async fn suggest_folders(
    State(state): State<AppState>,
    body: Option<Json<SuggestRequest>>,
) -> impl IntoResponse {
    let SuggestRequest { caption, device_id } = body.map(|Json(b)| b).unwrap_or_default();

    let service = state.suggestion.clone();
    let response = match tokio::spawn(async move { service.handle(caption, device_id).await }).await
    {
        Ok(response) => response,
        Err(e) => {
            error!(
                subsystem = "api",
                component = "suggest",
                error = %e,
                "Suggestion pipeline aborted"
            );
            SuggestionResponse::degraded(format!("Internal error: {}", e))
        }
    };

    Json(response)
}
