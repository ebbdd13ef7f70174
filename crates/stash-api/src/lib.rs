//! # stash-api
//!
//! HTTP API server for linkstash: the three externally triggered surfaces
//! (batch backfill, webhook classification, folder-name suggestion) plus a
//! health check, wired over the repositories in `stash-db` and the AI
//! clients in `stash-inference`.

pub mod handlers;
pub mod services;
pub mod testing;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use stash_core::{
    DebugEventRepository, FolderRepository, GenerationBackend, SavedLinkRepository,
};
use stash_inference::{FolderClassifier, NameSuggester};

use services::{BackfillService, ClassificationService, SuggestionService};

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
///
/// UUIDv7 embeds a Unix timestamp, so IDs sort chronologically — useful for
/// log correlation when tracing a classification across pipeline stages.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// APPLICATION STATE
// =============================================================================

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Batch backfill orchestrator.
    pub backfill: BackfillService,
    /// Webhook classification router.
    pub classification: ClassificationService,
    /// Suggestion request handler.
    pub suggestion: SuggestionService,
}

impl AppState {
    /// Wire up the three pipeline services over shared repositories and a
    /// generation backend.
    pub fn new(
        folders: Arc<dyn FolderRepository>,
        links: Arc<dyn SavedLinkRepository>,
        debug_events: Arc<dyn DebugEventRepository>,
        backend: Arc<dyn GenerationBackend>,
    ) -> Self {
        let classifier = FolderClassifier::new(backend.clone());
        let suggester = NameSuggester::new(backend);
        Self {
            backfill: BackfillService::new(folders.clone(), links.clone(), classifier.clone()),
            classification: ClassificationService::new(folders, links, classifier),
            suggestion: SuggestionService::new(suggester, debug_events),
        }
    }
}

/// Build the application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/functions/backfill-classifications",
            post(handlers::run_backfill),
        )
        .route("/functions/classify-folder", post(handlers::classify_folder))
        .route("/functions/suggest-folders", post(handlers::suggest_folders))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        // Permissive CORS: these are public function endpoints called from
        // mobile clients and database webhooks; preflight OPTIONS probes
        // must get a bare success with open cross-origin headers.
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

// =============================================================================
// ERROR HANDLING
// =============================================================================

/// API-boundary error with an HTTP status mapping.
#[derive(Debug)]
pub enum ApiError {
    Internal(stash_core::Error),
    NotFound(String),
    BadRequest(String),
}

impl From<stash_core::Error> for ApiError {
    fn from(err: stash_core::Error) -> Self {
        match &err {
            stash_core::Error::NotFound(msg) => ApiError::NotFound(msg.clone()),
            stash_core::Error::FolderNotFound(id) => {
                ApiError::NotFound(format!("Folder not found: {}", id))
            }
            stash_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg.clone()),
            _ => ApiError::Internal(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::Internal(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
