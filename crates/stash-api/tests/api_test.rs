//! Router-level tests exercising the three trigger surfaces end to end
//! over in-memory repositories and a scripted generation backend.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use stash_api::testing::{
    MemoryDebugEventRepository, MemoryFolderRepository, MemorySavedLinkRepository,
};
use stash_api::{app, AppState};
use stash_core::Folder;
use stash_inference::mock::MockBackend;

struct Harness {
    folders: MemoryFolderRepository,
    debug_events: MemoryDebugEventRepository,
    backend: MockBackend,
    router: axum::Router,
}

fn harness(folders: Vec<Folder>, links: MemorySavedLinkRepository, backend: MockBackend) -> Harness {
    let folders = MemoryFolderRepository::new(folders);
    let debug_events = MemoryDebugEventRepository::default();
    let state = AppState::new(
        Arc::new(folders.clone()),
        Arc::new(links),
        Arc::new(debug_events.clone()),
        Arc::new(backend.clone()),
    );
    Harness {
        folders,
        debug_events,
        backend,
        router: app(state),
    }
}

fn unclassified(id: i64, name: &str) -> Folder {
    Folder {
        id,
        name: name.to_string(),
        system_category: None,
    }
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// =============================================================================
// CORS / PREFLIGHT
// =============================================================================

#[tokio::test]
async fn preflight_probe_gets_bare_success_with_open_cors() {
    let h = harness(vec![], MemorySavedLinkRepository::default(), MockBackend::new());

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/functions/suggest-folders")
        .header(header::ORIGIN, "https://app.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = h.router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|v| v.to_str().unwrap()),
        Some("*")
    );
}

// =============================================================================
// SUGGESTION SURFACE
// =============================================================================

#[tokio::test]
async fn suggest_returns_bounded_deduped_list() {
    let backend = MockBackend::new().with_response("```json\n[\"Food\", \"Food\", \"Travel\"]\n```");
    let h = harness(vec![], MemorySavedLinkRepository::default(), backend);

    let response = h
        .router
        .oneshot(post_json(
            "/functions/suggest-folders",
            serde_json::json!({"caption": "Best ramen in Tokyo", "device_id": "dev-1"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body, serde_json::json!({"suggestions": ["Food", "Travel"]}));

    // Both pipeline stages were recorded.
    let stages: Vec<String> = h
        .debug_events
        .events()
        .into_iter()
        .map(|e| e.stage)
        .collect();
    assert_eq!(stages, vec!["backend_received", "backend_gemini_response"]);
}

#[tokio::test]
async fn suggest_with_blank_caption_makes_no_model_call() {
    let h = harness(vec![], MemorySavedLinkRepository::default(), MockBackend::new());

    let response = h
        .router
        .oneshot(post_json(
            "/functions/suggest-folders",
            serde_json::json!({"caption": "", "device_id": "dev-1"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, serde_json::json!({"suggestions": []}));
    assert_eq!(h.backend.call_count(), 0);
}

#[tokio::test]
async fn suggest_with_missing_body_is_still_success() {
    let h = harness(vec![], MemorySavedLinkRepository::default(), MockBackend::new());

    let response = h
        .router
        .oneshot(post_empty("/functions/suggest-folders"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, serde_json::json!({"suggestions": []}));
}

#[tokio::test]
async fn suggest_with_non_string_caption_is_treated_as_missing() {
    let h = harness(vec![], MemorySavedLinkRepository::default(), MockBackend::new());

    let response = h
        .router
        .oneshot(post_json(
            "/functions/suggest-folders",
            serde_json::json!({"caption": 42}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, serde_json::json!({"suggestions": []}));
    assert_eq!(h.backend.call_count(), 0);
}

#[tokio::test]
async fn suggest_never_fails_even_when_everything_breaks() {
    let backend = MockBackend::new().with_error("Gemini API error: 503 overloaded");
    let folders = MemoryFolderRepository::new(vec![]);
    let debug_events = MemoryDebugEventRepository::default().failing();
    let state = AppState::new(
        Arc::new(folders),
        Arc::new(MemorySavedLinkRepository::default()),
        Arc::new(debug_events),
        Arc::new(backend),
    );

    let response = app(state)
        .oneshot(post_json(
            "/functions/suggest-folders",
            serde_json::json!({"caption": "ramen"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, serde_json::json!({"suggestions": []}));
}

// =============================================================================
// WEBHOOK SURFACE
// =============================================================================

#[tokio::test]
async fn classify_folder_event_persists_category() {
    let backend = MockBackend::new().with_response("Food");
    let links = MemorySavedLinkRepository::default().with_titles(1, &["Ramen", "Pho"]);
    let h = harness(vec![unclassified(1, "Recipes")], links, backend);

    let response = h
        .router
        .oneshot(post_json(
            "/functions/classify-folder",
            serde_json::json!({
                "type": "INSERT",
                "table": "folders",
                "record": {"id": 1, "name": "Recipes", "system_category": null}
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        serde_json::json!({"category": "Food", "updated": true})
    );
    assert_eq!(h.folders.category_of(1).as_deref(), Some("Food"));
}

#[tokio::test]
async fn classify_is_idempotent_for_already_classified_folder() {
    let h = harness(
        vec![Folder {
            id: 1,
            name: "Recipes".to_string(),
            system_category: Some("Food".to_string()),
        }],
        MemorySavedLinkRepository::default(),
        MockBackend::new(),
    );

    let response = h
        .router
        .oneshot(post_json(
            "/functions/classify-folder",
            serde_json::json!({
                "table": "folders",
                "record": {"id": 1, "name": "Recipes", "system_category": "Food"}
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        serde_json::json!({"message": "Already classified"})
    );
    // Stored category unchanged, no inference call made.
    assert_eq!(h.folders.category_of(1).as_deref(), Some("Food"));
    assert_eq!(h.backend.call_count(), 0);
}

#[tokio::test]
async fn classify_missing_folder_is_an_error_not_an_ignore() {
    let h = harness(vec![], MemorySavedLinkRepository::default(), MockBackend::new());

    let response = h
        .router
        .oneshot(post_json(
            "/functions/classify-folder",
            serde_json::json!({
                "table": "saved_links",
                "record": {"id": 7, "folder_id": 99}
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert!(body.get("error").is_some());
}

#[tokio::test]
async fn classify_unrecognized_payload_is_ignored_with_success() {
    let h = harness(vec![], MemorySavedLinkRepository::default(), MockBackend::new());

    let response = h
        .router
        .oneshot(post_json(
            "/functions/classify-folder",
            serde_json::json!({"table": "comments", "record": {"id": 1}}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        serde_json::json!({"message": "Ignored: Invalid payload"})
    );
}

#[tokio::test]
async fn classify_inference_failure_surfaces_as_error_status() {
    let backend = MockBackend::new().with_error("Gemini API error: 500 boom");
    let h = harness(
        vec![unclassified(1, "Recipes")],
        MemorySavedLinkRepository::default(),
        backend,
    );

    let response = h
        .router
        .oneshot(post_json(
            "/functions/classify-folder",
            serde_json::json!({
                "table": "folders",
                "record": {"id": 1, "name": "Recipes"}
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("500"));
}

// =============================================================================
// BACKFILL SURFACE
// =============================================================================

#[tokio::test]
async fn backfill_reports_empty_backlog() {
    let h = harness(vec![], MemorySavedLinkRepository::default(), MockBackend::new());

    let response = h
        .router
        .oneshot(post_empty("/functions/backfill-classifications"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["message"], "No unclassified folders found.");
    assert_eq!(body["processed"], 0);
}

#[tokio::test]
async fn backfill_isolates_per_folder_failures() {
    let backend = MockBackend::new()
        .with_response("Food")
        .with_error("Gemini API error: 500 Internal Server Error")
        .with_response("Travel");
    let h = harness(
        vec![
            unclassified(41, "Recipes"),
            unclassified(42, "Mystery"),
            unclassified(43, "Trips"),
        ],
        MemorySavedLinkRepository::default(),
        backend,
    );

    let response = h
        .router
        .oneshot(post_empty("/functions/backfill-classifications"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Batch complete");
    assert_eq!(body["processed"], 2);
    assert_eq!(body["remaining"], 1);
    assert_eq!(body["failures"][0]["folderId"], 42);
    assert!(body["failures"][0]["error"].as_str().unwrap().contains("500"));
    // Folders after the failed one were still processed.
    assert_eq!(h.folders.category_of(43).as_deref(), Some("Travel"));
}

#[tokio::test]
async fn backfill_initial_query_failure_is_a_top_level_error() {
    let folders = MemoryFolderRepository::new(vec![]).failing_list();
    let state = AppState::new(
        Arc::new(folders),
        Arc::new(MemorySavedLinkRepository::default()),
        Arc::new(MemoryDebugEventRepository::default()),
        Arc::new(MockBackend::new()),
    );

    let response = app(state)
        .oneshot(post_empty("/functions/backfill-classifications"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert!(body.get("error").is_some());
}

// =============================================================================
// HEALTH
// =============================================================================

#[tokio::test]
async fn health_check_reports_ok() {
    let h = harness(vec![], MemorySavedLinkRepository::default(), MockBackend::new());

    let response = h
        .router
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "ok");
}
