//! API integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sdir_analysis::testing::StubDecomposer;
use sdir_analysis::{
    AnalysisConfig, AnalysisError, AnalysisResponse, AnalysisResult, PromptTemplate,
    SceneDecomposer,
};
use sdir_api::{create_router, ApiConfig, AppState};
use sdir_render::RenderConfig;

const SCENARIO: &str = "[HOOK]\nIn 1850, the streets of London were shrouded in fog.\n[DESENVOLVIMENTO]\nA child ran past the gas lamp.";

/// Succeeds on the first call, then returns contract violations.
struct FlakyDecomposer {
    calls: AtomicUsize,
    inner: StubDecomposer,
}

#[async_trait]
impl SceneDecomposer for FlakyDecomposer {
    fn name(&self) -> &'static str {
        "flaky"
    }

    async fn decompose(
        &self,
        script: &str,
        template: &PromptTemplate,
    ) -> AnalysisResult<AnalysisResponse> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            self.inner.decompose(script, template).await
        } else {
            Err(AnalysisError::contract("missing scenes"))
        }
    }
}

fn create_test_router(decomposer: StubDecomposer, render_config: RenderConfig) -> Router {
    let state = AppState::with_decomposer(
        ApiConfig::default(),
        AnalysisConfig::default(),
        render_config,
        Arc::new(decomposer),
    )
    .unwrap();
    create_router(state, None)
}

fn default_router() -> Router {
    create_test_router(StubDecomposer::new(), RenderConfig::default())
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, HeaderMap, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, bytes.to_vec())
}

async fn send_json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, _, bytes) = send(app, method, uri, body).await;
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn analyze(app: &Router, script: &str) -> (StatusCode, Value) {
    send_json(app, Method::POST, "/api/analyze", Some(json!({ "script": script }))).await
}

fn segment_ids(session: &Value) -> Vec<String> {
    session["segments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = default_router();
    let (status, body) = send_json(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_is_echoed_or_generated() {
    let app = default_router();

    let request = Request::builder()
        .uri("/api/session")
        .header("X-Request-ID", "req-42")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "req-42");

    let (_, headers, _) = send(&app, Method::GET, "/api/session", None).await;
    let generated = headers["x-request-id"].to_str().unwrap();
    assert!(uuid::Uuid::parse_str(generated).is_ok());
}

#[tokio::test]
async fn test_ready_requires_analysis_backend() {
    let app = default_router();
    let (status, _) = send_json(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);

    let state = AppState::new(
        ApiConfig::default(),
        AnalysisConfig::default(),
        RenderConfig::default(),
    )
    .unwrap();
    let unconfigured = create_router(state, None);
    let (status, body) = send_json(&unconfigured, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["checks"]["analysis_backend"]["status"], "missing");
}

#[tokio::test]
async fn test_analyze_scenario() {
    let app = default_router();
    let (status, body) = analyze(&app, SCENARIO).await;

    assert_eq!(status, StatusCode::OK);
    let session = &body["session"];
    assert_eq!(session["context"]["detected_city"], "London");
    assert_eq!(session["context"]["detected_era"], "1850");
    assert_eq!(session["processing"], false);

    let segments = session["segments"].as_array().unwrap();
    assert_eq!(segments.len(), 2);
    for segment in segments {
        assert!(!segment["original_text"].as_str().unwrap().starts_with('['));
        assert_eq!(segment["is_hook"], true);
    }
}

#[tokio::test]
async fn test_header_only_script_yields_empty_session() {
    let app = default_router();
    let (status, body) = analyze(&app, "[HOOK]\n[DESENVOLVIMENTO]").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["session"]["segments"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_script_is_rejected_without_backend_call() {
    let app = create_test_router(
        StubDecomposer::failing(AnalysisError::EmptyResponse),
        RenderConfig::default(),
    );

    let (status, body) = analyze(&app, "   \n  ").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "analysis_empty_script");
}

#[tokio::test]
async fn test_failed_analysis_keeps_previous_session() {
    let decomposer = FlakyDecomposer {
        calls: AtomicUsize::new(0),
        inner: StubDecomposer::new(),
    };
    let state = AppState::with_decomposer(
        ApiConfig::default(),
        AnalysisConfig::default(),
        RenderConfig::default(),
        Arc::new(decomposer),
    )
    .unwrap();
    let app = create_router(state, None);

    let (status, first) = analyze(&app, SCENARIO).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = analyze(&app, "In 1666, London burned.").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["detail"], "Failed to analyze script. Please try again.");
    assert_eq!(body["code"], "analysis_contract");

    let (_, session) = send_json(&app, Method::GET, "/api/session", None).await;
    assert_eq!(session["segments"], first["session"]["segments"]);
    assert_eq!(session["processing"], false);
}

#[tokio::test]
async fn test_concurrent_analysis_conflicts() {
    let app = create_test_router(
        StubDecomposer::with_delay(Duration::from_millis(300)),
        RenderConfig::default(),
    );

    let background = app.clone();
    let first = tokio::spawn(async move { analyze(&background, SCENARIO).await });

    tokio::time::sleep(Duration::from_millis(50)).await;
    let (status, body) = analyze(&app, SCENARIO).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "analysis_in_progress");

    let (status, _) = first.await.unwrap();
    assert_eq!(status, StatusCode::OK);

    let (status, _) = analyze(&app, SCENARIO).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_update_prompt_changes_only_target() {
    let app = default_router();
    let (_, body) = analyze(&app, SCENARIO).await;
    let before = body["session"]["segments"].clone();
    let ids = segment_ids(&body["session"]);

    let uri = format!("/api/segments/{}/prompt", ids[1]);
    let (status, session) = send_json(
        &app,
        Method::PATCH,
        &uri,
        Some(json!({ "visual_prompt": "1850 London, close-up of a gas lamp" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let after = &session["segments"];
    assert_eq!(after[0], before[0]);
    assert_eq!(after[1]["visual_prompt"], "1850 London, close-up of a gas lamp");
    assert_eq!(after[1]["id"], before[1]["id"]);
    assert_eq!(after[1]["original_text"], before[1]["original_text"]);
    assert_eq!(after[1]["is_hook"], before[1]["is_hook"]);
}

#[tokio::test]
async fn test_update_prompt_unknown_id_is_noop() {
    let app = default_router();
    let (_, body) = analyze(&app, SCENARIO).await;

    let (status, session) = send_json(
        &app,
        Method::PATCH,
        "/api/segments/does-not-exist/prompt",
        Some(json!({ "visual_prompt": "x" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["segments"], body["session"]["segments"]);
}

#[tokio::test]
async fn test_get_segment() {
    let app = default_router();
    let (_, body) = analyze(&app, SCENARIO).await;
    let ids = segment_ids(&body["session"]);

    let (status, segment) =
        send_json(&app, Method::GET, &format!("/api/segments/{}", ids[0]), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        segment["original_text"],
        "In 1850, the streets of London were shrouded in fog."
    );

    let (status, _) = send_json(&app, Method::GET, "/api/segments/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_export_text_and_filename() {
    let app = default_router();
    let (_, body) = analyze(&app, SCENARIO).await;
    let prompts: Vec<&str> = body["session"]["segments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["visual_prompt"].as_str().unwrap())
        .collect();

    let (status, headers, bytes) = send(&app, Method::GET, "/api/export", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(bytes).unwrap(), prompts.join("\n\n"));
    let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.contains("filename=\"London_veo_prompts.txt\""));
}

#[tokio::test]
async fn test_export_without_session_uses_fallback_name() {
    let app = default_router();
    let (status, headers, bytes) = send(&app, Method::GET, "/api/export", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(bytes.is_empty());
    let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.contains("script_veo_prompts.txt"));
}

#[tokio::test]
async fn test_clear_session() {
    let app = default_router();
    analyze(&app, SCENARIO).await;

    let (status, _, _) = send(&app, Method::DELETE, "/api/session", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, session) = send_json(&app, Method::GET, "/api/session", None).await;
    assert!(session["context"].is_null());
    assert!(session["segments"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_settings_never_echo_key() {
    let app = default_router();

    let (_, settings) = send_json(&app, Method::GET, "/api/settings", None).await;
    assert_eq!(settings, json!({ "has_render_api_key": false, "use_proxy": false }));

    let (status, settings) = send_json(
        &app,
        Method::PUT,
        "/api/settings",
        Some(json!({ "render_api_key": "  secret-key ", "use_proxy": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settings, json!({ "has_render_api_key": true, "use_proxy": true }));

    // Omitting the key keeps it
    let (_, settings) = send_json(
        &app,
        Method::PUT,
        "/api/settings",
        Some(json!({ "use_proxy": false })),
    )
    .await;
    assert_eq!(settings, json!({ "has_render_api_key": true, "use_proxy": false }));
}

#[tokio::test]
async fn test_render_segment_dispatches_prompt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/video-gen/grok"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "video_url": "https://cdn/v.mp4" })),
        )
        .mount(&server)
        .await;

    let app = create_test_router(
        StubDecomposer::new(),
        RenderConfig {
            endpoint: format!("{}/video-gen/grok", server.uri()),
            api_key: Some("render-key".to_string()),
            ..Default::default()
        },
    );
    let (_, body) = analyze(&app, SCENARIO).await;
    let ids = segment_ids(&body["session"]);

    let (status, render) = send_json(
        &app,
        Method::POST,
        &format!("/api/segments/{}/render", ids[0]),
        Some(json!({ "duration_seconds": 9, "resolution": "1080p", "aspect_ratio": "portrait" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(render["video_url"], "https://cdn/v.mp4");
    assert_eq!(render["duration"], "10");

    let requests = server.received_requests().await.unwrap();
    let form = String::from_utf8_lossy(&requests[0].body);
    assert!(form.contains("720p"));
    assert!(form.contains("landscape"));
    assert!(!form.contains("1080p"));
}

#[tokio::test]
async fn test_render_long_duration_snaps_to_fifteen() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "url": "https://cdn/long.mp4" })))
        .mount(&server)
        .await;

    let app = create_test_router(
        StubDecomposer::new(),
        RenderConfig {
            endpoint: format!("{}/video-gen/grok", server.uri()),
            api_key: Some("render-key".to_string()),
            ..Default::default()
        },
    );
    let (_, body) = analyze(&app, SCENARIO).await;
    let ids = segment_ids(&body["session"]);

    let (status, render) = send_json(
        &app,
        Method::POST,
        &format!("/api/segments/{}/render", ids[0]),
        Some(json!({ "duration_seconds": 900 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(render["duration"], "15");

    let requests = server.received_requests().await.unwrap();
    let form = String::from_utf8_lossy(&requests[0].body);
    assert!(form.contains("name=\"duration\"\r\n\r\n15\r\n"));
}

#[tokio::test]
async fn test_render_negative_duration_is_rejected() {
    let app = default_router();
    let (_, body) = analyze(&app, SCENARIO).await;
    let ids = segment_ids(&body["session"]);

    let (status, _) = send_json(
        &app,
        Method::POST,
        &format!("/api/segments/{}/render", ids[0]),
        Some(json!({ "duration_seconds": -1 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_render_without_key_is_bad_request() {
    let app = default_router();
    let (_, body) = analyze(&app, SCENARIO).await;
    let ids = segment_ids(&body["session"]);

    let (status, body) = send_json(
        &app,
        Method::POST,
        &format!("/api/segments/{}/render", ids[0]),
        Some(json!({ "duration_seconds": 6 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "render_missing_api_key");
}

#[tokio::test]
async fn test_render_backend_error_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(402).set_body_string("insufficient credits"))
        .mount(&server)
        .await;

    let app = create_test_router(
        StubDecomposer::new(),
        RenderConfig {
            endpoint: format!("{}/video-gen/grok", server.uri()),
            api_key: Some("render-key".to_string()),
            ..Default::default()
        },
    );
    let (_, body) = analyze(&app, SCENARIO).await;
    let ids = segment_ids(&body["session"]);

    let (status, body) = send_json(
        &app,
        Method::POST,
        &format!("/api/segments/{}/render", ids[0]),
        Some(json!({ "duration_seconds": 15 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["detail"], "API Error (402): insufficient credits");
}

#[tokio::test]
async fn test_render_unknown_segment_is_not_found() {
    let app = default_router();
    let (status, _) = send_json(
        &app,
        Method::POST,
        "/api/segments/missing/render",
        Some(json!({ "duration_seconds": 6 })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
