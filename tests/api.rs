//! End-to-end tests for the stats service router.
//!
//! Each test builds the full router over its own temp directory, so the
//! persisted file and the static root are isolated per test.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use metrics_exporter_prometheus::PrometheusBuilder;
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use tower::ServiceExt;

use statsboard::api::{create_router, AppState};
use statsboard::store::{StatsRecord, StatsStore, DEFAULT_ENGAGEMENT_RATE, DEFAULT_FOLLOWERS};

async fn test_app(dir: &TempDir) -> Router {
    let store = StatsStore::open(dir.path().join("data.json"), StatsRecord::seeded(None, None))
        .await
        .unwrap();
    let prometheus = PrometheusBuilder::new().build_recorder().handle();
    create_router(AppState::new(store, prometheus), dir.path())
}

fn get_req(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_req(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn first_get_returns_default_record_and_persists_it() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir).await;

    let response = app.oneshot(get_req("/api/stats")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

    let record = json_body(response).await;
    assert_eq!(record["followers"], DEFAULT_FOLLOWERS);
    assert_eq!(record["engagementRate"], DEFAULT_ENGAGEMENT_RATE);

    // Default must already be durable.
    let on_disk: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("data.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(on_disk["followers"], DEFAULT_FOLLOWERS);
}

#[tokio::test]
async fn post_merges_into_record_and_get_reflects_it() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir).await;

    let response = app
        .clone()
        .oneshot(post_req("/api/stats", r#"{"followers": 20000}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["stats"]["followers"], 20_000);

    let response = app.oneshot(get_req("/api/stats")).await.unwrap();
    let record = json_body(response).await;
    assert_eq!(record["followers"], 20_000);
    // Merge semantic: the omitted field keeps its previous value.
    assert_eq!(record["engagementRate"], DEFAULT_ENGAGEMENT_RATE);
}

#[tokio::test]
async fn posted_record_survives_a_restart() {
    let dir = TempDir::new().unwrap();

    let app = test_app(&dir).await;
    let response = app
        .oneshot(post_req(
            "/api/stats",
            r#"{"followers": 31337, "engagementRate": 7.25}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Fresh store over the same directory, as a process restart would build.
    let app = test_app(&dir).await;
    let response = app.oneshot(get_req("/api/stats")).await.unwrap();
    let record = json_body(response).await;
    assert_eq!(record["followers"], 31_337);
    assert_eq!(record["engagementRate"], 7.25);
}

#[tokio::test]
async fn malformed_post_is_500_and_leaves_record_unchanged() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir).await;

    let response = app
        .clone()
        .oneshot(post_req("/api/stats", "{not json"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(!bytes.is_empty(), "error body should carry a message");

    let response = app.oneshot(get_req("/api/stats")).await.unwrap();
    let record = json_body(response).await;
    assert_eq!(record["followers"], DEFAULT_FOLLOWERS);
}

#[tokio::test]
async fn string_typed_numerics_are_coerced() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir).await;

    let response = app
        .clone()
        .oneshot(post_req(
            "/api/stats",
            r#"{"followers": "15000", "engagementRate": "6.5"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get_req("/api/stats")).await.unwrap();
    let record = json_body(response).await;
    assert_eq!(record["followers"], 15_000);
    assert_eq!(record["engagementRate"], 6.5);
}

#[tokio::test]
async fn posting_twice_is_idempotent_on_disk() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir).await;

    let payload = r#"{"followers": 555, "engagementRate": 2.5}"#;
    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(post_req("/api/stats", payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let on_disk: StatsRecord = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("data.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(on_disk.followers, 555);
    assert_eq!(on_disk.engagement_rate, 2.5);
}

#[tokio::test]
async fn options_preflight_succeeds_for_api_and_static_paths() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir).await;

    for uri in ["/api/stats", "/index.html", "/deep/nested/path"] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK, "OPTIONS {uri}");
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS],
            "GET, POST, OPTIONS"
        );
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS],
            "Content-Type"
        );
    }
}

#[tokio::test]
async fn static_fallback_serves_files_and_404s_misses() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("index.html"), "<html>dash</html>").unwrap();
    let app = test_app(&dir).await;

    let response = app.clone().oneshot(get_req("/index.html")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get_req("/missing.html")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    // The 404 still carries CORS headers.
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn metrics_endpoint_renders_exposition_text() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir).await;

    let response = app.oneshot(get_req("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
