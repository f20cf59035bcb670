use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use dispatch_board::config::environment::EnvironmentConfig;
use dispatch_board::routes::create_app;
use dispatch_board::state::AppState;

struct TestApp {
    app: Router,
    dir: TempDir,
}

impl TestApp {
    fn data_file(&self) -> std::path::PathBuf {
        self.dir.path().join("truck_data.json")
    }
}

fn create_test_app() -> TestApp {
    let dir = TempDir::new().unwrap();
    let config = EnvironmentConfig {
        data_file: dir.path().join("truck_data.json"),
        static_dir: dir.path().join("public"),
        ..EnvironmentConfig::default()
    };
    TestApp {
        app: create_app(AppState::new(config)),
        dir,
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, headers, body)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Value) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn post_raw(app: &Router, uri: &str, body: String) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    let (status, _, body) = send(app, request).await;
    (status, body)
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    post_raw(app, uri, body.to_string()).await
}

fn fleet_body() -> Value {
    json!({
        "trucks": [
            { "id": "Med-1", "name": "Medic 1", "location": "City // HQ", "status": "onScene", "timerEndTime": null },
            { "id": "Med-2", "name": "Medic 2", "location": "Iva", "status": "logistics", "timerEndTime": 1700000600000i64 }
        ],
        "timerDefaults": { "atDestination": 25, "logistics": 15 },
        "clientTimestamp": 1700000000000i64
    })
}

#[tokio::test]
async fn test_first_read_materializes_default_document() {
    let test = create_test_app();
    assert!(!test.data_file().exists());

    let (status, _, body) = get(&test.app, "/api/trucks").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["trucks"].as_array().unwrap().len(), 17);
    assert_eq!(body["trucks"][0]["id"], "Med-0");
    assert_eq!(body["trucks"][0]["status"], "available");
    assert_eq!(body["timerDefaults"], json!({ "atDestination": 20, "logistics": 10 }));
    assert!(body["lastUpdated"].is_string());
    assert!(test.data_file().exists());
}

#[tokio::test]
async fn test_reads_without_writes_keep_the_stamp() {
    let test = create_test_app();
    let (_, _, first) = get(&test.app, "/api/trucks").await;
    let (_, _, second) = get(&test.app, "/api/trucks").await;
    assert_eq!(first["lastUpdated"], second["lastUpdated"]);
}

#[tokio::test]
async fn test_save_then_read_returns_saved_fleet() {
    let test = create_test_app();
    let (_, _, before) = get(&test.app, "/api/trucks").await;

    let (status, saved) = post(&test.app, "/api/trucks", fleet_body()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["success"], true);
    assert_eq!(saved["message"], "Truck data saved successfully");

    let (_, _, after) = get(&test.app, "/api/trucks").await;
    assert_eq!(after["lastUpdated"], saved["lastUpdated"]);
    assert_ne!(after["lastUpdated"], before["lastUpdated"]);
    assert!(after["lastUpdated"].as_str().unwrap() > before["lastUpdated"].as_str().unwrap());
    assert_eq!(after["trucks"], fleet_body()["trucks"]);
    assert_eq!(after["timerDefaults"], json!({ "atDestination": 25, "logistics": 15 }));
    assert!(after.get("clientTimestamp").is_none());
}

#[tokio::test]
async fn test_consecutive_saves_have_increasing_stamps() {
    let test = create_test_app();
    let (_, first) = post(&test.app, "/api/trucks", fleet_body()).await;
    let (_, second) = post(&test.app, "/api/trucks", fleet_body()).await;
    assert!(second["lastUpdated"].as_str().unwrap() > first["lastUpdated"].as_str().unwrap());
}

#[tokio::test]
async fn test_save_without_timer_defaults_uses_defaults() {
    let test = create_test_app();
    let (status, _) = post(&test.app, "/api/trucks", json!({ "trucks": [] })).await;
    assert_eq!(status, StatusCode::OK);

    let (_, _, document) = get(&test.app, "/api/trucks").await;
    assert_eq!(document["trucks"], json!([]));
    assert_eq!(document["timerDefaults"], json!({ "atDestination": 20, "logistics": 10 }));
}

#[tokio::test]
async fn test_invalid_saves_leave_document_untouched() {
    let test = create_test_app();
    let (_, _, before) = get(&test.app, "/api/trucks").await;

    let (status, body) = post(&test.app, "/api/trucks", json!({ "timerDefaults": {} })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("Invalid truck data"));

    let (status, _) = post(&test.app, "/api/trucks", json!({ "trucks": "nope" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(
        &test.app,
        "/api/trucks",
        json!({ "trucks": [{ "id": "A", "name": "A", "location": "B", "status": "posted" }] }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_raw(&test.app, "/api/trucks", "{ not json".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, _, after) = get(&test.app, "/api/trucks").await;
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_status_endpoint() {
    let test = create_test_app();
    let (status, _, body) = get(&test.app, "/api/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "online");
    assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
    assert!(body["uptime"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn test_backup_is_served_as_attachment() {
    let test = create_test_app();
    post(&test.app, "/api/trucks", fleet_body()).await;

    let (status, headers, body) = get(&test.app, "/api/backup").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers.get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=truck-backup.json"
    );
    assert_eq!(body["trucks"], fleet_body()["trucks"]);
    assert!(body["lastUpdated"].is_string());
}

#[tokio::test]
async fn test_restore_replaces_document() {
    let test = create_test_app();
    let (_, _, before) = get(&test.app, "/api/trucks").await;

    let (status, body) = post(&test.app, "/api/restore", json!({ "timerDefaults": {} })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("Invalid backup data"));

    let (_, _, unchanged) = get(&test.app, "/api/trucks").await;
    assert_eq!(unchanged, before);

    let backup = json!({
        "trucks": [{ "id": "Med-7", "name": "Med-7", "location": "Pendleton", "status": "unavailable", "timerEndTime": null }],
        "timerDefaults": { "atDestination": 30, "logistics": 5 },
        "lastUpdated": "2020-01-01T00:00:00.000Z"
    });
    let (status, body) = post(&test.app, "/api/restore", backup.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Data restored from backup successfully");

    let (_, _, after) = get(&test.app, "/api/trucks").await;
    assert_eq!(after["trucks"], backup["trucks"]);
    assert_eq!(after["timerDefaults"], backup["timerDefaults"]);
    assert!(after["lastUpdated"].as_str().unwrap() > before["lastUpdated"].as_str().unwrap());
}

#[tokio::test]
async fn test_document_survives_restart() {
    let test = create_test_app();
    let (_, saved) = post(&test.app, "/api/trucks", fleet_body()).await;

    let config = EnvironmentConfig {
        data_file: test.data_file(),
        static_dir: test.dir.path().join("public"),
        ..EnvironmentConfig::default()
    };
    let restarted = create_app(AppState::new(config));

    let (_, _, document) = get(&restarted, "/api/trucks").await;
    assert_eq!(document["lastUpdated"], saved["lastUpdated"]);

    let (_, again) = post(&restarted, "/api/trucks", fleet_body()).await;
    assert!(again["lastUpdated"].as_str().unwrap() > saved["lastUpdated"].as_str().unwrap());
}
