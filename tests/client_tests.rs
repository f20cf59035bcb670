use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dispatch_board::client::{FleetBackend, HttpFleetBackend};
use dispatch_board::models::{FleetState, UnitStatus};
use dispatch_board::utils::errors::SyncError;

fn backend(server: &MockServer) -> HttpFleetBackend {
    HttpFleetBackend::new(&format!("{}/", server.uri()), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_fetch_fleet_parses_document() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/trucks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "trucks": [
                { "id": "Med-1", "name": "Med-1", "location": "City // HQ", "status": "atDestination", "timerEndTime": 1700000000000i64 }
            ],
            "timerDefaults": { "atDestination": 20, "logistics": 10 },
            "lastUpdated": "2024-03-01T12:00:00.250Z"
        })))
        .mount(&server)
        .await;

    let document = backend(&server).fetch_fleet().await.unwrap();
    assert_eq!(document.trucks.len(), 1);
    assert_eq!(document.trucks[0].status, UnitStatus::AtDestination);
    assert_eq!(document.last_updated.timestamp_millis() % 1000, 250);
}

#[tokio::test]
async fn test_save_fleet_posts_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/trucks"))
        .and(body_partial_json(json!({
            "timerDefaults": { "atDestination": 20, "logistics": 10 },
            "clientTimestamp": 42
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Truck data saved successfully",
            "lastUpdated": "2024-03-01T12:00:01.000Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let snapshot = FleetState::default().snapshot(42);
    let response = backend(&server).save_fleet(&snapshot).await.unwrap();
    assert!(response.success);
    assert_eq!(response.last_updated.to_rfc3339(), "2024-03-01T12:00:01+00:00");
}

#[tokio::test]
async fn test_non_success_status_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/trucks"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "Internal Server Error" })))
        .mount(&server)
        .await;

    let result = backend(&server).fetch_fleet().await;
    assert!(matches!(result, Err(SyncError::Status(500))));
}

#[tokio::test]
async fn test_malformed_body_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/trucks"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let result = backend(&server).fetch_fleet().await;
    assert!(matches!(result, Err(SyncError::Malformed(_))));
}

#[tokio::test]
async fn test_unreachable_server_is_a_network_error() {
    // Puerto reservado y liberado: nadie escucha
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let backend =
        HttpFleetBackend::new(&format!("http://127.0.0.1:{}", port), Duration::from_secs(2)).unwrap();
    let result = backend.fetch_fleet().await;
    assert!(matches!(result, Err(SyncError::Network(_))));
}

#[tokio::test]
async fn test_server_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "online",
            "timestamp": "2024-03-01T12:00:00.000Z",
            "uptime": 12.5
        })))
        .mount(&server)
        .await;

    let status = backend(&server).server_status().await.unwrap();
    assert_eq!(status.status, "online");
    assert_eq!(status.uptime, 12.5);
}
