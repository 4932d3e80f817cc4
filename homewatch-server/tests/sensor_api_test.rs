use std::collections::HashMap;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::json;
use time::OffsetDateTime;
use tower::ServiceExt;

mod common;
use common::mock_app::{MockApp, MockOptions};

fn now() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_ingest_records_a_reading_for_a_known_device() {
    let app = MockApp::new().await;
    app.create_test_device("sensor-01", "Living Room").await;

    let request = Request::builder()
        .uri("/api/sensors/data")
        .method(Method::POST)
        .header("Content-Type", "application/json")
        .body(Body::from(
            json!({
                "device_id": "sensor-01",
                "degrees_celsius": 21.5,
                "humidity_percent": 40.0,
                "diagnostics": {"rssi": -52},
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let reading = body_json(response).await;
    assert_eq!(reading["device_id"], "sensor-01");
    assert_eq!(reading["degrees_celsius"], 21.5);
    assert_eq!(reading["diagnostics"]["rssi"], -52);

    let latest = app
        .telemetry_repository
        .find_latest_by_device("sensor-01")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.record_id, reading["record_id"].as_str().unwrap());
}

#[tokio::test]
async fn test_ingest_rejects_unknown_devices() {
    let app = MockApp::new().await;

    let request = Request::builder()
        .uri("/api/sensors/data")
        .method(Method::POST)
        .header("Content-Type", "application/json")
        .body(Body::from(
            json!({
                "device_id": "ghost",
                "degrees_celsius": 21.5,
                "humidity_percent": 40.0,
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_ingest_is_gated_by_the_feature_flag() {
    let app = MockApp::with_options(MockOptions {
        flags: HashMap::new(),
        ..MockOptions::default()
    })
    .await;
    app.create_test_device("sensor-01", "Living Room").await;

    let request = Request::builder()
        .uri("/api/sensors/data")
        .method(Method::POST)
        .header("Content-Type", "application/json")
        .body(Body::from(
            json!({
                "device_id": "sensor-01",
                "degrees_celsius": 21.5,
                "humidity_percent": 40.0,
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_data_endpoint_windows_readings_per_device() {
    let app = MockApp::new().await;
    app.create_test_device("sensor-01", "Living Room").await;

    let day = 86_400;
    app.insert_telemetry("sensor-01", now() - 10 * day).await;
    app.insert_telemetry("sensor-01", now() - 2 * day).await;
    app.insert_telemetry("sensor-01", now() - 10).await;

    let request = Request::builder()
        .uri("/api/sensors/data?days_back=7")
        .method(Method::GET)
        .body(Body::empty())
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let telemetry = body_json(response).await;
    assert_eq!(telemetry[0]["device_id"], "sensor-01");
    // The reading outside the window is excluded
    assert_eq!(telemetry[0]["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_info_endpoint_reports_health_and_latest_reading() {
    let app = MockApp::new().await;
    app.create_test_device("sensor-01", "Living Room").await;
    app.insert_telemetry("sensor-01", now() - 10).await;

    let request = Request::builder()
        .uri("/api/sensors/info")
        .method(Method::GET)
        .body(Body::empty())
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let info = body_json(response).await;
    assert_eq!(info[0]["device_name"], "Living Room");
    assert_eq!(info[0]["health"]["status"], "healthy");
    assert_eq!(info[0]["data"]["device_id"], "sensor-01");
}

#[tokio::test]
async fn test_device_listing_sorts_by_name() {
    let app = MockApp::new().await;
    app.create_test_device("sensor-02", "Zeta Room").await;
    app.create_test_device("sensor-01", "Alpha Room").await;

    let request = Request::builder()
        .uri("/api/devices")
        .method(Method::GET)
        .body(Body::empty())
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let devices = body_json(response).await;
    assert_eq!(devices[0]["device_name"], "Alpha Room");
    assert_eq!(devices[1]["device_name"], "Zeta Room");
}

#[tokio::test]
async fn test_create_device_rejects_duplicates_and_blank_names() {
    let app = MockApp::new().await;

    let request = Request::builder()
        .uri("/api/devices")
        .method(Method::POST)
        .header("Content-Type", "application/json")
        .body(Body::from(json!({"device_name": "Living Room"}).to_string()))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let request = Request::builder()
        .uri("/api/devices")
        .method(Method::POST)
        .header("Content-Type", "application/json")
        .body(Body::from(json!({"device_name": "Living Room"}).to_string()))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let request = Request::builder()
        .uri("/api/devices")
        .method(Method::POST)
        .header("Content-Type", "application/json")
        .body(Body::from(json!({"device_name": "  "}).to_string()))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_probes_answer_ok() {
    let app = MockApp::new().await;

    for uri in ["/api/health/alive", "/api/health/ready"] {
        let request = Request::builder()
            .uri(uri)
            .method(Method::GET)
            .body(Body::empty())
            .unwrap();

        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let probe = body_json(response).await;
        assert_eq!(probe["status"], "ok");
    }
}

#[tokio::test]
async fn test_purge_endpoint_applies_the_configured_retention() {
    let app = MockApp::new().await;
    app.create_test_device("sensor-01", "Living Room").await;

    let day = 86_400;
    app.insert_telemetry("sensor-01", now() - 40 * day).await;
    app.insert_telemetry("sensor-01", now() - 10).await;

    let request = Request::builder()
        .uri("/api/sensors/purge")
        .method(Method::POST)
        .body(Body::empty())
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let result = body_json(response).await;
    assert_eq!(result["deleted"], 1);
}
