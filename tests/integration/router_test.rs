//! Top-level routes, fallbacks and request rejections

use axum::http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::*;

#[tokio::test]
async fn test_banner_and_health() {
    let app = TestApp::new();

    let banner = app.get("/", None).await;
    assert_eq!(banner.status, StatusCode::OK);
    assert_eq!(banner.body, json!("CampusConnect Backend API is running"));

    let health = app.get("/health", None).await;
    assert_envelope!(health, StatusCode::OK, "Server is healthy");
    assert_eq!(health.data(), &json!({"status": "ok"}));
    assert_eq!(health.body["success"], true);
}

#[tokio::test]
async fn test_ping() {
    let app = TestApp::new();
    let response = app.get("/api/v1/user/ping", None).await;
    assert_envelope!(response, StatusCode::OK, "pong");
}

#[tokio::test]
async fn test_unknown_route_uses_error_envelope() {
    let app = TestApp::new();
    let response = app.get("/api/v1/nowhere", None).await;

    assert_envelope!(response, StatusCode::NOT_FOUND, "Route not found");
    assert_eq!(
        response.body,
        json!({"success": false, "message": "Route not found", "errors": [], "data": null})
    );
}

#[tokio::test]
async fn test_wrong_method_uses_error_envelope() {
    let app = TestApp::new();

    let response = app.get("/api/v1/posts/create", None).await;
    assert_envelope!(response, StatusCode::METHOD_NOT_ALLOWED, "Method not allowed");
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["errors"], json!([]));

    let response = app.delete("/api/v1/posts/all", None).await;
    assert_envelope!(response, StatusCode::METHOD_NOT_ALLOWED, "Method not allowed");
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let app = TestApp::new();
    let response = app
        .send(Call::new(Method::POST, "/api/v1/user/login_user").raw_json("{not json"))
        .await;

    assert_envelope!(response, StatusCode::BAD_REQUEST, "Invalid JSON body");
    assert!(!response.body["errors"]
        .as_array()
        .map(Vec::is_empty)
        .unwrap_or(true));
}

#[tokio::test]
async fn test_invalid_path_id_is_rejected() {
    let app = TestApp::new();
    let response = app.get("/api/v1/posts/not-a-uuid", None).await;
    assert_envelope!(response, StatusCode::BAD_REQUEST, "Invalid path parameter");
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let app = TestApp::new();
    let user = student(&app, "verbose").await;
    let content = "x".repeat(60 * 1024);

    let response = app
        .post("/api/v1/posts/create", user.token(), json!({"content": content}))
        .await;
    assert!(response.status.is_client_error(), "{}", response.status);
    assert_eq!(response.body["success"], false);
}

#[tokio::test]
async fn test_cors_preflight_allows_configured_origin() {
    let app = TestApp::new();
    let response = app
        .send(
            Call::new(Method::OPTIONS, "/api/v1/posts/all")
                .header("origin", "http://localhost:5173")
                .header("access-control-request-method", "GET"),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response
            .headers
            .get("access-control-allow-origin")
            .and_then(|value| value.to_str().ok()),
        Some("http://localhost:5173")
    );
    assert_eq!(
        response
            .headers
            .get("access-control-allow-credentials")
            .and_then(|value| value.to_str().ok()),
        Some("true")
    );
}
