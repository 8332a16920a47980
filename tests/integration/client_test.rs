//! API client tests against a mock server
//!
//! Covers envelope decoding and the refresh-once-then-retry behaviour on 401.

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use campusconnect::client::{CampusClient, ClientError, Session};
use campusconnect::shared::config::ClientConfig;
use campusconnect::shared::models::TokenPair;

fn profile_json(id: Uuid) -> Value {
    json!({
        "id": id,
        "username": "mock",
        "email": "mock@campus.edu",
        "fullname": "Mock User",
        "bio": null,
        "avatar": "https://cdn/avatar.png",
        "coverImage": null,
        "department": "Physics",
        "role": "Student",
        "createdAt": "2025-01-01T00:00:00Z",
        "updatedAt": "2025-01-01T00:00:00Z"
    })
}

fn envelope(message: &str, data: Value) -> Value {
    json!({"success": true, "message": message, "data": data})
}

fn error_envelope(message: &str) -> Value {
    json!({"success": false, "message": message, "errors": [], "data": null})
}

fn client_with_tokens(server: &MockServer, access: &str, refresh: &str) -> CampusClient {
    let config = ClientConfig::builder()
        .base_url(format!("{}/api/v1", server.uri()))
        .build()
        .expect("valid config");
    let session = Session::with_tokens(TokenPair {
        access_token: access.to_string(),
        refresh_token: refresh.to_string(),
    });
    CampusClient::new(config, session)
}

#[tokio::test]
async fn test_decodes_success_envelope_with_bearer_token() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();
    Mock::given(method("GET"))
        .and(path("/api/v1/user/get_user_profile"))
        .and(header("authorization", "Bearer live-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope("User profile fetched successfully", profile_json(id))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_tokens(&server, "live-token", "refresh");
    let user = client.profile().await.expect("profile");

    assert_eq!(user.id, id);
    assert_eq!(user.username, "mock");
    assert_eq!(client.session().user().await.map(|u| u.id), Some(id));
}

#[tokio::test]
async fn test_expired_access_token_is_refreshed_once_and_retried() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/api/v1/user/get_user_profile"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401).set_body_json(error_envelope(
            "Invalid or expired access token",
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/user/refresh_access_token"))
        .and(body_json(json!({"refreshToken": "old-refresh"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            "Access token refreshed",
            json!({"accessToken": "fresh", "refreshToken": "new-refresh"}),
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/user/get_user_profile"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope("User profile fetched successfully", profile_json(id))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_tokens(&server, "stale", "old-refresh");
    let user = client.profile().await.expect("profile after refresh");

    assert_eq!(user.id, id);
    assert_eq!(client.session().access_token().await.as_deref(), Some("fresh"));
    assert_eq!(
        client.session().refresh_token().await.as_deref(),
        Some("new-refresh")
    );
}

#[tokio::test]
async fn test_failed_refresh_clears_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/posts/all"))
        .respond_with(ResponseTemplate::new(401).set_body_json(error_envelope(
            "Invalid or expired access token",
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/user/refresh_access_token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(error_envelope(
            "Refresh token is expired or used",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_tokens(&server, "stale", "reused");
    let result = client.all_posts(1, 10).await;

    assert_matches!(result, Err(ClientError::LoginRequired));
    assert!(!client.session().is_authenticated().await);
    assert_eq!(client.session().access_token().await, None);
}

#[tokio::test]
async fn test_second_unauthorized_after_refresh_requires_login() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/events/upcoming"))
        .respond_with(ResponseTemplate::new(401).set_body_json(error_envelope("User not found")))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/user/refresh_access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            "Access token refreshed",
            json!({"accessToken": "a2", "refreshToken": "r2"}),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_tokens(&server, "a1", "r1");
    let result = client.upcoming_events().await;

    assert_matches!(result, Err(ClientError::LoginRequired));
    assert_eq!(client.session().refresh_token().await, None);
}

#[tokio::test]
async fn test_login_failure_surfaces_server_message_without_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/user/login_user"))
        .and(body_json(json!({"email": "who@campus.edu", "password": "bad"})))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(error_envelope("Invalid email or password")),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/user/refresh_access_token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_with_tokens(&server, "a", "r");
    let err = client
        .login(" WHO@campus.edu ", "bad")
        .await
        .expect_err("login should fail");

    assert_matches!(
        &err,
        ClientError::Api { status: 401, message, .. } if message == "Invalid email or password"
    );
    assert_eq!(err.user_message(), "Invalid email or password");
}

#[tokio::test]
async fn test_error_envelope_and_plain_error_bodies() {
    let server = MockServer::start().await;
    let missing = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path(format!("/api/v1/polls/{missing}")))
        .respond_with(ResponseTemplate::new(404).set_body_json(error_envelope("Poll not found")))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/groups/all"))
        .respond_with(ResponseTemplate::new(502).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let client = client_with_tokens(&server, "a", "r");

    let not_found = client.poll(missing).await.expect_err("missing poll");
    assert_eq!(not_found.status(), Some(404));
    assert_eq!(not_found.user_message(), "Poll not found");

    let gateway = client.all_groups(1, 10).await.expect_err("bad gateway");
    assert_matches!(
        gateway,
        ClientError::Api { status: 502, ref message, .. } if message == "Bad Gateway"
    );
}

#[tokio::test]
async fn test_pagination_query_is_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/resources/all"))
        .and(wiremock::matchers::query_param("page", "2"))
        .and(wiremock::matchers::query_param("limit", "5"))
        .and(wiremock::matchers::query_param("search", "notes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            "Resources fetched successfully",
            json!({
                "items": [],
                "pagination": {
                    "currentPage": 2,
                    "totalPages": 1,
                    "totalItems": 3,
                    "limit": 5,
                    "hasNext": false,
                    "hasPrev": true
                }
            }),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_tokens(&server, "a", "r");
    let page = client
        .all_resources(2, 5, None, Some("notes"))
        .await
        .expect("resources");

    assert!(page.items.is_empty());
    assert_eq!(page.pagination.current_page, 2);
    assert!(page.pagination.has_prev);
}

#[tokio::test]
async fn test_tag_is_encoded_as_one_path_segment() {
    let server = MockServer::start().await;
    let empty_page = envelope(
        "Posts fetched successfully",
        json!({
            "items": [],
            "pagination": {
                "currentPage": 1,
                "totalPages": 0,
                "totalItems": 0,
                "limit": 10,
                "hasNext": false,
                "hasPrev": false
            }
        }),
    );

    for encoded in ["/api/v1/posts/tag/%23rust", "/api/v1/posts/tag/c%2Fc++"] {
        Mock::given(method("GET"))
            .and(path(encoded))
            .respond_with(ResponseTemplate::new(200).set_body_json(empty_page.clone()))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = client_with_tokens(&server, "a", "r");
    for tag in ["#rust", "c/c++"] {
        let page = client.posts_by_tag(tag, 1, 10).await.expect("tagged posts");
        assert!(page.items.is_empty());
    }
}
