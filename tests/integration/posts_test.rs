//! Post API integration tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;

use crate::common::*;

#[tokio::test]
async fn test_create_post_with_comma_separated_tags() {
    let app = TestApp::new();
    let user = student(&app, "poster").await;

    let response = app
        .post(
            "/api/v1/posts/create",
            user.token(),
            json!({"title": "Hello", "content": "  First post  ", "tags": "rust, campus , ,news"}),
        )
        .await;

    assert_envelope!(response, StatusCode::CREATED, "Post created successfully");
    let data = response.data();
    assert_eq!(data["content"], "First post");
    assert_eq!(data["tags"], json!(["rust", "campus", "news"]));
    assert_eq!(data["owner"]["username"], "poster");
    assert_eq!(data["likesCount"], 0);
    assert_eq!(data["commentsCount"], 0);
}

#[tokio::test]
async fn test_create_post_requires_content() {
    let app = TestApp::new();
    let user = student(&app, "blank").await;

    let response = app
        .post("/api/v1/posts/create", user.token(), json!({"content": "   "}))
        .await;
    assert_envelope!(response, StatusCode::BAD_REQUEST, "Post content is required");

    let anonymous = app
        .post("/api/v1/posts/create", None, json!({"content": "hi"}))
        .await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_posts_newest_first_with_pagination() {
    let app = TestApp::new();
    let user = student(&app, "prolific").await;
    for n in 1..=3 {
        create_post(&app, &user, json!({"content": format!("post {n}")})).await;
    }

    let response = app.get("/api/v1/posts/all?page=1&limit=2", None).await;
    assert_envelope!(response, StatusCode::OK, "Posts fetched successfully");

    let data = response.data();
    assert_eq!(data["items"].as_array().map(Vec::len), Some(2));
    assert_eq!(data["items"][0]["content"], "post 3");
    assert_eq!(
        data["pagination"],
        json!({
            "currentPage": 1,
            "totalPages": 2,
            "totalItems": 3,
            "limit": 2,
            "hasNext": true,
            "hasPrev": false
        })
    );

    let last = app.get("/api/v1/posts/all?page=2&limit=2", None).await;
    assert_eq!(last.data()["items"][0]["content"], "post 1");
    assert_eq!(last.data()["pagination"]["hasNext"], false);
}

#[tokio::test]
async fn test_list_posts_ignores_garbage_pagination() {
    let app = TestApp::new();
    let response = app.get("/api/v1/posts/all?page=abc&limit=-1", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["pagination"]["currentPage"], 1);
    assert_eq!(response.data()["pagination"]["limit"], 10);
    assert_eq!(response.data()["pagination"]["totalPages"], 0);
}

#[tokio::test]
async fn test_user_and_tag_filters() {
    let app = TestApp::new();
    let alice = student(&app, "alice").await;
    let bob = student(&app, "bob").await;
    create_post(&app, &alice, json!({"content": "a1", "tags": ["events"]})).await;
    create_post(&app, &alice, json!({"content": "a2"})).await;
    create_post(&app, &bob, json!({"content": "b1", "tags": ["events", "sports"]})).await;

    let by_alice = app
        .get(&format!("/api/v1/posts/user/{}", alice.id), None)
        .await;
    assert_eq!(by_alice.data()["pagination"]["totalItems"], 2);

    let tagged = app.get("/api/v1/posts/tag/events", None).await;
    assert_eq!(tagged.data()["pagination"]["totalItems"], 2);
    assert_eq!(tagged.data()["items"][0]["content"], "b1");

    let sports = app.get("/api/v1/posts/tag/sports", None).await;
    assert_eq!(sports.data()["pagination"]["totalItems"], 1);
}

#[tokio::test]
async fn test_tag_filter_decodes_reserved_characters() {
    let app = TestApp::new();
    let author = student(&app, "author").await;
    create_post(&app, &author, json!({"content": "pointers", "tags": ["c/c++"]})).await;
    create_post(&app, &author, json!({"content": "traits", "tags": ["#rust"]})).await;

    let c = app.get("/api/v1/posts/tag/c%2Fc++", None).await;
    assert_eq!(c.data()["pagination"]["totalItems"], 1);
    assert_eq!(c.data()["items"][0]["content"], "pointers");

    let rust = app.get("/api/v1/posts/tag/%23rust", None).await;
    assert_eq!(rust.data()["pagination"]["totalItems"], 1);
    assert_eq!(rust.data()["items"][0]["content"], "traits");
}

#[tokio::test]
async fn test_get_missing_post() {
    let app = TestApp::new();
    let response = app
        .get(&format!("/api/v1/posts/{}", Uuid::new_v4()), None)
        .await;
    assert_envelope!(response, StatusCode::NOT_FOUND, "Post not found");
}

#[tokio::test]
async fn test_update_post_owner_only() {
    let app = TestApp::new();
    let owner = student(&app, "owner").await;
    let other = student(&app, "other").await;
    let post_id = create_post(&app, &owner, json!({"content": "draft", "tags": ["a"]})).await;
    let path = format!("/api/v1/posts/{post_id}");

    let forbidden = app.put(&path, other.token(), json!({"content": "hijack"})).await;
    assert_envelope!(
        forbidden,
        StatusCode::FORBIDDEN,
        "You can only update your own posts"
    );

    let updated = app.put(&path, owner.token(), json!({"content": "final"})).await;
    assert_envelope!(updated, StatusCode::OK, "Post updated successfully");
    assert_eq!(updated.data()["content"], "final");
    assert_eq!(updated.data()["tags"], json!(["a"]));
}

#[tokio::test]
async fn test_admin_may_delete_any_post() {
    let app = TestApp::new();
    let owner = student(&app, "writer").await;
    let root = admin(&app, "moderator").await;
    let post_id = create_post(&app, &owner, json!({"content": "spam"})).await;
    let path = format!("/api/v1/posts/{post_id}");

    let response = app.delete(&path, root.token()).await;
    assert_envelope!(response, StatusCode::OK, "Post deleted successfully");

    let gone = app.get(&path, None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_like_toggles() {
    let app = TestApp::new();
    let owner = student(&app, "liked").await;
    let fan = student(&app, "fan").await;
    let post_id = create_post(&app, &owner, json!({"content": "like me"})).await;
    let path = format!("/api/v1/posts/{post_id}/like");

    let liked = app.post(&path, fan.token(), json!({})).await;
    assert_envelope!(liked, StatusCode::OK, "Post liked");
    assert_eq!(liked.data()["isLiked"], true);
    assert_eq!(liked.data()["likesCount"], 1);

    let post = app.get(&format!("/api/v1/posts/{post_id}"), None).await;
    assert_eq!(post.data()["likes"], json!([fan.id.to_string()]));

    let unliked = app.post(&path, fan.token(), json!({})).await;
    assert_envelope!(unliked, StatusCode::OK, "Post unliked");
    assert_eq!(unliked.data()["likesCount"], 0);

    let missing = app
        .post(
            &format!("/api/v1/posts/{}/like", Uuid::new_v4()),
            fan.token(),
            json!({}),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}
