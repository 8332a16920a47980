//! Comment API integration tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;

use crate::common::*;

#[tokio::test]
async fn test_comment_lifecycle() {
    let app = TestApp::new();
    let author = student(&app, "author").await;
    let reader = student(&app, "reader").await;
    let post_id = create_post(&app, &author, json!({"content": "discuss"})).await;
    let comments_path = format!("/api/v1/comments/post/{post_id}");

    let created = app
        .post(&comments_path, reader.token(), json!({"text": " Nice post "}))
        .await;
    assert_envelope!(created, StatusCode::CREATED, "Comment created successfully");
    assert_eq!(created.data()["text"], "Nice post");
    assert_eq!(created.data()["owner"]["username"], "reader");
    let comment_id = id_of(created.data());

    let post = app.get(&format!("/api/v1/posts/{post_id}"), None).await;
    assert_eq!(post.data()["commentsCount"], 1);

    let listed = app.get(&comments_path, None).await;
    assert_envelope!(listed, StatusCode::OK, "Comments fetched successfully");
    assert_eq!(listed.data()["pagination"]["totalItems"], 1);

    let comment_path = format!("/api/v1/comments/{comment_id}");
    let forbidden = app
        .put(&comment_path, author.token(), json!({"text": "edited"}))
        .await;
    assert_envelope!(
        forbidden,
        StatusCode::FORBIDDEN,
        "You can only update your own comments"
    );

    let edited = app
        .put(&comment_path, reader.token(), json!({"text": "Great post"}))
        .await;
    assert_envelope!(edited, StatusCode::OK, "Comment updated successfully");
    assert_eq!(edited.data()["text"], "Great post");

    let deleted = app.delete(&comment_path, reader.token()).await;
    assert_envelope!(deleted, StatusCode::OK, "Comment deleted successfully");

    let again = app.delete(&comment_path, reader.token()).await;
    assert_envelope!(again, StatusCode::NOT_FOUND, "Comment not found");
}

#[tokio::test]
async fn test_comment_requires_text_and_existing_post() {
    let app = TestApp::new();
    let user = student(&app, "talker").await;
    let post_id = create_post(&app, &user, json!({"content": "x"})).await;

    let blank = app
        .post(
            &format!("/api/v1/comments/post/{post_id}"),
            user.token(),
            json!({"text": ""}),
        )
        .await;
    assert_envelope!(blank, StatusCode::BAD_REQUEST, "Comment text is required");

    let orphan = app
        .post(
            &format!("/api/v1/comments/post/{}", Uuid::new_v4()),
            user.token(),
            json!({"text": "hello?"}),
        )
        .await;
    assert_envelope!(orphan, StatusCode::NOT_FOUND, "Post not found");
}

#[tokio::test]
async fn test_deleting_post_removes_its_comments() {
    let app = TestApp::new();
    let user = student(&app, "cleaner").await;
    let post_id = create_post(&app, &user, json!({"content": "temporary"})).await;
    let created = app
        .post(
            &format!("/api/v1/comments/post/{post_id}"),
            user.token(),
            json!({"text": "soon gone"}),
        )
        .await;
    let comment_id = id_of(created.data());

    app.delete(&format!("/api/v1/posts/{post_id}"), user.token())
        .await;

    let listed = app
        .get(&format!("/api/v1/comments/post/{post_id}"), None)
        .await;
    assert_eq!(listed.data()["pagination"]["totalItems"], 0);

    let edit = app
        .put(
            &format!("/api/v1/comments/{comment_id}"),
            user.token(),
            json!({"text": "still here?"}),
        )
        .await;
    assert_eq!(edit.status, StatusCode::NOT_FOUND);
}
