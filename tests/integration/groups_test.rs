//! Group API integration tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;

use crate::common::*;

async fn create_group(app: &TestApp, user: &TestUser, name: &str) -> Uuid {
    let response = app
        .post(
            "/api/v1/groups/create",
            user.token(),
            json!({"name": name, "description": "A study group"}),
        )
        .await;
    assert_envelope!(response, StatusCode::CREATED, "Group created successfully");
    id_of(response.data())
}

#[tokio::test]
async fn test_creator_administers_and_joins() {
    let app = TestApp::new();
    let founder = student(&app, "founder").await;
    let group_id = create_group(&app, &founder, "Chess Club").await;

    let group = app.get(&format!("/api/v1/groups/{group_id}"), None).await;
    assert_envelope!(group, StatusCode::OK, "Group fetched successfully");
    assert_eq!(group.data()["admin"]["username"], "founder");
    assert_eq!(group.data()["membersCount"], 1);
    assert_eq!(group.data()["members"][0]["id"], founder.id.to_string());
}

#[tokio::test]
async fn test_group_name_required() {
    let app = TestApp::new();
    let user = student(&app, "nameless").await;
    let response = app
        .post("/api/v1/groups/create", user.token(), json!({"name": " "}))
        .await;
    assert_envelope!(response, StatusCode::BAD_REQUEST, "Group name is required");
}

#[tokio::test]
async fn test_membership_toggles() {
    let app = TestApp::new();
    let founder = student(&app, "captain").await;
    let joiner = student(&app, "joiner").await;
    let group_id = create_group(&app, &founder, "Robotics").await;
    let path = format!("/api/v1/groups/{group_id}/join");

    let joined = app.post(&path, joiner.token(), json!({})).await;
    assert_envelope!(joined, StatusCode::OK, "Joined group");
    assert_eq!(joined.data(), &json!({"member": true, "membersCount": 2}));

    let left = app.post(&path, joiner.token(), json!({})).await;
    assert_envelope!(left, StatusCode::OK, "Left group");
    assert_eq!(left.data()["membersCount"], 1);

    let missing = app
        .post(
            &format!("/api/v1/groups/{}/join", Uuid::new_v4()),
            joiner.token(),
            json!({}),
        )
        .await;
    assert_envelope!(missing, StatusCode::NOT_FOUND, "Group not found");
}

#[tokio::test]
async fn test_only_group_admin_or_site_admin_may_modify() {
    let app = TestApp::new();
    let founder = student(&app, "chair").await;
    let member = student(&app, "member").await;
    let root = admin(&app, "siteadmin").await;
    let group_id = create_group(&app, &founder, "Debate").await;
    let path = format!("/api/v1/groups/{group_id}");

    let denied = app.put(&path, member.token(), json!({"name": "Takeover"})).await;
    assert_envelope!(
        denied,
        StatusCode::FORBIDDEN,
        "You can only update groups you administer"
    );

    let renamed = app
        .put(&path, founder.token(), json!({"name": "Debate Society"}))
        .await;
    assert_envelope!(renamed, StatusCode::OK, "Group updated successfully");
    assert_eq!(renamed.data()["name"], "Debate Society");
    assert_eq!(renamed.data()["description"], "A study group");

    let deleted = app.delete(&path, root.token()).await;
    assert_envelope!(deleted, StatusCode::OK, "Group deleted successfully");

    let listed = app.get("/api/v1/groups/all", None).await;
    assert_envelope!(listed, StatusCode::OK, "Groups fetched successfully");
    assert_eq!(listed.data()["pagination"]["totalItems"], 0);
}
