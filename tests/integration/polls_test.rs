//! Poll API integration tests

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::common::*;

async fn create_poll(app: &TestApp, user: &TestUser, body: Value) -> Uuid {
    let response = app.post("/api/v1/polls/create", user.token(), body).await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    id_of(response.data())
}

fn vote_counts(poll: &Value) -> Vec<u64> {
    poll["options"]
        .as_array()
        .map(|options| {
            options
                .iter()
                .filter_map(|option| option["voteCount"].as_u64())
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn test_create_poll_validation() {
    let app = TestApp::new();
    let user = student(&app, "pollster").await;

    let no_question = app
        .post(
            "/api/v1/polls/create",
            user.token(),
            json!({"options": ["a", "b"]}),
        )
        .await;
    assert_envelope!(no_question, StatusCode::BAD_REQUEST, "Poll question is required");

    let one_option = app
        .post(
            "/api/v1/polls/create",
            user.token(),
            json!({"question": "Pizza?", "options": ["yes", "  "]}),
        )
        .await;
    assert_envelope!(
        one_option,
        StatusCode::BAD_REQUEST,
        "At least two options are required"
    );

    let created = app
        .post(
            "/api/v1/polls/create",
            user.token(),
            json!({"question": "Pizza?", "options": ["yes", "no"]}),
        )
        .await;
    assert_envelope!(created, StatusCode::CREATED, "Poll created successfully");
    assert_eq!(created.data()["totalVotes"], 0);
    assert_eq!(created.data()["expired"], false);
    assert_eq!(created.data()["createdBy"]["username"], "pollster");
}

#[tokio::test]
async fn test_vote_moves_between_options() {
    let app = TestApp::new();
    let owner = student(&app, "asker").await;
    let voter = student(&app, "voter").await;
    let poll_id = create_poll(
        &app,
        &owner,
        json!({"question": "Best day?", "options": ["Mon", "Fri", "Sun"]}),
    )
    .await;
    let path = format!("/api/v1/polls/{poll_id}/vote");

    let first = app.post(&path, voter.token(), json!({"optionIndex": 1})).await;
    assert_envelope!(first, StatusCode::OK, "Vote recorded successfully");
    assert_eq!(vote_counts(first.data()), vec![0, 1, 0]);

    let changed = app.post(&path, voter.token(), json!({"optionIndex": 2})).await;
    assert_eq!(vote_counts(changed.data()), vec![0, 0, 1]);
    assert_eq!(changed.data()["totalVotes"], 1);

    app.post(&path, owner.token(), json!({"optionIndex": 2})).await;
    let poll = app.get(&format!("/api/v1/polls/{poll_id}"), None).await;
    assert_eq!(vote_counts(poll.data()), vec![0, 0, 2]);
}

#[tokio::test]
async fn test_vote_rejections() {
    let app = TestApp::new();
    let user = student(&app, "picky").await;
    let poll_id = create_poll(
        &app,
        &user,
        json!({"question": "Q?", "options": ["a", "b"]}),
    )
    .await;
    let path = format!("/api/v1/polls/{poll_id}/vote");

    let missing = app.post(&path, user.token(), json!({})).await;
    assert_envelope!(missing, StatusCode::BAD_REQUEST, "Option index is required");

    let out_of_range = app.post(&path, user.token(), json!({"optionIndex": 2})).await;
    assert_envelope!(out_of_range, StatusCode::BAD_REQUEST, "Invalid option index");

    let negative = app.post(&path, user.token(), json!({"optionIndex": -1})).await;
    assert_envelope!(negative, StatusCode::BAD_REQUEST, "Invalid option index");

    let unknown = app
        .post(
            &format!("/api/v1/polls/{}/vote", Uuid::new_v4()),
            user.token(),
            json!({"optionIndex": 0}),
        )
        .await;
    assert_envelope!(unknown, StatusCode::NOT_FOUND, "Poll not found");
}

#[tokio::test]
async fn test_expired_poll_rejects_votes_and_is_not_active() {
    let app = TestApp::new();
    let user = student(&app, "late").await;
    let expired_at = Utc::now() - Duration::hours(1);
    let expired_id = create_poll(
        &app,
        &user,
        json!({"question": "Old?", "options": ["a", "b"], "expiresAt": expired_at.to_rfc3339()}),
    )
    .await;
    let open_id = create_poll(
        &app,
        &user,
        json!({"question": "New?", "options": ["a", "b"]}),
    )
    .await;

    let vote = app
        .post(
            &format!("/api/v1/polls/{expired_id}/vote"),
            user.token(),
            json!({"optionIndex": 0}),
        )
        .await;
    assert_envelope!(vote, StatusCode::BAD_REQUEST, "This poll has expired");

    let expired = app.get(&format!("/api/v1/polls/{expired_id}"), None).await;
    assert_eq!(expired.data()["expired"], true);

    let active = app.get("/api/v1/polls/active", None).await;
    assert_envelope!(active, StatusCode::OK, "Active polls fetched successfully");
    let ids: Vec<&str> = active
        .data()
        .as_array()
        .map(|polls| polls.iter().filter_map(|poll| poll["id"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(ids, vec![open_id.to_string().as_str()]);
}

#[tokio::test]
async fn test_options_locked_after_votes() {
    let app = TestApp::new();
    let owner = student(&app, "locker").await;
    let poll_id = create_poll(
        &app,
        &owner,
        json!({"question": "Lunch?", "options": ["rice", "noodles"]}),
    )
    .await;
    let path = format!("/api/v1/polls/{poll_id}");

    let reworded = app
        .put(
            &path,
            owner.token(),
            json!({"question": "Dinner?", "options": ["soup", "salad", "stew"]}),
        )
        .await;
    assert_envelope!(reworded, StatusCode::OK, "Poll updated successfully");
    assert_eq!(reworded.data()["question"], "Dinner?");
    assert_eq!(vote_counts(reworded.data()).len(), 3);

    app.post(
        &format!("{path}/vote"),
        owner.token(),
        json!({"optionIndex": 0}),
    )
    .await;

    let locked = app
        .put(&path, owner.token(), json!({"options": ["x", "y"]}))
        .await;
    assert_envelope!(
        locked,
        StatusCode::BAD_REQUEST,
        "Cannot modify poll options after votes have been cast"
    );

    let question_only = app
        .put(&path, owner.token(), json!({"question": "Supper?"}))
        .await;
    assert_eq!(question_only.status, StatusCode::OK);
    assert_eq!(vote_counts(question_only.data()), vec![1, 0, 0]);
}

#[tokio::test]
async fn test_delete_poll_owner_only() {
    let app = TestApp::new();
    let owner = student(&app, "maker").await;
    let other = student(&app, "meddler").await;
    let poll_id = create_poll(
        &app,
        &owner,
        json!({"question": "Keep?", "options": ["y", "n"]}),
    )
    .await;
    let path = format!("/api/v1/polls/{poll_id}");

    let denied = app.delete(&path, other.token()).await;
    assert_envelope!(
        denied,
        StatusCode::FORBIDDEN,
        "You can only delete your own polls"
    );

    let deleted = app.delete(&path, owner.token()).await;
    assert_envelope!(deleted, StatusCode::OK, "Poll deleted successfully");

    let all = app.get("/api/v1/polls/all", None).await;
    assert_eq!(all.data()["pagination"]["totalItems"], 0);
}
