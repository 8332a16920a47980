//! Event API integration tests

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;

use crate::common::*;

async fn create_event(app: &TestApp, user: &TestUser, title: &str, days_from_now: i64) -> Uuid {
    let date = Utc::now() + Duration::days(days_from_now);
    let response = app
        .post(
            "/api/v1/events/create",
            user.token(),
            json!({"title": title, "date": date.to_rfc3339(), "location": "Main Hall"}),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    id_of(response.data())
}

#[tokio::test]
async fn test_create_event_requires_title_and_date() {
    let app = TestApp::new();
    let user = student(&app, "planner").await;

    let response = app
        .post(
            "/api/v1/events/create",
            user.token(),
            json!({"title": "No date"}),
        )
        .await;
    assert_envelope!(response, StatusCode::BAD_REQUEST, "Title and date are required");
}

#[tokio::test]
async fn test_create_event_accepts_datetime_local_value() {
    let app = TestApp::new();
    let user = student(&app, "planner").await;

    let response = app
        .post(
            "/api/v1/events/create",
            user.token(),
            json!({"title": "Hackathon", "date": "2030-05-01T10:00"}),
        )
        .await;
    assert_envelope!(response, StatusCode::CREATED, "Event created successfully");
    let date = response.data()["date"].as_str().unwrap_or_default();
    assert!(date.starts_with("2030-05-01T10:00:00"), "{date}");

    let id = id_of(response.data());
    let response = app
        .put(
            &format!("/api/v1/events/{id}"),
            user.token(),
            json!({"date": "2030-06-02T18:30:15"}),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    let date = response.data()["date"].as_str().unwrap_or_default();
    assert!(date.starts_with("2030-06-02T18:30:15"), "{date}");

    let response = app
        .post(
            "/api/v1/events/create",
            user.token(),
            json!({"title": "Someday", "date": "whenever"}),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_events_sorted_by_date_and_upcoming_excludes_past() {
    let app = TestApp::new();
    let user = student(&app, "organizer").await;
    create_event(&app, &user, "Later", 10).await;
    create_event(&app, &user, "Past", -3).await;
    create_event(&app, &user, "Soon", 1).await;

    let all = app.get("/api/v1/events/all", None).await;
    assert_envelope!(all, StatusCode::OK, "Events fetched successfully");
    let titles: Vec<&str> = all.data()["items"]
        .as_array()
        .map(|items| items.iter().filter_map(|e| e["title"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(titles, vec!["Past", "Soon", "Later"]);

    let upcoming = app.get("/api/v1/events/upcoming", None).await;
    assert_envelope!(upcoming, StatusCode::OK, "Upcoming events fetched successfully");
    let titles: Vec<&str> = upcoming
        .data()
        .as_array()
        .map(|items| items.iter().filter_map(|e| e["title"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(titles, vec!["Soon", "Later"]);
}

#[tokio::test]
async fn test_attendance_toggles() {
    let app = TestApp::new();
    let host = student(&app, "host").await;
    let guest = student(&app, "guest").await;
    let event_id = create_event(&app, &host, "Meetup", 2).await;
    let path = format!("/api/v1/events/{event_id}/attend");

    let attend = app.post(&path, guest.token(), json!({})).await;
    assert_envelope!(attend, StatusCode::OK, "Event attendance recorded");
    assert_eq!(attend.data(), &json!({"attending": true, "attendeesCount": 1}));

    let event = app.get(&format!("/api/v1/events/{event_id}"), None).await;
    assert_eq!(event.data()["attendees"][0]["username"], "guest");

    let leave = app.post(&path, guest.token(), json!({})).await;
    assert_envelope!(leave, StatusCode::OK, "Event unattendance recorded");
    assert_eq!(leave.data()["attendeesCount"], 0);
}

#[tokio::test]
async fn test_update_and_delete_event_permissions() {
    let app = TestApp::new();
    let host = register(&app, "prof", "Faculty").await;
    let stranger = student(&app, "stranger").await;
    let event_id = create_event(&app, &host, "Lecture", 5).await;
    let path = format!("/api/v1/events/{event_id}");

    let forbidden = app
        .put(&path, stranger.token(), json!({"title": "Party"}))
        .await;
    assert_envelope!(
        forbidden,
        StatusCode::FORBIDDEN,
        "You can only update your own events"
    );

    let updated = app
        .put(&path, host.token(), json!({"location": "Room 101"}))
        .await;
    assert_envelope!(updated, StatusCode::OK, "Event updated successfully");
    assert_eq!(updated.data()["location"], "Room 101");
    assert_eq!(updated.data()["title"], "Lecture");

    let denied = app.delete(&path, stranger.token()).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let deleted = app.delete(&path, host.token()).await;
    assert_envelope!(deleted, StatusCode::OK, "Event deleted successfully");

    let missing = app.get(&path, None).await;
    assert_envelope!(missing, StatusCode::NOT_FOUND, "Event not found");
}
