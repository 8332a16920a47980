//! User and content fixtures

use axum::http::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use super::app::TestApp;

pub const PASSWORD: &str = "secret-password";

/// A registered user with a live session
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub access_token: String,
    pub refresh_token: String,
}

impl TestUser {
    pub fn token(&self) -> Option<&str> {
        Some(&self.access_token)
    }
}

pub fn registration(username: &str, role: &str) -> Value {
    json!({
        "username": username,
        "email": format!("{username}@campus.edu"),
        "fullname": format!("{username} tester"),
        "password": PASSWORD,
        "department": "Computer Science",
        "role": role,
        "bio": "Here to learn"
    })
}

pub async fn register(app: &TestApp, username: &str, role: &str) -> TestUser {
    let response = app
        .post("/api/v1/user/register_user", None, registration(username, role))
        .await;
    assert_eq!(
        response.status,
        StatusCode::CREATED,
        "registration failed: {}",
        response.body
    );

    let data = response.data();
    TestUser {
        id: data["user"]["id"]
            .as_str()
            .and_then(|id| id.parse().ok())
            .expect("user id"),
        username: data["user"]["username"].as_str().unwrap_or_default().to_string(),
        email: data["user"]["email"].as_str().unwrap_or_default().to_string(),
        access_token: data["accessToken"].as_str().unwrap_or_default().to_string(),
        refresh_token: data["refreshToken"].as_str().unwrap_or_default().to_string(),
    }
}

pub async fn student(app: &TestApp, username: &str) -> TestUser {
    register(app, username, "Student").await
}

pub async fn admin(app: &TestApp, username: &str) -> TestUser {
    register(app, username, "Admin").await
}

/// Create a post and return its id
pub async fn create_post(app: &TestApp, user: &TestUser, body: Value) -> Uuid {
    let response = app.post("/api/v1/posts/create", user.token(), body).await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    id_of(response.data())
}

pub fn id_of(data: &Value) -> Uuid {
    data["id"]
        .as_str()
        .and_then(|id| id.parse().ok())
        .expect("record id")
}
