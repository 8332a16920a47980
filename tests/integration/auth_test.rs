//! Authentication API integration tests
//!
//! Registration, login, token refresh and rotation, logout, profile and
//! admin user management.

use axum::http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::*;

#[tokio::test]
async fn test_register_success() {
    let app = TestApp::new();
    let response = app
        .post("/api/v1/user/register_user", None, registration("Ada", "Student"))
        .await;

    assert_envelope!(response, StatusCode::CREATED, "User registered successfully");
    let data = response.data();
    assert_eq!(data["user"]["username"], "ada");
    assert_eq!(data["user"]["email"], "ada@campus.edu");
    assert_eq!(data["user"]["role"], "Student");
    assert!(data["user"].get("passwordHash").is_none());
    assert!(data["accessToken"].as_str().is_some_and(|t| !t.is_empty()));
    assert!(data["refreshToken"].as_str().is_some_and(|t| !t.is_empty()));

    let cookies = response.cookies();
    assert_eq!(cookies.len(), 2);
    assert!(cookies.iter().any(|c| c.starts_with("accessToken=")));
    assert!(cookies.iter().all(|c| c.contains("HttpOnly")));
}

#[tokio::test]
async fn test_register_requires_all_fields() {
    let app = TestApp::new();
    let response = app
        .post(
            "/api/v1/user/register_user",
            None,
            json!({"username": "bob", "email": "bob@campus.edu", "password": "pw"}),
        )
        .await;

    assert_envelope!(
        response,
        StatusCode::BAD_REQUEST,
        "All fields including role are required"
    );
    assert_eq!(response.body["success"], false);
    assert!(response.data().is_null());
}

#[tokio::test]
async fn test_register_rejects_unknown_role() {
    let app = TestApp::new();
    let response = app
        .post("/api/v1/user/register_user", None, registration("eve", "Janitor"))
        .await;
    assert_envelope!(response, StatusCode::BAD_REQUEST, "Invalid role selected");
}

#[tokio::test]
async fn test_register_requires_bio_for_students_and_faculty() {
    let app = TestApp::new();

    let mut body = registration("sam", "Student");
    body["bio"] = json!("   ");
    let response = app.post("/api/v1/user/register_user", None, body).await;
    assert_envelope!(response, StatusCode::BAD_REQUEST, "Bio is required for Students");

    let mut body = registration("prof", "Faculty");
    if let Some(fields) = body.as_object_mut() {
        fields.remove("bio");
    }
    let response = app.post("/api/v1/user/register_user", None, body).await;
    assert_envelope!(
        response,
        StatusCode::BAD_REQUEST,
        "Faculty must add bio/qualification"
    );

    let mut body = registration("root", "Admin");
    if let Some(fields) = body.as_object_mut() {
        fields.remove("bio");
    }
    let response = app.post("/api/v1/user/register_user", None, body).await;
    assert_eq!(response.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_register_rejects_email_without_at() {
    let app = TestApp::new();
    let mut body = registration("nomail", "Student");
    body["email"] = json!("nomail.campus.edu");
    let response = app.post("/api/v1/user/register_user", None, body).await;
    assert_envelope!(response, StatusCode::BAD_REQUEST, "Invalid email format");
}

#[tokio::test]
async fn test_register_duplicates_rejected() {
    let app = TestApp::new();
    student(&app, "dup").await;

    let mut same_email = registration("other", "Student");
    same_email["email"] = json!("DUP@campus.edu");
    let response = app.post("/api/v1/user/register_user", None, same_email).await;
    assert_envelope!(
        response,
        StatusCode::BAD_REQUEST,
        "User already exists with this email"
    );

    let mut same_username = registration("DUP", "Student");
    same_username["email"] = json!("fresh@campus.edu");
    let response = app
        .post("/api/v1/user/register_user", None, same_username)
        .await;
    assert_envelope!(
        response,
        StatusCode::BAD_REQUEST,
        "User already exists with this username"
    );
}

#[tokio::test]
async fn test_login_success_message_names_role() {
    let app = TestApp::new();
    register(&app, "fac", "Faculty").await;

    let response = app
        .post(
            "/api/v1/user/login_user",
            None,
            json!({"email": "  FAC@campus.edu ", "password": PASSWORD}),
        )
        .await;

    assert_envelope!(response, StatusCode::OK, "Faculty logged in successfully");
    assert_eq!(response.data()["user"]["username"], "fac");
    assert_eq!(response.cookies().len(), 2);
}

#[tokio::test]
async fn test_login_wrong_password_and_unknown_email() {
    let app = TestApp::new();
    student(&app, "carol").await;

    let wrong = app
        .post(
            "/api/v1/user/login_user",
            None,
            json!({"email": "carol@campus.edu", "password": "nope"}),
        )
        .await;
    assert_envelope!(wrong, StatusCode::UNAUTHORIZED, "Invalid email or password");

    let unknown = app
        .post(
            "/api/v1/user/login_user",
            None,
            json!({"email": "ghost@campus.edu", "password": PASSWORD}),
        )
        .await;
    assert_envelope!(unknown, StatusCode::UNAUTHORIZED, "Invalid email or password");
}

#[tokio::test]
async fn test_login_requires_both_fields() {
    let app = TestApp::new();
    let response = app
        .post("/api/v1/user/login_user", None, json!({"email": "x@campus.edu"}))
        .await;
    assert_envelope!(
        response,
        StatusCode::BAD_REQUEST,
        "Please provide both email and password"
    );
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let app = TestApp::new();

    let missing = app.get("/api/v1/user/get_user_profile", None).await;
    assert_envelope!(
        missing,
        StatusCode::UNAUTHORIZED,
        "Access Token is required for Authorization"
    );

    let garbage = app
        .get("/api/v1/user/get_user_profile", Some("not-a-jwt"))
        .await;
    assert_envelope!(
        garbage,
        StatusCode::UNAUTHORIZED,
        "Invalid or expired access token"
    );
}

#[tokio::test]
async fn test_profile_via_bearer_and_cookie() {
    let app = TestApp::new();
    let user = student(&app, "dana").await;

    let bearer = app.get("/api/v1/user/get_user_profile", user.token()).await;
    assert_eq!(bearer.status, StatusCode::OK);
    assert_eq!(bearer.data()["email"], "dana@campus.edu");

    let cookie = app
        .send(
            Call::new(Method::GET, "/api/v1/user/get_user_profile")
                .header("cookie", &format!("accessToken={}", user.access_token)),
        )
        .await;
    assert_eq!(cookie.status, StatusCode::OK);
    assert_eq!(cookie.data()["id"], user.id.to_string());
}

#[tokio::test]
async fn test_refresh_rotates_tokens_and_rejects_reuse() {
    let app = TestApp::new();
    let user = student(&app, "erin").await;

    let first = app
        .post(
            "/api/v1/user/refresh_access_token",
            None,
            json!({"refreshToken": user.refresh_token}),
        )
        .await;
    assert_eq!(first.status, StatusCode::OK, "{}", first.body);
    let rotated = first.data()["refreshToken"].as_str().unwrap().to_string();
    assert_ne!(rotated, user.refresh_token);
    assert_eq!(first.cookies().len(), 2);

    let reuse = app
        .post(
            "/api/v1/user/refresh_access_token",
            None,
            json!({"refreshToken": user.refresh_token}),
        )
        .await;
    assert_envelope!(
        reuse,
        StatusCode::UNAUTHORIZED,
        "Refresh token is expired or used"
    );

    let via_cookie = app
        .send(
            Call::new(Method::GET, "/api/v1/user/refresh_access_token")
                .header("cookie", &format!("refreshToken={rotated}")),
        )
        .await;
    assert_eq!(via_cookie.status, StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_without_token() {
    let app = TestApp::new();
    let response = app.get("/api/v1/user/refresh_access_token", None).await;
    assert_envelope!(response, StatusCode::UNAUTHORIZED, "Refresh token not found");

    let forged = app
        .post(
            "/api/v1/user/refresh_access_token",
            None,
            json!({"refreshToken": "forged"}),
        )
        .await;
    assert_envelope!(
        forged,
        StatusCode::UNAUTHORIZED,
        "Invalid or expired refresh token"
    );
}

#[tokio::test]
async fn test_logout_invalidates_refresh_token() {
    let app = TestApp::new();
    let user = student(&app, "fred").await;

    let response = app.get("/api/v1/user/logout_user", user.token()).await;
    assert_envelope!(response, StatusCode::OK, "User logged out successfully");
    assert!(response.cookies().iter().all(|c| c.contains("Max-Age=0")));

    let refresh = app
        .post(
            "/api/v1/user/refresh_access_token",
            None,
            json!({"refreshToken": user.refresh_token}),
        )
        .await;
    assert_eq!(refresh.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_profile_is_partial() {
    let app = TestApp::new();
    let user = student(&app, "gina").await;

    let response = app
        .put(
            "/api/v1/user/update_user_profile",
            user.token(),
            json!({"fullname": "Gina Updated", "coverImage": "https://cdn/cover.png"}),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["fullname"], "Gina Updated");
    assert_eq!(response.data()["coverImage"], "https://cdn/cover.png");
    assert_eq!(response.data()["bio"], "Here to learn");
}

#[tokio::test]
async fn test_change_password() {
    let app = TestApp::new();
    let user = student(&app, "hank").await;

    let missing = app
        .put(
            "/api/v1/user/change_password",
            user.token(),
            json!({"oldPassword": PASSWORD}),
        )
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);

    let wrong = app
        .put(
            "/api/v1/user/change_password",
            user.token(),
            json!({"oldPassword": "wrong", "newPassword": "next-password"}),
        )
        .await;
    assert_envelope!(wrong, StatusCode::BAD_REQUEST, "Old password is incorrect");

    let ok = app
        .put(
            "/api/v1/user/change_password",
            user.token(),
            json!({"oldPassword": PASSWORD, "newPassword": "next-password"}),
        )
        .await;
    assert_envelope!(ok, StatusCode::OK, "Password changed successfully");

    let login = app
        .post(
            "/api/v1/user/login_user",
            None,
            json!({"email": user.email, "password": "next-password"}),
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
}

#[tokio::test]
async fn test_delete_account_cascades_content() {
    let app = TestApp::new();
    let user = student(&app, "ivan").await;
    let post_id = create_post(&app, &user, json!({"content": "bye"})).await;

    let response = app.delete("/api/v1/user/delete_account", user.token()).await;
    assert_envelope!(
        response,
        StatusCode::OK,
        "Your account has been deleted successfully."
    );

    let post = app.get(&format!("/api/v1/posts/{post_id}"), None).await;
    assert_eq!(post.status, StatusCode::NOT_FOUND);

    let profile = app.get("/api/v1/user/get_user_profile", user.token()).await;
    assert_envelope!(profile, StatusCode::UNAUTHORIZED, "User not found");
}

#[tokio::test]
async fn test_admin_routes_require_admin_role() {
    let app = TestApp::new();
    let user = student(&app, "jill").await;

    let anonymous = app.get("/api/v1/user/get_all_users", None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let forbidden = app.get("/api/v1/user/get_all_users", user.token()).await;
    assert_envelope!(forbidden, StatusCode::FORBIDDEN, "You don't have permission");
}

#[tokio::test]
async fn test_admin_lists_and_searches_users() {
    let app = TestApp::new();
    student(&app, "kyle").await;
    register(&app, "lena", "Faculty").await;
    let root = admin(&app, "root").await;

    let all = app.get("/api/v1/user/get_all_users", root.token()).await;
    assert_eq!(all.status, StatusCode::OK);
    assert_eq!(all.data()["totalUsers"], 3);
    assert_eq!(all.data()["users"][0]["username"], "root");

    let by_role = app
        .get("/api/v1/user/search_users?role=Faculty", root.token())
        .await;
    assert_eq!(by_role.data()["totalResults"], 1);
    assert_eq!(by_role.data()["users"][0]["username"], "lena");

    let by_keyword = app
        .get("/api/v1/user/search_users?keyword=KYLE", root.token())
        .await;
    assert_eq!(by_keyword.data()["totalResults"], 1);

    let bad_role = app
        .get("/api/v1/user/search_users?role=Wizard", root.token())
        .await;
    assert_eq!(bad_role.status, StatusCode::BAD_REQUEST);
}
