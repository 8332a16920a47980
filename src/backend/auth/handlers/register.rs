/**
 * Register Handler
 *
 * POST /api/v1/user/register_user
 *
 * # Validation
 *
 * - `email`, `username`, `fullname`, `password`, `department` and `role`
 *   are required
 * - `role` must be Student, Faculty or Admin
 * - Students and Faculty must provide a `bio`
 * - `email` must contain '@'
 * - `email` and `username` are trimmed, lowercased and must be unique
 */

use axum::extract::State;

use crate::backend::auth::cookies::SessionCookies;
use crate::backend::auth::handlers::start_session;
use crate::backend::auth::users::NewUser;
use crate::backend::error::{ApiJson, ApiResult, BackendError};
use crate::backend::response::Reply;
use crate::backend::server::state::AppState;
use crate::shared::error::non_blank;
use crate::shared::models::{AuthPayload, RegisterRequest, Role, DEFAULT_AVATAR};

const REQUIRED_MESSAGE: &str = "All fields including role are required";

pub async fn register_user(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> ApiResult<(SessionCookies, Reply<AuthPayload>)> {
    let required = |value: Option<String>| non_blank(value).ok_or_else(|| {
        tracing::warn!("Registration with missing fields");
        BackendError::bad_request(REQUIRED_MESSAGE)
    });

    let email = required(request.email)?.to_lowercase();
    let username = required(request.username)?.to_lowercase();
    let fullname = required(request.fullname)?;
    let password = request
        .password
        .filter(|password| !password.is_empty())
        .ok_or_else(|| BackendError::bad_request(REQUIRED_MESSAGE))?;
    let department = required(request.department)?;
    let role: Role = required(request.role)?.parse()?;

    let bio = non_blank(request.bio);
    if bio.is_none() {
        if let Some(message) = role.missing_bio_message() {
            return Err(BackendError::bad_request(message));
        }
    }

    if !email.contains('@') {
        tracing::warn!("Invalid email format: {}", email);
        return Err(BackendError::bad_request("Invalid email format"));
    }

    tracing::info!("Register request for username: {}, email: {}", username, email);

    if state.repos.users.user_by_email(&email).await?.is_some() {
        tracing::warn!("Email already exists: {}", email);
        return Err(BackendError::bad_request("User already exists with this email"));
    }
    if state.repos.users.user_by_username(&username).await?.is_some() {
        tracing::warn!("Username already exists: {}", username);
        return Err(BackendError::bad_request("User already exists with this username"));
    }

    let password_hash = bcrypt::hash(&password, state.config.bcrypt_cost)?;

    let user = state
        .repos
        .users
        .create_user(NewUser {
            username,
            email,
            fullname,
            password_hash,
            bio,
            avatar: non_blank(request.avatar).unwrap_or_else(|| DEFAULT_AVATAR.to_string()),
            cover_image: non_blank(request.cover_image),
            department: Some(department),
            role,
        })
        .await?;

    let (cookies, payload) = start_session(&state, &user).await?;

    tracing::info!("User registered: {} ({})", user.username, user.id);
    Ok((cookies, Reply::created(payload, "User registered successfully")))
}
