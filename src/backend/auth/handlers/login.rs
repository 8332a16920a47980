/**
 * Login Handler
 *
 * POST /api/v1/user/login_user
 *
 * Unknown email and wrong password both return 401 with the same message.
 */

use axum::extract::State;

use crate::backend::auth::cookies::SessionCookies;
use crate::backend::auth::handlers::start_session;
use crate::backend::error::{ApiJson, ApiResult, BackendError};
use crate::backend::response::Reply;
use crate::backend::server::state::AppState;
use crate::shared::error::non_blank;
use crate::shared::models::{AuthPayload, LoginRequest};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub async fn login_user(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ApiResult<(SessionCookies, Reply<AuthPayload>)> {
    let (Some(email), Some(password)) = (
        non_blank(request.email),
        request.password.filter(|password| !password.is_empty()),
    ) else {
        return Err(BackendError::bad_request("Please provide both email and password"));
    };
    let email = email.to_lowercase();

    tracing::info!("Login attempt for email: {}", email);

    let user = state.repos.users.user_by_email(&email).await?.ok_or_else(|| {
        tracing::warn!("Login failed: user not found: {}", email);
        BackendError::unauthorized(INVALID_CREDENTIALS)
    })?;

    if !bcrypt::verify(&password, &user.password_hash)? {
        tracing::warn!("Login failed: invalid password for {}", email);
        return Err(BackendError::unauthorized(INVALID_CREDENTIALS));
    }

    let (cookies, payload) = start_session(&state, &user).await?;

    tracing::info!("User logged in: {} ({})", user.username, user.id);
    let message = format!("{} logged in successfully", user.role);
    Ok((cookies, Reply::ok(payload, message)))
}
