/**
 * Refresh Handler
 *
 * GET|POST /api/v1/user/refresh_access_token
 *
 * The refresh token comes from the `refreshToken` cookie, or from a JSON
 * body `{ "refreshToken": "..." }`. It must match the token stored on the
 * user, so each refresh token can be used once.
 */

use axum::{body::Bytes, extract::State, http::HeaderMap};

use crate::backend::auth::cookies::{read_cookie, SessionCookies, REFRESH_COOKIE};
use crate::backend::auth::handlers::rotate_tokens;
use crate::backend::error::{ApiResult, BackendError};
use crate::backend::response::Reply;
use crate::backend::server::state::AppState;
use crate::shared::models::{RefreshRequest, TokenPair};

fn token_from_body(body: &Bytes) -> Option<String> {
    if body.is_empty() {
        return None;
    }
    serde_json::from_slice::<RefreshRequest>(body)
        .ok()
        .and_then(|request| request.refresh_token)
        .filter(|token| !token.is_empty())
}

pub async fn refresh_access_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<(SessionCookies, Reply<TokenPair>)> {
    let presented = read_cookie(&headers, REFRESH_COOKIE)
        .or_else(|| token_from_body(&body))
        .ok_or_else(|| BackendError::unauthorized("Refresh token not found"))?;

    let claims = state.tokens.verify_refresh(&presented).map_err(|e| {
        tracing::warn!("Invalid refresh token: {:?}", e);
        BackendError::unauthorized("Invalid or expired refresh token")
    })?;

    let user_id = claims
        .user_id()
        .ok_or_else(|| BackendError::unauthorized("Invalid refresh token"))?;
    let user = state
        .repos
        .users
        .user_by_id(user_id)
        .await?
        .ok_or_else(|| BackendError::unauthorized("Invalid refresh token"))?;

    if user.refresh_token.as_deref() != Some(presented.as_str()) {
        tracing::warn!("Refresh token reuse for user {}", user.id);
        return Err(BackendError::unauthorized("Refresh token is expired or used"));
    }

    let (cookies, tokens) = rotate_tokens(&state, &user).await?;

    tracing::info!("Tokens refreshed for user {}", user.id);
    Ok((cookies, Reply::ok(tokens, "Access token refreshed")))
}
