/**
 * Authentication Middleware
 *
 * This module protects routes that require a signed-in user. The access token
 * is read from the `accessToken` cookie or from an `Authorization: Bearer`
 * header, verified, and resolved to a user that must still exist.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::backend::auth::cookies::{read_cookie, ACCESS_COOKIE};
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use crate::shared::models::Role;

/// Authenticated user attached to request extensions
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
    pub username: String,
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Find the access token: cookie first, then `Authorization: Bearer`
pub fn access_token(headers: &HeaderMap) -> Option<String> {
    read_cookie(headers, ACCESS_COOKIE).or_else(|| {
        headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
    })
}

/// Verify the request's access token and load its user
pub async fn authenticate(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<AuthenticatedUser, BackendError> {
    let token = access_token(headers).ok_or_else(|| {
        tracing::warn!("Missing access token");
        BackendError::unauthorized("Access Token is required for Authorization")
    })?;

    let claims = state.tokens.verify_access(&token).map_err(|e| {
        tracing::warn!("Invalid access token: {:?}", e);
        BackendError::unauthorized("Invalid or expired access token")
    })?;

    let user_id = claims.user_id().ok_or_else(|| {
        tracing::warn!("Invalid user ID in token: {}", claims.sub);
        BackendError::unauthorized("Invalid access token")
    })?;

    let user = state.repos.users.user_by_id(user_id).await?.ok_or_else(|| {
        tracing::warn!("Token for unknown user {}", user_id);
        BackendError::unauthorized("User not found")
    })?;

    Ok(AuthenticatedUser {
        user_id: user.id,
        email: user.email,
        username: user.username,
        role: user.role,
    })
}

/// Authentication middleware
///
/// Returns 401 when the token is missing, invalid, or names a deleted user.
/// Otherwise attaches `AuthenticatedUser` to the request extensions.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let user = authenticate(&app_state, request.headers()).await?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Axum extractor for the authenticated user
///
/// Reuses the user attached by `auth_middleware`, or authenticates the
/// request itself when the route has no middleware.
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(AuthUser(user.clone()));
        }

        let user = authenticate(state, &parts.headers).await?;
        parts.extensions.insert(user.clone());
        Ok(AuthUser(user))
    }
}
