/**
 * Role and Ownership Checks
 */

use axum::{extract::Request, middleware::Next, response::Response};
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::middleware::auth::AuthenticatedUser;

/// Restrict a route to admins. Must run after `auth_middleware`.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, BackendError> {
    let user = request
        .extensions()
        .get::<AuthenticatedUser>()
        .ok_or_else(|| BackendError::unauthorized("Access Token is required for Authorization"))?;

    if !user.is_admin() {
        tracing::warn!(user_id = %user.user_id, role = %user.role, "Admin route refused");
        return Err(BackendError::forbidden("You don't have permission"));
    }

    Ok(next.run(request).await)
}

/// Allow the owner of a record, or any admin
///
/// `action` completes the refusal message, e.g. "update your own posts".
pub fn ensure_owner_or_admin(
    user: &AuthenticatedUser,
    owner_id: Uuid,
    action: &str,
) -> Result<(), BackendError> {
    if user.user_id == owner_id || user.is_admin() {
        Ok(())
    } else {
        Err(BackendError::forbidden(format!("You can only {}", action)))
    }
}
