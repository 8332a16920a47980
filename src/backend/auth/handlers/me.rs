/**
 * Current User Handlers
 *
 * Endpoints that act on the authenticated user's own account.
 *
 * - GET    /api/v1/user/get_user_profile
 * - PUT    /api/v1/user/update_user_profile
 * - PUT    /api/v1/user/change_password
 * - DELETE /api/v1/user/delete_account
 */

use axum::extract::State;

use crate::backend::auth::cookies::{clear_session_cookies, SessionCookies};
use crate::backend::auth::users::ProfileChanges;
use crate::backend::error::{ApiJson, ApiResult, BackendError};
use crate::backend::middleware::AuthUser;
use crate::backend::response::Reply;
use crate::backend::server::state::AppState;
use crate::shared::envelope::Empty;
use crate::shared::error::non_blank;
use crate::shared::models::{ChangePasswordRequest, UpdateProfileRequest, UserProfile};

fn user_not_found() -> BackendError {
    BackendError::not_found("User not found")
}

pub async fn get_user_profile(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
) -> ApiResult<Reply<UserProfile>> {
    let user = state
        .repos
        .users
        .user_by_id(auth.user_id)
        .await?
        .ok_or_else(user_not_found)?;

    Ok(Reply::ok(user.profile(), "User profile fetched successfully"))
}

pub async fn update_user_profile(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
    ApiJson(request): ApiJson<UpdateProfileRequest>,
) -> ApiResult<Reply<UserProfile>> {
    let changes = ProfileChanges {
        fullname: non_blank(request.fullname),
        bio: non_blank(request.bio),
        department: non_blank(request.department),
        avatar: non_blank(request.avatar),
        cover_image: non_blank(request.cover_image),
    };

    let user = state
        .repos
        .users
        .update_profile(auth.user_id, changes)
        .await?
        .ok_or_else(user_not_found)?;

    tracing::info!("Profile updated for user {}", user.id);
    Ok(Reply::ok(user.profile(), "Profile updated successfully"))
}

pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
    ApiJson(request): ApiJson<ChangePasswordRequest>,
) -> ApiResult<Reply<Empty>> {
    let (Some(old_password), Some(new_password)) = (
        request.old_password.filter(|password| !password.is_empty()),
        request.new_password.filter(|password| !password.is_empty()),
    ) else {
        return Err(BackendError::bad_request(
            "Both old password and new password are required",
        ));
    };

    let user = state
        .repos
        .users
        .user_by_id(auth.user_id)
        .await?
        .ok_or_else(user_not_found)?;

    if !bcrypt::verify(&old_password, &user.password_hash)? {
        tracing::warn!("Password change with wrong old password for {}", user.id);
        return Err(BackendError::bad_request("Old password is incorrect"));
    }

    let password_hash = bcrypt::hash(&new_password, state.config.bcrypt_cost)?;
    state
        .repos
        .users
        .set_password_hash(user.id, &password_hash)
        .await?;

    tracing::info!("Password changed for user {}", user.id);
    Ok(Reply::message("Password changed successfully"))
}

pub async fn delete_account(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
) -> ApiResult<(SessionCookies, Reply<Empty>)> {
    if !state.repos.users.delete_user(auth.user_id).await? {
        return Err(user_not_found());
    }

    tracing::info!("Account deleted: {}", auth.user_id);
    Ok((
        clear_session_cookies(state.config.cookie_secure),
        Reply::message("Your account has been deleted successfully."),
    ))
}
