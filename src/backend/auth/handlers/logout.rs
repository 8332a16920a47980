/**
 * Logout Handler
 *
 * GET /api/v1/user/logout_user
 */

use axum::extract::State;

use crate::backend::auth::cookies::{clear_session_cookies, SessionCookies};
use crate::backend::error::ApiResult;
use crate::backend::middleware::AuthUser;
use crate::backend::response::Reply;
use crate::backend::server::state::AppState;
use crate::shared::envelope::Empty;

pub async fn logout_user(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> ApiResult<(SessionCookies, Reply<Empty>)> {
    state.repos.users.set_refresh_token(user.user_id, None).await?;

    tracing::info!("User logged out: {}", user.user_id);
    Ok((
        clear_session_cookies(state.config.cookie_secure),
        Reply::message("User logged out successfully"),
    ))
}
