//! Authentication Handlers Module
//!
//! HTTP handlers for the `/api/v1/user` endpoints.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs      - Module exports and session helper
//! ├── register.rs - POST /register_user
//! ├── login.rs    - POST /login_user
//! ├── refresh.rs  - GET|POST /refresh_access_token
//! ├── logout.rs   - GET /logout_user
//! ├── me.rs       - profile, password and account endpoints
//! └── admin.rs    - admin-only user listing and search
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Register/Login**: credentials checked → token pair issued → refresh
//!    token stored on the user → both tokens set as cookies and returned
//! 2. **Refresh**: presented refresh token must match the stored one → new
//!    pair issued and stored, so the old refresh token stops working
//! 3. **Logout**: stored refresh token cleared → cookies expired

pub mod admin;
pub mod login;
pub mod logout;
pub mod me;
pub mod refresh;
pub mod register;

pub use admin::{get_all_users, search_users};
pub use login::login_user;
pub use logout::logout_user;
pub use me::{change_password, delete_account, get_user_profile, update_user_profile};
pub use refresh::refresh_access_token;
pub use register::register_user;

use crate::backend::auth::cookies::{set_session_cookies, SessionCookies};
use crate::backend::auth::users::UserRecord;
use crate::backend::error::ApiResult;
use crate::backend::server::state::AppState;
use crate::shared::models::{AuthPayload, TokenPair};

/// Issue a token pair, persist the refresh token and build the cookies
pub(crate) async fn rotate_tokens(
    state: &AppState,
    user: &UserRecord,
) -> ApiResult<(SessionCookies, TokenPair)> {
    let tokens = state.tokens.issue_pair(user)?;
    state
        .repos
        .users
        .set_refresh_token(user.id, Some(&tokens.refresh_token))
        .await?;
    let cookies = set_session_cookies(&tokens, state.config.cookie_secure);
    Ok((cookies, tokens))
}

/// Start a session for a freshly registered or logged-in user
pub(crate) async fn start_session(
    state: &AppState,
    user: &UserRecord,
) -> ApiResult<(SessionCookies, AuthPayload)> {
    let (cookies, tokens) = rotate_tokens(state, user).await?;
    let payload = AuthPayload {
        user: user.profile(),
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
    };
    Ok((cookies, payload))
}
