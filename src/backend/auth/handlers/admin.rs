/**
 * Admin User Handlers
 *
 * Mounted behind `require_admin`.
 *
 * - GET /api/v1/user/get_all_users
 * - GET /api/v1/user/search_users?keyword=&role=&department=
 */

use axum::extract::State;

use crate::backend::auth::users::{UserFilter, UserRecord};
use crate::backend::error::{ApiQuery, ApiResult};
use crate::backend::response::Reply;
use crate::backend::server::state::AppState;
use crate::shared::error::non_blank;
use crate::shared::models::{Role, UserList, UserProfile, UserSearchQuery, UserSearchResult};

fn profiles(users: Vec<UserRecord>) -> Vec<UserProfile> {
    users.iter().map(UserRecord::profile).collect()
}

pub async fn get_all_users(State(state): State<AppState>) -> ApiResult<Reply<UserList>> {
    let users = profiles(state.repos.users.list_users().await?);

    Ok(Reply::ok(
        UserList {
            total_users: users.len(),
            users,
        },
        "Users fetched successfully",
    ))
}

pub async fn search_users(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<UserSearchQuery>,
) -> ApiResult<Reply<UserSearchResult>> {
    let role = non_blank(query.role)
        .map(|role| role.parse::<Role>())
        .transpose()?;

    let filter = UserFilter {
        keyword: non_blank(query.keyword),
        role,
        department: non_blank(query.department),
    };

    let users = profiles(state.repos.users.search_users(&filter).await?);

    Ok(Reply::ok(
        UserSearchResult {
            total_results: users.len(),
            users,
        },
        "Users search completed successfully",
    ))
}
