/**
 * API Route Handlers
 *
 * One sub-router per resource, nested under `/api/v1` by `create_router`.
 *
 * # Routes
 *
 * - `/user`      - accounts, sessions, admin user listing
 * - `/posts`     - feed posts and likes
 * - `/comments`  - comments on posts
 * - `/events`    - events and attendance
 * - `/polls`     - polls and voting
 * - `/resources` - shared study material
 * - `/groups`    - study groups
 *
 * Write endpoints authenticate through the `AuthUser` extractor. Read
 * endpoints are public.
 */

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::backend::auth::handlers as auth;
use crate::backend::comments::handlers as comments;
use crate::backend::events::handlers as events;
use crate::backend::groups::handlers as groups;
use crate::backend::middleware::{auth_middleware, rate_limit, require_admin};
use crate::backend::polls::handlers as polls;
use crate::backend::posts::handlers as posts;
use crate::backend::resources::handlers as resources;
use crate::backend::response::Reply;
use crate::backend::server::state::AppState;
use crate::shared::envelope::Empty;

async fn ping() -> Reply<Empty> {
    Reply::message("pong")
}

/// `/api/v1/user`
///
/// Login and registration each sit behind their own rate limiter. Admin
/// routes run `auth_middleware` then `require_admin`.
pub fn user_routes(state: &AppState) -> Router<AppState> {
    let login = Router::new()
        .route("/login_user", post(auth::login_user))
        .route_layer(middleware::from_fn_with_state(
            state.login_limiter.clone(),
            rate_limit,
        ));

    let register = Router::new()
        .route("/register_user", post(auth::register_user))
        .route_layer(middleware::from_fn_with_state(
            state.register_limiter.clone(),
            rate_limit,
        ));

    let admin = Router::new()
        .route("/get_all_users", get(auth::get_all_users))
        .route("/search_users", get(auth::search_users))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/ping", get(ping))
        .route(
            "/refresh_access_token",
            get(auth::refresh_access_token).post(auth::refresh_access_token),
        )
        .route("/logout_user", get(auth::logout_user))
        .route("/change_password", put(auth::change_password))
        .route("/get_user_profile", get(auth::get_user_profile))
        .route("/update_user_profile", put(auth::update_user_profile))
        .route("/delete_account", axum::routing::delete(auth::delete_account))
        .merge(login)
        .merge(register)
        .merge(admin)
}

/// `/api/v1/posts`
pub fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/all", get(posts::get_all_posts))
        .route("/create", post(posts::create_post))
        .route("/user/{userId}", get(posts::get_user_posts))
        .route("/tag/{tag}", get(posts::get_posts_by_tag))
        .route(
            "/{postId}",
            get(posts::get_post)
                .put(posts::update_post)
                .delete(posts::delete_post),
        )
        .route("/{postId}/like", post(posts::toggle_like))
}

/// `/api/v1/comments`
pub fn comment_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/post/{postId}",
            get(comments::get_post_comments).post(comments::create_comment),
        )
        .route(
            "/{commentId}",
            put(comments::update_comment).delete(comments::delete_comment),
        )
}

/// `/api/v1/events`
pub fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/all", get(events::get_all_events))
        .route("/upcoming", get(events::get_upcoming_events))
        .route("/create", post(events::create_event))
        .route(
            "/{eventId}",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route("/{eventId}/attend", post(events::toggle_attendance))
}

/// `/api/v1/polls`
pub fn poll_routes() -> Router<AppState> {
    Router::new()
        .route("/all", get(polls::get_all_polls))
        .route("/active", get(polls::get_active_polls))
        .route("/create", post(polls::create_poll))
        .route(
            "/{pollId}",
            get(polls::get_poll)
                .put(polls::update_poll)
                .delete(polls::delete_poll),
        )
        .route("/{pollId}/vote", post(polls::vote_poll))
}

/// `/api/v1/resources`
pub fn resource_routes() -> Router<AppState> {
    Router::new()
        .route("/all", get(resources::get_all_resources))
        .route("/upload", post(resources::upload_resource))
        .route("/course/{courseId}", get(resources::get_course_resources))
        .route("/user/{userId}", get(resources::get_user_resources))
        .route(
            "/{resourceId}",
            get(resources::get_resource)
                .put(resources::update_resource)
                .delete(resources::delete_resource),
        )
}

/// `/api/v1/groups`
pub fn group_routes() -> Router<AppState> {
    Router::new()
        .route("/all", get(groups::get_all_groups))
        .route("/create", post(groups::create_group))
        .route(
            "/{groupId}",
            get(groups::get_group)
                .put(groups::update_group)
                .delete(groups::delete_group),
        )
        .route("/{groupId}/join", post(groups::toggle_membership))
}

/// Configure every `/api/v1` sub-router
pub fn configure_api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .nest("/user", user_routes(state))
        .nest("/posts", post_routes())
        .nest("/comments", comment_routes())
        .nest("/events", event_routes())
        .nest("/polls", poll_routes())
        .nest("/resources", resource_routes())
        .nest("/groups", group_routes())
}
