/**
 * Post Handlers
 *
 * - GET    /all              - newest first, paginated
 * - GET    /user/{userId}    - one author's posts, paginated
 * - GET    /tag/{tag}        - posts carrying a tag, paginated
 * - GET    /{postId}
 * - POST   /create
 * - PUT    /{postId}         - owner or admin
 * - DELETE /{postId}         - owner or admin, removes comments too
 * - POST   /{postId}/like    - like toggle
 */

use axum::extract::State;
use uuid::Uuid;

use crate::backend::auth::users::summary_for;
use crate::backend::error::{ApiJson, ApiPath, ApiQuery, ApiResult, BackendError};
use crate::backend::middleware::{ensure_owner_or_admin, AuthUser};
use crate::backend::posts::db::{NewPost, PostChanges, PostFilter, PostRecord};
use crate::backend::response::Reply;
use crate::backend::server::state::AppState;
use crate::shared::envelope::Empty;
use crate::shared::error::{non_blank, require_text};
use crate::shared::models::{CreatePostRequest, LikeToggle, PostView, UpdatePostRequest};
use crate::shared::pagination::{PageQuery, Paginated};

fn post_not_found() -> BackendError {
    BackendError::not_found("Post not found")
}

/// Attach owner summaries to a batch of posts
async fn post_views(state: &AppState, posts: Vec<PostRecord>) -> ApiResult<Vec<PostView>> {
    let owners: Vec<Uuid> = posts.iter().map(|post| post.owner_id).collect();
    let summaries = state.repos.users.user_summaries(&owners).await?;

    Ok(posts
        .into_iter()
        .map(|post| PostView {
            id: post.id,
            owner: summary_for(&summaries, post.owner_id),
            title: post.title,
            content: post.content,
            media: post.media,
            tags: post.tags,
            likes_count: post.likes.len(),
            likes: post.likes,
            comments_count: post.comments.len(),
            comments: post.comments,
            created_at: post.created_at,
            updated_at: post.updated_at,
        })
        .collect())
}

async fn post_view(state: &AppState, post: PostRecord) -> ApiResult<PostView> {
    post_views(state, vec![post])
        .await?
        .pop()
        .ok_or_else(post_not_found)
}

async fn list_page(
    state: &AppState,
    filter: PostFilter,
    query: PageQuery,
) -> ApiResult<Paginated<PostView>> {
    let page = query.resolve();
    let (posts, total) = state.repos.posts.list_posts(&filter, page).await?;
    Ok(page.paginate(post_views(state, posts).await?, total))
}

async fn load_post(state: &AppState, post_id: Uuid) -> ApiResult<PostRecord> {
    state
        .repos
        .posts
        .post_by_id(post_id)
        .await?
        .ok_or_else(post_not_found)
}

pub async fn get_all_posts(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Reply<Paginated<PostView>>> {
    let page = list_page(&state, PostFilter::default(), query).await?;
    Ok(Reply::ok(page, "Posts fetched successfully"))
}

pub async fn get_user_posts(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Reply<Paginated<PostView>>> {
    let filter = PostFilter {
        owner_id: Some(user_id),
        ..PostFilter::default()
    };
    let page = list_page(&state, filter, query).await?;
    Ok(Reply::ok(page, "User posts fetched successfully"))
}

pub async fn get_posts_by_tag(
    State(state): State<AppState>,
    ApiPath(tag): ApiPath<String>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Reply<Paginated<PostView>>> {
    let filter = PostFilter {
        tag: Some(tag.trim().to_string()),
        ..PostFilter::default()
    };
    let page = list_page(&state, filter, query).await?;
    Ok(Reply::ok(page, "Posts fetched successfully"))
}

pub async fn get_post(
    State(state): State<AppState>,
    ApiPath(post_id): ApiPath<Uuid>,
) -> ApiResult<Reply<PostView>> {
    let post = load_post(&state, post_id).await?;
    Ok(Reply::ok(post_view(&state, post).await?, "Post fetched successfully"))
}

pub async fn create_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(request): ApiJson<CreatePostRequest>,
) -> ApiResult<Reply<PostView>> {
    let content = require_text("content", request.content.as_deref())
        .map_err(|_| BackendError::bad_request("Post content is required"))?;

    let post = state
        .repos
        .posts
        .create_post(NewPost {
            owner_id: user.user_id,
            title: non_blank(request.title),
            content,
            media: non_blank(request.media),
            tags: request.tags.map(|tags| tags.into_tags()).unwrap_or_default(),
        })
        .await?;

    tracing::info!(post_id = %post.id, owner = %user.user_id, "Post created");
    Ok(Reply::created(post_view(&state, post).await?, "Post created successfully"))
}

pub async fn update_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiPath(post_id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdatePostRequest>,
) -> ApiResult<Reply<PostView>> {
    let post = load_post(&state, post_id).await?;
    ensure_owner_or_admin(&user, post.owner_id, "update your own posts")?;

    let changes = PostChanges {
        title: non_blank(request.title),
        content: non_blank(request.content),
        media: non_blank(request.media),
        tags: request.tags.map(|tags| tags.into_tags()),
    };

    let post = state
        .repos
        .posts
        .update_post(post_id, changes)
        .await?
        .ok_or_else(post_not_found)?;

    Ok(Reply::ok(post_view(&state, post).await?, "Post updated successfully"))
}

pub async fn delete_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiPath(post_id): ApiPath<Uuid>,
) -> ApiResult<Reply<Empty>> {
    let post = load_post(&state, post_id).await?;
    ensure_owner_or_admin(&user, post.owner_id, "delete your own posts")?;

    if !state.repos.posts.delete_post(post_id).await? {
        return Err(post_not_found());
    }

    tracing::info!(post_id = %post_id, by = %user.user_id, "Post deleted");
    Ok(Reply::message("Post deleted successfully"))
}

pub async fn toggle_like(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiPath(post_id): ApiPath<Uuid>,
) -> ApiResult<Reply<LikeToggle>> {
    let (is_liked, likes_count) = state
        .repos
        .posts
        .toggle_like(post_id, user.user_id)
        .await?
        .ok_or_else(post_not_found)?;

    let message = if is_liked { "Post liked" } else { "Post unliked" };
    Ok(Reply::ok(
        LikeToggle {
            post_id,
            is_liked,
            likes_count,
        },
        message,
    ))
}
