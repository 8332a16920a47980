/**
 * Comment Handlers
 *
 * - GET    /post/{postId}  - newest first, paginated
 * - POST   /post/{postId}  - the post must exist
 * - PUT    /{commentId}    - owner or admin
 * - DELETE /{commentId}    - owner or admin
 */

use axum::extract::State;
use uuid::Uuid;

use crate::backend::auth::users::summary_for;
use crate::backend::comments::db::{CommentRecord, NewComment};
use crate::backend::error::{ApiJson, ApiPath, ApiQuery, ApiResult, BackendError};
use crate::backend::middleware::{ensure_owner_or_admin, AuthUser};
use crate::backend::response::Reply;
use crate::backend::server::state::AppState;
use crate::shared::envelope::Empty;
use crate::shared::error::require_text;
use crate::shared::models::{CommentRequest, CommentView};
use crate::shared::pagination::{PageQuery, Paginated};

fn comment_not_found() -> BackendError {
    BackendError::not_found("Comment not found")
}

fn comment_text(request: &CommentRequest) -> ApiResult<String> {
    require_text("text", request.text.as_deref())
        .map_err(|_| BackendError::bad_request("Comment text is required"))
}

async fn comment_views(
    state: &AppState,
    comments: Vec<CommentRecord>,
) -> ApiResult<Vec<CommentView>> {
    let owners: Vec<Uuid> = comments.iter().map(|comment| comment.owner_id).collect();
    let summaries = state.repos.users.user_summaries(&owners).await?;

    Ok(comments
        .into_iter()
        .map(|comment| CommentView {
            id: comment.id,
            post_id: comment.post_id,
            owner: summary_for(&summaries, comment.owner_id),
            text: comment.text,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        })
        .collect())
}

async fn comment_view(state: &AppState, comment: CommentRecord) -> ApiResult<CommentView> {
    comment_views(state, vec![comment])
        .await?
        .pop()
        .ok_or_else(comment_not_found)
}

async fn load_comment(state: &AppState, comment_id: Uuid) -> ApiResult<CommentRecord> {
    state
        .repos
        .comments
        .comment_by_id(comment_id)
        .await?
        .ok_or_else(comment_not_found)
}

pub async fn get_post_comments(
    State(state): State<AppState>,
    ApiPath(post_id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Reply<Paginated<CommentView>>> {
    let page = query.resolve();
    let (comments, total) = state.repos.comments.comments_for_post(post_id, page).await?;
    let items = comment_views(&state, comments).await?;

    Ok(Reply::ok(page.paginate(items, total), "Comments fetched successfully"))
}

pub async fn create_comment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiPath(post_id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<CommentRequest>,
) -> ApiResult<Reply<CommentView>> {
    let text = comment_text(&request)?;

    if state.repos.posts.post_by_id(post_id).await?.is_none() {
        return Err(BackendError::not_found("Post not found"));
    }

    let comment = state
        .repos
        .comments
        .create_comment(NewComment {
            post_id,
            owner_id: user.user_id,
            text,
        })
        .await?;

    Ok(Reply::created(
        comment_view(&state, comment).await?,
        "Comment created successfully",
    ))
}

pub async fn update_comment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiPath(comment_id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<CommentRequest>,
) -> ApiResult<Reply<CommentView>> {
    let text = comment_text(&request)?;
    let comment = load_comment(&state, comment_id).await?;
    ensure_owner_or_admin(&user, comment.owner_id, "update your own comments")?;

    let comment = state
        .repos
        .comments
        .update_comment(comment_id, &text)
        .await?
        .ok_or_else(comment_not_found)?;

    Ok(Reply::ok(
        comment_view(&state, comment).await?,
        "Comment updated successfully",
    ))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiPath(comment_id): ApiPath<Uuid>,
) -> ApiResult<Reply<Empty>> {
    let comment = load_comment(&state, comment_id).await?;
    ensure_owner_or_admin(&user, comment.owner_id, "delete your own comments")?;

    if !state.repos.comments.delete_comment(comment_id).await? {
        return Err(comment_not_found());
    }

    Ok(Reply::message("Comment deleted successfully"))
}
