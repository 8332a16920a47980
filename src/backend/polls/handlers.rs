/**
 * Poll Handlers
 *
 * - GET    /all            - newest first, paginated
 * - GET    /active         - not yet expired
 * - GET    /{pollId}
 * - POST   /create
 * - POST   /{pollId}/vote
 * - PUT    /{pollId}       - creator or admin
 * - DELETE /{pollId}       - creator or admin
 */

use axum::extract::State;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::backend::auth::users::summary_for;
use crate::backend::error::{ApiJson, ApiPath, ApiQuery, ApiResult, BackendError};
use crate::backend::middleware::{ensure_owner_or_admin, AuthUser};
use crate::backend::polls::db::{NewPoll, PollChanges, PollRecord, VoteRejection};
use crate::backend::response::Reply;
use crate::backend::server::state::AppState;
use crate::shared::envelope::Empty;
use crate::shared::error::non_blank;
use crate::shared::models::{
    clean_options, CreatePollRequest, PollOptionView, PollView, UpdatePollRequest, UserSummary,
    VoteRequest,
};
use crate::shared::pagination::{PageQuery, Paginated};

const MIN_OPTIONS: usize = 2;

fn poll_not_found() -> BackendError {
    BackendError::not_found("Poll not found")
}

impl From<VoteRejection> for BackendError {
    fn from(rejection: VoteRejection) -> Self {
        BackendError::bad_request(rejection.to_string())
    }
}

fn validated_options(options: Vec<String>) -> ApiResult<Vec<String>> {
    let options = clean_options(options);
    if options.len() < MIN_OPTIONS {
        return Err(BackendError::bad_request("At least two options are required"));
    }
    Ok(options)
}

fn poll_view_at(poll: PollRecord, created_by: UserSummary, now: DateTime<Utc>) -> PollView {
    PollView {
        id: poll.id,
        created_by,
        question: poll.question.clone(),
        total_votes: poll.total_votes(),
        expired: poll.is_expired(now),
        expires_at: poll.expires_at,
        created_at: poll.created_at,
        updated_at: poll.updated_at,
        options: poll
            .options
            .into_iter()
            .map(|option| PollOptionView {
                vote_count: option.votes.len(),
                text: option.text,
                votes: option.votes,
            })
            .collect(),
    }
}

async fn poll_views(state: &AppState, polls: Vec<PollRecord>) -> ApiResult<Vec<PollView>> {
    let creators: Vec<Uuid> = polls.iter().map(|poll| poll.created_by).collect();
    let summaries = state.repos.users.user_summaries(&creators).await?;
    let now = Utc::now();

    Ok(polls
        .into_iter()
        .map(|poll| {
            let created_by = summary_for(&summaries, poll.created_by);
            poll_view_at(poll, created_by, now)
        })
        .collect())
}

async fn poll_view(state: &AppState, poll: PollRecord) -> ApiResult<PollView> {
    poll_views(state, vec![poll])
        .await?
        .pop()
        .ok_or_else(poll_not_found)
}

async fn load_poll(state: &AppState, poll_id: Uuid) -> ApiResult<PollRecord> {
    state
        .repos
        .polls
        .poll_by_id(poll_id)
        .await?
        .ok_or_else(poll_not_found)
}

pub async fn get_all_polls(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Reply<Paginated<PollView>>> {
    let page = query.resolve();
    let (polls, total) = state.repos.polls.list_polls(page).await?;
    let items = poll_views(&state, polls).await?;

    Ok(Reply::ok(page.paginate(items, total), "Polls fetched successfully"))
}

pub async fn get_active_polls(State(state): State<AppState>) -> ApiResult<Reply<Vec<PollView>>> {
    let polls = state.repos.polls.active_polls(Utc::now()).await?;
    Ok(Reply::ok(
        poll_views(&state, polls).await?,
        "Active polls fetched successfully",
    ))
}

pub async fn get_poll(
    State(state): State<AppState>,
    ApiPath(poll_id): ApiPath<Uuid>,
) -> ApiResult<Reply<PollView>> {
    let poll = load_poll(&state, poll_id).await?;
    Ok(Reply::ok(poll_view(&state, poll).await?, "Poll fetched successfully"))
}

pub async fn create_poll(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(request): ApiJson<CreatePollRequest>,
) -> ApiResult<Reply<PollView>> {
    let question = non_blank(request.question)
        .ok_or_else(|| BackendError::bad_request("Poll question is required"))?;
    let options = validated_options(request.options)?;

    let poll = state
        .repos
        .polls
        .create_poll(NewPoll {
            created_by: user.user_id,
            question,
            options,
            expires_at: request.expires_at,
        })
        .await?;

    tracing::info!(poll_id = %poll.id, by = %user.user_id, "Poll created");
    Ok(Reply::created(poll_view(&state, poll).await?, "Poll created successfully"))
}

pub async fn vote_poll(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiPath(poll_id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<VoteRequest>,
) -> ApiResult<Reply<PollView>> {
    let option_index = request
        .option_index
        .ok_or_else(|| BackendError::bad_request("Option index is required"))?;

    let poll = load_poll(&state, poll_id).await?;
    let position = poll.check_vote(option_index, Utc::now())?;

    let poll = state
        .repos
        .polls
        .record_vote(poll_id, user.user_id, position)
        .await?
        .ok_or_else(poll_not_found)?;

    tracing::info!(poll_id = %poll_id, user = %user.user_id, option = position, "Vote recorded");
    Ok(Reply::ok(poll_view(&state, poll).await?, "Vote recorded successfully"))
}

pub async fn update_poll(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiPath(poll_id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdatePollRequest>,
) -> ApiResult<Reply<PollView>> {
    let poll = load_poll(&state, poll_id).await?;
    ensure_owner_or_admin(&user, poll.created_by, "update your own polls")?;

    let options = match request.options {
        Some(_) if poll.has_votes() => {
            return Err(BackendError::bad_request(
                "Cannot modify poll options after votes have been cast",
            ));
        }
        Some(options) => Some(validated_options(options)?),
        None => None,
    };

    let changes = PollChanges {
        question: non_blank(request.question),
        options,
        expires_at: request.expires_at,
    };

    let poll = state
        .repos
        .polls
        .update_poll(poll_id, changes)
        .await?
        .ok_or_else(poll_not_found)?;

    Ok(Reply::ok(poll_view(&state, poll).await?, "Poll updated successfully"))
}

pub async fn delete_poll(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiPath(poll_id): ApiPath<Uuid>,
) -> ApiResult<Reply<Empty>> {
    let poll = load_poll(&state, poll_id).await?;
    ensure_owner_or_admin(&user, poll.created_by, "delete your own polls")?;

    if !state.repos.polls.delete_poll(poll_id).await? {
        return Err(poll_not_found());
    }

    Ok(Reply::message("Poll deleted successfully"))
}
