/**
 * Group Handlers
 *
 * - GET    /all              - newest first, paginated
 * - GET    /{groupId}
 * - POST   /create           - creator becomes group admin and first member
 * - PUT    /{groupId}        - group admin or Admin role
 * - DELETE /{groupId}        - group admin or Admin role
 * - POST   /{groupId}/join   - membership toggle
 */

use axum::extract::State;
use uuid::Uuid;

use crate::backend::auth::users::summary_for;
use crate::backend::error::{ApiJson, ApiPath, ApiQuery, ApiResult, BackendError};
use crate::backend::groups::db::{GroupChanges, GroupRecord, NewGroup};
use crate::backend::middleware::{ensure_owner_or_admin, AuthUser};
use crate::backend::response::Reply;
use crate::backend::server::state::AppState;
use crate::shared::envelope::Empty;
use crate::shared::error::non_blank;
use crate::shared::models::{GroupRequest, GroupView, MembershipToggle};
use crate::shared::pagination::{PageQuery, Paginated};

fn group_not_found() -> BackendError {
    BackendError::not_found("Group not found")
}

async fn group_views(state: &AppState, groups: Vec<GroupRecord>) -> ApiResult<Vec<GroupView>> {
    let mut ids: Vec<Uuid> = groups.iter().map(|group| group.admin_id).collect();
    ids.extend(groups.iter().flat_map(|group| group.members.iter().copied()));
    let summaries = state.repos.users.user_summaries(&ids).await?;

    Ok(groups
        .into_iter()
        .map(|group| GroupView {
            id: group.id,
            name: group.name,
            description: group.description,
            admin: summary_for(&summaries, group.admin_id),
            members_count: group.members.len(),
            members: group
                .members
                .iter()
                .map(|id| summary_for(&summaries, *id))
                .collect(),
            created_at: group.created_at,
            updated_at: group.updated_at,
        })
        .collect())
}

async fn group_view(state: &AppState, group: GroupRecord) -> ApiResult<GroupView> {
    group_views(state, vec![group])
        .await?
        .pop()
        .ok_or_else(group_not_found)
}

async fn load_group(state: &AppState, group_id: Uuid) -> ApiResult<GroupRecord> {
    state
        .repos
        .groups
        .group_by_id(group_id)
        .await?
        .ok_or_else(group_not_found)
}

pub async fn get_all_groups(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Reply<Paginated<GroupView>>> {
    let page = query.resolve();
    let (groups, total) = state.repos.groups.list_groups(page).await?;
    let items = group_views(&state, groups).await?;

    Ok(Reply::ok(page.paginate(items, total), "Groups fetched successfully"))
}

pub async fn get_group(
    State(state): State<AppState>,
    ApiPath(group_id): ApiPath<Uuid>,
) -> ApiResult<Reply<GroupView>> {
    let group = load_group(&state, group_id).await?;
    Ok(Reply::ok(group_view(&state, group).await?, "Group fetched successfully"))
}

pub async fn create_group(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(request): ApiJson<GroupRequest>,
) -> ApiResult<Reply<GroupView>> {
    let name = non_blank(request.name)
        .ok_or_else(|| BackendError::bad_request("Group name is required"))?;

    let group = state
        .repos
        .groups
        .create_group(NewGroup {
            name,
            description: non_blank(request.description),
            admin_id: user.user_id,
        })
        .await?;

    tracing::info!(group_id = %group.id, admin = %user.user_id, "Group created");
    Ok(Reply::created(group_view(&state, group).await?, "Group created successfully"))
}

pub async fn update_group(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiPath(group_id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<GroupRequest>,
) -> ApiResult<Reply<GroupView>> {
    let group = load_group(&state, group_id).await?;
    ensure_owner_or_admin(&user, group.admin_id, "update groups you administer")?;

    let changes = GroupChanges {
        name: non_blank(request.name),
        description: non_blank(request.description),
    };

    let group = state
        .repos
        .groups
        .update_group(group_id, changes)
        .await?
        .ok_or_else(group_not_found)?;

    Ok(Reply::ok(group_view(&state, group).await?, "Group updated successfully"))
}

pub async fn delete_group(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiPath(group_id): ApiPath<Uuid>,
) -> ApiResult<Reply<Empty>> {
    let group = load_group(&state, group_id).await?;
    ensure_owner_or_admin(&user, group.admin_id, "delete groups you administer")?;

    if !state.repos.groups.delete_group(group_id).await? {
        return Err(group_not_found());
    }

    Ok(Reply::message("Group deleted successfully"))
}

pub async fn toggle_membership(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiPath(group_id): ApiPath<Uuid>,
) -> ApiResult<Reply<MembershipToggle>> {
    let (member, members_count) = state
        .repos
        .groups
        .toggle_membership(group_id, user.user_id)
        .await?
        .ok_or_else(group_not_found)?;

    let message = if member { "Joined group" } else { "Left group" };
    Ok(Reply::ok(
        MembershipToggle {
            member,
            members_count,
        },
        message,
    ))
}
