/**
 * Event Handlers
 *
 * - GET    /all              - by date ascending, paginated
 * - GET    /upcoming         - next events from now, at most ten
 * - GET    /{eventId}
 * - POST   /create
 * - PUT    /{eventId}        - owner or admin, partial
 * - DELETE /{eventId}        - owner or admin
 * - POST   /{eventId}/attend - attendance toggle
 */

use axum::extract::State;
use chrono::Utc;
use uuid::Uuid;

use crate::backend::auth::users::summary_for;
use crate::backend::error::{ApiJson, ApiPath, ApiQuery, ApiResult, BackendError};
use crate::backend::events::db::{EventChanges, EventRecord, NewEvent, UPCOMING_LIMIT};
use crate::backend::middleware::{ensure_owner_or_admin, AuthUser};
use crate::backend::response::Reply;
use crate::backend::server::state::AppState;
use crate::shared::envelope::Empty;
use crate::shared::error::non_blank;
use crate::shared::models::{AttendanceToggle, CreateEventRequest, EventView, UpdateEventRequest};
use crate::shared::pagination::{PageQuery, Paginated};

fn event_not_found() -> BackendError {
    BackendError::not_found("Event not found")
}

async fn event_views(state: &AppState, events: Vec<EventRecord>) -> ApiResult<Vec<EventView>> {
    let mut ids: Vec<Uuid> = events.iter().map(|event| event.owner_id).collect();
    ids.extend(events.iter().flat_map(|event| event.attendees.iter().copied()));
    let summaries = state.repos.users.user_summaries(&ids).await?;

    Ok(events
        .into_iter()
        .map(|event| EventView {
            id: event.id,
            owner: summary_for(&summaries, event.owner_id),
            title: event.title,
            description: event.description,
            date: event.date,
            location: event.location,
            attendees_count: event.attendees.len(),
            attendees: event
                .attendees
                .iter()
                .map(|id| summary_for(&summaries, *id))
                .collect(),
            created_at: event.created_at,
            updated_at: event.updated_at,
        })
        .collect())
}

async fn event_view(state: &AppState, event: EventRecord) -> ApiResult<EventView> {
    event_views(state, vec![event])
        .await?
        .pop()
        .ok_or_else(event_not_found)
}

async fn load_event(state: &AppState, event_id: Uuid) -> ApiResult<EventRecord> {
    state
        .repos
        .events
        .event_by_id(event_id)
        .await?
        .ok_or_else(event_not_found)
}

pub async fn get_all_events(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Reply<Paginated<EventView>>> {
    let page = query.resolve();
    let (events, total) = state.repos.events.list_events(page).await?;
    let items = event_views(&state, events).await?;

    Ok(Reply::ok(page.paginate(items, total), "Events fetched successfully"))
}

pub async fn get_upcoming_events(State(state): State<AppState>) -> ApiResult<Reply<Vec<EventView>>> {
    let events = state
        .repos
        .events
        .upcoming_events(Utc::now(), UPCOMING_LIMIT)
        .await?;

    Ok(Reply::ok(
        event_views(&state, events).await?,
        "Upcoming events fetched successfully",
    ))
}

pub async fn get_event(
    State(state): State<AppState>,
    ApiPath(event_id): ApiPath<Uuid>,
) -> ApiResult<Reply<EventView>> {
    let event = load_event(&state, event_id).await?;
    Ok(Reply::ok(event_view(&state, event).await?, "Event fetched successfully"))
}

pub async fn create_event(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(request): ApiJson<CreateEventRequest>,
) -> ApiResult<Reply<EventView>> {
    let (Some(title), Some(date)) = (non_blank(request.title), request.date) else {
        return Err(BackendError::bad_request("Title and date are required"));
    };

    let event = state
        .repos
        .events
        .create_event(NewEvent {
            owner_id: user.user_id,
            title,
            description: non_blank(request.description),
            date,
            location: non_blank(request.location),
        })
        .await?;

    tracing::info!(event_id = %event.id, owner = %user.user_id, "Event created");
    Ok(Reply::created(event_view(&state, event).await?, "Event created successfully"))
}

pub async fn update_event(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiPath(event_id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateEventRequest>,
) -> ApiResult<Reply<EventView>> {
    let event = load_event(&state, event_id).await?;
    ensure_owner_or_admin(&user, event.owner_id, "update your own events")?;

    let changes = EventChanges {
        title: non_blank(request.title),
        description: non_blank(request.description),
        date: request.date,
        location: non_blank(request.location),
    };

    let event = state
        .repos
        .events
        .update_event(event_id, changes)
        .await?
        .ok_or_else(event_not_found)?;

    Ok(Reply::ok(event_view(&state, event).await?, "Event updated successfully"))
}

pub async fn delete_event(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiPath(event_id): ApiPath<Uuid>,
) -> ApiResult<Reply<Empty>> {
    let event = load_event(&state, event_id).await?;
    ensure_owner_or_admin(&user, event.owner_id, "delete your own events")?;

    if !state.repos.events.delete_event(event_id).await? {
        return Err(event_not_found());
    }

    tracing::info!(event_id = %event_id, by = %user.user_id, "Event deleted");
    Ok(Reply::message("Event deleted successfully"))
}

pub async fn toggle_attendance(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiPath(event_id): ApiPath<Uuid>,
) -> ApiResult<Reply<AttendanceToggle>> {
    let (attending, attendees_count) = state
        .repos
        .events
        .toggle_attendance(event_id, user.user_id)
        .await?
        .ok_or_else(event_not_found)?;

    let message = if attending {
        "Event attendance recorded"
    } else {
        "Event unattendance recorded"
    };
    Ok(Reply::ok(
        AttendanceToggle {
            attending,
            attendees_count,
        },
        message,
    ))
}
