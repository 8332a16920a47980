/**
 * Resource Handlers
 *
 * - GET    /all?course=&search=  - paginated
 * - GET    /course/{courseId}    - paginated
 * - GET    /user/{userId}        - paginated
 * - GET    /{resourceId}
 * - POST   /upload
 * - PUT    /{resourceId}         - uploader or admin
 * - DELETE /{resourceId}         - uploader or admin
 *
 * All listings are newest first. File bytes live on an external media host;
 * only the resulting URL is stored.
 */

use axum::extract::State;
use uuid::Uuid;

use crate::backend::auth::users::summary_for;
use crate::backend::error::{ApiJson, ApiPath, ApiQuery, ApiResult, BackendError};
use crate::backend::middleware::{ensure_owner_or_admin, AuthUser};
use crate::backend::resources::db::{NewResource, ResourceChanges, ResourceFilter, ResourceRecord};
use crate::backend::response::Reply;
use crate::backend::server::state::AppState;
use crate::shared::envelope::Empty;
use crate::shared::error::non_blank;
use crate::shared::models::{
    ResourceQuery, ResourceView, UpdateResourceRequest, UploadResourceRequest,
    PLACEHOLDER_FILE_URL,
};
use crate::shared::pagination::{PageQuery, Paginated};

fn resource_not_found() -> BackendError {
    BackendError::not_found("Resource not found")
}

async fn resource_views(
    state: &AppState,
    resources: Vec<ResourceRecord>,
) -> ApiResult<Vec<ResourceView>> {
    let uploaders: Vec<Uuid> = resources.iter().map(|resource| resource.uploaded_by).collect();
    let summaries = state.repos.users.user_summaries(&uploaders).await?;

    Ok(resources
        .into_iter()
        .map(|resource| ResourceView {
            id: resource.id,
            uploaded_by: summary_for(&summaries, resource.uploaded_by),
            title: resource.title,
            description: resource.description,
            file_url: resource.file_url,
            course: resource.course_id,
            created_at: resource.created_at,
            updated_at: resource.updated_at,
        })
        .collect())
}

async fn resource_view(state: &AppState, resource: ResourceRecord) -> ApiResult<ResourceView> {
    resource_views(state, vec![resource])
        .await?
        .pop()
        .ok_or_else(resource_not_found)
}

async fn list_page(
    state: &AppState,
    filter: ResourceFilter,
    query: PageQuery,
) -> ApiResult<Paginated<ResourceView>> {
    let page = query.resolve();
    let (resources, total) = state.repos.resources.list_resources(&filter, page).await?;
    Ok(page.paginate(resource_views(state, resources).await?, total))
}

async fn load_resource(state: &AppState, resource_id: Uuid) -> ApiResult<ResourceRecord> {
    state
        .repos
        .resources
        .resource_by_id(resource_id)
        .await?
        .ok_or_else(resource_not_found)
}

pub async fn get_all_resources(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ResourceQuery>,
) -> ApiResult<Reply<Paginated<ResourceView>>> {
    let filter = ResourceFilter {
        course_id: query.course,
        uploaded_by: None,
        search: non_blank(query.search),
    };
    let paging = PageQuery {
        page: query.page,
        limit: query.limit,
    };
    let page = list_page(&state, filter, paging).await?;
    Ok(Reply::ok(page, "Resources fetched successfully"))
}

pub async fn get_course_resources(
    State(state): State<AppState>,
    ApiPath(course_id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Reply<Paginated<ResourceView>>> {
    let filter = ResourceFilter {
        course_id: Some(course_id),
        ..ResourceFilter::default()
    };
    let page = list_page(&state, filter, query).await?;
    Ok(Reply::ok(page, "Course resources fetched successfully"))
}

pub async fn get_user_resources(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Reply<Paginated<ResourceView>>> {
    let filter = ResourceFilter {
        uploaded_by: Some(user_id),
        ..ResourceFilter::default()
    };
    let page = list_page(&state, filter, query).await?;
    Ok(Reply::ok(page, "User resources fetched successfully"))
}

pub async fn get_resource(
    State(state): State<AppState>,
    ApiPath(resource_id): ApiPath<Uuid>,
) -> ApiResult<Reply<ResourceView>> {
    let resource = load_resource(&state, resource_id).await?;
    Ok(Reply::ok(
        resource_view(&state, resource).await?,
        "Resource fetched successfully",
    ))
}

pub async fn upload_resource(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(request): ApiJson<UploadResourceRequest>,
) -> ApiResult<Reply<ResourceView>> {
    let title =
        non_blank(request.title).ok_or_else(|| BackendError::bad_request("Title is required"))?;

    let resource = state
        .repos
        .resources
        .create_resource(NewResource {
            uploaded_by: user.user_id,
            title,
            description: non_blank(request.description),
            file_url: non_blank(request.file_url)
                .unwrap_or_else(|| PLACEHOLDER_FILE_URL.to_string()),
            course_id: request.course,
        })
        .await?;

    tracing::info!(resource_id = %resource.id, by = %user.user_id, "Resource uploaded");
    Ok(Reply::created(
        resource_view(&state, resource).await?,
        "Resource uploaded successfully",
    ))
}

pub async fn update_resource(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiPath(resource_id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateResourceRequest>,
) -> ApiResult<Reply<ResourceView>> {
    let resource = load_resource(&state, resource_id).await?;
    ensure_owner_or_admin(&user, resource.uploaded_by, "update your own resources")?;

    let changes = ResourceChanges {
        title: non_blank(request.title),
        description: non_blank(request.description),
        file_url: non_blank(request.file_url),
        course_id: request.course,
    };

    let resource = state
        .repos
        .resources
        .update_resource(resource_id, changes)
        .await?
        .ok_or_else(resource_not_found)?;

    Ok(Reply::ok(
        resource_view(&state, resource).await?,
        "Resource updated successfully",
    ))
}

pub async fn delete_resource(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiPath(resource_id): ApiPath<Uuid>,
) -> ApiResult<Reply<Empty>> {
    let resource = load_resource(&state, resource_id).await?;
    ensure_owner_or_admin(&user, resource.uploaded_by, "delete your own resources")?;

    if !state.repos.resources.delete_resource(resource_id).await? {
        return Err(resource_not_found());
    }

    Ok(Reply::message("Resource deleted successfully"))
}
