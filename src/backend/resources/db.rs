/**
 * Database Operations for Shared Resources
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::backend::store::{to_i64, PgStore, StoreResult};
use crate::shared::pagination::PageRequest;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ResourceRecord {
    pub id: Uuid,
    pub uploaded_by: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub file_url: String,
    pub course_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewResource {
    pub uploaded_by: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub file_url: String,
    pub course_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct ResourceChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub file_url: Option<String>,
    pub course_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct ResourceFilter {
    pub course_id: Option<Uuid>,
    pub uploaded_by: Option<Uuid>,
    /// Case-insensitive substring of title or description
    pub search: Option<String>,
}

impl ResourceFilter {
    pub fn matches(&self, resource: &ResourceRecord) -> bool {
        let search_ok = self.search.as_deref().is_none_or(|search| {
            let search = search.to_lowercase();
            resource.title.to_lowercase().contains(&search)
                || resource
                    .description
                    .as_deref()
                    .is_some_and(|description| description.to_lowercase().contains(&search))
        });
        search_ok
            && self.course_id.is_none_or(|course| resource.course_id == Some(course))
            && self.uploaded_by.is_none_or(|user| resource.uploaded_by == user)
    }
}

#[async_trait]
pub trait ResourceRepository: Send + Sync {
    async fn create_resource(&self, resource: NewResource) -> StoreResult<ResourceRecord>;

    async fn resource_by_id(&self, id: Uuid) -> StoreResult<Option<ResourceRecord>>;

    /// One page of matching resources, newest first
    async fn list_resources(
        &self,
        filter: &ResourceFilter,
        page: PageRequest,
    ) -> StoreResult<(Vec<ResourceRecord>, u64)>;

    async fn update_resource(
        &self,
        id: Uuid,
        changes: ResourceChanges,
    ) -> StoreResult<Option<ResourceRecord>>;

    async fn delete_resource(&self, id: Uuid) -> StoreResult<bool>;
}

const RESOURCE_COLUMNS: &str =
    "id, uploaded_by, title, description, file_url, course_id, created_at, updated_at";

#[async_trait]
impl ResourceRepository for PgStore {
    async fn create_resource(&self, resource: NewResource) -> StoreResult<ResourceRecord> {
        let sql = format!(
            r#"
            INSERT INTO resources (id, uploaded_by, title, description, file_url, course_id,
                                   created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING {RESOURCE_COLUMNS}
            "#
        );
        let record = sqlx::query_as::<_, ResourceRecord>(&sql)
            .bind(Uuid::new_v4())
            .bind(resource.uploaded_by)
            .bind(&resource.title)
            .bind(&resource.description)
            .bind(&resource.file_url)
            .bind(resource.course_id)
            .bind(Utc::now())
            .fetch_one(self.pool())
            .await?;
        Ok(record)
    }

    async fn resource_by_id(&self, id: Uuid) -> StoreResult<Option<ResourceRecord>> {
        let sql = format!("SELECT {RESOURCE_COLUMNS} FROM resources WHERE id = $1");
        let record = sqlx::query_as::<_, ResourceRecord>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(record)
    }

    async fn list_resources(
        &self,
        filter: &ResourceFilter,
        page: PageRequest,
    ) -> StoreResult<(Vec<ResourceRecord>, u64)> {
        const WHERE: &str = r#"
            WHERE ($1::uuid IS NULL OR course_id = $1)
              AND ($2::uuid IS NULL OR uploaded_by = $2)
              AND ($3::text IS NULL
                   OR strpos(lower(title), lower($3)) > 0
                   OR strpos(lower(COALESCE(description, '')), lower($3)) > 0)
        "#;

        let sql = format!(
            "SELECT {RESOURCE_COLUMNS} FROM resources {WHERE} \
             ORDER BY created_at DESC LIMIT $4 OFFSET $5"
        );
        let records = sqlx::query_as::<_, ResourceRecord>(&sql)
            .bind(filter.course_id)
            .bind(filter.uploaded_by)
            .bind(&filter.search)
            .bind(to_i64(page.limit))
            .bind(to_i64(page.skip()))
            .fetch_all(self.pool())
            .await?;

        let count_sql = format!("SELECT COUNT(*) FROM resources {WHERE}");
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(filter.course_id)
            .bind(filter.uploaded_by)
            .bind(&filter.search)
            .fetch_one(self.pool())
            .await?;

        Ok((records, total.max(0) as u64))
    }

    async fn update_resource(
        &self,
        id: Uuid,
        changes: ResourceChanges,
    ) -> StoreResult<Option<ResourceRecord>> {
        let sql = format!(
            r#"
            UPDATE resources
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                file_url = COALESCE($4, file_url),
                course_id = COALESCE($5, course_id),
                updated_at = $6
            WHERE id = $1
            RETURNING {RESOURCE_COLUMNS}
            "#
        );
        let record = sqlx::query_as::<_, ResourceRecord>(&sql)
            .bind(id)
            .bind(&changes.title)
            .bind(&changes.description)
            .bind(&changes.file_url)
            .bind(changes.course_id)
            .bind(Utc::now())
            .fetch_optional(self.pool())
            .await?;
        Ok(record)
    }

    async fn delete_resource(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM resources WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
