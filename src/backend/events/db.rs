/**
 * Database Operations for Events and Attendance
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::backend::store::{to_i64, PgStore, StoreResult};
use crate::shared::pagination::PageRequest;

/// Upper bound on `GET /events/upcoming`
pub const UPCOMING_LIMIT: u64 = 10;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EventRecord {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub location: Option<String>,
    /// Attending user ids in the order they joined
    pub attendees: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct EventChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create_event(&self, event: NewEvent) -> StoreResult<EventRecord>;

    async fn event_by_id(&self, id: Uuid) -> StoreResult<Option<EventRecord>>;

    /// One page of events ordered by date ascending
    async fn list_events(&self, page: PageRequest) -> StoreResult<(Vec<EventRecord>, u64)>;

    /// Events dated at or after `now`, soonest first
    async fn upcoming_events(&self, now: DateTime<Utc>, limit: u64) -> StoreResult<Vec<EventRecord>>;

    async fn update_event(&self, id: Uuid, changes: EventChanges)
        -> StoreResult<Option<EventRecord>>;

    async fn delete_event(&self, id: Uuid) -> StoreResult<bool>;

    /// Flip attendance. Returns `(attending, attendees_count)`, or `None` when
    /// the event does not exist.
    async fn toggle_attendance(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<(bool, usize)>>;
}

const EVENT_SELECT: &str = r#"
    SELECT e.id, e.owner_id, e.title, e.description, e.date, e.location,
           ARRAY(SELECT a.user_id FROM event_attendees a WHERE a.event_id = e.id
                 ORDER BY a.created_at) AS attendees,
           e.created_at, e.updated_at
    FROM events e
"#;

#[async_trait]
impl EventRepository for PgStore {
    async fn create_event(&self, event: NewEvent) -> StoreResult<EventRecord> {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO events (id, owner_id, title, description, date, location, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            "#,
        )
        .bind(id)
        .bind(event.owner_id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(&event.location)
        .bind(Utc::now())
        .execute(self.pool())
        .await?;

        self.event_by_id(id)
            .await?
            .ok_or_else(|| sqlx::Error::RowNotFound.into())
    }

    async fn event_by_id(&self, id: Uuid) -> StoreResult<Option<EventRecord>> {
        let sql = format!("{EVENT_SELECT} WHERE e.id = $1");
        let event = sqlx::query_as::<_, EventRecord>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(event)
    }

    async fn list_events(&self, page: PageRequest) -> StoreResult<(Vec<EventRecord>, u64)> {
        let sql = format!("{EVENT_SELECT} ORDER BY e.date ASC LIMIT $1 OFFSET $2");
        let events = sqlx::query_as::<_, EventRecord>(&sql)
            .bind(to_i64(page.limit))
            .bind(to_i64(page.skip()))
            .fetch_all(self.pool())
            .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events")
            .fetch_one(self.pool())
            .await?;

        Ok((events, total.max(0) as u64))
    }

    async fn upcoming_events(&self, now: DateTime<Utc>, limit: u64) -> StoreResult<Vec<EventRecord>> {
        let sql = format!("{EVENT_SELECT} WHERE e.date >= $1 ORDER BY e.date ASC LIMIT $2");
        let events = sqlx::query_as::<_, EventRecord>(&sql)
            .bind(now)
            .bind(to_i64(limit))
            .fetch_all(self.pool())
            .await?;
        Ok(events)
    }

    async fn update_event(
        &self,
        id: Uuid,
        changes: EventChanges,
    ) -> StoreResult<Option<EventRecord>> {
        let result = sqlx::query(
            r#"
            UPDATE events
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                date = COALESCE($4, date),
                location = COALESCE($5, location),
                updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(changes.date)
        .bind(&changes.location)
        .bind(Utc::now())
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.event_by_id(id).await
    }

    async fn delete_event(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn toggle_attendance(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<(bool, usize)>> {
        let mut tx = self.pool().begin().await?;

        let exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM events WHERE id = $1")
            .bind(event_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Ok(None);
        }

        let removed =
            sqlx::query("DELETE FROM event_attendees WHERE event_id = $1 AND user_id = $2")
                .bind(event_id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?
                .rows_affected()
                > 0;

        if !removed {
            sqlx::query(
                "INSERT INTO event_attendees (event_id, user_id, created_at) VALUES ($1, $2, $3) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(event_id)
            .bind(user_id)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
        }

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM event_attendees WHERE event_id = $1")
                .bind(event_id)
                .fetch_one(&mut *tx)
                .await?;

        tx.commit().await?;
        Ok(Some((!removed, count.max(0) as usize)))
    }
}
