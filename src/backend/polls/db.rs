/**
 * Poll Model and Database Operations
 *
 * Options are stored in `poll_options` keyed by position. Votes are stored
 * in `poll_votes` with one row per (poll, user), so casting a new vote
 * replaces the previous one.
 */

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::backend::store::{to_i64, PgStore, StoreResult};
use crate::shared::pagination::PageRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOption {
    pub text: String,
    /// Ids of users whose current vote is this option
    pub votes: Vec<Uuid>,
}

impl PollOption {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            votes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PollRecord {
    pub id: Uuid,
    pub created_by: Uuid,
    pub question: String,
    pub options: Vec<PollOption>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Why a vote was refused
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum VoteRejection {
    #[error("This poll has expired")]
    Expired,
    #[error("Invalid option index")]
    InvalidOption,
}

impl PollRecord {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at < now)
    }

    pub fn total_votes(&self) -> usize {
        self.options.iter().map(|option| option.votes.len()).sum()
    }

    pub fn has_votes(&self) -> bool {
        self.total_votes() > 0
    }

    /// Validate a vote and return the option position it targets
    pub fn check_vote(&self, option_index: i64, now: DateTime<Utc>) -> Result<usize, VoteRejection> {
        if self.is_expired(now) {
            return Err(VoteRejection::Expired);
        }
        usize::try_from(option_index)
            .ok()
            .filter(|index| *index < self.options.len())
            .ok_or(VoteRejection::InvalidOption)
    }

    /// Move the user's vote to `option_index`, removing it from every other option
    pub fn apply_vote(&mut self, user_id: Uuid, option_index: usize) {
        for option in &mut self.options {
            option.votes.retain(|voter| *voter != user_id);
        }
        if let Some(option) = self.options.get_mut(option_index) {
            option.votes.push(user_id);
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewPoll {
    pub created_by: Uuid,
    pub question: String,
    pub options: Vec<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct PollChanges {
    pub question: Option<String>,
    /// Replacement option texts. Only applied while the poll has no votes.
    pub options: Option<Vec<String>>,
    /// `Some(None)` clears the expiry
    pub expires_at: Option<Option<DateTime<Utc>>>,
}

#[async_trait]
pub trait PollRepository: Send + Sync {
    async fn create_poll(&self, poll: NewPoll) -> StoreResult<PollRecord>;

    async fn poll_by_id(&self, id: Uuid) -> StoreResult<Option<PollRecord>>;

    /// One page of polls, newest first
    async fn list_polls(&self, page: PageRequest) -> StoreResult<(Vec<PollRecord>, u64)>;

    /// Polls without expiry or expiring at or after `now`, newest first
    async fn active_polls(&self, now: DateTime<Utc>) -> StoreResult<Vec<PollRecord>>;

    async fn update_poll(&self, id: Uuid, changes: PollChanges) -> StoreResult<Option<PollRecord>>;

    async fn delete_poll(&self, id: Uuid) -> StoreResult<bool>;

    /// Record the user's vote, replacing any earlier one
    async fn record_vote(
        &self,
        poll_id: Uuid,
        user_id: Uuid,
        option_index: usize,
    ) -> StoreResult<Option<PollRecord>>;
}

#[derive(sqlx::FromRow)]
struct PollRow {
    id: Uuid,
    created_by: Uuid,
    question: String,
    expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct OptionRow {
    poll_id: Uuid,
    text: String,
}

#[derive(sqlx::FromRow)]
struct VoteRow {
    poll_id: Uuid,
    user_id: Uuid,
    option_index: i32,
}

impl PgStore {
    /// Attach options and votes to poll rows, keeping row order
    async fn hydrate_polls(&self, rows: Vec<PollRow>) -> StoreResult<Vec<PollRecord>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();

        let option_rows = sqlx::query_as::<_, OptionRow>(
            "SELECT poll_id, text FROM poll_options WHERE poll_id = ANY($1) ORDER BY poll_id, position",
        )
        .bind(&ids)
        .fetch_all(self.pool())
        .await?;

        let vote_rows = sqlx::query_as::<_, VoteRow>(
            "SELECT poll_id, user_id, option_index FROM poll_votes WHERE poll_id = ANY($1) ORDER BY created_at",
        )
        .bind(&ids)
        .fetch_all(self.pool())
        .await?;

        let mut options: HashMap<Uuid, Vec<PollOption>> = HashMap::new();
        for row in option_rows {
            options.entry(row.poll_id).or_default().push(PollOption::new(row.text));
        }
        for vote in vote_rows {
            let slot = options
                .get_mut(&vote.poll_id)
                .and_then(|poll_options| poll_options.get_mut(vote.option_index as usize));
            if let Some(option) = slot {
                option.votes.push(vote.user_id);
            }
        }

        Ok(rows
            .into_iter()
            .map(|row| PollRecord {
                options: options.remove(&row.id).unwrap_or_default(),
                id: row.id,
                created_by: row.created_by,
                question: row.question,
                expires_at: row.expires_at,
                created_at: row.created_at,
                updated_at: row.updated_at,
            })
            .collect())
    }
}

const POLL_COLUMNS: &str = "id, created_by, question, expires_at, created_at, updated_at";

#[async_trait]
impl PollRepository for PgStore {
    async fn create_poll(&self, poll: NewPoll) -> StoreResult<PollRecord> {
        let id = Uuid::new_v4();
        let mut tx = self.pool().begin().await?;

        sqlx::query(
            r#"
            INSERT INTO polls (id, created_by, question, expires_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            "#,
        )
        .bind(id)
        .bind(poll.created_by)
        .bind(&poll.question)
        .bind(poll.expires_at)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        for (position, text) in poll.options.iter().enumerate() {
            sqlx::query("INSERT INTO poll_options (poll_id, position, text) VALUES ($1, $2, $3)")
                .bind(id)
                .bind(position as i32)
                .bind(text)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        self.poll_by_id(id)
            .await?
            .ok_or_else(|| sqlx::Error::RowNotFound.into())
    }

    async fn poll_by_id(&self, id: Uuid) -> StoreResult<Option<PollRecord>> {
        let sql = format!("SELECT {POLL_COLUMNS} FROM polls WHERE id = $1");
        let row = sqlx::query_as::<_, PollRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        match row {
            Some(row) => Ok(self.hydrate_polls(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list_polls(&self, page: PageRequest) -> StoreResult<(Vec<PollRecord>, u64)> {
        let sql = format!(
            "SELECT {POLL_COLUMNS} FROM polls ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        );
        let rows = sqlx::query_as::<_, PollRow>(&sql)
            .bind(to_i64(page.limit))
            .bind(to_i64(page.skip()))
            .fetch_all(self.pool())
            .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM polls")
            .fetch_one(self.pool())
            .await?;

        Ok((self.hydrate_polls(rows).await?, total.max(0) as u64))
    }

    async fn active_polls(&self, now: DateTime<Utc>) -> StoreResult<Vec<PollRecord>> {
        let sql = format!(
            "SELECT {POLL_COLUMNS} FROM polls \
             WHERE expires_at IS NULL OR expires_at >= $1 \
             ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, PollRow>(&sql)
            .bind(now)
            .fetch_all(self.pool())
            .await?;
        self.hydrate_polls(rows).await
    }

    async fn update_poll(&self, id: Uuid, changes: PollChanges) -> StoreResult<Option<PollRecord>> {
        let mut tx = self.pool().begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE polls
            SET question = COALESCE($2, question),
                expires_at = CASE WHEN $3 THEN $4 ELSE expires_at END,
                updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&changes.question)
        .bind(changes.expires_at.is_some())
        .bind(changes.expires_at.flatten())
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        if let Some(options) = &changes.options {
            sqlx::query("DELETE FROM poll_options WHERE poll_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            for (position, text) in options.iter().enumerate() {
                sqlx::query("INSERT INTO poll_options (poll_id, position, text) VALUES ($1, $2, $3)")
                    .bind(id)
                    .bind(position as i32)
                    .bind(text)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;
        self.poll_by_id(id).await
    }

    async fn delete_poll(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM polls WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn record_vote(
        &self,
        poll_id: Uuid,
        user_id: Uuid,
        option_index: usize,
    ) -> StoreResult<Option<PollRecord>> {
        sqlx::query(
            r#"
            INSERT INTO poll_votes (poll_id, user_id, option_index, created_at)
            SELECT $1, $2, $3, $4 WHERE EXISTS (SELECT 1 FROM polls WHERE id = $1)
            ON CONFLICT (poll_id, user_id)
            DO UPDATE SET option_index = EXCLUDED.option_index, created_at = EXCLUDED.created_at
            "#,
        )
        .bind(poll_id)
        .bind(user_id)
        .bind(option_index as i32)
        .bind(Utc::now())
        .execute(self.pool())
        .await?;

        self.poll_by_id(poll_id).await
    }
}
