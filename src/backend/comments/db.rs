/**
 * Database Operations for Comments
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::backend::store::{to_i64, PgStore, StoreResult};
use crate::shared::pagination::PageRequest;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentRecord {
    pub id: Uuid,
    pub post_id: Uuid,
    pub owner_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: Uuid,
    pub owner_id: Uuid,
    pub text: String,
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create_comment(&self, comment: NewComment) -> StoreResult<CommentRecord>;

    async fn comment_by_id(&self, id: Uuid) -> StoreResult<Option<CommentRecord>>;

    /// One page of a post's comments, newest first
    async fn comments_for_post(
        &self,
        post_id: Uuid,
        page: PageRequest,
    ) -> StoreResult<(Vec<CommentRecord>, u64)>;

    async fn update_comment(&self, id: Uuid, text: &str) -> StoreResult<Option<CommentRecord>>;

    async fn delete_comment(&self, id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
impl CommentRepository for PgStore {
    async fn create_comment(&self, comment: NewComment) -> StoreResult<CommentRecord> {
        let now = Utc::now();
        let record = sqlx::query_as::<_, CommentRecord>(
            r#"
            INSERT INTO comments (id, post_id, owner_id, text, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING id, post_id, owner_id, text, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(comment.post_id)
        .bind(comment.owner_id)
        .bind(&comment.text)
        .bind(now)
        .fetch_one(self.pool())
        .await?;
        Ok(record)
    }

    async fn comment_by_id(&self, id: Uuid) -> StoreResult<Option<CommentRecord>> {
        let record = sqlx::query_as::<_, CommentRecord>(
            "SELECT id, post_id, owner_id, text, created_at, updated_at FROM comments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(record)
    }

    async fn comments_for_post(
        &self,
        post_id: Uuid,
        page: PageRequest,
    ) -> StoreResult<(Vec<CommentRecord>, u64)> {
        let records = sqlx::query_as::<_, CommentRecord>(
            r#"
            SELECT id, post_id, owner_id, text, created_at, updated_at
            FROM comments
            WHERE post_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(post_id)
        .bind(to_i64(page.limit))
        .bind(to_i64(page.skip()))
        .fetch_all(self.pool())
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(self.pool())
            .await?;

        Ok((records, total.max(0) as u64))
    }

    async fn update_comment(&self, id: Uuid, text: &str) -> StoreResult<Option<CommentRecord>> {
        let record = sqlx::query_as::<_, CommentRecord>(
            r#"
            UPDATE comments SET text = $2, updated_at = $3
            WHERE id = $1
            RETURNING id, post_id, owner_id, text, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(text)
        .bind(Utc::now())
        .fetch_optional(self.pool())
        .await?;
        Ok(record)
    }

    async fn delete_comment(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
