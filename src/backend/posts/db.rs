/**
 * Database Operations for Posts and Likes
 *
 * Likes live in `post_likes` with one row per (post, user). Post rows are
 * loaded with their like and comment ids aggregated into arrays.
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::backend::store::{to_i64, PgStore, StoreResult};
use crate::shared::pagination::PageRequest;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRecord {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: Option<String>,
    pub content: String,
    pub media: Option<String>,
    pub tags: Vec<String>,
    /// Ids of users who liked the post
    pub likes: Vec<Uuid>,
    /// Ids of comments on the post, oldest first
    pub comments: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub owner_id: Uuid,
    pub title: Option<String>,
    pub content: String,
    pub media: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub media: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Narrow a post listing to one owner or one tag
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub owner_id: Option<Uuid>,
    pub tag: Option<String>,
}

impl PostFilter {
    pub fn matches(&self, post: &PostRecord) -> bool {
        self.owner_id.is_none_or(|owner| owner == post.owner_id)
            && self
                .tag
                .as_deref()
                .is_none_or(|tag| post.tags.iter().any(|own| own == tag))
    }
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create_post(&self, post: NewPost) -> StoreResult<PostRecord>;

    async fn post_by_id(&self, id: Uuid) -> StoreResult<Option<PostRecord>>;

    /// One page of posts, newest first, with the total match count
    async fn list_posts(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> StoreResult<(Vec<PostRecord>, u64)>;

    async fn update_post(&self, id: Uuid, changes: PostChanges)
        -> StoreResult<Option<PostRecord>>;

    /// Delete a post and its comments
    async fn delete_post(&self, id: Uuid) -> StoreResult<bool>;

    /// Flip the user's like. Returns `(is_liked, likes_count)`, or `None` when
    /// the post does not exist.
    async fn toggle_like(&self, post_id: Uuid, user_id: Uuid) -> StoreResult<Option<(bool, usize)>>;
}

const POST_SELECT: &str = r#"
    SELECT p.id, p.owner_id, p.title, p.content, p.media, p.tags,
           ARRAY(SELECT l.user_id FROM post_likes l WHERE l.post_id = p.id
                 ORDER BY l.created_at) AS likes,
           ARRAY(SELECT c.id FROM comments c WHERE c.post_id = p.id
                 ORDER BY c.created_at) AS comments,
           p.created_at, p.updated_at
    FROM posts p
"#;

#[async_trait]
impl PostRepository for PgStore {
    async fn create_post(&self, post: NewPost) -> StoreResult<PostRecord> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO posts (id, owner_id, title, content, media, tags, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            "#,
        )
        .bind(id)
        .bind(post.owner_id)
        .bind(&post.title)
        .bind(&post.content)
        .bind(&post.media)
        .bind(&post.tags)
        .bind(now)
        .execute(self.pool())
        .await?;

        self.post_by_id(id)
            .await?
            .ok_or_else(|| sqlx::Error::RowNotFound.into())
    }

    async fn post_by_id(&self, id: Uuid) -> StoreResult<Option<PostRecord>> {
        let sql = format!("{POST_SELECT} WHERE p.id = $1");
        let post = sqlx::query_as::<_, PostRecord>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(post)
    }

    async fn list_posts(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> StoreResult<(Vec<PostRecord>, u64)> {
        const WHERE: &str = "WHERE ($1::uuid IS NULL OR p.owner_id = $1) \
                             AND ($2::text IS NULL OR $2 = ANY(p.tags))";

        let sql = format!("{POST_SELECT} {WHERE} ORDER BY p.created_at DESC LIMIT $3 OFFSET $4");
        let posts = sqlx::query_as::<_, PostRecord>(&sql)
            .bind(filter.owner_id)
            .bind(&filter.tag)
            .bind(to_i64(page.limit))
            .bind(to_i64(page.skip()))
            .fetch_all(self.pool())
            .await?;

        let count_sql = format!("SELECT COUNT(*) FROM posts p {WHERE}");
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(filter.owner_id)
            .bind(&filter.tag)
            .fetch_one(self.pool())
            .await?;

        Ok((posts, total.max(0) as u64))
    }

    async fn update_post(
        &self,
        id: Uuid,
        changes: PostChanges,
    ) -> StoreResult<Option<PostRecord>> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET title = COALESCE($2, title),
                content = COALESCE($3, content),
                media = COALESCE($4, media),
                tags = COALESCE($5, tags),
                updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.content)
        .bind(&changes.media)
        .bind(&changes.tags)
        .bind(Utc::now())
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.post_by_id(id).await
    }

    async fn delete_post(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn toggle_like(&self, post_id: Uuid, user_id: Uuid) -> StoreResult<Option<(bool, usize)>> {
        let mut tx = self.pool().begin().await?;

        let exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM posts WHERE id = $1")
            .bind(post_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Ok(None);
        }

        let removed = sqlx::query("DELETE FROM post_likes WHERE post_id = $1 AND user_id = $2")
            .bind(post_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected()
            > 0;

        if !removed {
            sqlx::query(
                "INSERT INTO post_likes (post_id, user_id, created_at) VALUES ($1, $2, $3) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(post_id)
            .bind(user_id)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
        }

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM post_likes WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some((!removed, count.max(0) as usize)))
    }
}
