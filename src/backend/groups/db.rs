/**
 * Database Operations for Groups and Membership
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::backend::store::{to_i64, PgStore, StoreResult};
use crate::shared::pagination::PageRequest;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GroupRecord {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub admin_id: Uuid,
    /// Member ids in join order; the group admin joins first
    pub members: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewGroup {
    pub name: String,
    pub description: Option<String>,
    pub admin_id: Uuid,
}

#[derive(Debug, Clone, Default)]
pub struct GroupChanges {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Create a group with its admin as the first member
    async fn create_group(&self, group: NewGroup) -> StoreResult<GroupRecord>;

    async fn group_by_id(&self, id: Uuid) -> StoreResult<Option<GroupRecord>>;

    /// One page of groups, newest first
    async fn list_groups(&self, page: PageRequest) -> StoreResult<(Vec<GroupRecord>, u64)>;

    async fn update_group(&self, id: Uuid, changes: GroupChanges)
        -> StoreResult<Option<GroupRecord>>;

    async fn delete_group(&self, id: Uuid) -> StoreResult<bool>;

    /// Flip membership. Returns `(member, members_count)`, or `None` when the
    /// group does not exist.
    async fn toggle_membership(
        &self,
        group_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<(bool, usize)>>;
}

const GROUP_SELECT: &str = r#"
    SELECT g.id, g.name, g.description, g.admin_id,
           ARRAY(SELECT m.user_id FROM group_members m WHERE m.group_id = g.id
                 ORDER BY m.created_at) AS members,
           g.created_at, g.updated_at
    FROM groups g
"#;

#[async_trait]
impl GroupRepository for PgStore {
    async fn create_group(&self, group: NewGroup) -> StoreResult<GroupRecord> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let mut tx = self.pool().begin().await?;

        sqlx::query(
            r#"
            INSERT INTO groups (id, name, description, admin_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            "#,
        )
        .bind(id)
        .bind(&group.name)
        .bind(&group.description)
        .bind(group.admin_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO group_members (group_id, user_id, created_at) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(group.admin_id)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        self.group_by_id(id)
            .await?
            .ok_or_else(|| sqlx::Error::RowNotFound.into())
    }

    async fn group_by_id(&self, id: Uuid) -> StoreResult<Option<GroupRecord>> {
        let sql = format!("{GROUP_SELECT} WHERE g.id = $1");
        let group = sqlx::query_as::<_, GroupRecord>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(group)
    }

    async fn list_groups(&self, page: PageRequest) -> StoreResult<(Vec<GroupRecord>, u64)> {
        let sql = format!("{GROUP_SELECT} ORDER BY g.created_at DESC LIMIT $1 OFFSET $2");
        let groups = sqlx::query_as::<_, GroupRecord>(&sql)
            .bind(to_i64(page.limit))
            .bind(to_i64(page.skip()))
            .fetch_all(self.pool())
            .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM groups")
            .fetch_one(self.pool())
            .await?;

        Ok((groups, total.max(0) as u64))
    }

    async fn update_group(
        &self,
        id: Uuid,
        changes: GroupChanges,
    ) -> StoreResult<Option<GroupRecord>> {
        let result = sqlx::query(
            r#"
            UPDATE groups
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(Utc::now())
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.group_by_id(id).await
    }

    async fn delete_group(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn toggle_membership(
        &self,
        group_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<(bool, usize)>> {
        let mut tx = self.pool().begin().await?;

        let exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM groups WHERE id = $1")
            .bind(group_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Ok(None);
        }

        let removed = sqlx::query("DELETE FROM group_members WHERE group_id = $1 AND user_id = $2")
            .bind(group_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected()
            > 0;

        if !removed {
            sqlx::query(
                "INSERT INTO group_members (group_id, user_id, created_at) VALUES ($1, $2, $3) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(group_id)
            .bind(user_id)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
        }

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM group_members WHERE group_id = $1")
                .bind(group_id)
                .fetch_one(&mut *tx)
                .await?;

        tx.commit().await?;
        Ok(Some((!removed, count.max(0) as usize)))
    }
}
