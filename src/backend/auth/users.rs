/**
 * User Model and Database Operations
 *
 * This module holds the stored user record, the repository trait every store
 * implements, and the PostgreSQL implementation of that trait.
 */

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::backend::store::{map_unique, PgStore, StoreResult};
use crate::shared::models::{Role, UserProfile, UserSummary};

/// User row as stored in the database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    /// Trimmed and lowercased, unique
    pub username: String,
    /// Trimmed and lowercased, unique
    pub email: String,
    pub fullname: String,
    /// Hashed password (bcrypt)
    pub password_hash: String,
    pub bio: Option<String>,
    pub avatar: String,
    pub cover_image: Option<String>,
    pub department: Option<String>,
    #[sqlx(try_from = "String")]
    pub role: Role,
    /// Refresh token currently accepted for this user
    pub refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    /// Client-facing view without the password hash or refresh token
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            fullname: self.fullname.clone(),
            bio: self.bio.clone(),
            avatar: self.avatar.clone(),
            cover_image: self.cover_image.clone(),
            department: self.department.clone(),
            role: self.role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            fullname: self.fullname.clone(),
            avatar: self.avatar.clone(),
        }
    }
}

/// Fields for a new account. Username and email are already normalized.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub fullname: String,
    pub password_hash: String,
    pub bio: Option<String>,
    pub avatar: String,
    pub cover_image: Option<String>,
    pub department: Option<String>,
    pub role: Role,
}

/// Partial profile update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub fullname: Option<String>,
    pub bio: Option<String>,
    pub department: Option<String>,
    pub avatar: Option<String>,
    pub cover_image: Option<String>,
}

/// Admin search filter
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Case-insensitive substring of username, fullname or email
    pub keyword: Option<String>,
    pub role: Option<Role>,
    /// Case-insensitive department match
    pub department: Option<String>,
}

impl UserFilter {
    /// In-process evaluation of the filter
    pub fn matches(&self, user: &UserRecord) -> bool {
        let keyword_ok = self.keyword.as_deref().is_none_or(|keyword| {
            let keyword = keyword.to_lowercase();
            [&user.username, &user.fullname, &user.email]
                .iter()
                .any(|field| field.to_lowercase().contains(&keyword))
        });
        let role_ok = self.role.is_none_or(|role| role == user.role);
        let department_ok = self.department.as_deref().is_none_or(|department| {
            user.department
                .as_deref()
                .is_some_and(|own| own.eq_ignore_ascii_case(department))
        });
        keyword_ok && role_ok && department_ok
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user. Duplicate username or email yields `StoreError::Conflict`.
    async fn create_user(&self, user: NewUser) -> StoreResult<UserRecord>;

    async fn user_by_id(&self, id: Uuid) -> StoreResult<Option<UserRecord>>;

    async fn user_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>>;

    async fn user_by_username(&self, username: &str) -> StoreResult<Option<UserRecord>>;

    /// All users, newest first
    async fn list_users(&self) -> StoreResult<Vec<UserRecord>>;

    /// Users matching the filter, newest first
    async fn search_users(&self, filter: &UserFilter) -> StoreResult<Vec<UserRecord>>;

    async fn update_profile(
        &self,
        id: Uuid,
        changes: ProfileChanges,
    ) -> StoreResult<Option<UserRecord>>;

    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> StoreResult<()>;

    /// Store or clear the refresh token accepted for a user
    async fn set_refresh_token(&self, id: Uuid, token: Option<&str>) -> StoreResult<()>;

    /// Delete a user and everything they own. Returns false when absent.
    async fn delete_user(&self, id: Uuid) -> StoreResult<bool>;

    /// Owner summaries keyed by id. Unknown ids are omitted.
    async fn user_summaries(&self, ids: &[Uuid]) -> StoreResult<HashMap<Uuid, UserSummary>>;
}

/// Resolve a summary, falling back to a placeholder for unknown ids
pub fn summary_for(summaries: &HashMap<Uuid, UserSummary>, id: Uuid) -> UserSummary {
    summaries
        .get(&id)
        .cloned()
        .unwrap_or_else(|| UserSummary::unknown(id))
}

const USER_COLUMNS: &str = "id, username, email, fullname, password_hash, bio, avatar, \
     cover_image, department, role, refresh_token, created_at, updated_at";

#[async_trait]
impl UserRepository for PgStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<UserRecord> {
        let now = Utc::now();
        let sql = format!(
            r#"
            INSERT INTO users (id, username, email, fullname, password_hash, bio, avatar,
                               cover_image, department, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
            RETURNING {USER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, UserRecord>(&sql)
            .bind(Uuid::new_v4())
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.fullname)
            .bind(&user.password_hash)
            .bind(&user.bio)
            .bind(&user.avatar)
            .bind(&user.cover_image)
            .bind(&user.department)
            .bind(user.role.as_str())
            .bind(now)
            .fetch_one(self.pool())
            .await
            .map_err(map_unique)
    }

    async fn user_by_id(&self, id: Uuid) -> StoreResult<Option<UserRecord>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(user)
    }

    async fn user_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let user = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(email)
            .fetch_optional(self.pool())
            .await?;
        Ok(user)
    }

    async fn user_by_username(&self, username: &str) -> StoreResult<Option<UserRecord>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        let user = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(username)
            .fetch_optional(self.pool())
            .await?;
        Ok(user)
    }

    async fn list_users(&self) -> StoreResult<Vec<UserRecord>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC");
        let users = sqlx::query_as::<_, UserRecord>(&sql)
            .fetch_all(self.pool())
            .await?;
        Ok(users)
    }

    async fn search_users(&self, filter: &UserFilter) -> StoreResult<Vec<UserRecord>> {
        let sql = format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE ($1::text IS NULL
                   OR strpos(lower(username), lower($1)) > 0
                   OR strpos(lower(fullname), lower($1)) > 0
                   OR strpos(lower(email), lower($1)) > 0)
              AND ($2::text IS NULL OR role = $2)
              AND ($3::text IS NULL OR lower(department) = lower($3))
            ORDER BY created_at DESC
            "#
        );
        let users = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(&filter.keyword)
            .bind(filter.role.map(|role| role.as_str()))
            .bind(&filter.department)
            .fetch_all(self.pool())
            .await?;
        Ok(users)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        changes: ProfileChanges,
    ) -> StoreResult<Option<UserRecord>> {
        let sql = format!(
            r#"
            UPDATE users
            SET fullname = COALESCE($2, fullname),
                bio = COALESCE($3, bio),
                department = COALESCE($4, department),
                avatar = COALESCE($5, avatar),
                cover_image = COALESCE($6, cover_image),
                updated_at = $7
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );
        let user = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(id)
            .bind(&changes.fullname)
            .bind(&changes.bio)
            .bind(&changes.department)
            .bind(&changes.avatar)
            .bind(&changes.cover_image)
            .bind(Utc::now())
            .fetch_optional(self.pool())
            .await?;
        Ok(user)
    }

    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> StoreResult<()> {
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = $3 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .bind(Utc::now())
            .execute(self.pool())
            .await?;
        Ok(())
    }

    async fn set_refresh_token(&self, id: Uuid, token: Option<&str>) -> StoreResult<()> {
        sqlx::query("UPDATE users SET refresh_token = $2 WHERE id = $1")
            .bind(id)
            .bind(token)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn user_summaries(&self, ids: &[Uuid]) -> StoreResult<HashMap<Uuid, UserSummary>> {
        #[derive(sqlx::FromRow)]
        struct SummaryRow {
            id: Uuid,
            username: String,
            fullname: String,
            avatar: String,
        }

        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, SummaryRow>(
            "SELECT id, username, fullname, avatar FROM users WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(self.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let summary = UserSummary {
                    id: row.id,
                    username: row.username,
                    fullname: row.fullname,
                    avatar: row.avatar,
                };
                (row.id, summary)
            })
            .collect())
    }
}
