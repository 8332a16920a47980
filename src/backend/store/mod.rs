//! Storage Layer
//!
//! Every domain talks to storage through an async repository trait defined
//! next to its records (`auth::users`, `posts::db`, ...). Two stores implement
//! all of them:
//!
//! - **`PgStore`** - PostgreSQL through `sqlx`, used when `DATABASE_URL` is set
//! - **`MemoryStore`** - a single in-process map set, used for development
//!   without a database and by the test suite
//!
//! # Module Structure
//!
//! ```text
//! store/
//! ├── mod.rs     - StoreError, PgStore, Repositories bundle
//! └── memory.rs  - MemoryStore
//! ```
//!
//! Deleting a user removes the content they own. Deleting a post removes its
//! comments. Postgres does this with `ON DELETE CASCADE`, the memory store by
//! hand.

use std::sync::Arc;

use sqlx::PgPool;
use thiserror::Error;

use crate::backend::auth::users::UserRepository;
use crate::backend::comments::db::CommentRepository;
use crate::backend::events::db::EventRepository;
use crate::backend::groups::db::GroupRepository;
use crate::backend::polls::db::PollRepository;
use crate::backend::posts::db::PostRepository;
use crate::backend::resources::db::ResourceRepository;

pub mod memory;

pub use memory::MemoryStore;

/// Postgres error code for `unique_violation`
const UNIQUE_VIOLATION: &str = "23505";

/// Errors raised by repositories
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A unique constraint rejected the write
    #[error("duplicate value violates {0}")]
    Conflict(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Turn unique violations into `StoreError::Conflict`
pub(crate) fn map_unique(err: sqlx::Error) -> StoreError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            let constraint = db_err.constraint().unwrap_or("unique constraint").to_string();
            return StoreError::Conflict(constraint);
        }
    }
    StoreError::Database(err)
}

/// Convert a page offset or limit into a SQL bind value
pub(crate) fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// PostgreSQL implementation of every repository trait
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Repository handles shared through `AppState`
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub events: Arc<dyn EventRepository>,
    pub polls: Arc<dyn PollRepository>,
    pub resources: Arc<dyn ResourceRepository>,
    pub groups: Arc<dyn GroupRepository>,
}

impl Repositories {
    /// All repositories backed by one Postgres pool
    pub fn postgres(pool: PgPool) -> Self {
        Self::from_store(Arc::new(PgStore::new(pool)))
    }

    /// All repositories backed by one shared in-memory store
    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(MemoryStore::default()))
    }

    fn from_store<S>(store: Arc<S>) -> Self
    where
        S: UserRepository
            + PostRepository
            + CommentRepository
            + EventRepository
            + PollRepository
            + ResourceRepository
            + GroupRepository
            + 'static,
    {
        Self {
            users: store.clone(),
            posts: store.clone(),
            comments: store.clone(),
            events: store.clone(),
            polls: store.clone(),
            resources: store.clone(),
            groups: store,
        }
    }
}
