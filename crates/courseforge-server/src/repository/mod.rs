//! Repository interfaces
//!
//! Features talk to storage only through the traits below. Two implementations exist:
//! [`MemoryStore`] for development and tests, and [`PostgresStore`] for deployments.
//! Every method is scoped by owner where ownership applies, so a course belonging to
//! another user is indistinguishable from one that does not exist.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use courseforge_common::types::{Course, SettingsGroup, SettingsPatch, User, UserStats};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::StorageBackend;
use crate::db::DbResult;

/// A hashed bearer token bound to a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token_hash: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user; a taken email is [`DbError::Duplicate`](crate::db::DbError::Duplicate)
    async fn create_user(&self, user: &User) -> DbResult<()>;

    async fn find_user_by_id(&self, id: Uuid) -> DbResult<Option<User>>;

    /// Look up by normalized (lowercase) email
    async fn find_user_by_email(&self, email: &str) -> DbResult<Option<User>>;

    /// Set name and/or email, leaving every other column as stored; returns the updated user
    ///
    /// A taken email is [`DbError::Duplicate`](crate::db::DbError::Duplicate).
    async fn update_profile_fields(
        &self,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
        updated_at: DateTime<Utc>,
    ) -> DbResult<User>;

    async fn update_password_hash(
        &self,
        id: Uuid,
        password_hash: &str,
        updated_at: DateTime<Utc>,
    ) -> DbResult<()>;

    /// Apply `patch` to the stored settings group and write back only that group
    async fn update_settings(
        &self,
        id: Uuid,
        patch: SettingsPatch,
        updated_at: DateTime<Utc>,
    ) -> DbResult<SettingsGroup>;

    /// Overwrite the cached stats aggregate
    async fn update_stats(&self, user_id: Uuid, stats: UserStats) -> DbResult<()>;
}

#[async_trait]
pub trait CourseRepository: Send + Sync {
    async fn insert_course(&self, course: &Course) -> DbResult<()>;

    async fn find_course(&self, owner_id: Uuid, id: Uuid) -> DbResult<Option<Course>>;

    /// One page of an owner's courses, newest first, plus the owner's total count
    async fn list_courses(
        &self,
        owner_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> DbResult<(Vec<Course>, i64)>;

    async fn all_courses(&self, owner_id: Uuid) -> DbResult<Vec<Course>>;

    async fn update_course(&self, course: &Course) -> DbResult<()>;

    /// Returns false when the owner has no such course
    async fn delete_course(&self, owner_id: Uuid, id: Uuid) -> DbResult<bool>;
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Store a new session, dropping sessions that have already expired
    async fn create_session(&self, session: &Session) -> DbResult<()>;

    /// The session for `token_hash` if it exists and has not expired at `now`
    async fn find_active_session(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> DbResult<Option<Session>>;

    async fn revoke_session(&self, token_hash: &str) -> DbResult<bool>;

    /// Revoke every session of a user, returning how many were removed
    async fn revoke_user_sessions(&self, user_id: Uuid) -> DbResult<u64>;
}

/// Handles to all repositories, cheap to clone into request state
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub courses: Arc<dyn CourseRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    backend: StorageBackend,
    pool: Option<PgPool>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::default());
        Self {
            users: store.clone(),
            courses: store.clone(),
            sessions: store,
            backend: StorageBackend::Memory,
            pool: None,
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        let store = Arc::new(PostgresStore::new(pool.clone()));
        Self {
            users: store.clone(),
            courses: store.clone(),
            sessions: store,
            backend: StorageBackend::Postgres,
            pool: Some(pool),
        }
    }

    pub fn backend(&self) -> StorageBackend {
        self.backend
    }

    pub async fn health_check(&self) -> DbResult<()> {
        match &self.pool {
            Some(pool) => crate::db::health_check(pool).await,
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for Repositories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repositories")
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}
