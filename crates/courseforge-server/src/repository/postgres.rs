//! PostgreSQL storage
//!
//! Content arrays (notes, quizzes, flashcards) and settings groups live in JSONB columns;
//! everything that is filtered or sorted on is a plain column.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use courseforge_common::types::{
    Course, Flashcard, NotificationSettings, Note, Preferences, PrivacySettings, Quiz,
    SettingsGroup, SettingsPatch, User, UserStats,
};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::{CourseRepository, Session, SessionRepository, UserRepository};
use crate::db::{is_unique_violation, DbError, DbResult};

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    avatar: Option<String>,
    preferences: Json<Preferences>,
    notifications: Json<NotificationSettings>,
    privacy: Json<PrivacySettings>,
    stats: Json<UserStats>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            avatar: row.avatar,
            preferences: row.preferences.0,
            notifications: row.notifications.0,
            privacy: row.privacy.0,
            stats: row.stats.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CourseRow {
    id: Uuid,
    owner_id: Uuid,
    title: String,
    description: String,
    thumbnail: String,
    video_url: Option<String>,
    duration: String,
    lessons: i64,
    progress: i16,
    source_type: String,
    notes: Json<Vec<Note>>,
    quizzes: Json<Vec<Quiz>>,
    flashcards: Json<Vec<Flashcard>>,
    original_file_name: Option<String>,
    file_size: Option<i64>,
    category: String,
    difficulty: String,
    tags: Vec<String>,
    is_public: bool,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CourseRow> for Course {
    type Error = DbError;

    fn try_from(row: CourseRow) -> Result<Self, Self::Error> {
        Ok(Course {
            id: row.id,
            owner_id: row.owner_id,
            title: row.title,
            description: row.description,
            thumbnail: row.thumbnail,
            video_url: row.video_url,
            duration: row.duration,
            lessons: u32::try_from(row.lessons).map_err(|_| DbError::decode("course lessons"))?,
            progress: u8::try_from(row.progress)
                .map_err(|_| DbError::decode("course progress"))?,
            source_type: row.source_type.parse().map_err(DbError::decode)?,
            notes: row.notes.0,
            quizzes: row.quizzes.0,
            flashcards: row.flashcards.0,
            original_file_name: row.original_file_name,
            file_size: row
                .file_size
                .map(u64::try_from)
                .transpose()
                .map_err(|_| DbError::decode("course file size"))?,
            category: row.category.parse().map_err(DbError::decode)?,
            difficulty: row.difficulty.parse().map_err(DbError::decode)?,
            tags: row.tags,
            is_public: row.is_public,
            completed_at: row.completed_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SessionRow {
    token_hash: String,
    user_id: Uuid,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Session {
            token_hash: row.token_hash,
            user_id: row.user_id,
            created_at: row.created_at,
            expires_at: row.expires_at,
        }
    }
}

const USER_COLUMNS: &str = "id, name, email, password_hash, avatar, preferences, notifications, \
                            privacy, stats, created_at, updated_at";

const COURSE_COLUMNS: &str = "id, owner_id, title, description, thumbnail, video_url, duration, \
                              lessons, progress, source_type, notes, quizzes, flashcards, \
                              original_file_name, file_size, category, difficulty, tags, \
                              is_public, completed_at, created_at, updated_at";

fn file_size_column(course: &Course) -> DbResult<Option<i64>> {
    course
        .file_size
        .map(i64::try_from)
        .transpose()
        .map_err(|_| DbError::decode("course file size"))
}

fn map_user_write_error(err: sqlx::Error, email: &str) -> DbError {
    if is_unique_violation(&err) {
        DbError::duplicate("User", email)
    } else {
        DbError::Sqlx(err)
    }
}

#[async_trait]
impl UserRepository for PostgresStore {
    async fn create_user(&self, user: &User) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, avatar, preferences,
                               notifications, privacy, stats, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.avatar)
        .bind(Json(&user.preferences))
        .bind(Json(&user.notifications))
        .bind(Json(&user.privacy))
        .bind(Json(&user.stats))
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_user_write_error(e, &user.email))?;

        Ok(())
    }

    async fn find_user_by_id(&self, id: Uuid) -> DbResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn find_user_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn update_profile_fields(
        &self,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
        updated_at: DateTime<Utc>,
    ) -> DbResult<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users
            SET name = COALESCE($2, name), email = COALESCE($3, email), updated_at = $4
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_user_write_error(e, email.unwrap_or_default()))?;

        row.map(User::from)
            .ok_or_else(|| DbError::not_found("User", &id.to_string()))
    }

    async fn update_password_hash(
        &self,
        id: Uuid,
        password_hash: &str,
        updated_at: DateTime<Utc>,
    ) -> DbResult<()> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $2, updated_at = $3 WHERE id = $1")
                .bind(id)
                .bind(password_hash)
                .bind(updated_at)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", &id.to_string()));
        }
        Ok(())
    }

    async fn update_settings(
        &self,
        id: Uuid,
        patch: SettingsPatch,
        updated_at: DateTime<Utc>,
    ) -> DbResult<SettingsGroup> {
        let mut tx = self.pool.begin().await?;

        // Held until commit, so concurrent patches to one group apply in sequence
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("User", &id.to_string()))?;

        let mut user = User::from(row);
        let group = patch.apply_to(&mut user);

        let query = match group {
            SettingsGroup::Preferences(preferences) => {
                sqlx::query("UPDATE users SET preferences = $2, updated_at = $3 WHERE id = $1")
                    .bind(id)
                    .bind(Json(preferences))
            },
            SettingsGroup::Notifications(notifications) => {
                sqlx::query("UPDATE users SET notifications = $2, updated_at = $3 WHERE id = $1")
                    .bind(id)
                    .bind(Json(notifications))
            },
            SettingsGroup::Privacy(privacy) => {
                sqlx::query("UPDATE users SET privacy = $2, updated_at = $3 WHERE id = $1")
                    .bind(id)
                    .bind(Json(privacy))
            },
        };
        query.bind(updated_at).execute(&mut *tx).await?;

        tx.commit().await?;
        Ok(group)
    }

    async fn update_stats(&self, user_id: Uuid, stats: UserStats) -> DbResult<()> {
        let result = sqlx::query("UPDATE users SET stats = $2 WHERE id = $1")
            .bind(user_id)
            .bind(Json(stats))
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", &user_id.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CourseRepository for PostgresStore {
    async fn insert_course(&self, course: &Course) -> DbResult<()> {
        sqlx::query(&format!(
            "INSERT INTO courses ({COURSE_COLUMNS}) VALUES \
             ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, \
             $19, $20, $21, $22)"
        ))
        .bind(course.id)
        .bind(course.owner_id)
        .bind(&course.title)
        .bind(&course.description)
        .bind(&course.thumbnail)
        .bind(&course.video_url)
        .bind(&course.duration)
        .bind(i64::from(course.lessons))
        .bind(i16::from(course.progress))
        .bind(course.source_type.as_str())
        .bind(Json(&course.notes))
        .bind(Json(&course.quizzes))
        .bind(Json(&course.flashcards))
        .bind(&course.original_file_name)
        .bind(file_size_column(course)?)
        .bind(course.category.as_str())
        .bind(course.difficulty.as_str())
        .bind(&course.tags)
        .bind(course.is_public)
        .bind(course.completed_at)
        .bind(course.created_at)
        .bind(course.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DbError::duplicate("Course", &course.id.to_string())
            } else {
                DbError::Sqlx(e)
            }
        })?;

        Ok(())
    }

    async fn find_course(&self, owner_id: Uuid, id: Uuid) -> DbResult<Option<Course>> {
        let row = sqlx::query_as::<_, CourseRow>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1 AND owner_id = $2"
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Course::try_from).transpose()
    }

    async fn list_courses(
        &self,
        owner_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> DbResult<(Vec<Course>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, CourseRow>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE owner_id = $1 \
             ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3"
        ))
        .bind(owner_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let courses = rows
            .into_iter()
            .map(Course::try_from)
            .collect::<DbResult<Vec<_>>>()?;
        Ok((courses, total))
    }

    async fn all_courses(&self, owner_id: Uuid) -> DbResult<Vec<Course>> {
        let rows = sqlx::query_as::<_, CourseRow>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE owner_id = $1"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Course::try_from).collect()
    }

    async fn update_course(&self, course: &Course) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE courses
            SET title = $3, description = $4, progress = $5, notes = $6, quizzes = $7,
                flashcards = $8, tags = $9, is_public = $10, completed_at = $11, updated_at = $12
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(course.id)
        .bind(course.owner_id)
        .bind(&course.title)
        .bind(&course.description)
        .bind(i16::from(course.progress))
        .bind(Json(&course.notes))
        .bind(Json(&course.quizzes))
        .bind(Json(&course.flashcards))
        .bind(&course.tags)
        .bind(course.is_public)
        .bind(course.completed_at)
        .bind(course.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Course", &course.id.to_string()));
        }
        Ok(())
    }

    async fn delete_course(&self, owner_id: Uuid, id: Uuid) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl SessionRepository for PostgresStore {
    async fn create_session(&self, session: &Session) -> DbResult<()> {
        let purged = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
            .bind(Utc::now())
            .execute(&self.pool)
            .await?
            .rows_affected();
        if purged > 0 {
            tracing::debug!(purged, "Removed expired sessions");
        }

        sqlx::query(
            "INSERT INTO sessions (token_hash, user_id, created_at, expires_at) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(&session.token_hash)
        .bind(session.user_id)
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_active_session(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> DbResult<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(
            "SELECT token_hash, user_id, created_at, expires_at FROM sessions \
             WHERE token_hash = $1 AND expires_at > $2",
        )
        .bind(token_hash)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Session::from))
    }

    async fn revoke_session(&self, token_hash: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(token_hash)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn revoke_user_sessions(&self, user_id: Uuid) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use courseforge_common::types::{Category, Difficulty, NewCourse, SourceType};

    fn sample_course(owner_id: Uuid) -> Course {
        NewCourse {
            title: "SQL Basics".into(),
            description: "d".into(),
            thumbnail: "t".into(),
            duration: "2h 30m".into(),
            lessons: 8,
            category: Category::Technology,
            difficulty: Difficulty::Beginner,
            tags: vec!["sql".into()],
            source_type: SourceType::Pdf,
            video_url: None,
            original_file_name: Some("sql.pdf".into()),
            file_size: Some(2048),
            progress: 0,
            notes: vec![],
            quizzes: vec![],
            flashcards: vec![],
        }
        .into_course(owner_id, Utc::now())
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore = "requires PostgreSQL via DATABASE_URL"]
    async fn test_user_and_course_roundtrip(pool: PgPool) -> sqlx::Result<()> {
        let store = PostgresStore::new(pool);
        let user = User::new("Ada".into(), "ada@example.com".into(), "h".into(), Utc::now());
        store.create_user(&user).await.unwrap();
        assert!(matches!(
            store.create_user(&user).await,
            Err(DbError::Duplicate(_))
        ));

        let mut course = sample_course(user.id);
        store.insert_course(&course).await.unwrap();

        course.apply_progress(100, Utc::now()).unwrap();
        store.update_course(&course).await.unwrap();

        let loaded = store.find_course(user.id, course.id).await.unwrap().unwrap();
        assert_eq!(loaded.progress, 100);
        assert!(loaded.completed_at.is_some());
        assert_eq!(loaded.file_size, Some(2048));

        assert!(store.find_course(Uuid::new_v4(), course.id).await.unwrap().is_none());
        assert!(store.delete_course(user.id, course.id).await.unwrap());
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore = "requires PostgreSQL via DATABASE_URL"]
    async fn test_expired_sessions_are_ignored(pool: PgPool) -> sqlx::Result<()> {
        let store = PostgresStore::new(pool);
        let user = User::new("Bo".into(), "bo@example.com".into(), "h".into(), Utc::now());
        store.create_user(&user).await.unwrap();

        let now = Utc::now();
        let session = Session {
            token_hash: "deadbeef".into(),
            user_id: user.id,
            created_at: now,
            expires_at: now + chrono::Duration::minutes(5),
        };
        store.create_session(&session).await.unwrap();

        assert!(store.find_active_session("deadbeef", now).await.unwrap().is_some());
        assert!(store
            .find_active_session("deadbeef", now + chrono::Duration::minutes(10))
            .await
            .unwrap()
            .is_none());
        assert_eq!(store.revoke_user_sessions(user.id).await.unwrap(), 1);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore = "requires PostgreSQL via DATABASE_URL"]
    async fn test_create_session_purges_expired(pool: PgPool) -> sqlx::Result<()> {
        let store = PostgresStore::new(pool.clone());
        let user = User::new("Cy".into(), "cy@example.com".into(), "h".into(), Utc::now());
        store.create_user(&user).await.unwrap();

        let now = Utc::now();
        for (hash, expires_at) in [
            ("stale", now - chrono::Duration::hours(1)),
            ("fresh", now + chrono::Duration::hours(1)),
        ] {
            store
                .create_session(&Session {
                    token_hash: hash.into(),
                    user_id: user.id,
                    created_at: now - chrono::Duration::hours(2),
                    expires_at,
                })
                .await
                .unwrap();
        }

        let remaining: Vec<(String,)> = sqlx::query_as("SELECT token_hash FROM sessions")
            .fetch_all(&pool)
            .await?;
        assert_eq!(remaining, vec![("fresh".to_string(),)]);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore = "requires PostgreSQL via DATABASE_URL"]
    async fn test_settings_write_keeps_password_hash(pool: PgPool) -> sqlx::Result<()> {
        let store = PostgresStore::new(pool);
        let user = User::new("Di".into(), "di@example.com".into(), "old".into(), Utc::now());
        store.create_user(&user).await.unwrap();

        store.update_password_hash(user.id, "new", Utc::now()).await.unwrap();
        let patch = SettingsPatch::Privacy(courseforge_common::types::PrivacySettingsPatch {
            profile_visible: Some(false),
            ..Default::default()
        });
        store.update_settings(user.id, patch, Utc::now()).await.unwrap();
        let updated = store
            .update_profile_fields(user.id, Some("Diana"), None, Utc::now())
            .await
            .unwrap();

        assert_eq!(updated.password_hash, "new");
        assert!(!updated.privacy.profile_visible);
        assert_eq!(updated.email, "di@example.com");
        Ok(())
    }
}
