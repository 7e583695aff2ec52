//! Process-local storage backed by `RwLock`ed maps

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use courseforge_common::types::{Course, SettingsGroup, SettingsPatch, User, UserStats};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CourseRepository, Session, SessionRepository, UserRepository};
use crate::db::{DbError, DbResult};

#[derive(Debug)]
struct StoredCourse {
    seq: u64,
    course: Course,
}

#[derive(Debug, Default)]
struct CourseTable {
    next_seq: u64,
    rows: HashMap<Uuid, StoredCourse>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    courses: RwLock<CourseTable>,
    sessions: RwLock<HashMap<String, Session>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(&self, user: &User) -> DbResult<()> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(DbError::duplicate("User", &user.email));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_user_by_id(&self, id: Uuid) -> DbResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn update_profile_fields(
        &self,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
        updated_at: DateTime<Utc>,
    ) -> DbResult<User> {
        let mut users = self.users.write().await;
        if let Some(email) = email {
            if users.values().any(|u| u.email == email && u.id != id) {
                return Err(DbError::duplicate("User", email));
            }
        }
        let user = users
            .get_mut(&id)
            .ok_or_else(|| DbError::not_found("User", &id.to_string()))?;
        if let Some(name) = name {
            user.name = name.to_string();
        }
        if let Some(email) = email {
            user.email = email.to_string();
        }
        user.updated_at = updated_at;
        Ok(user.clone())
    }

    async fn update_password_hash(
        &self,
        id: Uuid,
        password_hash: &str,
        updated_at: DateTime<Utc>,
    ) -> DbResult<()> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| DbError::not_found("User", &id.to_string()))?;
        user.password_hash = password_hash.to_string();
        user.updated_at = updated_at;
        Ok(())
    }

    async fn update_settings(
        &self,
        id: Uuid,
        patch: SettingsPatch,
        updated_at: DateTime<Utc>,
    ) -> DbResult<SettingsGroup> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| DbError::not_found("User", &id.to_string()))?;
        let group = patch.apply_to(user);
        user.updated_at = updated_at;
        Ok(group)
    }

    async fn update_stats(&self, user_id: Uuid, stats: UserStats) -> DbResult<()> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| DbError::not_found("User", &user_id.to_string()))?;
        user.stats = stats;
        Ok(())
    }
}

#[async_trait]
impl CourseRepository for MemoryStore {
    async fn insert_course(&self, course: &Course) -> DbResult<()> {
        let mut table = self.courses.write().await;
        if table.rows.contains_key(&course.id) {
            return Err(DbError::duplicate("Course", &course.id.to_string()));
        }
        let seq = table.next_seq;
        table.next_seq += 1;
        table.rows.insert(
            course.id,
            StoredCourse {
                seq,
                course: course.clone(),
            },
        );
        Ok(())
    }

    async fn find_course(&self, owner_id: Uuid, id: Uuid) -> DbResult<Option<Course>> {
        let table = self.courses.read().await;
        Ok(table
            .rows
            .get(&id)
            .filter(|row| row.course.owner_id == owner_id)
            .map(|row| row.course.clone()))
    }

    async fn list_courses(
        &self,
        owner_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> DbResult<(Vec<Course>, i64)> {
        let table = self.courses.read().await;
        let mut owned: Vec<&StoredCourse> = table
            .rows
            .values()
            .filter(|row| row.course.owner_id == owner_id)
            .collect();
        owned.sort_by(|a, b| {
            b.course
                .created_at
                .cmp(&a.course.created_at)
                .then(b.seq.cmp(&a.seq))
        });

        let total = owned.len() as i64;
        let page = owned
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .map(|row| row.course.clone())
            .collect();
        Ok((page, total))
    }

    async fn all_courses(&self, owner_id: Uuid) -> DbResult<Vec<Course>> {
        let table = self.courses.read().await;
        Ok(table
            .rows
            .values()
            .filter(|row| row.course.owner_id == owner_id)
            .map(|row| row.course.clone())
            .collect())
    }

    async fn update_course(&self, course: &Course) -> DbResult<()> {
        let mut table = self.courses.write().await;
        match table.rows.get_mut(&course.id) {
            Some(row) if row.course.owner_id == course.owner_id => {
                row.course = course.clone();
                Ok(())
            },
            _ => Err(DbError::not_found("Course", &course.id.to_string())),
        }
    }

    async fn delete_course(&self, owner_id: Uuid, id: Uuid) -> DbResult<bool> {
        let mut table = self.courses.write().await;
        let owned = table
            .rows
            .get(&id)
            .is_some_and(|row| row.course.owner_id == owner_id);
        if owned {
            table.rows.remove(&id);
        }
        Ok(owned)
    }
}

#[async_trait]
impl SessionRepository for MemoryStore {
    async fn create_session(&self, session: &Session) -> DbResult<()> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, s| s.is_active(now));
        sessions.insert(session.token_hash.clone(), session.clone());
        Ok(())
    }

    async fn find_active_session(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> DbResult<Option<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(token_hash)
            .filter(|s| s.is_active(now))
            .cloned())
    }

    async fn revoke_session(&self, token_hash: &str) -> DbResult<bool> {
        Ok(self.sessions.write().await.remove(token_hash).is_some())
    }

    async fn revoke_user_sessions(&self, user_id: Uuid) -> DbResult<u64> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.user_id != user_id);
        Ok((before - sessions.len()) as u64)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Duration;
    use courseforge_common::types::{
        Category, Difficulty, NewCourse, PrivacySettingsPatch, SourceType,
    };

    fn user(email: &str) -> User {
        User::new("Ada".into(), email.into(), "hash".into(), Utc::now())
    }

    fn course(owner_id: Uuid, title: &str, now: DateTime<Utc>) -> Course {
        NewCourse {
            title: title.into(),
            description: String::new(),
            thumbnail: String::new(),
            duration: "2h".into(),
            lessons: 1,
            category: Category::General,
            difficulty: Difficulty::Beginner,
            tags: vec![],
            source_type: SourceType::Pdf,
            video_url: None,
            original_file_name: Some("a.pdf".into()),
            file_size: Some(1),
            progress: 0,
            notes: vec![],
            quizzes: vec![],
            flashcards: vec![],
        }
        .into_course(owner_id, now)
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryStore::new();
        store.create_user(&user("ada@example.com")).await.unwrap();
        let err = store.create_user(&user("ada@example.com")).await.unwrap_err();
        assert!(matches!(err, DbError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_update_profile_email_conflict() {
        let store = MemoryStore::new();
        let ada = user("ada@example.com");
        let bob = user("bob@example.com");
        store.create_user(&ada).await.unwrap();
        store.create_user(&bob).await.unwrap();

        assert!(matches!(
            store
                .update_profile_fields(bob.id, None, Some("ada@example.com"), Utc::now())
                .await,
            Err(DbError::Duplicate(_))
        ));

        // Keeping one's own email is not a conflict
        let updated = store
            .update_profile_fields(bob.id, Some("Robert"), Some("bob@example.com"), Utc::now())
            .await
            .unwrap();
        assert_eq!(updated.name, "Robert");
    }

    #[tokio::test]
    async fn test_narrow_updates_leave_other_columns_alone() {
        let store = MemoryStore::new();
        let ada = user("ada@example.com");
        store.create_user(&ada).await.unwrap();

        store
            .update_password_hash(ada.id, "new-hash", Utc::now())
            .await
            .unwrap();
        let patch = SettingsPatch::Privacy(PrivacySettingsPatch {
            profile_visible: Some(false),
            ..Default::default()
        });
        let group = store.update_settings(ada.id, patch, Utc::now()).await.unwrap();
        store
            .update_profile_fields(ada.id, Some("Countess"), None, Utc::now())
            .await
            .unwrap();

        let stored = store.find_user_by_id(ada.id).await.unwrap().unwrap();
        assert_eq!(stored.password_hash, "new-hash");
        assert_eq!(group, SettingsGroup::Privacy(stored.privacy));
        assert!(!stored.privacy.profile_visible);
        assert_eq!(stored.name, "Countess");
        assert_eq!(stored.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_list_newest_first_with_equal_timestamps() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let now = Utc::now();
        for title in ["first", "second", "third"] {
            store.insert_course(&course(owner, title, now)).await.unwrap();
        }
        store
            .insert_course(&course(Uuid::new_v4(), "other", now))
            .await
            .unwrap();

        let (page, total) = store.list_courses(owner, 2, 0).await.unwrap();
        assert_eq!(total, 3);
        let titles: Vec<_> = page.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["third", "second"]);

        let (page, _) = store.list_courses(owner, 2, 2).await.unwrap();
        assert_eq!(page[0].title, "first");
    }

    #[tokio::test]
    async fn test_course_scoped_by_owner() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let c = course(owner, "mine", Utc::now());
        store.insert_course(&c).await.unwrap();

        assert!(store.find_course(stranger, c.id).await.unwrap().is_none());
        assert!(!store.delete_course(stranger, c.id).await.unwrap());
        assert!(store.delete_course(owner, c.id).await.unwrap());
        assert!(store.find_course(owner, c.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_session_not_found() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let session = Session {
            token_hash: "h".into(),
            user_id: Uuid::new_v4(),
            created_at: now - Duration::hours(2),
            expires_at: now - Duration::hours(1),
        };
        store.create_session(&session).await.unwrap();
        assert!(store.find_active_session("h", now).await.unwrap().is_none());
        assert!(store
            .find_active_session("h", now - Duration::minutes(90))
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_create_session_purges_expired() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let user_id = Uuid::new_v4();
        store
            .create_session(&Session {
                token_hash: "stale".into(),
                user_id,
                created_at: now - Duration::hours(2),
                expires_at: now - Duration::hours(1),
            })
            .await
            .unwrap();
        store
            .create_session(&Session {
                token_hash: "fresh".into(),
                user_id,
                created_at: now,
                expires_at: now + Duration::hours(1),
            })
            .await
            .unwrap();

        assert!(store
            .find_active_session("stale", now - Duration::minutes(90))
            .await
            .unwrap()
            .is_none());
        assert!(store.find_active_session("fresh", now).await.unwrap().is_some());
        assert_eq!(store.sessions.read().await.len(), 1);
    }

    #[tokio::test]
    async fn test_revoke_user_sessions() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let user_id = Uuid::new_v4();
        for hash in ["a", "b"] {
            store
                .create_session(&Session {
                    token_hash: hash.into(),
                    user_id,
                    created_at: now,
                    expires_at: now + Duration::hours(1),
                })
                .await
                .unwrap();
        }
        assert_eq!(store.revoke_user_sessions(user_id).await.unwrap(), 2);
        assert!(!store.revoke_session("a").await.unwrap());
    }
}
