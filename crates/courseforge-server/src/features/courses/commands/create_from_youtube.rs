//! Create a course from a YouTube URL

use std::sync::Arc;

use chrono::Utc;
use courseforge_common::types::Course;
use courseforge_generator::{CourseGenerator, GenerateError, SourceDescriptor};
use serde::Deserialize;
use uuid::Uuid;

use crate::db::DbError;
use crate::features::shared::refresh_user_stats;
use crate::repository::Repositories;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateYoutubeCourseCommand {
    pub url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateYoutubeCourseError {
    #[error("{0}")]
    Generate(#[from] GenerateError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

#[tracing::instrument(skip(repos, generator, command), fields(url = %command.url))]
pub async fn handle(
    repos: &Repositories,
    generator: &Arc<CourseGenerator>,
    owner_id: Uuid,
    command: CreateYoutubeCourseCommand,
) -> Result<Course, CreateYoutubeCourseError> {
    let source = SourceDescriptor::Youtube { url: command.url };
    let course = generator.generate(&source)?.into_course(owner_id, Utc::now());

    repos.courses.insert_course(&course).await?;
    refresh_user_stats(repos, owner_id).await?;

    tracing::info!(course_id = %course.id, title = %course.title, "YouTube course created");
    Ok(course)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use courseforge_generator::{GeneratorOptions, InitialProgress};

    use crate::features::shared::test_helpers::{create_test_user, test_state, test_state_with};

    #[tokio::test]
    async fn test_creates_course_and_refreshes_stats() {
        let state = test_state();
        let user = create_test_user(&state, "ada@example.com").await;

        let course = handle(
            &state.repos,
            &state.generator,
            user.id,
            CreateYoutubeCourseCommand {
                url: "https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string(),
            },
        )
        .await
        .unwrap();

        assert_eq!(course.owner_id, user.id);
        assert_eq!(course.progress, 0);
        assert!(course.completed_at.is_none());

        let stored = state.repos.users.find_user_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored.stats.total_courses, 1);
    }

    #[tokio::test]
    async fn test_demo_random_progress_counts_in_stats() {
        let state = test_state_with(GeneratorOptions {
            initial_progress: InitialProgress::DemoRandom,
            ..Default::default()
        });
        let user = create_test_user(&state, "ada@example.com").await;

        let course = handle(
            &state.repos,
            &state.generator,
            user.id,
            CreateYoutubeCourseCommand {
                url: "https://youtu.be/dQw4w9WgXcQ".to_string(),
            },
        )
        .await
        .unwrap();

        let stored = state.repos.users.find_user_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored.stats.average_progress, course.progress);
    }

    #[tokio::test]
    async fn test_unparseable_url_persists_nothing() {
        let state = test_state();
        let user = create_test_user(&state, "ada@example.com").await;

        let err = handle(
            &state.repos,
            &state.generator,
            user.id,
            CreateYoutubeCourseCommand {
                url: "not a video".to_string(),
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            CreateYoutubeCourseError::Generate(GenerateError::UnparseableUrl(_))
        ));
        assert!(state.repos.courses.all_courses(user.id).await.unwrap().is_empty());
    }
}
