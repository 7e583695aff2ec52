//! Get a single course owned by the caller

use courseforge_common::types::Course;
use uuid::Uuid;

use crate::db::DbError;
use crate::repository::Repositories;

#[derive(Debug, thiserror::Error)]
pub enum GetCourseError {
    #[error("Course '{0}' not found")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

#[tracing::instrument(skip(repos))]
pub async fn handle(
    repos: &Repositories,
    owner_id: Uuid,
    course_id: Uuid,
) -> Result<Course, GetCourseError> {
    repos
        .courses
        .find_course(owner_id, course_id)
        .await?
        .ok_or(GetCourseError::NotFound(course_id))
}
