//! Delete course command

use serde::Serialize;
use uuid::Uuid;

use crate::db::DbError;
use crate::features::shared::refresh_user_stats;
use crate::repository::Repositories;

#[derive(Debug, Clone, Serialize)]
pub struct DeleteCourseResponse {
    pub id: Uuid,
    pub deleted: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteCourseError {
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
) -> Result<DeleteCourseResponse, DeleteCourseError> {
    if !repos.courses.delete_course(owner_id, course_id).await? {
        return Err(DeleteCourseError::NotFound(course_id));
    }
    refresh_user_stats(repos, owner_id).await?;

    tracing::info!("Course deleted");
    Ok(DeleteCourseResponse {
        id: course_id,
        deleted: true,
    })
}
