//! Update course progress
//!
//! Progress must be an integer in 0..=100. Reaching 100 stamps `completed_at`; moving
//! below 100 clears it.

use chrono::Utc;
use courseforge_common::types::{Course, ProgressTransition};
use courseforge_common::ForgeError;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::DbError;
use crate::features::shared::refresh_user_stats;
use crate::repository::Repositories;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateProgressCommand {
    pub progress: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateProgressError {
    #[error("Course '{0}' not found")]
    NotFound(Uuid),

    #[error("{0}")]
    OutOfRange(#[from] ForgeError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

#[tracing::instrument(skip(repos, command), fields(progress = command.progress))]
pub async fn handle(
    repos: &Repositories,
    owner_id: Uuid,
    course_id: Uuid,
    command: UpdateProgressCommand,
) -> Result<Course, UpdateProgressError> {
    let mut course = repos
        .courses
        .find_course(owner_id, course_id)
        .await?
        .ok_or(UpdateProgressError::NotFound(course_id))?;

    let transition = course.apply_progress(command.progress, Utc::now())?;
    repos.courses.update_course(&course).await?;
    refresh_user_stats(repos, owner_id).await?;

    match transition {
        ProgressTransition::Completed => tracing::info!("Course completed"),
        ProgressTransition::Reopened => tracing::info!("Course reopened"),
        ProgressTransition::Unchanged => tracing::debug!("Course progress updated"),
    }

    Ok(course)
}
