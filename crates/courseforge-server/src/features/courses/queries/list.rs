//! List the caller's courses, newest first

use courseforge_common::types::Course;
use uuid::Uuid;

use crate::db::DbError;
use crate::features::shared::{PaginationMetadata, PaginationParams};
use crate::repository::Repositories;

#[derive(Debug, thiserror::Error)]
pub enum ListCoursesError {
    #[error("{0}")]
    InvalidPagination(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

#[derive(Debug, Clone)]
pub struct ListCoursesResponse {
    pub courses: Vec<Course>,
    pub pagination: PaginationMetadata,
}

#[tracing::instrument(skip(repos, params), fields(page = ?params.page, per_page = ?params.per_page))]
pub async fn handle(
    repos: &Repositories,
    owner_id: Uuid,
    params: PaginationParams,
) -> Result<ListCoursesResponse, ListCoursesError> {
    params.validate().map_err(ListCoursesError::InvalidPagination)?;
    let offset = params
        .offset()
        .ok_or(ListCoursesError::InvalidPagination("Page is out of range"))?;

    let (courses, total) = repos
        .courses
        .list_courses(owner_id, params.per_page(), offset)
        .await?;

    Ok(ListCoursesResponse {
        courses,
        pagination: PaginationMetadata::from_params(&params, total),
    })
}
