//! Current user query
//!
//! Reloads the caller from storage so the profile carries the latest cached stats.

use courseforge_common::types::UserProfile;
use uuid::Uuid;

use crate::db::DbError;
use crate::repository::Repositories;

#[derive(Debug, thiserror::Error)]
pub enum GetCurrentUserError {
    #[error("User '{0}' not found")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

#[tracing::instrument(skip(repos))]
pub async fn handle(repos: &Repositories, user_id: Uuid) -> Result<UserProfile, GetCurrentUserError> {
    let user = repos
        .users
        .find_user_by_id(user_id)
        .await?
        .ok_or(GetCurrentUserError::NotFound(user_id))?;
    Ok(user.profile())
}
