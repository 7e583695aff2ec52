//! User stats query
//!
//! Always recomputes from the caller's courses and persists the result, so the response
//! can never disagree with the course list.

use courseforge_common::types::UserStats;
use uuid::Uuid;

use crate::db::DbError;
use crate::features::shared::refresh_user_stats;
use crate::repository::Repositories;

#[derive(Debug, thiserror::Error)]
pub enum GetStatsError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

#[tracing::instrument(skip(repos))]
pub async fn handle(repos: &Repositories, user_id: Uuid) -> Result<UserStats, GetStatsError> {
    Ok(refresh_user_stats(repos, user_id).await?)
}
