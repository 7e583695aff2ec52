//! Logout command: revokes only the session the request authenticated with

use serde::Serialize;

use crate::db::DbError;
use crate::repository::Repositories;

#[derive(Debug, Clone, Serialize)]
pub struct LogoutResponse {
    pub logged_out: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum LogoutError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

#[tracing::instrument(skip(repos, token_hash))]
pub async fn handle(repos: &Repositories, token_hash: &str) -> Result<LogoutResponse, LogoutError> {
    let revoked = repos.sessions.revoke_session(token_hash).await?;
    tracing::info!(revoked, "Session revoked");
    Ok(LogoutResponse { logged_out: true })
}
