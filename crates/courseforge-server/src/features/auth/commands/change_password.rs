//! Change password command
//!
//! Verifies the current password, stores the new hash, revokes every session of the
//! user (including the one making the request) and issues a fresh token.

use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use super::AuthResponse;
use crate::auth::issue_session;
use crate::auth::password::{hash_password, verify_password, PasswordError};
use crate::config::AuthConfig;
use crate::db::DbError;
use crate::features::shared::validation::{validate_password, PasswordValidationError};
use crate::repository::Repositories;

#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChangePasswordCommand {
    pub current_password: String,
    pub new_password: String,
}

impl std::fmt::Debug for ChangePasswordCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ChangePasswordCommand { .. }")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChangePasswordError {
    #[error("Current password is incorrect")]
    IncorrectPassword,

    #[error("Password validation failed: {0}")]
    PasswordValidation(#[from] PasswordValidationError),

    #[error("{0}")]
    Password(#[from] PasswordError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

#[tracing::instrument(skip(repos, auth, command))]
pub async fn handle(
    repos: &Repositories,
    auth: &AuthConfig,
    user_id: Uuid,
    command: ChangePasswordCommand,
) -> Result<AuthResponse, ChangePasswordError> {
    let mut user = repos
        .users
        .find_user_by_id(user_id)
        .await?
        .ok_or_else(|| DbError::not_found("User", &user_id.to_string()))?;

    if !verify_password(&command.current_password, &user.password_hash)? {
        return Err(ChangePasswordError::IncorrectPassword);
    }
    validate_password(&command.new_password)?;

    user.password_hash = hash_password(&command.new_password)?;
    user.updated_at = Utc::now();
    repos
        .users
        .update_password_hash(user.id, &user.password_hash, user.updated_at)
        .await?;

    let revoked = repos.sessions.revoke_user_sessions(user.id).await?;
    let token = issue_session(repos, user.id, auth.token_ttl()).await?;

    tracing::info!(revoked_sessions = revoked, "Password changed");

    Ok(AuthResponse {
        token,
        user: user.profile(),
    })
}
