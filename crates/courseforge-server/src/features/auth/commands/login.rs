//! Login command

use serde::Deserialize;

use super::AuthResponse;
use crate::auth::{issue_session, password::{verify_password, PasswordError}};
use crate::config::AuthConfig;
use crate::db::DbError;
use crate::features::shared::validation::normalize_email;
use crate::repository::Repositories;

#[derive(Clone, Deserialize)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCommand")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("Email and password are required")]
    MissingCredentials,

    /// Covers both an unknown email and a wrong password
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("{0}")]
    Password(#[from] PasswordError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

#[tracing::instrument(skip(repos, auth, command), fields(email = %command.email))]
pub async fn handle(
    repos: &Repositories,
    auth: &AuthConfig,
    command: LoginCommand,
) -> Result<AuthResponse, LoginError> {
    let email = normalize_email(&command.email);
    if email.is_empty() || command.password.is_empty() {
        return Err(LoginError::MissingCredentials);
    }

    let user = repos
        .users
        .find_user_by_email(&email)
        .await?
        .ok_or(LoginError::InvalidCredentials)?;

    if !verify_password(&command.password, &user.password_hash)? {
        tracing::info!(user_id = %user.id, "Login rejected: wrong password");
        return Err(LoginError::InvalidCredentials);
    }

    let token = issue_session(repos, user.id, auth.token_ttl()).await?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(AuthResponse {
        token,
        user: user.profile(),
    })
}
