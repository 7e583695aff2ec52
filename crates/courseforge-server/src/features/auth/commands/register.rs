//! Register command
//!
//! Creates an account with default settings and empty stats, then signs the new user in.

use chrono::Utc;
use courseforge_common::types::User;
use serde::Deserialize;

use super::AuthResponse;
use crate::auth::{issue_session, password::{hash_password, PasswordError}};
use crate::config::AuthConfig;
use crate::db::DbError;
use crate::features::shared::validation::{
    validate_email, validate_name, validate_password, EmailValidationError,
    NameValidationError, PasswordValidationError,
};
use crate::repository::Repositories;

#[derive(Clone, Deserialize)]
pub struct RegisterCommand {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for RegisterCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterCommand")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("Name validation failed: {0}")]
    NameValidation(#[from] NameValidationError),

    #[error("Email validation failed: {0}")]
    EmailValidation(#[from] EmailValidationError),

    #[error("Password validation failed: {0}")]
    PasswordValidation(#[from] PasswordValidationError),

    #[error("An account with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("{0}")]
    Password(#[from] PasswordError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl RegisterCommand {
    /// Validate all fields, returning the trimmed name and normalized email
    #[tracing::instrument(skip(self), fields(email = %self.email))]
    pub fn validate(&self) -> Result<(String, String), RegisterError> {
        let name = validate_name(&self.name)?;
        let email = validate_email(&self.email)?;
        validate_password(&self.password)?;
        Ok((name, email))
    }
}

#[tracing::instrument(skip(repos, auth, command), fields(email = %command.email))]
pub async fn handle(
    repos: &Repositories,
    auth: &AuthConfig,
    command: RegisterCommand,
) -> Result<AuthResponse, RegisterError> {
    let (name, email) = command.validate()?;

    let password_hash = hash_password(&command.password)?;
    let user = User::new(name, email, password_hash, Utc::now());

    match repos.users.create_user(&user).await {
        Ok(()) => {},
        Err(DbError::Duplicate(_)) => return Err(RegisterError::DuplicateEmail(user.email)),
        Err(e) => return Err(e.into()),
    }

    let token = issue_session(repos, user.id, auth.token_ttl()).await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok(AuthResponse {
        token,
        user: user.profile(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::test_state;

    fn command(email: &str) -> RegisterCommand {
        RegisterCommand {
            name: " Ada ".to_string(),
            email: email.to_string(),
            password: "secret1".to_string(),
        }
    }

    #[test]
    fn test_debug_redacts_password() {
        let debug = format!("{:?}", command("ada@example.com"));
        assert!(!debug.contains("secret1"));
    }

    #[tokio::test]
    async fn test_register_normalizes_and_signs_in() {
        let state = test_state();
        let response = handle(&state.repos, &state.auth, command("Ada@Example.com"))
            .await
            .unwrap();

        assert_eq!(response.user.name, "Ada");
        assert_eq!(response.user.email, "ada@example.com");
        assert_eq!(response.user.stats.total_courses, 0);
        assert_eq!(response.token.len(), 64);
    }

    #[tokio::test]
    async fn test_register_duplicate_email_case_insensitive() {
        let state = test_state();
        handle(&state.repos, &state.auth, command("ada@example.com"))
            .await
            .unwrap();

        let err = handle(&state.repos, &state.auth, command("ADA@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, RegisterError::DuplicateEmail(_)));
    }

    #[tokio::test]
    async fn test_register_short_password() {
        let state = test_state();
        let mut cmd = command("ada@example.com");
        cmd.password = "12345".to_string();
        let err = handle(&state.repos, &state.auth, cmd).await.unwrap_err();
        assert!(matches!(err, RegisterError::PasswordValidation(_)));
    }
}
