//! Update profile command

use chrono::Utc;
use courseforge_common::types::UserProfile;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::DbError;
use crate::features::shared::validation::{
    validate_email, validate_name, EmailValidationError, NameValidationError,
};
use crate::repository::Repositories;

/// Partial profile update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateProfileCommand {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateProfileError {
    #[error("At least one of name or email must be provided")]
    NoFieldsToUpdate,

    #[error("Name validation failed: {0}")]
    NameValidation(#[from] NameValidationError),

    #[error("Email validation failed: {0}")]
    EmailValidation(#[from] EmailValidationError),

    #[error("An account with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl UpdateProfileCommand {
    #[tracing::instrument(skip(self))]
    pub fn validate(&self) -> Result<(), UpdateProfileError> {
        if self.name.is_none() && self.email.is_none() {
            return Err(UpdateProfileError::NoFieldsToUpdate);
        }
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        Ok(())
    }
}

#[tracing::instrument(skip(repos, command))]
pub async fn handle(
    repos: &Repositories,
    user_id: Uuid,
    command: UpdateProfileCommand,
) -> Result<UserProfile, UpdateProfileError> {
    command.validate()?;

    let name = command.name.as_deref().map(validate_name).transpose()?;
    let email = command.email.as_deref().map(validate_email).transpose()?;

    let user = match repos
        .users
        .update_profile_fields(user_id, name.as_deref(), email.as_deref(), Utc::now())
        .await
    {
        Ok(user) => user,
        Err(DbError::Duplicate(_)) => {
            return Err(UpdateProfileError::DuplicateEmail(email.unwrap_or_default()))
        },
        Err(e) => return Err(e.into()),
    };

    tracing::info!("Profile updated");
    Ok(user.profile())
}
