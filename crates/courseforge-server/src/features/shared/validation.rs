//! Shared validation utilities
//!
//! Account input rules used by registration, login, and profile updates.
//!
//! # Examples
//!
//! ```rust,ignore
//! use courseforge_server::features::shared::validation::{validate_email, validate_name};
//!
//! let name = validate_name("  Ada Lovelace ")?;
//! let email = validate_email("Ada@Example.com")?;
//! assert_eq!(email, "ada@example.com");
//! ```

use thiserror::Error;

/// Maximum display name length, in characters after trimming
pub const MAX_NAME_CHARS: usize = 100;

/// Maximum email length (RFC 5321 path limit)
pub const MAX_EMAIL_CHARS: usize = 254;

pub const MIN_PASSWORD_CHARS: usize = 6;
pub const MAX_PASSWORD_CHARS: usize = 128;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NameValidationError {
    #[error("Name is required and cannot be empty")]
    Required,

    #[error("Name must be between 1 and {max_length} characters")]
    TooLong { max_length: usize },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EmailValidationError {
    #[error("Email is required and cannot be empty")]
    Required,

    #[error("Email must be at most {max_length} characters")]
    TooLong { max_length: usize },

    #[error("Email address is invalid")]
    InvalidFormat,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordValidationError {
    #[error("Password must be at least {min_length} characters")]
    TooShort { min_length: usize },

    #[error("Password must be at most {max_length} characters")]
    TooLong { max_length: usize },
}

/// Validate a display name, returning it trimmed
pub fn validate_name(name: &str) -> Result<String, NameValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(NameValidationError::Required);
    }
    if trimmed.chars().count() > MAX_NAME_CHARS {
        return Err(NameValidationError::TooLong {
            max_length: MAX_NAME_CHARS,
        });
    }
    Ok(trimmed.to_string())
}

/// Trim and lowercase an email so lookups and uniqueness are case-insensitive
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate an email address, returning its normalized form
///
/// # Rules
/// - Exactly one `@`, with a non-empty local part
/// - The domain contains a dot that is neither its first nor last character
/// - No whitespace
/// - At most [`MAX_EMAIL_CHARS`] characters
pub fn validate_email(email: &str) -> Result<String, EmailValidationError> {
    let email = normalize_email(email);
    if email.is_empty() {
        return Err(EmailValidationError::Required);
    }
    if email.chars().count() > MAX_EMAIL_CHARS {
        return Err(EmailValidationError::TooLong {
            max_length: MAX_EMAIL_CHARS,
        });
    }
    if email.chars().any(char::is_whitespace) {
        return Err(EmailValidationError::InvalidFormat);
    }

    let (local, domain) = email
        .split_once('@')
        .ok_or(EmailValidationError::InvalidFormat)?;
    if local.is_empty() || domain.contains('@') {
        return Err(EmailValidationError::InvalidFormat);
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(EmailValidationError::InvalidFormat);
    }

    Ok(email)
}

/// Validate a new password's length; content is never inspected
pub fn validate_password(password: &str) -> Result<(), PasswordValidationError> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_CHARS {
        return Err(PasswordValidationError::TooShort {
            min_length: MIN_PASSWORD_CHARS,
        });
    }
    if len > MAX_PASSWORD_CHARS {
        return Err(PasswordValidationError::TooLong {
            max_length: MAX_PASSWORD_CHARS,
        });
    }
    Ok(())
}
