//! Credentials and sessions
//!
//! - [`password`]: Argon2id hashing for stored passwords
//! - [`token`]: opaque bearer tokens and their SHA-256 digests
//!
//! [`issue_session`] ties the two halves together: it mints a token, stores its hash
//! with an expiry and hands the plaintext back exactly once.

pub mod password;
pub mod token;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::db::DbResult;
use crate::repository::{Repositories, Session};

/// Create a session for `user_id` and return the plaintext bearer token
#[tracing::instrument(skip(repos))]
pub async fn issue_session(repos: &Repositories, user_id: Uuid, ttl: Duration) -> DbResult<String> {
    let token = token::generate_token();
    let now = Utc::now();

    let session = Session {
        token_hash: token::hash_token(&token),
        user_id,
        created_at: now,
        expires_at: now + ttl,
    };
    repos.sessions.create_session(&session).await?;

    tracing::debug!(expires_at = %session.expires_at, "Session issued");
    Ok(token)
}
