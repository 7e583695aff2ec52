//! Bearer token authentication

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use chrono::Utc;
use courseforge_common::types::User;

use crate::auth::token::hash_token;
use crate::error::AppError;
use crate::features::FeatureState;

/// The authenticated caller, resolved from `Authorization: Bearer <token>`
///
/// Rejects with 401 when the header is missing or malformed, when the token has no
/// active session, or when the session's user no longer exists.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
    /// Hash of the presented token, used to revoke this session on logout
    pub token_hash: String,
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[axum::async_trait]
impl FromRequestParts<FeatureState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &FeatureState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or_else(AppError::unauthorized)?;
        let token_hash = hash_token(token);

        let session = state
            .repos
            .sessions
            .find_active_session(&token_hash, Utc::now())
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid or expired token".to_string()))?;

        let user = state
            .repos
            .users
            .find_user_by_id(session.user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid or expired token".to_string()))?;

        Ok(Self { user, token_hash })
    }
}
