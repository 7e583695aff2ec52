//! User API routes
//!
//! # Route Structure
//!
//! - `GET /api/v1/users/stats` - Recomputed learning stats
//! - `PUT /api/v1/users/preferences` - Patch `{preferences: {...}}`
//! - `PUT /api/v1/users/notifications` - Patch `{notifications: {...}}`
//! - `PUT /api/v1/users/privacy` - Patch `{privacy: {...}}`

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};

use courseforge_common::types::SettingsPatch;

use super::commands::{NotificationsBody, PreferencesBody, PrivacyBody, UpdateSettingsError};
use super::queries::GetStatsError;
use crate::api::extract::AppJson;
use crate::api::response::{ApiResponse, ErrorResponse};
use crate::features::FeatureState;
use crate::middleware::auth::AuthUser;

pub fn users_routes() -> Router<FeatureState> {
    Router::new()
        .route("/stats", get(get_stats))
        .route("/preferences", put(update_preferences))
        .route("/notifications", put(update_notifications))
        .route("/privacy", put(update_privacy))
}

#[tracing::instrument(skip(state, auth), fields(user_id = %auth.user.id))]
async fn get_stats(
    State(state): State<FeatureState>,
    auth: AuthUser,
) -> Result<Response, UserApiError> {
    let stats = super::queries::stats::handle(&state.repos, auth.user.id).await?;
    Ok(ApiResponse::success(stats).into_response())
}

async fn update_settings(
    state: &FeatureState,
    auth: AuthUser,
    patch: SettingsPatch,
) -> Result<Response, UserApiError> {
    let settings =
        super::commands::update_settings::handle(&state.repos, auth.user.id, patch).await?;
    Ok(ApiResponse::success(settings).into_response())
}

#[tracing::instrument(skip(state, auth, body), fields(user_id = %auth.user.id))]
async fn update_preferences(
    State(state): State<FeatureState>,
    auth: AuthUser,
    AppJson(body): AppJson<PreferencesBody>,
) -> Result<Response, UserApiError> {
    update_settings(&state, auth, body.into()).await
}

#[tracing::instrument(skip(state, auth, body), fields(user_id = %auth.user.id))]
async fn update_notifications(
    State(state): State<FeatureState>,
    auth: AuthUser,
    AppJson(body): AppJson<NotificationsBody>,
) -> Result<Response, UserApiError> {
    update_settings(&state, auth, body.into()).await
}

#[tracing::instrument(skip(state, auth, body), fields(user_id = %auth.user.id))]
async fn update_privacy(
    State(state): State<FeatureState>,
    auth: AuthUser,
    AppJson(body): AppJson<PrivacyBody>,
) -> Result<Response, UserApiError> {
    update_settings(&state, auth, body.into()).await
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum UserApiError {
    Stats(GetStatsError),
    Settings(UpdateSettingsError),
}

impl From<GetStatsError> for UserApiError {
    fn from(err: GetStatsError) -> Self {
        Self::Stats(err)
    }
}

impl From<UpdateSettingsError> for UserApiError {
    fn from(err: UpdateSettingsError) -> Self {
        Self::Settings(err)
    }
}

impl IntoResponse for UserApiError {
    fn into_response(self) -> Response {
        // Both variants only wrap storage failures
        tracing::error!("Database error in user endpoint: {}", self);
        let error = ErrorResponse::new("INTERNAL_ERROR", "A database error occurred");
        (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
    }
}

impl std::fmt::Display for UserApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stats(e) => write!(f, "{}", e),
            Self::Settings(e) => write!(f, "{}", e),
        }
    }
}
