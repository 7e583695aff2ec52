//! Update one settings group
//!
//! Each group is patched independently; absent keys keep their current value and
//! unknown keys are rejected while the request body is parsed.

use chrono::Utc;
use courseforge_common::types::{
    NotificationSettingsPatch, PreferencesPatch, PrivacySettingsPatch, SettingsGroup,
    SettingsPatch,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::db::DbError;
use crate::repository::Repositories;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PreferencesBody {
    pub preferences: PreferencesPatch,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotificationsBody {
    pub notifications: NotificationSettingsPatch,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrivacyBody {
    pub privacy: PrivacySettingsPatch,
}

impl From<PreferencesBody> for SettingsPatch {
    fn from(body: PreferencesBody) -> Self {
        Self::Preferences(body.preferences)
    }
}

impl From<NotificationsBody> for SettingsPatch {
    fn from(body: NotificationsBody) -> Self {
        Self::Notifications(body.notifications)
    }
}

impl From<PrivacyBody> for SettingsPatch {
    fn from(body: PrivacyBody) -> Self {
        Self::Privacy(body.privacy)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateSettingsError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

/// Patch one group against the stored user; returns the full group after the update
#[tracing::instrument(skip(repos, patch))]
pub async fn handle(
    repos: &Repositories,
    user_id: Uuid,
    patch: SettingsPatch,
) -> Result<SettingsGroup, UpdateSettingsError> {
    let group = repos
        .users
        .update_settings(user_id, patch, Utc::now())
        .await?;

    tracing::info!("Settings updated");
    Ok(group)
}
