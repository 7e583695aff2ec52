//! User accounts and settings
//!
//! Settings are three closed option groups. Each group has a matching `*Patch` type used
//! for partial updates; patches reject unknown keys so a typo never silently no-ops.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
    Fr,
    De,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmailDigest {
    Daily,
    #[default]
    Weekly,
    Monthly,
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub theme: Theme,
    pub language: Language,
    pub email_digest: EmailDigest,
    pub autoplay: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            language: Language::default(),
            email_digest: EmailDigest::default(),
            autoplay: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    pub course_complete: bool,
    pub quiz_results: bool,
    pub weekly_progress: bool,
    pub new_features: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            course_complete: true,
            quiz_results: true,
            weekly_progress: false,
            new_features: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivacySettings {
    pub profile_visible: bool,
    pub progress_visible: bool,
    pub achievements_visible: bool,
}

impl Default for PrivacySettings {
    fn default() -> Self {
        Self {
            profile_visible: true,
            progress_visible: false,
            achievements_visible: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PreferencesPatch {
    pub theme: Option<Theme>,
    pub language: Option<Language>,
    pub email_digest: Option<EmailDigest>,
    pub autoplay: Option<bool>,
}

impl PreferencesPatch {
    pub fn apply(self, target: &mut Preferences) {
        if let Some(theme) = self.theme {
            target.theme = theme;
        }
        if let Some(language) = self.language {
            target.language = language;
        }
        if let Some(digest) = self.email_digest {
            target.email_digest = digest;
        }
        if let Some(autoplay) = self.autoplay {
            target.autoplay = autoplay;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotificationSettingsPatch {
    pub course_complete: Option<bool>,
    pub quiz_results: Option<bool>,
    pub weekly_progress: Option<bool>,
    pub new_features: Option<bool>,
}

impl NotificationSettingsPatch {
    pub fn apply(self, target: &mut NotificationSettings) {
        if let Some(v) = self.course_complete {
            target.course_complete = v;
        }
        if let Some(v) = self.quiz_results {
            target.quiz_results = v;
        }
        if let Some(v) = self.weekly_progress {
            target.weekly_progress = v;
        }
        if let Some(v) = self.new_features {
            target.new_features = v;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrivacySettingsPatch {
    pub profile_visible: Option<bool>,
    pub progress_visible: Option<bool>,
    pub achievements_visible: Option<bool>,
}

impl PrivacySettingsPatch {
    pub fn apply(self, target: &mut PrivacySettings) {
        if let Some(v) = self.profile_visible {
            target.profile_visible = v;
        }
        if let Some(v) = self.progress_visible {
            target.progress_visible = v;
        }
        if let Some(v) = self.achievements_visible {
            target.achievements_visible = v;
        }
    }
}

/// A patch aimed at exactly one settings group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsPatch {
    Preferences(PreferencesPatch),
    Notifications(NotificationSettingsPatch),
    Privacy(PrivacySettingsPatch),
}

/// One complete settings group, keyed by group name when serialized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingsGroup {
    Preferences(Preferences),
    Notifications(NotificationSettings),
    Privacy(PrivacySettings),
}

impl SettingsPatch {
    /// Patch the matching group of `user` and return that group as it now stands
    pub fn apply_to(self, user: &mut User) -> SettingsGroup {
        match self {
            Self::Preferences(patch) => {
                patch.apply(&mut user.preferences);
                SettingsGroup::Preferences(user.preferences)
            },
            Self::Notifications(patch) => {
                patch.apply(&mut user.notifications);
                SettingsGroup::Notifications(user.notifications)
            },
            Self::Privacy(patch) => {
                patch.apply(&mut user.privacy);
                SettingsGroup::Privacy(user.privacy)
            },
        }
    }
}

/// Cached aggregate over a user's courses
///
/// Always derived from the course set; never edited directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserStats {
    pub total_courses: u32,
    pub completed_courses: u32,
    pub total_hours: u32,
    pub average_progress: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub avatar: Option<String>,
    pub preferences: Preferences,
    pub notifications: NotificationSettings,
    pub privacy: PrivacySettings,
    pub stats: UserStats,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// A freshly registered user with default settings and empty stats
    pub fn new(name: String, email: String, password_hash: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            avatar: None,
            preferences: Preferences::default(),
            notifications: NotificationSettings::default(),
            privacy: PrivacySettings::default(),
            stats: UserStats::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile::from(self)
    }
}

/// Public view of a [`User`]; never carries the password hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub preferences: Preferences,
    pub notifications: NotificationSettings,
    pub privacy: PrivacySettings,
    pub stats: UserStats,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            avatar: user.avatar.clone(),
            preferences: user.preferences,
            notifications: user.notifications,
            privacy: user.privacy,
            stats: user.stats,
            created_at: user.created_at,
        }
    }
}
