pub mod update_settings;

pub use update_settings::{NotificationsBody, PreferencesBody, PrivacyBody, UpdateSettingsError};
