//! Domain types shared by the generator and the server
//!
//! - [`course`]: generated courses and their embedded notes, quizzes, and flashcards
//! - [`user`]: user accounts, settings groups, and the stats summary

pub mod course;
pub mod user;

pub use course::{
    Category, Course, Difficulty, Flashcard, NewCourse, Note, ProgressTransition, Question, Quiz,
    SourceType,
};
pub use user::{
    EmailDigest, Language, NotificationSettings, NotificationSettingsPatch, Preferences,
    PreferencesPatch, PrivacySettings, PrivacySettingsPatch, SettingsGroup, SettingsPatch, Theme,
    User, UserProfile, UserStats,
};
