//! Error types shared across CourseForge crates

use thiserror::Error;

/// Result type alias for CourseForge operations
pub type Result<T> = std::result::Result<T, ForgeError>;

/// Main error type for domain-level failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ForgeError {
    #[error("Unsupported source type: {0}")]
    UnsupportedSourceType(String),

    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    #[error("Invalid difficulty: {0}")]
    InvalidDifficulty(String),

    #[error("Progress must be between 0 and 100, got {0}")]
    ProgressOutOfRange(i64),

    #[error("Configuration error: {0}")]
    Config(String),
}
