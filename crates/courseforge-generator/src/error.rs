//! Generator error types

use std::path::PathBuf;

use courseforge_common::ForgeError;
use thiserror::Error;

/// Errors returned by [`crate::CourseGenerator::generate`]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerateError {
    #[error("YouTube URL is required")]
    MissingUrl,

    #[error("PDF filename is required")]
    MissingFilename,

    #[error("Could not find a YouTube video ID in '{0}'")]
    UnparseableUrl(String),

    #[error("Unsupported source type: {0}")]
    UnsupportedSourceType(String),
}

impl GenerateError {
    /// Whether the caller supplied bad input, as opposed to an unknown source kind
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            GenerateError::MissingUrl
                | GenerateError::MissingFilename
                | GenerateError::UnparseableUrl(_)
        )
    }
}

impl From<ForgeError> for GenerateError {
    fn from(err: ForgeError) -> Self {
        match err {
            ForgeError::UnsupportedSourceType(kind) => GenerateError::UnsupportedSourceType(kind),
            other => GenerateError::UnsupportedSourceType(other.to_string()),
        }
    }
}

/// Errors raised while loading or validating a template catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid catalog: {0}")]
    Invalid(String),
}
