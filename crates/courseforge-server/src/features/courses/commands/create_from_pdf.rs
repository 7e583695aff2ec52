//! Create a course from an uploaded PDF
//!
//! Only the upload's filename and size feed generation; the bytes themselves are not
//! inspected or stored.

use std::sync::Arc;

use chrono::Utc;
use courseforge_common::types::Course;
use courseforge_generator::{CourseGenerator, GenerateError, SourceDescriptor};
use uuid::Uuid;

use crate::config::UploadConfig;
use crate::db::DbError;
use crate::features::shared::refresh_user_stats;
use crate::repository::Repositories;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// True when a MIME type is `application/pdf`, ignoring case and parameters
pub fn is_pdf_content_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case(PDF_CONTENT_TYPE))
}

#[derive(Debug, Clone)]
pub struct CreatePdfCourseCommand {
    pub filename: String,
    pub content_type: Option<String>,
    pub size_bytes: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum CreatePdfCourseError {
    #[error("Only PDF files are allowed (got {0})")]
    NotPdf(String),

    #[error("PDF exceeds the {limit} byte upload limit")]
    TooLarge { limit: usize },

    #[error("{0}")]
    Generate(#[from] GenerateError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl CreatePdfCourseCommand {
    #[tracing::instrument(skip(self, uploads), fields(filename = %self.filename))]
    pub fn validate(&self, uploads: &UploadConfig) -> Result<(), CreatePdfCourseError> {
        match self.content_type.as_deref() {
            Some(ct) if is_pdf_content_type(ct) => {},
            other => {
                return Err(CreatePdfCourseError::NotPdf(
                    other.unwrap_or("no content type").to_string(),
                ))
            },
        }

        if self.size_bytes > uploads.max_pdf_bytes as u64 {
            return Err(CreatePdfCourseError::TooLarge {
                limit: uploads.max_pdf_bytes,
            });
        }

        Ok(())
    }
}

#[tracing::instrument(
    skip(repos, generator, uploads, command),
    fields(filename = %command.filename, size_bytes = command.size_bytes)
)]
pub async fn handle(
    repos: &Repositories,
    generator: &Arc<CourseGenerator>,
    uploads: &UploadConfig,
    owner_id: Uuid,
    command: CreatePdfCourseCommand,
) -> Result<Course, CreatePdfCourseError> {
    command.validate(uploads)?;

    let source = SourceDescriptor::Pdf {
        filename: command.filename,
        size_bytes: command.size_bytes,
    };
    let course = generator.generate(&source)?.into_course(owner_id, Utc::now());

    repos.courses.insert_course(&course).await?;
    refresh_user_stats(repos, owner_id).await?;

    tracing::info!(course_id = %course.id, title = %course.title, "PDF course created");
    Ok(course)
}
