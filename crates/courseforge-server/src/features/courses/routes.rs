//! Course API routes
//!
//! # Route Structure
//!
//! - `GET /api/v1/courses` - Caller's courses, newest first, paginated
//! - `GET /api/v1/courses/:id` - One course
//! - `POST /api/v1/courses/youtube` - Generate a course from a YouTube URL
//! - `POST /api/v1/courses/pdf` - Generate a course from an uploaded PDF (field `pdf`)
//! - `PUT /api/v1/courses/:id/progress` - Set progress (0-100)
//! - `DELETE /api/v1/courses/:id` - Delete a course
//!
//! Courses owned by another user answer 404, exactly like missing ones.

use axum::{
    extract::{
        multipart::{Multipart, MultipartError, MultipartRejection},
        DefaultBodyLimit, Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use courseforge_generator::GenerateError;
use serde_json::json;
use uuid::Uuid;

use super::commands::{
    create_from_pdf::is_pdf_content_type, CreatePdfCourseCommand, CreatePdfCourseError,
    CreateYoutubeCourseCommand, CreateYoutubeCourseError, DeleteCourseError,
    UpdateProgressCommand, UpdateProgressError,
};
use super::queries::{GetCourseError, ListCoursesError};
use crate::api::extract::{AppJson, AppQuery};
use crate::api::response::{ApiResponse, ErrorResponse};
use crate::features::shared::PaginationParams;
use crate::features::FeatureState;
use crate::middleware::auth::AuthUser;

/// Multipart field carrying the uploaded file
pub const PDF_FIELD: &str = "pdf";

/// Body allowance on top of the file limit for multipart boundaries and part headers
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

// ============================================================================
// Router Configuration
// ============================================================================

pub fn courses_routes(max_pdf_bytes: usize) -> Router<FeatureState> {
    let upload_limit =
        DefaultBodyLimit::max(max_pdf_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES));

    Router::new()
        .route("/", get(list_courses))
        .route("/youtube", post(create_youtube_course))
        .route("/pdf", post(create_pdf_course).layer(upload_limit))
        .route("/:id", get(get_course).delete(delete_course))
        .route("/:id/progress", put(update_progress))
}

fn parse_course_id(raw: &str) -> Result<Uuid, CourseApiError> {
    Uuid::parse_str(raw).map_err(|_| CourseApiError::InvalidId(raw.to_string()))
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

/// Generate a course from a YouTube URL
///
/// # Request Body
///
/// ```json
/// { "url": "https://www.youtube.com/watch?v=dQw4w9WgXcQ" }
/// ```
///
/// # Response
///
/// - `201 Created` - The generated course
/// - `400 Bad Request` - Missing or unparseable URL
#[tracing::instrument(skip(state, auth, command), fields(user_id = %auth.user.id))]
async fn create_youtube_course(
    State(state): State<FeatureState>,
    auth: AuthUser,
    AppJson(command): AppJson<CreateYoutubeCourseCommand>,
) -> Result<Response, CourseApiError> {
    let course = super::commands::create_from_youtube::handle(
        &state.repos,
        &state.generator,
        auth.user.id,
        command,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(course))).into_response())
}

/// Generate a course from an uploaded PDF
///
/// # Request Body
///
/// `multipart/form-data` with the file in the `pdf` field.
///
/// # Response
///
/// - `201 Created` - The generated course
/// - `400 Bad Request` - No file, or no filename
/// - `413 Payload Too Large` - File exceeds the upload limit
/// - `415 Unsupported Media Type` - File is not `application/pdf`
#[tracing::instrument(skip(state, auth, multipart), fields(user_id = %auth.user.id))]
async fn create_pdf_course(
    State(state): State<FeatureState>,
    auth: AuthUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, CourseApiError> {
    let mut multipart =
        multipart.map_err(|e| CourseApiError::Upload(UploadError::InvalidForm(e.body_text())))?;
    let command = read_pdf_upload(&mut multipart, state.uploads.max_pdf_bytes).await?;

    let course = super::commands::create_from_pdf::handle(
        &state.repos,
        &state.generator,
        &state.uploads,
        auth.user.id,
        command,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(course))).into_response())
}

/// Find the `pdf` field and measure it, stopping early on a wrong type or oversize body
async fn read_pdf_upload(
    multipart: &mut Multipart,
    max_bytes: usize,
) -> Result<CreatePdfCourseCommand, CourseApiError> {
    let too_large = || CreatePdfCourseError::TooLarge { limit: max_bytes };
    let map_multipart = |err: MultipartError| {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            CourseApiError::CreatePdf(too_large())
        } else {
            CourseApiError::Upload(UploadError::InvalidForm(err.body_text()))
        }
    };

    while let Some(mut field) = multipart.next_field().await.map_err(map_multipart)? {
        if field.name() != Some(PDF_FIELD) {
            continue;
        }

        let content_type = field.content_type().map(str::to_string);
        if !content_type.as_deref().is_some_and(is_pdf_content_type) {
            return Err(CreatePdfCourseError::NotPdf(
                content_type.unwrap_or_else(|| "no content type".to_string()),
            )
            .into());
        }

        let filename = field.file_name().unwrap_or_default().to_string();

        let mut size_bytes: u64 = 0;
        while let Some(chunk) = field.chunk().await.map_err(map_multipart)? {
            size_bytes += chunk.len() as u64;
            if size_bytes > max_bytes as u64 {
                return Err(too_large().into());
            }
        }

        return Ok(CreatePdfCourseCommand {
            filename,
            content_type,
            size_bytes,
        });
    }

    Err(CourseApiError::Upload(UploadError::MissingFile))
}

/// Set a course's progress
///
/// # Response
///
/// - `200 OK` - The updated course
/// - `400 Bad Request` - Progress missing, not an integer, or outside 0-100
/// - `404 Not Found` - No such course for this user
#[tracing::instrument(skip(state, auth, command), fields(user_id = %auth.user.id, course_id = %id))]
async fn update_progress(
    State(state): State<FeatureState>,
    auth: AuthUser,
    Path(id): Path<String>,
    AppJson(command): AppJson<UpdateProgressCommand>,
) -> Result<Response, CourseApiError> {
    let course_id = parse_course_id(&id)?;
    let course =
        super::commands::update_progress::handle(&state.repos, auth.user.id, course_id, command)
            .await?;
    Ok(ApiResponse::success(course).into_response())
}

#[tracing::instrument(skip(state, auth), fields(user_id = %auth.user.id, course_id = %id))]
async fn delete_course(
    State(state): State<FeatureState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Response, CourseApiError> {
    let course_id = parse_course_id(&id)?;
    let response = super::commands::delete::handle(&state.repos, auth.user.id, course_id).await?;
    Ok(ApiResponse::success(response).into_response())
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

#[tracing::instrument(skip(state, auth), fields(user_id = %auth.user.id, course_id = %id))]
async fn get_course(
    State(state): State<FeatureState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Response, CourseApiError> {
    let course_id = parse_course_id(&id)?;
    let course = super::queries::get::handle(&state.repos, auth.user.id, course_id).await?;
    Ok(ApiResponse::success(course).into_response())
}

/// List the caller's courses
///
/// # Query Parameters
///
/// - `page` - Page number (default: 1)
/// - `per_page` - Items per page (default: 20, max: 100)
#[tracing::instrument(skip(state, auth, params), fields(user_id = %auth.user.id))]
async fn list_courses(
    State(state): State<FeatureState>,
    auth: AuthUser,
    AppQuery(params): AppQuery<PaginationParams>,
) -> Result<Response, CourseApiError> {
    let response = super::queries::list::handle(&state.repos, auth.user.id, params).await?;

    Ok(ApiResponse::success_with_meta(
        response.courses,
        json!({ "pagination": response.pagination }),
    )
    .into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug, thiserror::Error)]
enum UploadError {
    #[error("No PDF file uploaded (expected multipart field 'pdf')")]
    MissingFile,

    #[error("Invalid multipart body: {0}")]
    InvalidForm(String),
}

/// Unified error type for course endpoints
#[derive(Debug)]
enum CourseApiError {
    CreateYoutube(CreateYoutubeCourseError),
    CreatePdf(CreatePdfCourseError),
    UpdateProgress(UpdateProgressError),
    Delete(DeleteCourseError),
    Get(GetCourseError),
    List(ListCoursesError),
    Upload(UploadError),
    InvalidId(String),
}

impl From<CreateYoutubeCourseError> for CourseApiError {
    fn from(err: CreateYoutubeCourseError) -> Self {
        Self::CreateYoutube(err)
    }
}

impl From<CreatePdfCourseError> for CourseApiError {
    fn from(err: CreatePdfCourseError) -> Self {
        Self::CreatePdf(err)
    }
}

impl From<UpdateProgressError> for CourseApiError {
    fn from(err: UpdateProgressError) -> Self {
        Self::UpdateProgress(err)
    }
}

impl From<DeleteCourseError> for CourseApiError {
    fn from(err: DeleteCourseError) -> Self {
        Self::Delete(err)
    }
}

impl From<GetCourseError> for CourseApiError {
    fn from(err: GetCourseError) -> Self {
        Self::Get(err)
    }
}

impl From<ListCoursesError> for CourseApiError {
    fn from(err: ListCoursesError) -> Self {
        Self::List(err)
    }
}

const VALIDATION: (StatusCode, &str) = (StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
const NOT_FOUND: (StatusCode, &str) = (StatusCode::NOT_FOUND, "NOT_FOUND");
const INTERNAL: (StatusCode, &str) = (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR");
const UNSUPPORTED_SOURCE: (StatusCode, &str) = (StatusCode::BAD_REQUEST, "UNSUPPORTED_SOURCE_TYPE");

impl CourseApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        use CourseApiError::*;

        match self {
            CreateYoutube(CreateYoutubeCourseError::Generate(
                GenerateError::UnsupportedSourceType(_),
            ))
            | CreatePdf(CreatePdfCourseError::Generate(GenerateError::UnsupportedSourceType(_))) => {
                UNSUPPORTED_SOURCE
            },
            CreateYoutube(CreateYoutubeCourseError::Generate(_))
            | CreatePdf(CreatePdfCourseError::Generate(_)) => VALIDATION,
            CreatePdf(CreatePdfCourseError::NotPdf(_)) => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, "UNSUPPORTED_MEDIA_TYPE")
            },
            CreatePdf(CreatePdfCourseError::TooLarge { .. }) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE")
            },
            UpdateProgress(UpdateProgressError::OutOfRange(_))
            | List(ListCoursesError::InvalidPagination(_))
            | Upload(_) => VALIDATION,

            UpdateProgress(UpdateProgressError::NotFound(_))
            | Delete(DeleteCourseError::NotFound(_))
            | Get(GetCourseError::NotFound(_))
            | InvalidId(_) => NOT_FOUND,

            CreateYoutube(CreateYoutubeCourseError::Database(_))
            | CreatePdf(CreatePdfCourseError::Database(_))
            | UpdateProgress(UpdateProgressError::Database(_))
            | Delete(DeleteCourseError::Database(_))
            | Get(GetCourseError::Database(_))
            | List(ListCoursesError::Database(_)) => INTERNAL,
        }
    }
}

impl IntoResponse for CourseApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Internal error in course endpoint: {}", self);
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}

impl std::fmt::Display for CourseApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreateYoutube(e) => write!(f, "{}", e),
            Self::CreatePdf(e) => write!(f, "{}", e),
            Self::UpdateProgress(e) => write!(f, "{}", e),
            Self::Delete(e) => write!(f, "{}", e),
            Self::Get(e) => write!(f, "{}", e),
            Self::List(e) => write!(f, "{}", e),
            Self::Upload(e) => write!(f, "{}", e),
            Self::InvalidId(id) => write!(f, "Course '{}' not found", id),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_errors_are_client_errors() {
        let err = CourseApiError::CreateYoutube(CreateYoutubeCourseError::Generate(
            GenerateError::MissingUrl,
        ));
        assert_eq!(err.status_and_code(), VALIDATION);

        let err = CourseApiError::CreatePdf(CreatePdfCourseError::Generate(
            GenerateError::UnsupportedSourceType("vimeo".into()),
        ));
        assert_eq!(
            err.status_and_code(),
            (StatusCode::BAD_REQUEST, "UNSUPPORTED_SOURCE_TYPE")
        );
    }

    #[test]
    fn test_malformed_id_is_not_found() {
        let err = parse_course_id("not-a-uuid").unwrap_err();
        assert_eq!(err.status_and_code(), NOT_FOUND);
        assert_eq!(err.to_string(), "Course 'not-a-uuid' not found");
    }
}
