pub mod create_from_pdf;
pub mod create_from_youtube;
pub mod delete;
pub mod update_progress;

pub use create_from_pdf::{CreatePdfCourseCommand, CreatePdfCourseError};
pub use create_from_youtube::{CreateYoutubeCourseCommand, CreateYoutubeCourseError};
pub use delete::{DeleteCourseError, DeleteCourseResponse};
pub use update_progress::{UpdateProgressCommand, UpdateProgressError};
