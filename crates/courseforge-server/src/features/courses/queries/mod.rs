pub mod get;
pub mod list;

pub use get::GetCourseError;
pub use list::{ListCoursesError, ListCoursesResponse};
