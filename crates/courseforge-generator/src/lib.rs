//! CourseForge course generator
//!
//! Turns a YouTube URL or a PDF filename into a micro-course by selecting one of a small
//! set of hand-written templates and stamping it with the source. There is no content
//! extraction: selection is a hash of the video ID, or a keyword match on the filename.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use courseforge_generator::{CourseGenerator, GeneratorOptions, SourceDescriptor, TemplateCatalog};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let catalog = Arc::new(TemplateCatalog::builtin()?);
//!     let generator = CourseGenerator::new(catalog, GeneratorOptions::default());
//!
//!     let course = generator.generate(&SourceDescriptor::Youtube {
//!         url: "https://youtu.be/dQw4w9WgXcQ".to_string(),
//!     })?;
//!     println!("{} ({} notes)", course.title, course.notes.len());
//!     Ok(())
//! }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod catalog;
pub mod error;
pub mod generator;
pub mod pdf;
pub mod stats;
pub mod youtube;

pub use catalog::{CourseTemplate, TemplateCatalog};
pub use error::{CatalogError, GenerateError};
pub use generator::{
    CourseGenerator, GeneratorOptions, InitialProgress, SourceDescriptor, UnparseableUrlPolicy,
};
pub use stats::compute_stats;
