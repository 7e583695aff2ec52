//! CourseForge Common Library
//!
//! Shared types, logging, and error handling for the CourseForge workspace.
//!
//! # Overview
//!
//! This crate provides common functionality used across all CourseForge workspace members:
//!
//! - **Error Handling**: The shared [`ForgeError`] type and result alias
//! - **Logging**: Centralized `tracing` subscriber setup
//! - **Types**: Course, user, and settings records shared by the generator and the server
//!
//! # Example
//!
//! ```no_run
//! use courseforge_common::types::{Course, SourceType};
//!
//! fn is_video(course: &Course) -> bool {
//!     course.source_type == SourceType::Youtube
//! }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{ForgeError, Result};
