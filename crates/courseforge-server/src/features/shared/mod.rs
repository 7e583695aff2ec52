//! Shared utilities and types for feature modules
//!
//! # Contents
//!
//! - **pagination**: Page/per-page parameters and response metadata
//! - **validation**: Account input validation
//! - **stats**: Recomputing the cached per-user stats
//! - **test_helpers**: In-memory state and fixtures (test-only)

pub mod pagination;
pub mod stats;
pub mod validation;

#[cfg(test)]
pub mod test_helpers;

pub use pagination::{PaginationMetadata, PaginationParams};
pub use stats::refresh_user_stats;
