//! Feature modules implementing the CourseForge API
//!
//! Each feature is a vertical slice with its own commands, queries, and routes.
//!
//! # Features
//!
//! - **auth**: Registration, login, logout, profile and password changes
//! - **courses**: Course generation from YouTube URLs and PDF uploads, progress, deletion
//! - **users**: Learning statistics and account settings
//!
//! # Architecture
//!
//! Each feature module follows the structure:
//! - `commands/` - Write operations (create, update, delete)
//! - `queries/` - Read operations (get, list)
//! - `routes.rs` - HTTP route definitions and error mapping
//!
//! Command and query handlers are plain async functions over [`Repositories`], so they
//! can be tested without going through HTTP.

pub mod auth;
pub mod courses;
pub mod shared;
pub mod users;

use std::sync::Arc;

use axum::Router;
use courseforge_generator::CourseGenerator;

use crate::config::{AuthConfig, UploadConfig};
use crate::repository::Repositories;

/// Shared state for all feature routes
#[derive(Clone)]
pub struct FeatureState {
    /// User, course and session storage
    pub repos: Repositories,
    /// Template-backed course generator, shared across requests
    pub generator: Arc<CourseGenerator>,
    pub auth: AuthConfig,
    pub uploads: UploadConfig,
}

/// Creates the API router with all feature routes mounted
///
/// - `/auth` - Accounts and sessions
/// - `/courses` - Course generation and progress
/// - `/users` - Statistics and settings
pub fn router(state: FeatureState) -> Router<()> {
    let max_pdf_bytes = state.uploads.max_pdf_bytes;

    Router::new()
        .nest("/auth", auth::auth_routes())
        .nest("/courses", courses::courses_routes(max_pdf_bytes))
        .nest("/users", users::users_routes())
        .with_state(state)
}
