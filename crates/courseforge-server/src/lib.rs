//! CourseForge Server Library
//!
//! HTTP server that turns YouTube URLs and PDF uploads into micro-courses.
//!
//! # Overview
//!
//! - **API Endpoints**: JSON REST API under `/api/v1` for accounts, courses, and statistics
//! - **Storage**: In-memory repositories by default, PostgreSQL via SQLx when configured
//! - **Authentication**: Opaque bearer tokens backed by hashed server-side sessions
//! - **Configuration**: Environment-based configuration management
//! - **Middleware**: CORS, compression, and request tracing
//!
//! # Architecture
//!
//! Features are vertical slices split into commands and queries:
//!
//! - **Commands** (write operations): register, generate a course, set progress, delete
//! - **Queries** (read operations): current user, list courses, statistics
//!
//! Handlers talk to storage only through the traits in [`repository`], so every feature
//! runs unchanged against either backend. Course content itself comes from
//! [`courseforge_generator`].
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use courseforge_generator::{CourseGenerator, TemplateCatalog};
//! use courseforge_server::{api, config::Config, features::FeatureState, repository::Repositories};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let catalog = Arc::new(TemplateCatalog::builtin()?);
//!     let state = FeatureState {
//!         repos: Repositories::in_memory(),
//!         generator: Arc::new(CourseGenerator::new(catalog, config.generator.options())),
//!         auth: config.auth.clone(),
//!         uploads: config.uploads.clone(),
//!     };
//!
//!     let app = api::create_router(state, &config.cors);
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:5000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod features;
pub mod middleware;
pub mod repository;

pub use error::AppError;
