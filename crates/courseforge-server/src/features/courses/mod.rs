//! Course generation and management

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::courses_routes;
