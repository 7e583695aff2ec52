//! Accounts and sessions: registration, login, logout, profile and password changes

pub mod commands;
pub mod queries;
pub mod routes;

pub use commands::AuthResponse;
pub use routes::auth_routes;
