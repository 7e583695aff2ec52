//! Authentication API routes
//!
//! # Route Structure
//!
//! - `POST /api/v1/auth/register` - Create an account and sign in
//! - `POST /api/v1/auth/login` - Exchange credentials for a bearer token
//! - `POST /api/v1/auth/logout` - Revoke the current token
//! - `GET /api/v1/auth/me` - Current user's profile
//! - `PUT /api/v1/auth/profile` - Update name and/or email
//! - `PUT /api/v1/auth/password` - Change password, revoking all sessions

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};

use super::commands::{
    ChangePasswordCommand, ChangePasswordError, LoginCommand, LoginError, LogoutError,
    RegisterCommand, RegisterError, UpdateProfileCommand, UpdateProfileError,
};
use super::queries::GetCurrentUserError;
use crate::api::extract::AppJson;
use crate::api::response::{ApiResponse, ErrorResponse};
use crate::features::FeatureState;
use crate::middleware::auth::AuthUser;

// ============================================================================
// Router Configuration
// ============================================================================

pub fn auth_routes() -> Router<FeatureState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
        .route("/profile", put(update_profile))
        .route("/password", put(change_password))
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

/// Register a new account
///
/// # Response
///
/// - `201 Created` - `{token, user}`
/// - `400 Bad Request` - Validation error
/// - `409 Conflict` - Email already registered
#[tracing::instrument(skip(state, command))]
async fn register(
    State(state): State<FeatureState>,
    AppJson(command): AppJson<RegisterCommand>,
) -> Result<Response, AuthApiError> {
    let response = super::commands::register::handle(&state.repos, &state.auth, command).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

/// Sign in with email and password
///
/// # Response
///
/// - `200 OK` - `{token, user}`
/// - `400 Bad Request` - Missing email or password
/// - `401 Unauthorized` - Invalid email or password
#[tracing::instrument(skip(state, command))]
async fn login(
    State(state): State<FeatureState>,
    AppJson(command): AppJson<LoginCommand>,
) -> Result<Response, AuthApiError> {
    let response = super::commands::login::handle(&state.repos, &state.auth, command).await?;
    Ok(ApiResponse::success(response).into_response())
}

#[tracing::instrument(skip(state, auth), fields(user_id = %auth.user.id))]
async fn logout(
    State(state): State<FeatureState>,
    auth: AuthUser,
) -> Result<Response, AuthApiError> {
    let response = super::commands::logout::handle(&state.repos, &auth.token_hash).await?;
    Ok(ApiResponse::success(response).into_response())
}

/// Update the caller's name and/or email
///
/// # Response
///
/// - `200 OK` - Updated profile
/// - `400 Bad Request` - Validation error or unknown field
/// - `409 Conflict` - Email belongs to another account
#[tracing::instrument(skip(state, auth, command), fields(user_id = %auth.user.id))]
async fn update_profile(
    State(state): State<FeatureState>,
    auth: AuthUser,
    AppJson(command): AppJson<UpdateProfileCommand>,
) -> Result<Response, AuthApiError> {
    let profile =
        super::commands::update_profile::handle(&state.repos, auth.user.id, command).await?;
    Ok(ApiResponse::success(profile).into_response())
}

/// Change the caller's password
///
/// Every existing token for the user stops working; the response carries a new one.
#[tracing::instrument(skip(state, auth, command), fields(user_id = %auth.user.id))]
async fn change_password(
    State(state): State<FeatureState>,
    auth: AuthUser,
    AppJson(command): AppJson<ChangePasswordCommand>,
) -> Result<Response, AuthApiError> {
    let response =
        super::commands::change_password::handle(&state.repos, &state.auth, auth.user.id, command)
            .await?;
    Ok(ApiResponse::success(response).into_response())
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

#[tracing::instrument(skip(state, auth), fields(user_id = %auth.user.id))]
async fn me(State(state): State<FeatureState>, auth: AuthUser) -> Result<Response, AuthApiError> {
    let profile = super::queries::me::handle(&state.repos, auth.user.id).await?;
    Ok(ApiResponse::success(profile).into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Unified error type for authentication endpoints
#[derive(Debug)]
enum AuthApiError {
    Register(RegisterError),
    Login(LoginError),
    Logout(LogoutError),
    UpdateProfile(UpdateProfileError),
    ChangePassword(ChangePasswordError),
    Me(GetCurrentUserError),
}

impl From<RegisterError> for AuthApiError {
    fn from(err: RegisterError) -> Self {
        Self::Register(err)
    }
}

impl From<LoginError> for AuthApiError {
    fn from(err: LoginError) -> Self {
        Self::Login(err)
    }
}

impl From<LogoutError> for AuthApiError {
    fn from(err: LogoutError) -> Self {
        Self::Logout(err)
    }
}

impl From<UpdateProfileError> for AuthApiError {
    fn from(err: UpdateProfileError) -> Self {
        Self::UpdateProfile(err)
    }
}

impl From<ChangePasswordError> for AuthApiError {
    fn from(err: ChangePasswordError) -> Self {
        Self::ChangePassword(err)
    }
}

impl From<GetCurrentUserError> for AuthApiError {
    fn from(err: GetCurrentUserError) -> Self {
        Self::Me(err)
    }
}

impl AuthApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        use AuthApiError::*;

        match self {
            Register(RegisterError::NameValidation(_))
            | Register(RegisterError::EmailValidation(_))
            | Register(RegisterError::PasswordValidation(_))
            | Login(LoginError::MissingCredentials)
            | UpdateProfile(UpdateProfileError::NoFieldsToUpdate)
            | UpdateProfile(UpdateProfileError::NameValidation(_))
            | UpdateProfile(UpdateProfileError::EmailValidation(_))
            | ChangePassword(ChangePasswordError::PasswordValidation(_)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            },

            Login(LoginError::InvalidCredentials)
            | ChangePassword(ChangePasswordError::IncorrectPassword)
            | Me(GetCurrentUserError::NotFound(_)) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),

            Register(RegisterError::DuplicateEmail(_))
            | UpdateProfile(UpdateProfileError::DuplicateEmail(_)) => {
                (StatusCode::CONFLICT, "CONFLICT")
            },

            Register(RegisterError::Password(_))
            | Register(RegisterError::Database(_))
            | Login(LoginError::Password(_))
            | Login(LoginError::Database(_))
            | Logout(LogoutError::Database(_))
            | UpdateProfile(UpdateProfileError::Database(_))
            | ChangePassword(ChangePasswordError::Password(_))
            | ChangePassword(ChangePasswordError::Database(_))
            | Me(GetCurrentUserError::Database(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            },
        }
    }
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Internal error in auth endpoint: {}", self);
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}

impl std::fmt::Display for AuthApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Register(e) => write!(f, "{}", e),
            Self::Login(e) => write!(f, "{}", e),
            Self::Logout(e) => write!(f, "{}", e),
            Self::UpdateProfile(e) => write!(f, "{}", e),
            Self::ChangePassword(e) => write!(f, "{}", e),
            Self::Me(e) => write!(f, "{}", e),
        }
    }
}
