pub mod change_password;
pub mod login;
pub mod logout;
pub mod register;
pub mod update_profile;

use courseforge_common::types::UserProfile;
use serde::Serialize;

pub use change_password::{ChangePasswordCommand, ChangePasswordError};
pub use login::{LoginCommand, LoginError};
pub use logout::{LogoutError, LogoutResponse};
pub use register::{RegisterCommand, RegisterError};
pub use update_profile::{UpdateProfileCommand, UpdateProfileError};

/// Returned by every command that signs a user in
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}
