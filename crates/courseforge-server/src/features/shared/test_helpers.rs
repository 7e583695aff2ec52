//! Test fixtures for feature handlers
//!
//! Builds a [`FeatureState`] over in-memory repositories and seeds users directly,
//! bypassing the HTTP layer.

use std::sync::Arc;

use chrono::Utc;
use courseforge_common::types::User;
use courseforge_generator::{CourseGenerator, GeneratorOptions, TemplateCatalog};

use crate::auth::password::hash_password;
use crate::config::{AuthConfig, UploadConfig, DEFAULT_MAX_PDF_BYTES, DEFAULT_TOKEN_TTL_HOURS};
use crate::features::FeatureState;
use crate::repository::Repositories;

pub const TEST_PASSWORD: &str = "password123";

#[allow(clippy::expect_used)]
pub fn test_state_with(options: GeneratorOptions) -> FeatureState {
    let catalog = TemplateCatalog::builtin().expect("built-in catalog is valid");
    FeatureState {
        repos: Repositories::in_memory(),
        generator: Arc::new(CourseGenerator::new(Arc::new(catalog), options)),
        auth: AuthConfig {
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
        },
        uploads: UploadConfig {
            max_pdf_bytes: DEFAULT_MAX_PDF_BYTES,
        },
    }
}

pub fn test_state() -> FeatureState {
    test_state_with(GeneratorOptions::default())
}

/// Insert a user whose password is [`TEST_PASSWORD`]
#[allow(clippy::expect_used)]
pub async fn create_test_user(state: &FeatureState, email: &str) -> User {
    let hash = hash_password(TEST_PASSWORD).expect("hashing succeeds");
    let user = User::new("Test User".to_string(), email.to_string(), hash, Utc::now());
    state
        .repos
        .users
        .create_user(&user)
        .await
        .expect("user inserted");
    user
}
