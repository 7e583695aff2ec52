//! Configuration management

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use courseforge_generator::{GeneratorOptions, InitialProgress, UnparseableUrlPolicy};
use serde::{Deserialize, Serialize};

// ============================================================================
// Server Configuration Constants
// ============================================================================

/// Default server host binding.
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

/// Default server port.
pub const DEFAULT_SERVER_PORT: u16 = 5000;

/// Default shutdown timeout in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Default database URL for local development.
pub const DEFAULT_DATABASE_URL: &str = "postgresql://localhost/courseforge";

/// Default maximum database connections in the pool.
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;

/// Default minimum database connections in the pool.
pub const DEFAULT_DATABASE_MIN_CONNECTIONS: u32 = 2;

/// Default database connection timeout in seconds.
pub const DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default database idle timeout in seconds (10 minutes).
pub const DEFAULT_DATABASE_IDLE_TIMEOUT_SECS: u64 = 600;

/// Default CORS allowed origin (the Vite dev server).
pub const DEFAULT_CORS_ALLOWED_ORIGIN: &str = "http://localhost:5173";

/// Default bearer token lifetime (7 days).
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24 * 7;

/// Default PDF upload limit (10 MiB).
pub const DEFAULT_MAX_PDF_BYTES: usize = 10 * 1024 * 1024;

/// Where users, courses, and sessions are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local maps; data is lost on restart
    #[default]
    Memory,
    Postgres,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Memory => "memory",
            StorageBackend::Postgres => "postgres",
        }
    }
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            other => anyhow::bail!("Invalid storage backend '{}', expected memory or postgres", other),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageBackend,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub auth: AuthConfig,
    pub generator: GeneratorConfig,
    pub uploads: UploadConfig,
}

/// Server-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub shutdown_timeout_secs: u64,
}

/// Database configuration, only used with [`StorageBackend::Postgres`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub token_ttl_hours: i64,
}

impl AuthConfig {
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.token_ttl_hours)
    }
}

/// Course generator settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub on_unparseable_url: UnparseableUrlPolicy,
    pub initial_progress: InitialProgress,
    /// Replacement template catalog; the built-in catalog is used when unset
    pub templates_path: Option<PathBuf>,
}

impl GeneratorConfig {
    pub fn options(&self) -> GeneratorOptions {
        GeneratorOptions {
            on_unparseable_url: self.on_unparseable_url,
            initial_progress: self.initial_progress,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub max_pdf_bytes: usize,
}

/// Read and parse an environment variable, using `default` when it is unset
///
/// A value that is set but does not parse is an error rather than a silent default.
fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid value for {}: {} ({})", key, raw, e)),
        Err(_) => Ok(default),
    }
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = Self::from_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Build configuration from the current process environment without loading `.env`
    pub fn from_env() -> anyhow::Result<Self> {
        let config = Config {
            server: ServerConfig {
                host: std::env::var("COURSEFORGE_HOST")
                    .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
                port: env_or("COURSEFORGE_PORT", DEFAULT_SERVER_PORT)?,
                shutdown_timeout_secs: env_or(
                    "COURSEFORGE_SHUTDOWN_TIMEOUT",
                    DEFAULT_SHUTDOWN_TIMEOUT_SECS,
                )?,
            },
            storage: env_or("COURSEFORGE_STORAGE", StorageBackend::default())?,
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
                max_connections: env_or(
                    "DATABASE_MAX_CONNECTIONS",
                    DEFAULT_DATABASE_MAX_CONNECTIONS,
                )?,
                min_connections: env_or(
                    "DATABASE_MIN_CONNECTIONS",
                    DEFAULT_DATABASE_MIN_CONNECTIONS,
                )?,
                connect_timeout_secs: env_or(
                    "DATABASE_CONNECT_TIMEOUT",
                    DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS,
                )?,
                idle_timeout_secs: env_or(
                    "DATABASE_IDLE_TIMEOUT",
                    DEFAULT_DATABASE_IDLE_TIMEOUT_SECS,
                )?,
            },
            cors: CorsConfig {
                allowed_origins: std::env::var("CORS_ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| DEFAULT_CORS_ALLOWED_ORIGIN.to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                allow_credentials: env_or("CORS_ALLOW_CREDENTIALS", true)?,
            },
            auth: AuthConfig {
                token_ttl_hours: env_or("COURSEFORGE_TOKEN_TTL_HOURS", DEFAULT_TOKEN_TTL_HOURS)?,
            },
            generator: GeneratorConfig {
                on_unparseable_url: env_or(
                    "COURSEFORGE_ON_UNPARSEABLE_URL",
                    UnparseableUrlPolicy::default(),
                )?,
                initial_progress: env_or(
                    "COURSEFORGE_INITIAL_PROGRESS",
                    InitialProgress::default(),
                )?,
                templates_path: std::env::var("COURSEFORGE_TEMPLATES_PATH")
                    .ok()
                    .filter(|s| !s.trim().is_empty())
                    .map(PathBuf::from),
            },
            uploads: UploadConfig {
                max_pdf_bytes: env_or("COURSEFORGE_MAX_PDF_BYTES", DEFAULT_MAX_PDF_BYTES)?,
            },
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port must be greater than 0");
        }

        if self.storage == StorageBackend::Postgres {
            if self.database.url.is_empty() {
                anyhow::bail!("Database URL cannot be empty");
            }

            if self.database.max_connections == 0 {
                anyhow::bail!("Database max_connections must be greater than 0");
            }

            if self.database.min_connections > self.database.max_connections {
                anyhow::bail!(
                    "Database min_connections ({}) cannot be greater than max_connections ({})",
                    self.database.min_connections,
                    self.database.max_connections
                );
            }
        }

        if self.auth.token_ttl_hours <= 0 {
            anyhow::bail!("Token TTL must be at least one hour");
        }

        if self.uploads.max_pdf_bytes == 0 {
            anyhow::bail!("PDF upload limit must be greater than 0");
        }

        if let Some(path) = &self.generator.templates_path {
            if !path.is_file() {
                return Err(anyhow::anyhow!("{} is not a file", path.display()))
                    .context("COURSEFORGE_TEMPLATES_PATH must point to a catalog file");
            }
        }

        if self.cors.allowed_origins.is_empty() {
            tracing::warn!("No CORS origins configured - all origins will be allowed");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: DEFAULT_SERVER_HOST.to_string(),
                port: DEFAULT_SERVER_PORT,
                shutdown_timeout_secs: DEFAULT_SHUTDOWN_TIMEOUT_SECS,
            },
            storage: StorageBackend::default(),
            database: DatabaseConfig {
                url: DEFAULT_DATABASE_URL.to_string(),
                max_connections: DEFAULT_DATABASE_MAX_CONNECTIONS,
                min_connections: DEFAULT_DATABASE_MIN_CONNECTIONS,
                connect_timeout_secs: DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS,
                idle_timeout_secs: DEFAULT_DATABASE_IDLE_TIMEOUT_SECS,
            },
            cors: CorsConfig {
                allowed_origins: vec![DEFAULT_CORS_ALLOWED_ORIGIN.to_string()],
                allow_credentials: true,
            },
            auth: AuthConfig {
                token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
            },
            generator: GeneratorConfig::default(),
            uploads: UploadConfig {
                max_pdf_bytes: DEFAULT_MAX_PDF_BYTES,
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "COURSEFORGE_PORT",
        "COURSEFORGE_STORAGE",
        "COURSEFORGE_ON_UNPARSEABLE_URL",
        "COURSEFORGE_INITIAL_PROGRESS",
        "COURSEFORGE_MAX_PDF_BYTES",
        "COURSEFORGE_TEMPLATES_PATH",
        "CORS_ALLOWED_ORIGINS",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.generator.on_unparseable_url, UnparseableUrlPolicy::Reject);
        assert_eq!(config.generator.initial_progress, InitialProgress::Zero);
        assert_eq!(config.uploads.max_pdf_bytes, 10 * 1024 * 1024);
    }

    #[test]
    #[serial]
    fn test_from_env_reads_overrides() {
        clear_env();
        std::env::set_var("COURSEFORGE_PORT", "8088");
        std::env::set_var("COURSEFORGE_STORAGE", "postgres");
        std::env::set_var("COURSEFORGE_ON_UNPARSEABLE_URL", "fallback");
        std::env::set_var("COURSEFORGE_INITIAL_PROGRESS", "demo_random");
        std::env::set_var("CORS_ALLOWED_ORIGINS", "http://a.test, http://b.test");

        let config = Config::from_env().unwrap();
        assert_eq!(config.server.port, 8088);
        assert_eq!(config.storage, StorageBackend::Postgres);
        assert_eq!(config.generator.on_unparseable_url, UnparseableUrlPolicy::Fallback);
        assert_eq!(config.generator.initial_progress, InitialProgress::DemoRandom);
        assert_eq!(config.cors.allowed_origins, vec!["http://a.test", "http://b.test"]);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_enum_value_is_an_error() {
        clear_env();
        std::env::set_var("COURSEFORGE_ON_UNPARSEABLE_URL", "guess");
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("COURSEFORGE_ON_UNPARSEABLE_URL"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_number_is_an_error() {
        clear_env();
        std::env::set_var("COURSEFORGE_MAX_PDF_BYTES", "ten megabytes");
        assert!(Config::from_env().is_err());
        clear_env();
    }

    #[test]
    fn test_validate_rejects_missing_catalog_file() {
        let mut config = Config::default();
        config.generator.templates_path = Some(PathBuf::from("/nonexistent/catalog.json"));
        assert!(config.validate().is_err());

        let dir = tempfile::tempdir().unwrap();
        config.generator.templates_path = Some(dir.path().to_path_buf());
        assert!(config.validate().is_err());

        let file = tempfile::NamedTempFile::new().unwrap();
        config.generator.templates_path = Some(file.path().to_path_buf());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_pool_bounds_only_for_postgres() {
        let mut config = Config::default();
        config.database.min_connections = 50;
        assert!(config.validate().is_ok());

        config.storage = StorageBackend::Postgres;
        assert!(config.validate().is_err());
    }
}
