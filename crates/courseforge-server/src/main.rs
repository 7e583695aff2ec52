//! CourseForge Server - Main entry point

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use courseforge_common::logging::{init_logging, LogConfig};
use courseforge_generator::{CourseGenerator, TemplateCatalog};
use tokio::signal;
use tracing::info;

use courseforge_server::{
    api,
    config::{Config, StorageBackend},
    db::{self, DbConfig},
    features::FeatureState,
    repository::Repositories,
};

#[tokio::main]
async fn main() -> Result<()> {
    let log_config = LogConfig::builder()
        .log_file_prefix("courseforge-server")
        .filter_directives("courseforge_server=debug,courseforge_generator=debug,tower_http=debug,sqlx=info")
        .build()
        .merge_env()?;

    let _log_guard = init_logging(&log_config)?;

    info!("Starting CourseForge Server");

    let config = Config::load()?;
    info!(
        storage = config.storage.as_str(),
        "Configuration loaded - server will bind to {}:{}", config.server.host, config.server.port
    );

    let repos = match config.storage {
        StorageBackend::Memory => {
            info!("Using in-memory storage; data is lost on restart");
            Repositories::in_memory()
        },
        StorageBackend::Postgres => {
            let pool = db::create_pool(&DbConfig::from(&config.database)).await?;
            info!("Database connection pool established");

            sqlx::migrate!("../../migrations")
                .run(&pool)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;
            info!("Database migrations completed");

            Repositories::postgres(pool)
        },
    };

    let catalog = match &config.generator.templates_path {
        Some(path) => TemplateCatalog::from_path(path)
            .with_context(|| format!("Failed to load templates from {}", path.display()))?,
        None => TemplateCatalog::builtin().context("Built-in template catalog is invalid")?,
    };
    info!(
        youtube_templates = catalog.youtube_templates().len(),
        "Template catalog loaded"
    );

    let state = FeatureState {
        repos,
        generator: Arc::new(CourseGenerator::new(Arc::new(catalog), config.generator.options())),
        auth: config.auth.clone(),
        uploads: config.uploads.clone(),
    };

    let app = api::create_router(state, &config.cors);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    api::serve(
        listener,
        app,
        shutdown_signal(),
        Duration::from_secs(config.server.shutdown_timeout_secs),
    )
    .await?;

    info!("Server shut down gracefully");

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }
}
