//! HTTP surface: the application router, health endpoint, and shared request/response types

pub mod extract;
pub mod response;

use std::future::{Future, IntoFuture};
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::compression::CompressionLayer;

use crate::config::CorsConfig;
use crate::features::{self, FeatureState};
use crate::middleware;

/// Build the application router with all routes and middleware
///
/// Feature routes are mounted under `/api/v1`; `/health` stays at the root.
pub fn create_router(state: FeatureState, cors: &CorsConfig) -> Router {
    let health = Router::new()
        .route("/health", get(health_check))
        .with_state(state.clone());

    health
        .nest("/api/v1", features::router(state))
        // Layers apply from innermost to outermost
        .layer(CompressionLayer::new())
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer(cors))
}

/// Serve `app` until `signal` resolves, then give open connections up to `grace` to finish
///
/// Connections still open when `grace` runs out are dropped.
pub async fn serve<F>(
    listener: TcpListener,
    app: Router,
    signal: F,
    grace: Duration,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (signalled_tx, signalled_rx) = oneshot::channel::<()>();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            signal.await;
            let _ = signalled_tx.send(());
        })
        .into_future();

    let deadline = async move {
        if signalled_rx.await.is_ok() {
            tracing::info!("Waiting up to {} seconds for connections to close", grace.as_secs());
            tokio::time::sleep(grace).await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        result = server => result,
        () = deadline => {
            tracing::warn!(
                grace_secs = grace.as_secs(),
                "Shutdown timeout reached, dropping open connections"
            );
            Ok(())
        },
    }
}

async fn health_check(State(state): State<FeatureState>) -> Response {
    let storage = state.repos.backend().as_str();

    match state.repos.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "storage": storage
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, storage, "Storage health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unavailable",
                    "storage": storage
                })),
            )
                .into_response()
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::features::shared::test_helpers::test_state;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_reports_memory_backend() {
        let app = create_router(test_state(), &Config::default().cors);

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["storage"], "memory");
    }

    #[tokio::test]
    async fn test_serve_exits_without_waiting_when_idle() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let app = create_router(test_state(), &Config::default().cors);

        let started = std::time::Instant::now();
        serve(listener, app, async {}, Duration::from_secs(30))
            .await
            .unwrap();
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_serve_drops_stuck_connections_after_grace() {
        use tokio::io::AsyncWriteExt;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().route("/stuck", get(|| std::future::pending::<()>()));

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(serve(
            listener,
            app,
            async move {
                let _ = stop_rx.await;
            },
            Duration::from_millis(200),
        ));

        let mut client = tokio::net::TcpStream::connect(addr).await.unwrap();
        client
            .write_all(b"GET /stuck HTTP/1.1\r\nhost: localhost\r\n\r\n")
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        stop_tx.send(()).unwrap();

        let finished = tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .expect("server stops once the grace period ends");
        assert!(finished.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let app = create_router(test_state(), &Config::default().cors);

        let response = app
            .oneshot(Request::get("/api/v1/nothing").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
