//! Shared helpers for CourseForge HTTP integration tests
//!
//! Every test gets a fresh router over in-memory repositories and drives it with
//! `tower::ServiceExt::oneshot`, so no database or listening socket is needed.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use courseforge_generator::{CourseGenerator, GeneratorOptions, TemplateCatalog};
use courseforge_server::{
    api,
    config::{Config, UploadConfig},
    features::FeatureState,
    repository::Repositories,
};
use serde_json::{json, Value};
use tower::ServiceExt;

pub const PASSWORD: &str = "password123";
pub const BOUNDARY: &str = "courseforge-test-boundary";

pub fn test_app() -> Router {
    test_app_with(Config::default())
}

/// Router over fresh in-memory storage with a custom upload limit
pub fn test_app_with_upload_limit(max_pdf_bytes: usize) -> Router {
    let mut config = Config::default();
    config.uploads = UploadConfig { max_pdf_bytes };
    test_app_with(config)
}

pub fn test_app_with(config: Config) -> Router {
    let catalog = TemplateCatalog::builtin().expect("built-in catalog is valid");
    let state = FeatureState {
        repos: Repositories::in_memory(),
        generator: Arc::new(CourseGenerator::new(Arc::new(catalog), GeneratorOptions::default())),
        auth: config.auth.clone(),
        uploads: config.uploads.clone(),
    };
    api::create_router(state, &config.cors)
}

/// Send a request with an optional JSON body and bearer token
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    into_parts(app, request).await
}

pub async fn get(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    send(app, Method::GET, uri, token, None).await
}

pub async fn post_json(app: &Router, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, token, Some(body)).await
}

pub async fn put_json(app: &Router, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
    send(app, Method::PUT, uri, token, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    send(app, Method::DELETE, uri, token, None).await
}

async fn into_parts(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

/// Register a user and return their bearer token
pub async fn register(app: &Router, email: &str) -> String {
    let (status, body) = post_json(
        app,
        "/api/v1/auth/register",
        None,
        json!({ "name": "Ada Lovelace", "email": email, "password": PASSWORD }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    body["data"]["token"].as_str().unwrap().to_string()
}

/// Build a multipart body with a single file field
pub fn multipart_body(field: &str, filename: &str, content_type: &str, contents: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn upload(app: &Router, token: &str, body: Vec<u8>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/courses/pdf")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    into_parts(app, request).await
}

pub async fn upload_pdf(app: &Router, token: &str, filename: &str, size: usize) -> (StatusCode, Value) {
    let contents = vec![b'%'; size];
    upload(app, token, multipart_body("pdf", filename, "application/pdf", &contents)).await
}

/// Create a YouTube course and return its id
pub async fn create_youtube_course(app: &Router, token: &str, url: &str) -> String {
    let (status, body) = post_json(app, "/api/v1/courses/youtube", Some(token), json!({ "url": url })).await;
    assert_eq!(status, StatusCode::CREATED, "course creation failed: {body}");
    body["data"]["id"].as_str().unwrap().to_string()
}
