//! Authentication endpoint integration tests

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use axum::http::{Method, StatusCode};
use common::*;
use serde_json::json;

#[tokio::test]
async fn test_register_login_me_logout() {
    let app = test_app();

    let (status, body) = post_json(
        &app,
        "/api/v1/auth/register",
        None,
        json!({ "name": "  Ada Lovelace ", "email": "Ada@Example.com", "password": PASSWORD }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let user = &body["data"]["user"];
    assert_eq!(user["name"], "Ada Lovelace");
    assert_eq!(user["email"], "ada@example.com");
    assert_eq!(user["preferences"]["theme"], "dark");
    assert!(user.get("password_hash").is_none());
    assert_eq!(body["data"]["token"].as_str().unwrap().len(), 64);

    let (status, body) = post_json(
        &app,
        "/api/v1/auth/login",
        None,
        json!({ "email": "ADA@example.com", "password": PASSWORD }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let (status, body) = get(&app, "/api/v1/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "ada@example.com");

    let (status, body) = send(&app, Method::POST, "/api/v1/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["logged_out"], true);

    let (status, _) = get(&app, "/api/v1/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = test_app();
    register(&app, "ada@example.com").await;

    let (status, body) = post_json(
        &app,
        "/api/v1/auth/register",
        None,
        json!({ "name": "Another Ada", "email": "ADA@example.com", "password": PASSWORD }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_register_validation() {
    let app = test_app();

    let cases = [
        json!({ "name": "", "email": "ada@example.com", "password": PASSWORD }),
        json!({ "name": "Ada", "email": "not-an-email", "password": PASSWORD }),
        json!({ "name": "Ada", "email": "ada@example.com", "password": "short" }),
        json!({ "name": "Ada", "email": "ada@example.com" }),
    ];

    for case in cases {
        let (status, body) = post_json(&app, "/api/v1/auth/register", None, case.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{case}");
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn test_login_failures_share_one_message() {
    let app = test_app();
    register(&app, "ada@example.com").await;

    let (status, wrong_password) = post_json(
        &app,
        "/api/v1/auth/login",
        None,
        json!({ "email": "ada@example.com", "password": "wrong-password" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, unknown_email) = post_json(
        &app,
        "/api/v1/auth/login",
        None,
        json!({ "email": "nobody@example.com", "password": PASSWORD }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password["error"], unknown_email["error"]);

    let (status, _) = post_json(
        &app,
        "/api/v1/auth/login",
        None,
        json!({ "email": "", "password": "" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_change_password_revokes_existing_tokens() {
    let app = test_app();
    let first = register(&app, "ada@example.com").await;

    let (status, _) = put_json(
        &app,
        "/api/v1/auth/password",
        Some(&first),
        json!({ "current_password": "wrong-password", "new_password": "new-password" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = put_json(
        &app,
        "/api/v1/auth/password",
        Some(&first),
        json!({ "current_password": PASSWORD, "new_password": "new-password" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let second = body["data"]["token"].as_str().unwrap().to_string();

    let (status, _) = get(&app, "/api/v1/auth/me", Some(&first)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = get(&app, "/api/v1/auth/me", Some(&second)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = post_json(
        &app,
        "/api/v1/auth/login",
        None,
        json!({ "email": "ada@example.com", "password": "new-password" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_update_profile() {
    let app = test_app();
    let token = register(&app, "ada@example.com").await;
    register(&app, "grace@example.com").await;

    let (status, body) = put_json(
        &app,
        "/api/v1/auth/profile",
        Some(&token),
        json!({ "name": "Countess Lovelace" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Countess Lovelace");
    assert_eq!(body["data"]["email"], "ada@example.com");

    let (status, _) = put_json(
        &app,
        "/api/v1/auth/profile",
        Some(&token),
        json!({ "email": "Grace@example.com" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = put_json(&app, "/api/v1/auth/profile", Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = put_json(
        &app,
        "/api/v1/auth/profile",
        Some(&token),
        json!({ "password_hash": "x" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_authorization_header() {
    let app = test_app();
    let token = register(&app, "ada@example.com").await;

    let request = axum::http::Request::builder()
        .uri("/api/v1/auth/me")
        .header("authorization", format!("Token {token}"))
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.clone(), request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let (status, _) = get(&app, "/api/v1/auth/me", Some("")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
