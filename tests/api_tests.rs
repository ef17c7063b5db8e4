// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP API tests.
//!
//! These tests verify that:
//! 1. Every failure comes back as `{error, message}` with a matching status
//! 2. Sign-in, plan and caption routes drive the controller
//! 3. CORS preflight requests return correct headers

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use common::{FakeBackend, Outcome, TEST_IMAGE};
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let (app, _) = common::create_test_app(FakeBackend::new());

    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_initial_session_is_free_and_anonymous() {
    let (app, _) = common::create_test_app(FakeBackend::new());

    let (status, body) = send(&app, Method::GET, "/api/session", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"], Value::Null);
    assert_eq!(body["plan"], "FREE");
    assert_eq!(body["remaining"], 5);
    assert_eq!(body["dailyLimit"], 5);
}

#[tokio::test]
async fn test_caption_then_history() {
    let (app, _) = common::create_test_app(FakeBackend::scripted(vec![Outcome::Text(
        "A red bicycle.",
    )]));

    let (status, item) = send(
        &app,
        Method::POST,
        "/api/captions",
        Some(json!({"image": TEST_IMAGE, "mimeType": "image/png"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(item["caption"], "A red bicycle.");
    assert_eq!(item["modelUsed"], "gemini-2.5-flash");
    assert_eq!(item["imageUrl"], TEST_IMAGE);

    let (_, history) = send(&app, Method::GET, "/api/history", None).await;
    assert_eq!(history.as_array().map(Vec::len), Some(1));
    assert_eq!(history[0]["id"], item["id"]);

    let (_, quota) = send(&app, Method::GET, "/api/quota", None).await;
    assert_eq!(quota["remaining"], 4);
    assert_eq!(quota["allowed"], true);
}

#[tokio::test]
async fn test_quota_exceeded_response() {
    let (app, _) = common::create_test_app(FakeBackend::new());
    let body = json!({"image": TEST_IMAGE, "mimeType": "image/png"});

    for _ in 0..5 {
        let (status, _) = send(&app, Method::POST, "/api/captions", Some(body.clone())).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, error) = send(&app, Method::POST, "/api/captions", Some(body)).await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(error["error"], "quota_exceeded");
    assert_eq!(
        error["message"],
        "Daily quota reached. Upgrade to Pro for unlimited access."
    );
}

#[tokio::test]
async fn test_service_unavailable_response() {
    let (app, _) =
        common::create_test_app(FakeBackend::scripted(vec![Outcome::Fail, Outcome::Fail]));

    let (status, error) = send(
        &app,
        Method::POST,
        "/api/captions",
        Some(json!({"image": TEST_IMAGE})),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(error["error"], "service_unavailable");
    assert_eq!(
        error["message"],
        "AI service is temporarily unavailable. Please try again later."
    );
}

#[tokio::test]
async fn test_login_validation_and_success() {
    let (app, _) = common::create_test_app(FakeBackend::new());

    let (status, error) = send(
        &app,
        Method::POST,
        "/auth/login",
        Some(json!({"email": "not-an-email", "password": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], "validation_error");
    assert_eq!(error["message"], "Invalid email address");

    let (status, session) = send(
        &app,
        Method::POST,
        "/auth/login",
        Some(json!({"email": "a@b.com", "password": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["user"]["name"], "a");
    assert_eq!(session["plan"], "PAID");
    assert_eq!(session["remaining"], Value::Null);

    let (status, session) = send(&app, Method::POST, "/auth/logout", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["user"], Value::Null);
    assert_eq!(session["plan"], "FREE");
}

#[tokio::test]
async fn test_signup_short_password() {
    let (app, _) = common::create_test_app(FakeBackend::new());

    let (status, error) = send(
        &app,
        Method::POST,
        "/auth/signup",
        Some(json!({"name": "Jane", "email": "jane@example.com", "password": "123"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["message"], "Password must be at least 6 characters");
}

#[tokio::test]
async fn test_signup_malformed_email() {
    let (app, _) = common::create_test_app(FakeBackend::new());

    let (status, error) = send(
        &app,
        Method::POST,
        "/auth/signup",
        Some(json!({"name": "Jane", "email": "no-at-sign", "password": "123456"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["message"], "Invalid email address");

    let (_, session) = send(&app, Method::GET, "/api/session", None).await;
    assert_eq!(session["user"], Value::Null);
    assert_eq!(session["plan"], "FREE");
}

#[tokio::test]
async fn test_plan_upgrade_requires_login() {
    let (app, state) = common::create_test_app(FakeBackend::new());

    let (status, error) = send(&app, Method::PUT, "/api/plan", Some(json!({"plan": "PAID"}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error["error"], "login_required");

    let (status, _) = send(&app, Method::POST, "/auth/google", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, session) =
        send(&app, Method::PUT, "/api/plan", Some(json!({"plan": "FREE"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["plan"], "FREE");
    assert_eq!(session["user"]["email"], "user@gmail.com");
    assert_eq!(
        state.controller.plans().get_stored_plan(),
        lenscraft::models::Plan::Free
    );
}

#[tokio::test]
async fn test_cors_preflight() {
    let (app, _) = common::create_test_app(FakeBackend::new());

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/captions")
                .header(header::ORIGIN, "http://localhost:5173")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "http://localhost:5173"
    );
}
