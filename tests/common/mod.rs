//! Shared helpers for the HTTP integration tests

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt as _;
use serde_json::{json, Value};
use tower::ServiceExt; // for Router::oneshot

use formcraft::config::AppConfig;
use formcraft::http_server::{build_router, AppState};

pub fn test_app() -> Router {
    let config = AppConfig::default();
    build_router(AppState::in_memory(&config), &config.server)
}

/// Send one request and decode the JSON body (`Value::Null` when empty)
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Register a user and return their bearer token
pub async fn register(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/register",
        None,
        Some(json!({
            "name": "Tester",
            "email": email,
            "password": "password123",
            "password_confirmation": "password123"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
    body["token"].as_str().unwrap().to_string()
}

pub fn contact_form() -> Value {
    json!({
        "title": "Contact",
        "description": "Get in touch",
        "fields": [
            {"id": "name", "type": "text", "label": "Name", "required": true},
            {"id": "mail", "type": "email", "label": "Email", "required": true},
            {"id": "size", "type": "select", "label": "Size", "required": false, "options": ["S", "M", "L"]}
        ],
        "is_published": false
    })
}
