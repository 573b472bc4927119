//! Form API Tests
//!
//! End-to-end tests of the form routes through the full router:
//! - create/read round trip keeps field order
//! - the server re-validates every write
//! - forms are scoped to their owner
//! - listing is paginated

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{contact_form, register, send, test_app};

// =============================================================================
// Create / Read
// =============================================================================

#[tokio::test]
async fn test_create_then_get_returns_same_fields() {
    let app = test_app();
    let token = register(&app, "owner@example.com").await;

    let (status, created) = send(&app, Method::POST, "/api/forms", Some(&token), Some(contact_form())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], json!(1));
    assert_eq!(created["title"], "Contact");
    assert_eq!(created["fields"], contact_form()["fields"]);
    assert!(created["created_at"].is_string());
    assert!(created["updated_at"].is_string());

    let (status, fetched) = send(&app, Method::GET, "/api/forms/1", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<_> = fetched["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["name", "mail", "size"]);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_create_drops_options_on_plain_fields() {
    let app = test_app();
    let token = register(&app, "owner@example.com").await;

    let body = json!({
        "title": "T",
        "fields": [{"id": "1", "type": "text", "label": "A", "options": ["x"]}]
    });
    let (status, created) = send(&app, Method::POST, "/api/forms", Some(&token), Some(body)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(created["fields"][0].get("options").is_none());
    assert_eq!(created["fields"][0]["required"], json!(false));
    assert_eq!(created["is_published"], json!(false));
}

// =============================================================================
// Server-side validation
// =============================================================================

#[tokio::test]
async fn test_update_with_unknown_type_is_rejected() {
    let app = test_app();
    let token = register(&app, "owner@example.com").await;
    send(&app, Method::POST, "/api/forms", Some(&token), Some(contact_form())).await;

    let mut body = contact_form();
    body["fields"][0]["type"] = json!("bogus");
    let (status, response) = send(&app, Method::PUT, "/api/forms/1", Some(&token), Some(body)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response["message"], "Validation failed");
    assert!(response["errors"]["fields.0.type"].is_array());

    // Stored form is untouched
    let (_, fetched) = send(&app, Method::GET, "/api/forms/1", Some(&token), None).await;
    assert_eq!(fetched["fields"][0]["type"], "text");
}

#[tokio::test]
async fn test_create_rejects_bad_bodies() {
    let app = test_app();
    let token = register(&app, "owner@example.com").await;

    let (status, response) = send(&app, Method::POST, "/api/forms", Some(&token), Some(json!({}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response["errors"]["title"].is_array());
    assert!(response["errors"]["fields"].is_array());

    let body = json!({
        "title": "T",
        "fields": [{"id": "s", "type": "select", "label": "S", "options": ["", " "]}]
    });
    let (status, response) = send(&app, Method::POST, "/api/forms", Some(&token), Some(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response["errors"]["s-options"],
        json!(["Options are required for type select"])
    );

    let (_, listing) = send(&app, Method::GET, "/api/forms", Some(&token), None).await;
    assert_eq!(listing["total"], json!(0));
}

#[tokio::test]
async fn test_partial_update() {
    let app = test_app();
    let token = register(&app, "owner@example.com").await;
    send(&app, Method::POST, "/api/forms", Some(&token), Some(contact_form())).await;

    let (status, updated) = send(
        &app,
        Method::PUT,
        "/api/forms/1",
        Some(&token),
        Some(json!({"is_published": true, "description": null})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["is_published"], json!(true));
    assert_eq!(updated["description"], json!(null));
    assert_eq!(updated["fields"], contact_form()["fields"]);
    assert_eq!(updated["id"], json!(1));
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = test_app();
    let token = register(&app, "owner@example.com").await;

    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/api/forms")
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.clone(), request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Auth and ownership
// =============================================================================

#[tokio::test]
async fn test_form_routes_require_token() {
    let app = test_app();

    for (method, uri) in [
        (Method::GET, "/api/forms"),
        (Method::POST, "/api/forms"),
        (Method::GET, "/api/forms/1"),
        (Method::PUT, "/api/forms/1"),
        (Method::DELETE, "/api/forms/1"),
        (Method::POST, "/api/forms/1/validate"),
    ] {
        let (status, body) = send(&app, method.clone(), uri, None, Some(contact_form())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert_eq!(body["message"], "Unauthenticated.");
    }

    let (status, _) = send(&app, Method::GET, "/api/forms", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_other_users_forms_are_not_found() {
    let app = test_app();
    let owner = register(&app, "owner@example.com").await;
    let other = register(&app, "other@example.com").await;
    send(&app, Method::POST, "/api/forms", Some(&owner), Some(contact_form())).await;

    let (status, body) = send(&app, Method::GET, "/api/forms/1", Some(&other), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Form not found");

    let (status, _) = send(&app, Method::PUT, "/api/forms/1", Some(&other), Some(contact_form())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, "/api/forms/1", Some(&other), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, listing) = send(&app, Method::GET, "/api/forms", Some(&other), None).await;
    assert_eq!(listing["total"], json!(0));
}

#[tokio::test]
async fn test_non_numeric_id_is_not_found() {
    let app = test_app();
    let token = register(&app, "owner@example.com").await;

    let (status, _) = send(&app, Method::GET, "/api/forms/abc", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Delete and listing
// =============================================================================

#[tokio::test]
async fn test_delete_returns_no_content() {
    let app = test_app();
    let token = register(&app, "owner@example.com").await;
    send(&app, Method::POST, "/api/forms", Some(&token), Some(contact_form())).await;

    let (status, body) = send(&app, Method::DELETE, "/api/forms/1", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, serde_json::Value::Null);

    let (status, _) = send(&app, Method::GET, "/api/forms/1", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, "/api/forms/1", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_listing_is_paginated_latest_first() {
    let app = test_app();
    let token = register(&app, "owner@example.com").await;

    for i in 0..12 {
        let mut body = contact_form();
        body["title"] = json!(format!("Form {}", i));
        let (status, _) = send(&app, Method::POST, "/api/forms", Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, first) = send(&app, Method::GET, "/api/forms", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["current_page"], json!(1));
    assert_eq!(first["per_page"], json!(10));
    assert_eq!(first["total"], json!(12));
    assert_eq!(first["last_page"], json!(2));
    assert_eq!(first["data"].as_array().unwrap().len(), 10);
    assert_eq!(first["data"][0]["title"], "Form 11");

    let (_, second) = send(&app, Method::GET, "/api/forms?page=2", Some(&token), None).await;
    assert_eq!(second["current_page"], json!(2));
    assert_eq!(second["data"].as_array().unwrap().len(), 2);
    assert_eq!(second["data"][1]["title"], "Form 0");
}

#[tokio::test]
async fn test_huge_page_number_returns_empty_page() {
    let app = test_app();
    let token = register(&app, "owner@example.com").await;
    for _ in 0..8 {
        send(&app, Method::POST, "/api/forms", Some(&token), Some(contact_form())).await;
    }

    let uri = format!("/api/forms?page={}", usize::MAX);
    let (status, listing) = send(&app, Method::GET, &uri, Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["data"], json!([]));
    assert_eq!(listing["total"], json!(8));
}

// =============================================================================
// Value checks
// =============================================================================

#[tokio::test]
async fn test_validate_endpoint() {
    let app = test_app();
    let token = register(&app, "owner@example.com").await;
    send(&app, Method::POST, "/api/forms", Some(&token), Some(contact_form())).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/forms/1/validate",
        Some(&token),
        Some(json!({"values": {"name": "Ada", "mail": "ada@example.com", "size": "M"}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"valid": true, "errors": {}}));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/forms/1/validate",
        Some(&token),
        Some(json!({"values": {"mail": "nope", "size": "XL"}})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["valid"], json!(false));
    assert_eq!(
        body["errors"],
        json!({
            "mail": "Please enter a valid email address",
            "name": "Name is required",
            "size": "Please select a valid option"
        })
    );
}

#[tokio::test]
async fn test_health() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
