//! End-to-end tests driving the router the way an HTTP client would.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use flarecfg::{AppState, api, store::ConfigStore};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

fn test_app() -> (TempDir, Router) {
    let dir = TempDir::new().unwrap();
    let store = ConfigStore::open(dir.path().join("config.json")).unwrap();
    let app = api::create_router(Arc::new(AppState { store }));
    (dir, app)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

#[tokio::test]
async fn account_create_then_duplicate_token() {
    let (_dir, app) = test_app();

    let payload = json!({ "authentication": { "api_token": "tok1" }, "zones": [] });
    let (status, body) = send(&app, "POST", "/accounts", Some(payload.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], json!(false));
    let id = body["data"]["account"]["id"].as_str().unwrap();
    assert!(!id.is_empty());
    assert_eq!(body["data"]["account"]["zones"], json!([]));

    let (status, body) = send(&app, "POST", "/accounts", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!(true));
    assert!(
        body["message"].as_str().unwrap().contains("already exists"),
        "message should indicate the duplicate: {body}"
    );
    assert!(body["data"]["detail"].is_string());
}

#[tokio::test]
async fn unknown_fields_are_rejected_with_422() {
    let (_dir, app) = test_app();

    let payload = json!({ "authentication": { "api_token": "tok1" }, "bogus": true });
    let (status, body) = send(&app, "POST", "/accounts", Some(payload)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], json!(true));
}

#[tokio::test]
async fn out_of_range_ttl_is_rejected_with_422() {
    let (_dir, app) = test_app();
    let (_, body) = send(
        &app,
        "POST",
        "/accounts",
        Some(json!({ "authentication": { "api_token": "tok1" } })),
    )
    .await;
    let account_id = body["data"]["account"]["id"].as_str().unwrap().to_string();

    let payload = json!({
        "zone_id": "0123456789abcdef0123456789abcdef",
        "domain": "example.com",
        "subdomains": [{ "name": "www", "ttl": 30 }]
    });
    let (status, body) = send(
        &app,
        "POST",
        &format!("/accounts/{account_id}/zones"),
        Some(payload),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["data"]["detail"].as_str().unwrap().contains("TTL"));
}

#[tokio::test]
async fn unknown_account_returns_404_envelope() {
    let (_dir, app) = test_app();

    let (status, body) = send(&app, "GET", "/accounts/no-such-id", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!(true));
    assert_eq!(body["data"]["detail"], json!("Account not found"));
}

#[tokio::test]
async fn zone_lifecycle() {
    let (_dir, app) = test_app();

    let (_, body) = send(
        &app,
        "POST",
        "/accounts",
        Some(json!({ "authentication": { "api_token": "tok1" } })),
    )
    .await;
    let account_id = body["data"]["account"]["id"].as_str().unwrap().to_string();

    // create with a nested subdomain
    let payload = json!({
        "zone_id": "0123456789abcdef0123456789abcdef",
        "domain": "example.com",
        "subdomains": [{ "name": "www", "proxied": true, "ttl": 300 }]
    });
    let (status, body) = send(
        &app,
        "POST",
        &format!("/accounts/{account_id}/zones"),
        Some(payload),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let zone_id = body["data"]["zone"]["id"].as_str().unwrap().to_string();
    assert!(!body["data"]["zone"]["subdomains"][0]["id"]
        .as_str()
        .unwrap()
        .is_empty());

    // read back
    let (status, body) = send(
        &app,
        "GET",
        &format!("/accounts/{account_id}/zones/{zone_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["zone"]["domain"], json!("example.com"));

    // full replacement keeps the id even when the payload lies about it
    let replacement = json!({
        "id": "spoofed",
        "zone_id": "0123456789abcdef0123456789abcdef",
        "domain": "renamed.example",
        "subdomains": []
    });
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/accounts/{account_id}/zones/{zone_id}"),
        Some(replacement),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["zone"]["id"], json!(zone_id));
    assert_eq!(body["data"]["zone"]["domain"], json!("renamed.example"));

    // delete, then the zone is gone but the account remains
    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/accounts/{account_id}/zones/{zone_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/accounts/{account_id}/zones/{zone_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["data"]["detail"], json!("Zone not found"));

    let (status, body) = send(&app, "GET", &format!("/accounts/{account_id}/zones"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["zones"], json!([]));
}

#[tokio::test]
async fn duplicate_zone_id_returns_400() {
    let (_dir, app) = test_app();

    let (_, body) = send(
        &app,
        "POST",
        "/accounts",
        Some(json!({ "authentication": { "api_token": "tok1" } })),
    )
    .await;
    let account_id = body["data"]["account"]["id"].as_str().unwrap().to_string();

    let payload = json!({
        "zone_id": "0123456789abcdef0123456789abcdef",
        "domain": "example.com"
    });
    let (status, _) = send(
        &app,
        "POST",
        &format!("/accounts/{account_id}/zones"),
        Some(payload.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        "POST",
        &format!("/accounts/{account_id}/zones"),
        Some(payload),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("already exists"));
}

#[tokio::test]
async fn update_authentication_only_touches_credentials() {
    let (_dir, app) = test_app();

    let (_, body) = send(
        &app,
        "POST",
        "/accounts",
        Some(json!({ "authentication": { "api_token": "tok1" } })),
    )
    .await;
    let account_id = body["data"]["account"]["id"].as_str().unwrap().to_string();

    let auth = json!({ "api_key": { "api_key": "key1", "account_email": "a@example.com" } });
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/accounts/{account_id}/auth"),
        Some(auth),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["auth"]["api_key"]["api_key"], json!("key1"));

    let (_, body) = send(&app, "GET", &format!("/accounts/{account_id}"), None).await;
    assert_eq!(body["data"]["account"]["id"], json!(account_id));
    assert_eq!(
        body["data"]["account"]["authentication"]["api_token"],
        json!(null)
    );
}
