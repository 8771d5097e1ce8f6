use super::common::*;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::intake::{
    application_router, IntakeService, TriageEngine, Validator, API_KEY_HEADER,
};

fn submit_request(body: impl Into<Body>, api_key: Option<&str>) -> Request<Body> {
    let mut builder = Request::post("/api/applications")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(key) = api_key {
        builder = builder.header(API_KEY_HEADER, key);
    }
    builder.body(body.into()).expect("request builds")
}

fn json_bytes(value: &Value) -> Vec<u8> {
    serde_json::to_vec(value).expect("serializes")
}

#[tokio::test]
async fn missing_api_key_is_unauthorized() {
    let (service, _) = build_service();
    let response = router_with_service(service)
        .oneshot(submit_request(json_bytes(&valid_body()), None))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_api_key_is_unauthorized() {
    let (service, store) = build_service();
    let response = router_with_service(service)
        .oneshot(submit_request(json_bytes(&valid_body()), Some("wrong-key")))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(store.application_count().expect("count"), 0);
}

#[tokio::test]
async fn unconfigured_api_key_rejects_everything() {
    let (service, _) = build_service();
    let router = application_router(Arc::new(service), None);
    let response = router
        .oneshot(submit_request(json_bytes(&valid_body()), Some("")))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn valid_submission_returns_created() {
    let (service, store) = build_service();
    let response = router_with_service(service)
        .oneshot(submit_request(json_bytes(&valid_body()), Some(TEST_API_KEY)))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    let keys: Vec<&str> = payload
        .as_object()
        .expect("object")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys.len(), 3);
    assert_eq!(payload["reviewTier"], json!("standard"));
    assert_eq!(payload["riskFlags"], json!([]));
    assert!(payload["applicationId"].is_string());
    assert_eq!(store.application_count().expect("count"), 1);
}

#[tokio::test]
async fn api_key_is_trimmed() {
    let (service, _) = build_service();
    let response = router_with_service(service)
        .oneshot(submit_request(json_bytes(&valid_body()), Some(" secret ")))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn invalid_json_is_bad_request() {
    let (service, _) = build_service();
    let response = router_with_service(service)
        .oneshot(submit_request("{not json", Some(TEST_API_KEY)))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], json!("Invalid JSON"));
    assert_eq!(payload["errors"], json!(["Request body must be valid JSON."]));
}

#[tokio::test]
async fn validation_failure_returns_field_errors() {
    let (service, _) = build_service();
    let body = body_with("agreement", json!(false));
    let response = router_with_service(service)
        .oneshot(submit_request(json_bytes(&body), Some(TEST_API_KEY)))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], json!("Validation failed"));
    assert_eq!(
        payload["fieldErrors"]["agreement"],
        json!("You must agree to the terms.")
    );
    assert_eq!(payload["errors"], json!(["You must agree to the terms."]));
}

#[tokio::test]
async fn storage_failures_are_server_errors_without_detail() {
    let service = IntakeService::new(
        Validator::default(),
        TriageEngine::default(),
        Arc::new(UnavailableRepository),
    );
    let response = router_with_service(service)
        .oneshot(submit_request(json_bytes(&valid_body()), Some(TEST_API_KEY)))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload = read_json_body(response).await;
    assert_eq!(payload, json!({ "error": "Internal server error" }));
}

#[tokio::test]
async fn handoff_route_serves_pii_free_records() {
    let (service, _) = build_service();
    let accepted = service.submit(&valid_body()).expect("accepted");
    let router = router_with_service(service);

    let request = Request::get(format!("/api/handoffs/{}", accepted.application_id))
        .header(API_KEY_HEADER, TEST_API_KEY)
        .body(Body::empty())
        .expect("request builds");
    let response = router.oneshot(request).await.expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload["applicantRef"],
        json!(format!("app-{}", accepted.application_id))
    );
    assert!(payload.get("ssn").is_none());
    assert!(payload.get("email").is_none());
}

#[tokio::test]
async fn handoff_route_reports_missing_records() {
    let (service, _) = build_service();
    let request = Request::get("/api/handoffs/unknown")
        .header(API_KEY_HEADER, TEST_API_KEY)
        .body(Body::empty())
        .expect("request builds");
    let response = router_with_service(service)
        .oneshot(request)
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn handoff_route_requires_api_key() {
    let (service, _) = build_service();
    let request = Request::get("/api/handoffs/unknown")
        .body(Body::empty())
        .expect("request builds");
    let response = router_with_service(service)
        .oneshot(request)
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
