use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use subtle::ConstantTimeEq;
use tracing::error;

use super::domain::ApplicationId;
use super::repository::ApplicationRepository;
use super::service::{IntakeError, IntakeService};

pub const API_KEY_HEADER: &str = "x-api-key";

/// Shared handler state: the service plus the key callers must present.
pub struct IntakeState<R> {
    service: Arc<IntakeService<R>>,
    api_key: Option<Arc<str>>,
}

impl<R> Clone for IntakeState<R> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            api_key: self.api_key.clone(),
        }
    }
}

impl<R> IntakeState<R> {
    pub fn new(service: Arc<IntakeService<R>>, api_key: Option<String>) -> Self {
        Self {
            service,
            api_key: api_key.map(Arc::from),
        }
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        let Some(expected) = self.api_key.as_deref() else {
            return false;
        };
        let Some(provided) = headers
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
        else {
            return false;
        };
        provided.as_bytes().ct_eq(expected.as_bytes()).into()
    }
}

/// Router builder exposing the submission and handoff endpoints.
pub fn application_router<R>(service: Arc<IntakeService<R>>, api_key: Option<String>) -> Router
where
    R: ApplicationRepository + 'static,
{
    Router::new()
        .route("/api/applications", post(submit_handler::<R>))
        .route(
            "/api/handoffs/:application_id",
            get(handoff_handler::<R>),
        )
        .with_state(IntakeState::new(service, api_key))
}

pub(crate) async fn submit_handler<R>(
    State(state): State<IntakeState<R>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    if !state.authorized(&headers) {
        return unauthorized();
    }

    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(_) => {
            let payload = json!({
                "error": "Invalid JSON",
                "errors": ["Request body must be valid JSON."],
            });
            return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
        }
    };

    match state.service.submit(&payload) {
        Ok(response) => (StatusCode::CREATED, axum::Json(response)).into_response(),
        Err(IntakeError::Validation(failure)) => {
            let payload = json!({
                "error": "Validation failed",
                "errors": failure.errors,
                "fieldErrors": failure.field_errors,
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        Err(IntakeError::Store(err)) => {
            error!(
                error = %err,
                configuration = err.is_configuration(),
                "failed to store application"
            );
            internal_error()
        }
    }
}

pub(crate) async fn handoff_handler<R>(
    State(state): State<IntakeState<R>>,
    headers: HeaderMap,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    if !state.authorized(&headers) {
        return unauthorized();
    }

    let id = ApplicationId(application_id);
    match state.service.handoff(&id) {
        Ok(Some(record)) => (StatusCode::OK, axum::Json(record)).into_response(),
        Ok(None) => {
            let payload = json!({ "error": "Not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(err) => {
            error!(error = %err, "failed to read handoff record");
            internal_error()
        }
    }
}

fn unauthorized() -> Response {
    let payload = json!({ "error": "Unauthorized" });
    (StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response()
}

fn internal_error() -> Response {
    let payload = json!({ "error": "Internal server error" });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
