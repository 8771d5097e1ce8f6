use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{json, Value};

use crate::intake::repository::{ApplicationRepository, StoreError};
use crate::intake::{
    application_router, ApplicationId, ApplicationInput, ApplicationStore, EncryptionService,
    HandoffRecord, IntakeService, ReviewTier, StoredApplication, TriageEngine, Validator,
};

/// 32 bytes of 0x01, base64 encoded.
pub(super) const TEST_ENCRYPTION_KEY: &str = "AQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQE=";
pub(super) const TEST_API_KEY: &str = "secret";

pub(super) fn valid_body() -> Value {
    json!({
        "firstName": "Jane",
        "lastName": "Doe",
        "email": "jane@example.com",
        "phone": "555-123-4567",
        "dateOfBirth": "1990-01-15",
        "ssn": "234-56-7890",
        "addressLine1": "123 Main St",
        "city": "Boston",
        "state": "MA",
        "zipCode": "02101",
        "programName": "ECE Grant",
        "amountRequested": 500,
        "agreement": true
    })
}

pub(super) fn body_with(field: &str, value: Value) -> Value {
    let mut body = valid_body();
    body[field] = value;
    body
}

pub(super) fn body_without(field: &str) -> Value {
    let mut body = valid_body();
    body.as_object_mut()
        .expect("fixture is an object")
        .remove(field);
    body
}

pub(super) fn applicant() -> ApplicationInput {
    ApplicationInput {
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        email: "jane@example.com".to_string(),
        phone: "555-123-4567".to_string(),
        date_of_birth: "1990-01-15".to_string(),
        ssn: "234-56-7890".to_string(),
        address_line1: "123 Main St".to_string(),
        address_line2: Some("Apt 1".to_string()),
        city: "Boston".to_string(),
        state: "MA".to_string(),
        zip_code: "02101".to_string(),
        program_name: "ECE Grant".to_string(),
        amount_requested: 500.0,
        agreement: true,
    }
}

pub(super) fn submitted_at() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-01-01T00:00:00.000Z")
        .expect("valid timestamp")
        .with_timezone(&Utc)
}

pub(super) fn stored_application(id: &str) -> StoredApplication {
    StoredApplication {
        application_id: ApplicationId(id.to_string()),
        submitted_at: submitted_at(),
        review_tier: ReviewTier::Standard,
        risk_flags: Vec::new(),
        input: applicant(),
    }
}

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 15).expect("valid date")
}

pub(super) fn cipher() -> EncryptionService {
    EncryptionService::new(Some(TEST_ENCRYPTION_KEY.to_string()))
}

pub(super) fn build_service() -> (IntakeService<ApplicationStore>, Arc<ApplicationStore>) {
    let store = Arc::new(ApplicationStore::new(cipher()));
    let service = IntakeService::new(
        Validator::default(),
        TriageEngine::default(),
        store.clone(),
    );
    (service, store)
}

pub(super) fn router_with_service<R>(service: IntakeService<R>) -> axum::Router
where
    R: ApplicationRepository + 'static,
{
    application_router(Arc::new(service), Some(TEST_API_KEY.to_string()))
}

pub(super) struct UnavailableRepository;

impl ApplicationRepository for UnavailableRepository {
    fn save_application(&self, _record: &StoredApplication) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }

    fn application(&self, _id: &ApplicationId) -> Result<Option<StoredApplication>, StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }

    fn save_handoff(&self, _record: HandoffRecord) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }

    fn handoff(&self, _id: &ApplicationId) -> Result<Option<HandoffRecord>, StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
