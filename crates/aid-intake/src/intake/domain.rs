use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::telemetry::REDACTED;

/// Identifier minted once per accepted submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub String);

impl ApplicationId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Review urgency assigned by triage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewTier {
    Standard,
    ManualReview,
}

impl ReviewTier {
    pub const fn label(self) -> &'static str {
        match self {
            ReviewTier::Standard => "standard",
            ReviewTier::ManualReview => "manual_review",
        }
    }
}

/// Normalized applicant submission produced by the validator.
///
/// `Debug` redacts every identifying field so records can appear in traces safely.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: String,
    pub ssn: String,
    pub address_line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub program_name: String,
    pub amount_requested: f64,
    pub agreement: bool,
}

impl fmt::Debug for ApplicationInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicationInput")
            .field("first_name", &REDACTED)
            .field("last_name", &REDACTED)
            .field("email", &REDACTED)
            .field("phone", &REDACTED)
            .field("date_of_birth", &REDACTED)
            .field("ssn", &REDACTED)
            .field("address_line1", &REDACTED)
            .field("address_line2", &self.address_line2.as_ref().map(|_| REDACTED))
            .field("city", &REDACTED)
            .field("state", &self.state)
            .field("zip_code", &REDACTED)
            .field("program_name", &self.program_name)
            .field("amount_requested", &self.amount_requested)
            .field("agreement", &self.agreement)
            .finish()
    }
}

/// Outcome of the risk triage rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriageResult {
    pub review_tier: ReviewTier,
    pub risk_flags: Vec<String>,
}

/// Full record kept by the store, only ever at rest in encrypted form.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredApplication {
    pub application_id: ApplicationId,
    pub submitted_at: DateTime<Utc>,
    pub review_tier: ReviewTier,
    pub risk_flags: Vec<String>,
    #[serde(flatten)]
    pub input: ApplicationInput,
}

impl StoredApplication {
    pub fn assemble(
        application_id: ApplicationId,
        submitted_at: DateTime<Utc>,
        input: ApplicationInput,
        triage: TriageResult,
    ) -> Self {
        Self {
            application_id,
            submitted_at,
            review_tier: triage.review_tier,
            risk_flags: triage.risk_flags,
            input,
        }
    }

    /// The only shape of a stored application that may leave the service.
    pub fn submit_response(&self) -> ApplicationSubmitResponse {
        ApplicationSubmitResponse {
            application_id: self.application_id.clone(),
            review_tier: self.review_tier,
            risk_flags: self.risk_flags.clone(),
        }
    }
}

impl fmt::Debug for StoredApplication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredApplication")
            .field("application_id", &self.application_id)
            .field("submitted_at", &self.submitted_at)
            .field("review_tier", &self.review_tier)
            .field("risk_flags", &self.risk_flags)
            .field("input", &self.input)
            .finish()
    }
}

/// PII-free projection handed to downstream processing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandoffRecord {
    pub application_id: ApplicationId,
    pub submitted_at: DateTime<Utc>,
    pub review_tier: ReviewTier,
    pub risk_flags: Vec<String>,
    pub program_name: String,
    pub amount_requested: f64,
    pub applicant_ref: String,
}

/// Response body returned to clients after an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSubmitResponse {
    pub application_id: ApplicationId,
    pub review_tier: ReviewTier,
    pub risk_flags: Vec<String>,
}
