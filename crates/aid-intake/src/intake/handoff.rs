use super::domain::{HandoffRecord, StoredApplication};

pub const APPLICANT_REF_PREFIX: &str = "app-";

/// Build the downstream record field by field from an allow-list.
///
/// The applicant's input is only read for `program_name` and `amount_requested`; any field
/// added to `ApplicationInput` stays out of the handoff until it is named here.
pub fn to_handoff(application: &StoredApplication) -> HandoffRecord {
    HandoffRecord {
        application_id: application.application_id.clone(),
        submitted_at: application.submitted_at,
        review_tier: application.review_tier,
        risk_flags: application.risk_flags.clone(),
        program_name: application.input.program_name.clone(),
        amount_requested: application.input.amount_requested,
        applicant_ref: format!("{APPLICANT_REF_PREFIX}{}", application.application_id),
    }
}
