//! Financial-assistance application intake.
//!
//! Submissions flow through validation and triage, are sealed with AES-256-GCM before they
//! reach the store, and leave behind a PII-free handoff record for downstream processing.
//! Only the identifier, review tier, and risk flags are ever returned to a client.

pub mod crypto;
pub mod domain;
pub mod handoff;
pub mod repository;
pub mod router;
pub mod service;
pub mod ssn;
pub mod store;
pub mod triage;
pub mod validation;

#[cfg(test)]
mod tests;

pub use crypto::{CryptoError, EncryptedPayload, EncryptionService};
pub use domain::{
    ApplicationId, ApplicationInput, ApplicationSubmitResponse, HandoffRecord, ReviewTier,
    StoredApplication, TriageResult,
};
pub use handoff::to_handoff;
pub use repository::{ApplicationRepository, StoreError};
pub use router::{application_router, IntakeState, API_KEY_HEADER};
pub use service::{IntakeError, IntakeService};
pub use store::ApplicationStore;
pub use triage::{TriageConfig, TriageEngine};
pub use validation::{ValidationFailure, Validator};
