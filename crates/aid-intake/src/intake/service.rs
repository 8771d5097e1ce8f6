use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{info, warn};

use super::domain::{
    ApplicationId, ApplicationSubmitResponse, HandoffRecord, StoredApplication, TriageResult,
};
use super::handoff::to_handoff;
use super::repository::{ApplicationRepository, StoreError};
use super::triage::TriageEngine;
use super::validation::{ValidationFailure, Validator};

/// Service composing validation, triage, and the repository.
pub struct IntakeService<R> {
    validator: Validator,
    engine: TriageEngine,
    repository: Arc<R>,
}

impl<R> IntakeService<R>
where
    R: ApplicationRepository + 'static,
{
    pub fn new(validator: Validator, engine: TriageEngine, repository: Arc<R>) -> Self {
        Self {
            validator,
            engine,
            repository,
        }
    }

    /// Validate and triage a submission without persisting anything.
    pub fn assess(&self, body: &Value) -> Result<TriageResult, ValidationFailure> {
        let input = self.validator.validate(body)?;
        Ok(self.engine.triage(&input))
    }

    /// Accept a raw submission, store it encrypted, and publish its handoff record.
    pub fn submit(&self, body: &Value) -> Result<ApplicationSubmitResponse, IntakeError> {
        let input = self.validator.validate(body).map_err(|failure| {
            warn!(
                error_count = failure.errors.len(),
                fields = ?failure.fields(),
                "application rejected by validation"
            );
            failure
        })?;

        let triage = self.engine.triage(&input);
        let stored =
            StoredApplication::assemble(ApplicationId::generate(), Utc::now(), input, triage);

        self.repository.save_application(&stored)?;
        self.repository.save_handoff(to_handoff(&stored))?;

        info!(
            application_id = %stored.application_id,
            review_tier = stored.review_tier.label(),
            flag_count = stored.risk_flags.len(),
            "application accepted"
        );

        Ok(stored.submit_response())
    }

    /// Decrypted application for internal consumers. Never expose this in a response.
    pub fn application(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Option<StoredApplication>, IntakeError> {
        Ok(self.repository.application(application_id)?)
    }

    pub fn handoff(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Option<HandoffRecord>, IntakeError> {
        Ok(self.repository.handoff(application_id)?)
    }
}

/// Error raised by the intake service.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error(transparent)]
    Validation(#[from] ValidationFailure),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntakeError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, IntakeError::Validation(_))
    }
}
