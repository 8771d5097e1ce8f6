use aid_intake::config::AppConfig;
use aid_intake::intake::{
    ApplicationStore, EncryptionService, IntakeService, TriageConfig, TriageEngine, Validator,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Wire the intake service to the process-wide store using the loaded configuration.
pub(crate) fn build_intake_service(config: &AppConfig) -> IntakeService<ApplicationStore> {
    let cipher = EncryptionService::new(config.security.encryption_key.clone());
    let store = ApplicationStore::shared(cipher);

    IntakeService::new(
        Validator::new(&config.intake),
        TriageEngine::new(TriageConfig::default()),
        store,
    )
}
