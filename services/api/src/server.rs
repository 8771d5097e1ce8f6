use crate::cli::ServeArgs;
use crate::infra::{build_intake_service, AppState};
use crate::routes::with_application_routes;
use aid_intake::config::AppConfig;
use aid_intake::error::AppError;
use aid_intake::intake::EncryptionService;
use aid_intake::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    if let Err(err) = EncryptionService::new(config.security.encryption_key.clone()).ensure_key() {
        warn!(error = %err, "encryption key unusable; submissions will fail until it is fixed");
    }
    if config.security.api_key.is_none() {
        warn!("API_KEY is not set; every intake request will be rejected");
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let intake_service = Arc::new(build_intake_service(&config));

    let app = with_application_routes(intake_service, config.security.api_key.clone())
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "application intake service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
