use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryWizardStore};
use crate::routes::with_site_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use it_academy::config::AppConfig;
use it_academy::error::AppError;
use it_academy::registration::{ConfiguredSender, RegistrationService, TokioRedirectScheduler};
use it_academy::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry, config.environment)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let sender = ConfiguredSender::from_config(&config.notification)?;
    let delivery = match &sender {
        ConfiguredSender::Logging(_) => "logging",
        ConfiguredSender::Webhook(_) => "webhook",
    };
    let registration_service = Arc::new(RegistrationService::new(
        Arc::new(InMemoryWizardStore::default()),
        Arc::new(sender),
        Arc::new(TokioRedirectScheduler),
        config.registration.clone(),
    ));
    let _idle_sweeper = registration_service.spawn_idle_sweeper();

    let app = with_site_routes(registration_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        delivery,
        mask_delivery_failures = config.registration.mask_delivery_failures,
        idle_timeout_secs = config.registration.idle_timeout.as_secs(),
        "it academy site ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
