use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryContractorRepository, LoggingNotificationSender};
use crate::routes::with_onboarding_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use contractor_onboarding::config::AppConfig;
use contractor_onboarding::error::AppError;
use contractor_onboarding::telemetry;
use contractor_onboarding::workflows::onboarding::{OnboardingService, StrategyRegistry};
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

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryContractorRepository::default());
    if let Some(path) = config.onboarding.roster_path.as_deref() {
        repository.seed_from_roster(path)?;
    }
    let notifications = Arc::new(LoggingNotificationSender::default());
    let registry = Arc::new(StrategyRegistry::builtin());
    let onboarding_service = Arc::new(
        OnboardingService::new(registry, repository, notifications)
            .with_dispatch(config.onboarding.dispatch_enabled),
    );

    let app = with_onboarding_routes(onboarding_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        dispatch_enabled = config.onboarding.dispatch_enabled,
        "contractor onboarding service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
