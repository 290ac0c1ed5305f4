use crate::cli::ServeArgs;
use crate::infra::{override_artifacts, AppState};
use crate::routes::with_assessment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use creditwise::config::AppConfig;
use creditwise::error::AppError;
use creditwise::telemetry;
use creditwise::underwriting::{LoanAssessmentService, ResourceLoader};
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
    config.artifacts = override_artifacts(config.artifacts, &args.artifacts);

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let loader = ResourceLoader::from_config(config.artifacts.clone());
    let handles = loader.initialize()?;
    let assessment_service = Arc::new(LoanAssessmentService::new(handles));

    let app = with_assessment_routes(assessment_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "loan assessment service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
