use crate::cli::ArtifactArgs;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use creditwise::config::{AppConfig, ArtifactConfig};
use creditwise::error::AppError;
use creditwise::underwriting::{LoanAssessmentService, ResourceLoader};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Artifact locations from the environment, replaced wholesale by `--artifacts-dir`.
pub(crate) fn resolve_artifacts(args: &ArtifactArgs) -> Result<ArtifactConfig, AppError> {
    let config = AppConfig::load()?;
    Ok(override_artifacts(config.artifacts, args))
}

pub(crate) fn override_artifacts(
    configured: ArtifactConfig,
    args: &ArtifactArgs,
) -> ArtifactConfig {
    match &args.artifacts_dir {
        Some(dir) => ArtifactConfig::in_directory(dir),
        None => configured,
    }
}

/// Load every artifact and wrap the handles in an assessment service.
pub(crate) fn load_service(artifacts: ArtifactConfig) -> Result<LoanAssessmentService, AppError> {
    let handles = ResourceLoader::from_config(artifacts).initialize()?;
    Ok(LoanAssessmentService::new(handles))
}
