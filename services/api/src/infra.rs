use metrics_exporter_prometheus::PrometheusHandle;
use score_predictor::config::{ModelConfig, SuggestionConfig};
use score_predictor::error::AppError;
use score_predictor::prediction::{PredictionPipeline, RidgePipeline, SuggestionEngine};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) frontend_dir: Arc<PathBuf>,
}

/// Load the model artifact and pick the suggestion strategy. A missing
/// artifact aborts startup.
pub(crate) fn build_pipeline(
    model: &ModelConfig,
    suggestions: &SuggestionConfig,
) -> Result<PredictionPipeline, AppError> {
    let artifact = RidgePipeline::from_path(&model.artifact_path)?;
    info!(
        path = %model.artifact_path.display(),
        numeric_terms = artifact.numeric.len(),
        categorical_terms = artifact.categorical.len(),
        "loaded regression model"
    );

    let engine = SuggestionEngine::from_config(suggestions)?;
    Ok(PredictionPipeline::new(Arc::new(artifact), engine))
}
