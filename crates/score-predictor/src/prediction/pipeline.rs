use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::features::FeatureRow;
use super::model::{ModelError, ScoreModel};
use super::profile::{RawProfile, StudentProfile, ValidationError};
use super::service::PredictionService;
use super::suggestions::SuggestionEngine;

/// Response envelope for a prediction request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PredictionResult {
    pub fn scored(prediction: f64, suggestions: Vec<String>) -> Self {
        Self {
            success: true,
            prediction: Some(prediction),
            suggestions: Some(suggestions),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            prediction: None,
            suggestions: None,
            error: Some(error.into()),
        }
    }
}

/// Failures that abort a prediction. Both kinds are reported identically.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Inference(#[from] ModelError),
}

/// Per-request orchestration: normalize, assemble, predict, advise.
#[derive(Debug, Clone)]
pub struct PredictionPipeline {
    service: PredictionService,
    suggestions: SuggestionEngine,
}

impl PredictionPipeline {
    pub fn new(model: Arc<dyn ScoreModel>, suggestions: SuggestionEngine) -> Self {
        Self {
            service: PredictionService::new(model),
            suggestions,
        }
    }

    pub fn suggestion_strategy(&self) -> &'static str {
        self.suggestions.strategy_label()
    }

    pub async fn evaluate(&self, raw: &RawProfile) -> Result<PredictionResult, PredictionError> {
        let profile = StudentProfile::from_raw(raw)?;
        let row = FeatureRow::assemble(&profile);
        let prediction = self.service.predict(&row)?;
        debug!(prediction, "scored student profile");

        let suggestions = self
            .suggestions
            .suggest(&profile, prediction)
            .await
            .or_fallback();

        Ok(PredictionResult::scored(prediction, suggestions))
    }
}
