use std::sync::Arc;

use super::features::FeatureRow;
use super::model::{ModelError, ScoreModel};

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

/// Wraps the shared model and normalizes its raw output into a reportable score.
#[derive(Clone)]
pub struct PredictionService {
    model: Arc<dyn ScoreModel>,
}

impl PredictionService {
    pub fn new(model: Arc<dyn ScoreModel>) -> Self {
        Self { model }
    }

    /// Invoke the model and clamp into `[0, 100]` with two decimals.
    ///
    /// Infinite outputs clamp to the nearest bound; only NaN is an error.
    pub fn predict(&self, row: &FeatureRow) -> Result<f64, ModelError> {
        let raw = self.model.predict(row)?;
        if raw.is_nan() {
            return Err(ModelError::NotANumber);
        }
        Ok(clamp_score(raw))
    }
}

impl std::fmt::Debug for PredictionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictionService").finish_non_exhaustive()
    }
}

pub fn clamp_score(raw: f64) -> f64 {
    let clamped = raw.clamp(MIN_SCORE, MAX_SCORE);
    (clamped * 100.0).round() / 100.0
}
