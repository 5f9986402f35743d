use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::features::{FeatureRow, FeatureValue};

/// Opaque regression capability. Implementations must be safe to share
/// read-only across concurrent requests.
pub trait ScoreModel: Send + Sync {
    fn predict(&self, row: &FeatureRow) -> Result<f64, ModelError>;
}

/// Inference failure, surfaced to callers the same way as validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("feature '{0}' is missing from the input row")]
    MissingFeature(String),
    #[error("feature '{feature}' expected {expected} input")]
    FeatureType {
        feature: String,
        expected: &'static str,
    },
    #[error("model produced an undefined prediction")]
    NotANumber,
}

/// Raised when the model artifact cannot be read at startup.
#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("model artifact not found at {}", path.display())]
    NotFound { path: PathBuf },
    #[error("unable to read model artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed model artifact: {0}")]
    Format(#[from] serde_json::Error),
    #[error("invalid model artifact: {0}")]
    Invalid(String),
}

/// Standard-scaled linear model with one-hot categorical terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RidgePipeline {
    pub intercept: f64,
    #[serde(default)]
    pub numeric: Vec<NumericTerm>,
    #[serde(default)]
    pub categorical: Vec<CategoricalTerm>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericTerm {
    pub feature: String,
    pub mean: f64,
    pub scale: f64,
    pub coefficient: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalTerm {
    pub feature: String,
    pub levels: BTreeMap<String, f64>,
    /// Contribution when the value is absent.
    #[serde(default)]
    pub missing: f64,
}

impl RidgePipeline {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ModelLoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ModelLoadError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ModelLoadError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ModelLoadError> {
        let pipeline: Self = serde_json::from_reader(reader)?;
        pipeline.validate()?;
        Ok(pipeline)
    }

    fn validate(&self) -> Result<(), ModelLoadError> {
        if !self.intercept.is_finite() {
            return Err(ModelLoadError::Invalid("intercept must be finite".to_string()));
        }

        for term in &self.numeric {
            if ![term.mean, term.scale, term.coefficient]
                .iter()
                .all(|value| value.is_finite())
            {
                return Err(ModelLoadError::Invalid(format!(
                    "numeric term '{}' has non-finite parameters",
                    term.feature
                )));
            }
        }

        for term in &self.categorical {
            if !term.missing.is_finite() || term.levels.values().any(|value| !value.is_finite()) {
                return Err(ModelLoadError::Invalid(format!(
                    "categorical term '{}' has non-finite coefficients",
                    term.feature
                )));
            }
        }

        Ok(())
    }
}

impl ScoreModel for RidgePipeline {
    fn predict(&self, row: &FeatureRow) -> Result<f64, ModelError> {
        let mut score = self.intercept;

        for term in &self.numeric {
            let value = row
                .value(&term.feature)
                .ok_or_else(|| ModelError::MissingFeature(term.feature.clone()))?;
            let x = value.as_number().ok_or_else(|| ModelError::FeatureType {
                feature: term.feature.clone(),
                expected: "numeric",
            })?;
            let scale = if term.scale == 0.0 { 1.0 } else { term.scale };
            score += term.coefficient * (x - term.mean) / scale;
        }

        for term in &self.categorical {
            let value = row
                .value(&term.feature)
                .ok_or_else(|| ModelError::MissingFeature(term.feature.clone()))?;
            match value {
                FeatureValue::Category(Some(label)) => {
                    // unknown levels are ignored like an unseen one-hot column
                    score += term.levels.get(label).copied().unwrap_or(0.0);
                }
                FeatureValue::Category(None) => score += term.missing,
                FeatureValue::Integer(_) | FeatureValue::Float(_) => {
                    return Err(ModelError::FeatureType {
                        feature: term.feature.clone(),
                        expected: "categorical",
                    })
                }
            }
        }

        // overflow saturates to an infinity, which the service clamps
        if score.is_nan() {
            Err(ModelError::NotANumber)
        } else {
            Ok(score)
        }
    }
}
