//! Exam score prediction: field normalization, feature assembly, model
//! inference with clamping, and improvement suggestions.

pub mod features;
pub mod model;
pub mod pipeline;
pub mod profile;
pub mod router;
pub mod service;
pub mod suggestions;

pub use features::{FeatureColumn, FeatureRow, FeatureValue, FEATURE_SCHEMA};
pub use model::{ModelError, ModelLoadError, RidgePipeline, ScoreModel};
pub use pipeline::{PredictionError, PredictionPipeline, PredictionResult};
pub use profile::{normalize_category, RawProfile, StudentProfile, ValidationError};
pub use router::{prediction_router, ProfilePayload};
pub use service::{clamp_score, PredictionService, MAX_SCORE, MIN_SCORE};
pub use suggestions::{
    fallback_suggestions, GeminiClient, GenerationError, SuggestionEngine, SuggestionOutcome,
    TextGenerator, FALLBACK_SUGGESTIONS, MAX_SUGGESTIONS,
};
