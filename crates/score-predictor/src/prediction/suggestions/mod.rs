//! Improvement advice for a scored profile.
//!
//! Two strategies exist: a deterministic rule engine and delegation to an
//! external text generator. The strategy is fixed when the engine is built so
//! nothing reads the environment per request.

mod advisor;
pub mod gemini;
mod rules;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::profile::StudentProfile;
use crate::config::SuggestionConfig;

pub use gemini::{GeminiClient, GenerationError, TextGenerator};

pub const MAX_SUGGESTIONS: usize = 5;

/// Substituted when the external generator is configured but fails.
pub const FALLBACK_SUGGESTIONS: [&str; 4] = [
    "Maintain consistent study hours daily",
    "Focus on improving attendance",
    "Balance study time with adequate rest",
    "Reduce distractions during study sessions",
];

/// Result of a suggestion attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionOutcome {
    Generated(Vec<String>),
    ExternalServiceFailed,
}

impl SuggestionOutcome {
    /// Resolve into a non-empty list, substituting the fixed fallback.
    pub fn or_fallback(self) -> Vec<String> {
        match self {
            SuggestionOutcome::Generated(items) if !items.is_empty() => items,
            _ => fallback_suggestions(),
        }
    }
}

pub fn fallback_suggestions() -> Vec<String> {
    FALLBACK_SUGGESTIONS.iter().map(|item| item.to_string()).collect()
}

#[derive(Clone)]
enum Strategy {
    RuleBased,
    Delegated {
        generator: Arc<dyn TextGenerator>,
        timeout: Duration,
    },
}

/// Produces at most five suggestions for a profile and its predicted score.
#[derive(Clone)]
pub struct SuggestionEngine {
    strategy: Strategy,
}

impl SuggestionEngine {
    pub fn rule_based() -> Self {
        Self {
            strategy: Strategy::RuleBased,
        }
    }

    pub fn delegated(generator: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        Self {
            strategy: Strategy::Delegated { generator, timeout },
        }
    }

    /// Delegate to Gemini when a credential is configured, otherwise use rules.
    pub fn from_config(config: &SuggestionConfig) -> Result<Self, GenerationError> {
        match &config.api_key {
            Some(api_key) => {
                let client = GeminiClient::new(
                    config.endpoint.clone(),
                    config.model.clone(),
                    api_key.clone(),
                    config.timeout,
                )?;
                Ok(Self::delegated(Arc::new(client), config.timeout))
            }
            None => Ok(Self::rule_based()),
        }
    }

    pub fn strategy_label(&self) -> &'static str {
        match self.strategy {
            Strategy::RuleBased => "rule_based",
            Strategy::Delegated { .. } => "delegated",
        }
    }

    pub async fn suggest(&self, profile: &StudentProfile, prediction: f64) -> SuggestionOutcome {
        match &self.strategy {
            Strategy::RuleBased => {
                SuggestionOutcome::Generated(rules::rule_based_suggestions(profile, prediction))
            }
            Strategy::Delegated { generator, timeout } => {
                match delegate(generator.as_ref(), *timeout, profile, prediction).await {
                    Ok(items) => SuggestionOutcome::Generated(items),
                    Err(err) => {
                        warn!(error = %err, "suggestion service failed; using fallback list");
                        SuggestionOutcome::ExternalServiceFailed
                    }
                }
            }
        }
    }
}

impl std::fmt::Debug for SuggestionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestionEngine")
            .field("strategy", &self.strategy_label())
            .finish()
    }
}

async fn delegate(
    generator: &dyn TextGenerator,
    timeout: Duration,
    profile: &StudentProfile,
    prediction: f64,
) -> Result<Vec<String>, GenerationError> {
    let prompt = advisor::build_prompt(profile, prediction);
    let response = tokio::time::timeout(timeout, generator.generate(&prompt))
        .await
        .map_err(|_| GenerationError::Timeout(timeout))??;

    let suggestions = advisor::parse_suggestions(&response);
    debug!(count = suggestions.len(), "parsed delegated suggestions");
    if suggestions.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    Ok(suggestions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ScriptedGenerator {
        reply: Result<String, String>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing(reason: &str) -> Self {
            Self {
                reply: Err(reason.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
            self.prompts
                .lock()
                .expect("prompt mutex")
                .push(prompt.to_string());
            self.reply.clone().map_err(GenerationError::Transport)
        }
    }

    struct StalledGenerator;

    #[async_trait]
    impl TextGenerator for StalledGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("1. Too late.".to_string())
        }
    }

    fn profile() -> StudentProfile {
        StudentProfile {
            age: 20,
            gender: Some("Male".to_string()),
            study_hours_per_day: 2.0,
            social_media_hours: 5.0,
            part_time_job: Some("Yes".to_string()),
            attendance_percentage: 70.0,
            sleep_hours: 5.0,
            diet_quality: Some("Poor".to_string()),
            exercise_frequency: 0,
            parental_education_level: None,
            internet_resource_accessibility: Some("Poor".to_string()),
            extracurricular_participation: Some("No".to_string()),
        }
    }

    #[tokio::test]
    async fn rule_based_engine_generates_locally() {
        let engine = SuggestionEngine::rule_based();
        assert_eq!(engine.strategy_label(), "rule_based");
        match engine.suggest(&profile(), 50.0).await {
            SuggestionOutcome::Generated(items) => assert_eq!(items.len(), MAX_SUGGESTIONS),
            other => panic!("expected generated suggestions, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn delegated_engine_parses_generator_output() {
        let generator = Arc::new(ScriptedGenerator::replying(
            "1. Study in 45 minute blocks.\n2. Put your phone away while studying.",
        ));
        let engine = SuggestionEngine::delegated(generator.clone(), Duration::from_secs(5));

        let outcome = engine.suggest(&profile(), 48.25).await;
        assert_eq!(
            outcome,
            SuggestionOutcome::Generated(vec![
                "Study in 45 minute blocks.".to_string(),
                "Put your phone away while studying.".to_string(),
            ])
        );

        let prompts = generator.prompts.lock().expect("prompt mutex");
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Predicted Exam Score: 48.25/100"));
    }

    #[tokio::test]
    async fn generator_errors_signal_failure() {
        let engine = SuggestionEngine::delegated(
            Arc::new(ScriptedGenerator::failing("connection refused")),
            Duration::from_secs(5),
        );
        let outcome = engine.suggest(&profile(), 50.0).await;
        assert_eq!(outcome, SuggestionOutcome::ExternalServiceFailed);
        assert_eq!(outcome.or_fallback(), fallback_suggestions());
    }

    #[tokio::test]
    async fn blank_generator_output_signals_failure() {
        let engine = SuggestionEngine::delegated(
            Arc::new(ScriptedGenerator::replying("\n  \n")),
            Duration::from_secs(5),
        );
        assert_eq!(
            engine.suggest(&profile(), 50.0).await,
            SuggestionOutcome::ExternalServiceFailed
        );
    }

    #[tokio::test(start_paused = true)]
    async fn slow_generator_times_out() {
        let engine =
            SuggestionEngine::delegated(Arc::new(StalledGenerator), Duration::from_secs(12));
        assert_eq!(
            engine.suggest(&profile(), 50.0).await,
            SuggestionOutcome::ExternalServiceFailed
        );
    }

    #[test]
    fn fallback_is_the_fixed_four_item_list() {
        let items = SuggestionOutcome::Generated(Vec::new()).or_fallback();
        assert_eq!(items.len(), 4);
        assert_eq!(items[0], "Maintain consistent study hours daily");
    }

    #[test]
    fn from_config_selects_strategy_by_credential() {
        let mut config = SuggestionConfig {
            api_key: None,
            model: "gemini-pro".to_string(),
            endpoint: "https://example.test/v1beta".to_string(),
            timeout: Duration::from_secs(12),
        };
        let engine = SuggestionEngine::from_config(&config).expect("engine builds");
        assert_eq!(engine.strategy_label(), "rule_based");

        config.api_key = Some("secret".to_string());
        let engine = SuggestionEngine::from_config(&config).expect("engine builds");
        assert_eq!(engine.strategy_label(), "delegated");
    }
}
