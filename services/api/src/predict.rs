use crate::infra::build_pipeline;
use clap::Args;
use score_predictor::config::AppConfig;
use score_predictor::error::AppError;
use score_predictor::prediction::{PredictionResult, RawProfile};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct PredictArgs {
    /// JSON file holding a single student profile object
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Skip the generative suggestion service even when a key is configured
    #[arg(long)]
    pub(crate) rule_based: bool,
}

pub(crate) async fn run_predict(args: PredictArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    if args.rule_based {
        config.suggestions.api_key = None;
    }

    let raw = read_profile(&args.input)?;
    let pipeline = build_pipeline(&config.model, &config.suggestions)?;
    let result = pipeline.evaluate(&raw).await?;

    render_prediction(&result);
    Ok(())
}

fn read_profile(path: &Path) -> Result<RawProfile, AppError> {
    let contents = std::fs::read_to_string(path)?;
    parse_profile(&contents)
}

fn parse_profile(contents: &str) -> Result<RawProfile, AppError> {
    match serde_json::from_str::<serde_json::Value>(contents) {
        Ok(serde_json::Value::Object(fields)) => Ok(RawProfile::new(fields)),
        Ok(_) => Err(AppError::Io(io::Error::new(
            io::ErrorKind::InvalidData,
            "profile file must contain a JSON object",
        ))),
        Err(err) => Err(AppError::Io(io::Error::new(io::ErrorKind::InvalidData, err))),
    }
}

fn render_prediction(result: &PredictionResult) {
    println!("Exam score prediction");
    if let Some(prediction) = result.prediction {
        println!("Predicted score: {prediction:.2}/100");
    }

    if let Some(suggestions) = &result.suggestions {
        println!("\nSuggestions");
        for (index, suggestion) in suggestions.iter().enumerate() {
            println!("{}. {}", index + 1, suggestion);
        }
    }
}
