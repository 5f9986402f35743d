use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequest, Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Form, Json, Router,
};
use serde_json::Value;
use tracing::info;

use super::pipeline::{PredictionPipeline, PredictionResult};
use crate::error::AppError;
use super::profile::RawProfile;

/// Router builder exposing the prediction endpoint.
pub fn prediction_router(pipeline: Arc<PredictionPipeline>) -> Router {
    Router::new()
        .route("/api/predict", post(predict_handler))
        .with_state(pipeline)
}

pub(crate) async fn predict_handler(
    State(pipeline): State<Arc<PredictionPipeline>>,
    ProfilePayload(raw): ProfilePayload,
) -> Response {
    match pipeline.evaluate(&raw).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(error) => {
            info!(%error, "rejected prediction request");
            AppError::from(error).into_response()
        }
    }
}

fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(PredictionResult::failed(message)),
    )
        .into_response()
}

/// Prediction payload accepted as a JSON object or a url-encoded form.
#[derive(Debug)]
pub struct ProfilePayload(pub RawProfile);

#[async_trait]
impl<S> FromRequest<S> for ProfilePayload
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_json(&req) {
            let Json(body) = Json::<Value>::from_request(req, state)
                .await
                .map_err(|rejection| bad_request(rejection.body_text()))?;
            match body {
                Value::Object(fields) => Ok(Self(RawProfile::new(fields))),
                _ => Err(bad_request("request body must be a JSON object")),
            }
        } else {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|rejection| bad_request(rejection.body_text()))?;
            Ok(Self(RawProfile::from_form(fields)))
        }
    }
}

fn is_json(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| {
            let mime = mime.trim();
            mime.eq_ignore_ascii_case("application/json") || mime.ends_with("+json")
        })
        .unwrap_or(false)
}
