use crate::infra::AppState;
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json};
use score_predictor::prediction::{prediction_router, PredictionPipeline};
use serde_json::json;
use std::path::{Component, Path as FsPath, PathBuf};
use std::sync::Arc;

pub(crate) fn with_prediction_routes(pipeline: Arc<PredictionPipeline>) -> axum::Router {
    prediction_router(pipeline)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/", get(index_page))
        .route("/*path", get(static_asset))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn index_page(Extension(state): Extension<AppState>) -> Response {
    serve_asset(&state.frontend_dir, "index.html").await
}

pub(crate) async fn static_asset(
    Extension(state): Extension<AppState>,
    Path(path): Path<String>,
) -> Response {
    serve_asset(&state.frontend_dir, &path).await
}

async fn serve_asset(root: &FsPath, relative: &str) -> Response {
    let Some(path) = resolve_asset(root, relative) else {
        return not_found();
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime.essence_str().to_string())],
                bytes,
            )
                .into_response()
        }
        Err(_) => not_found(),
    }
}

/// Join `relative` under `root`, refusing anything but plain path segments.
fn resolve_asset(root: &FsPath, relative: &str) -> Option<PathBuf> {
    let relative = FsPath::new(relative);
    let plain = relative
        .components()
        .all(|component| matches!(component, Component::Normal(_)));
    if plain && relative.components().next().is_some() {
        Some(root.join(relative))
    } else {
        None
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use score_predictor::prediction::{RidgePipeline, SuggestionEngine};
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    const REPO_ROOT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../..");

    fn app(ready: bool) -> axum::Router {
        let model = RidgePipeline::from_path(format!("{REPO_ROOT}/models/ridge_pipeline.json"))
            .expect("bundled model loads");
        let pipeline = Arc::new(PredictionPipeline::new(
            Arc::new(model),
            SuggestionEngine::rule_based(),
        ));
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
            frontend_dir: Arc::new(PathBuf::from(format!("{REPO_ROOT}/frontend"))),
        };
        with_prediction_routes(pipeline).layer(Extension(state))
    }

    async fn get(app: axum::Router, uri: &str) -> Response {
        app.oneshot(Request::get(uri).body(Body::empty()).expect("request builds"))
            .await
            .expect("router responds")
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        assert_eq!(
            get(app(false), "/ready").await.status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(get(app(true), "/ready").await.status(), StatusCode::OK);
        assert_eq!(get(app(true), "/health").await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn metrics_are_exposed_as_text() {
        let response = get(app(true), "/metrics").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }

    #[tokio::test]
    async fn serves_landing_page_and_assets() {
        let response = get(app(true), "/").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html");

        let response = get(app(true), "/styles.css").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");
    }

    #[tokio::test]
    async fn missing_assets_are_not_found() {
        let response = get(app(true), "/missing.js").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn resolve_asset_rejects_traversal() {
        let root = FsPath::new("/srv/frontend");
        assert_eq!(
            resolve_asset(root, "css/site.css"),
            Some(PathBuf::from("/srv/frontend/css/site.css"))
        );
        assert!(resolve_asset(root, "../secrets.env").is_none());
        assert!(resolve_asset(root, "/etc/passwd").is_none());
        assert!(resolve_asset(root, "").is_none());
    }

    #[tokio::test]
    async fn predict_route_is_mounted() {
        let request = Request::post("/api/predict")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"age": 19, "study_hours_per_day": 4}"#))
            .expect("request builds");
        let response = app(true).oneshot(request).await.expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
    }
}
