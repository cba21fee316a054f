//! HTTP surface: prediction form, JSON API, health checks and Prometheus metrics

use crate::error::ApiError;
use crate::form::PredictionForm;
use crate::render;
use aqi_lib::{
    evaluate,
    health::{ComponentStatus, HealthRegistry},
    observability::{AqiMetrics, StructuredLogger},
    AqiCategory, AqiPredictor, Evaluation, FailureStage, PollutantReading, PredictionOutcome,
};
use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection},
        State,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<AqiPredictor>,
    pub health_registry: HealthRegistry,
    pub metrics: AqiMetrics,
    pub logger: StructuredLogger,
}

impl AppState {
    pub fn new(
        predictor: AqiPredictor,
        health_registry: HealthRegistry,
        metrics: AqiMetrics,
        logger: StructuredLogger,
    ) -> Self {
        Self {
            predictor: Arc::new(predictor),
            health_registry,
            metrics,
            logger,
        }
    }

    /// Evaluate one reading and record the outcome in metrics, logs and health
    pub async fn evaluate(&self, reading: &PollutantReading) -> Evaluation {
        let start = Instant::now();
        let evaluation = evaluate(&self.predictor, reading);
        let elapsed = start.elapsed();

        match &evaluation {
            Evaluation::Success(outcome) => {
                self.metrics.observe_prediction_latency(elapsed.as_secs_f64());
                self.metrics.inc_predictions(outcome.category);
                self.logger.log_prediction(outcome, elapsed.as_micros());
                self.health_registry.record_prediction(None).await;
            }
            Evaluation::InvalidInput(e) => {
                self.metrics.inc_prediction_errors("input");
                self.logger.log_prediction_failure("input", &e.to_string());
            }
            Evaluation::Failed(e) => {
                let message = e.to_string();
                self.metrics.inc_prediction_errors(e.stage());
                self.logger.log_prediction_failure(e.stage(), &message);
                self.health_registry.record_prediction(Some(&message)).await;
            }
        }

        evaluation
    }
}

/// Blank form with every field at its default
async fn index() -> Html<String> {
    let form = PredictionForm::from_reading(&PollutantReading::default());
    Html(render::page(&form, None))
}

/// Form submission; the submitted values are always echoed back
async fn predict_form(
    State(state): State<Arc<AppState>>,
    form: Result<Form<PredictionForm>, FormRejection>,
) -> Response {
    let form = match form {
        Ok(Form(form)) => form,
        Err(e) => {
            state.metrics.inc_prediction_errors("input");
            state.logger.log_prediction_failure("input", &e.body_text());
            let blank = PredictionForm::from_reading(&PollutantReading::default());
            return (
                StatusCode::BAD_REQUEST,
                Html(render::error_page(&blank, &e.body_text())),
            )
                .into_response();
        }
    };

    let reading = match form.parse() {
        Ok(reading) => reading,
        Err(e) => {
            state.metrics.inc_prediction_errors("input");
            state
                .logger
                .log_prediction_failure("input", &e.to_string());
            let evaluation = Evaluation::InvalidInput(e);
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(render::page(&form, Some(&evaluation))),
            )
                .into_response();
        }
    };

    let evaluation = state.evaluate(&reading).await;
    let status = match evaluation.failure_stage() {
        None => StatusCode::OK,
        Some(FailureStage::Input) => StatusCode::UNPROCESSABLE_ENTITY,
        Some(FailureStage::Artifact) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (status, Html(render::page(&form, Some(&evaluation)))).into_response()
}

/// JSON prediction endpoint
async fn predict_json(
    State(state): State<Arc<AppState>>,
    body: Result<Json<PollutantReading>, JsonRejection>,
) -> Result<Json<PredictionOutcome>, ApiError> {
    let Json(reading) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    match state.evaluate(&reading).await {
        Evaluation::Success(outcome) => Ok(Json(outcome)),
        Evaluation::InvalidInput(e) => Err(e.into()),
        Evaluation::Failed(e) => Err(e.into()),
    }
}

#[derive(Serialize)]
struct CategoryBand {
    key: &'static str,
    label: &'static str,
    color: &'static str,
    /// Exclusive lower bound
    min: Option<f64>,
    /// Inclusive upper bound
    max: Option<f64>,
}

async fn categories() -> Json<Vec<CategoryBand>> {
    let bands = AqiCategory::ALL
        .iter()
        .map(|category| {
            let (min, max) = category.range();
            CategoryBand {
                key: category.key(),
                label: category.label(),
                color: category.color(),
                min,
                max,
            }
        })
        .collect();
    Json(bands)
}

/// Health check response - returns 200 if healthy, 503 if unhealthy
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = match health.status {
        ComponentStatus::Healthy => StatusCode::OK,
        ComponentStatus::Degraded => StatusCode::OK, // Still serving predictions
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

/// Readiness check response - returns 200 if ready, 503 if not ready
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint
async fn metrics() -> Response {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!(error = %e, "Failed to encode metrics");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
        .into_response()
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/predict", post(predict_form))
        .route("/api/v1/predict", post(predict_json))
        .route("/api/v1/categories", get(categories))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Start the server and run until `shutdown` resolves
pub async fn serve(
    addr: &str,
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let app = create_router(state);

    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
