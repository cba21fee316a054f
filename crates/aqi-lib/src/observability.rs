//! Observability for the AQI service
//!
//! Provides:
//! - Prometheus metrics (prediction latency, predictions per category, errors per stage, artifact info)
//! - Structured JSON logging with tracing

use crate::classifier::AqiCategory;
use crate::predictor::InferenceStats;
use crate::presentation::PredictionOutcome;
use prometheus::{
    register_gauge_vec, register_histogram, register_int_counter_vec, GaugeVec, Histogram,
    IntCounterVec,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Histogram buckets for prediction latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<AqiMetricsInner> = OnceLock::new();

struct AqiMetricsInner {
    prediction_latency_seconds: Histogram,
    predictions_total: IntCounterVec,
    prediction_errors_total: IntCounterVec,
    artifact_info: GaugeVec,
}

impl AqiMetricsInner {
    fn new() -> Self {
        Self {
            prediction_latency_seconds: register_histogram!(
                "aqi_prediction_latency_seconds",
                "Time spent scaling features and running the regression model",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register prediction_latency_seconds"),

            predictions_total: register_int_counter_vec!(
                "aqi_predictions_total",
                "Predictions served, by AQI category",
                &["category"]
            )
            .expect("Failed to register predictions_total"),

            prediction_errors_total: register_int_counter_vec!(
                "aqi_prediction_errors_total",
                "Failed evaluations, by pipeline stage",
                &["stage"]
            )
            .expect("Failed to register prediction_errors_total"),

            artifact_info: register_gauge_vec!(
                "aqi_artifact_info",
                "Kinds of the loaded scaler and model",
                &["scaler", "model"]
            )
            .expect("Failed to register artifact_info"),
        }
    }
}

/// Lightweight handle to the global metrics instance.
///
/// Multiple clones share the same underlying metrics.
#[derive(Clone)]
pub struct AqiMetrics {
    _private: (),
}

impl Default for AqiMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl AqiMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(AqiMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &AqiMetricsInner {
        GLOBAL_METRICS.get_or_init(AqiMetricsInner::new)
    }

    pub fn observe_prediction_latency(&self, duration_secs: f64) {
        self.inner().prediction_latency_seconds.observe(duration_secs);
    }

    pub fn inc_predictions(&self, category: AqiCategory) {
        self.inner()
            .predictions_total
            .with_label_values(&[category.key()])
            .inc();
    }

    /// `stage` is "input", "transform" or "predict"
    pub fn inc_prediction_errors(&self, stage: &str) {
        self.inner()
            .prediction_errors_total
            .with_label_values(&[stage])
            .inc();
    }

    pub fn set_artifact_info(&self, scaler: &str, model: &str) {
        self.inner().artifact_info.reset();
        self.inner()
            .artifact_info
            .with_label_values(&[scaler, model])
            .set(1.0);
    }
}

/// Structured logger for service events
#[derive(Clone)]
pub struct StructuredLogger {
    service: String,
}

impl StructuredLogger {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    pub fn log_startup(&self, version: &str, addr: &str) {
        info!(
            event = "service_started",
            service = %self.service,
            version = %version,
            addr = %addr,
            "AQI predictor started"
        );
    }

    pub fn log_artifacts_loaded(&self, scaler_path: &str, scaler: &str, model_path: &str, model: &str) {
        info!(
            event = "artifacts_loaded",
            service = %self.service,
            scaler_path = %scaler_path,
            scaler_kind = %scaler,
            model_path = %model_path,
            model_kind = %model,
            "Scaler and model loaded"
        );
    }

    pub fn log_prediction(&self, outcome: &PredictionOutcome, elapsed_us: u128) {
        let reading = &outcome.reading;
        info!(
            event = "prediction_generated",
            service = %self.service,
            pm25 = reading.pm25,
            pm10 = reading.pm10,
            no2 = reading.no2,
            so2 = reading.so2,
            co = reading.co,
            o3 = reading.o3,
            aqi = outcome.aqi.value(),
            category = outcome.category.key(),
            elapsed_us = elapsed_us as u64,
            "Generated AQI prediction"
        );
    }

    pub fn log_prediction_failure(&self, stage: &str, error: &str) {
        warn!(
            event = "prediction_failed",
            service = %self.service,
            stage = %stage,
            error = %error,
            "AQI prediction failed"
        );
    }

    pub fn log_shutdown(&self, reason: &str, stats: &InferenceStats) {
        info!(
            event = "service_shutdown",
            service = %self.service,
            reason = %reason,
            total_inferences = stats.total_inferences,
            slow_inferences = stats.slow_inferences,
            "AQI predictor shutting down"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_handles_share_registry() {
        let metrics = AqiMetrics::new();
        let clone = metrics.clone();

        metrics.observe_prediction_latency(0.0002);
        metrics.inc_predictions(AqiCategory::Moderate);
        clone.inc_predictions(AqiCategory::Moderate);
        clone.inc_prediction_errors("transform");
        metrics.set_artifact_info("standard", "linear");

        let count = metrics
            .inner()
            .predictions_total
            .with_label_values(&["moderate"])
            .get();
        assert!(count >= 2);
    }

    #[test]
    fn test_structured_logger_creation() {
        let logger = StructuredLogger::new("aqi-server");
        assert_eq!(logger.service, "aqi-server");
    }

    #[test]
    fn test_shutdown_event_accepts_inference_stats() {
        let logger = StructuredLogger::new("aqi-server");
        let stats = InferenceStats {
            total_inferences: 12,
            slow_inferences: 1,
        };
        logger.log_shutdown("SIGINT received", &stats);
    }
}
