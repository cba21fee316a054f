//! AQI inference over the loaded artifacts
//!
//! reading → feature vector → scaler → model → rounded score. The artifacts
//! are injected at construction and only ever read.

use crate::artifacts::Artifacts;
use crate::error::{AqiError, PredictionError, TransformError};
use crate::models::{AqiScore, FeatureVector, PollutantReading, FEATURE_NAMES, NUM_FEATURES};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, warn};

/// Maximum inference latency before warning (5ms target)
const MAX_INFERENCE_MS: u128 = 5;

/// Predicts an AQI score from a pollutant reading
pub struct AqiPredictor {
    artifacts: Artifacts,
    inference_count: AtomicU64,
    slow_inference_count: AtomicU64,
}

impl AqiPredictor {
    pub fn new(artifacts: Artifacts) -> Self {
        Self {
            artifacts,
            inference_count: AtomicU64::new(0),
            slow_inference_count: AtomicU64::new(0),
        }
    }

    pub fn artifacts(&self) -> &Artifacts {
        &self.artifacts
    }

    /// Run the full pipeline for one reading
    pub fn predict(&self, reading: &PollutantReading) -> Result<AqiScore, AqiError> {
        let start = Instant::now();

        let features = FeatureVector::from(reading);
        let scaled = self.artifacts.scaler.transform(features.as_slice())?;
        if scaled.len() != NUM_FEATURES {
            return Err(TransformError::Shape {
                expected: NUM_FEATURES,
                actual: scaled.len(),
            }
            .into());
        }
        if let Some(idx) = scaled.iter().position(|v| !v.is_finite()) {
            return Err(TransformError::NonFinite {
                feature: FEATURE_NAMES[idx],
            }
            .into());
        }

        let raw = self.artifacts.model.predict(&scaled)?;
        if !raw.is_finite() {
            return Err(PredictionError::NonFinite(raw).into());
        }

        let elapsed = start.elapsed();
        self.inference_count.fetch_add(1, Ordering::Relaxed);

        if elapsed.as_millis() > MAX_INFERENCE_MS {
            self.slow_inference_count.fetch_add(1, Ordering::Relaxed);
            warn!(elapsed_ms = elapsed.as_millis(), "Inference exceeded {}ms target", MAX_INFERENCE_MS);
        } else {
            debug!(elapsed_us = elapsed.as_micros(), raw = raw, "Inference completed");
        }

        Ok(AqiScore::from_raw(raw))
    }

    /// Get inference statistics
    pub fn stats(&self) -> InferenceStats {
        InferenceStats {
            total_inferences: self.inference_count.load(Ordering::Relaxed),
            slow_inferences: self.slow_inference_count.load(Ordering::Relaxed),
        }
    }
}

/// Inference statistics
#[derive(Debug, Clone)]
pub struct InferenceStats {
    pub total_inferences: u64,
    pub slow_inferences: u64,
}
