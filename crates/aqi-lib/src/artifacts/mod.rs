//! Pre-fitted artifacts: the feature scaler and the regression model
//!
//! Both are loaded once at startup by [`ArtifactLoader`] and shared
//! read-only for the lifetime of the process.

mod loader;
mod regressor;
mod scaler;

pub use loader::{compute_checksum, ArtifactConfig, ArtifactLoader, DEFAULT_MAX_ARTIFACT_BYTES};
pub use regressor::{LinearRegressor, OnnxRegressor};
pub use scaler::{MinMaxScaler, ScalerArtifact, StandardScaler};

use crate::error::{PredictionError, TransformError};
use std::sync::Arc;

/// Capability: map raw features onto the distribution the model was trained on
pub trait FeatureScaler: Send + Sync {
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, TransformError>;

    /// Short description for logs and metrics, e.g. "standard"
    fn kind(&self) -> &'static str;
}

/// Capability: map scaled features onto a raw AQI value
pub trait Regressor: Send + Sync {
    fn predict(&self, features: &[f64]) -> Result<f64, PredictionError>;

    fn kind(&self) -> &'static str;
}

/// Immutable handles to the loaded scaler and model
#[derive(Clone)]
pub struct Artifacts {
    pub scaler: Arc<dyn FeatureScaler>,
    pub model: Arc<dyn Regressor>,
}

impl Artifacts {
    pub fn new(scaler: Arc<dyn FeatureScaler>, model: Arc<dyn Regressor>) -> Self {
        Self { scaler, model }
    }
}

impl std::fmt::Debug for Artifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Artifacts")
            .field("scaler", &self.scaler.kind())
            .field("model", &self.model.kind())
            .finish()
    }
}
