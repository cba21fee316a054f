//! Error taxonomy for artifact loading, prediction and input validation

use crate::models::Pollutant;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal startup error: the scaler or model could not be loaded
#[derive(Debug, Error)]
pub enum ArtifactLoadError {
    #[error("{role} artifact not found at {path}")]
    Missing { role: &'static str, path: PathBuf },

    #[error("failed to read {role} artifact {path}: {source}")]
    Unreadable {
        role: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{role} artifact {path} is {size} bytes, exceeding the {limit} byte limit")]
    TooLarge {
        role: &'static str,
        path: PathBuf,
        size: u64,
        limit: u64,
    },

    #[error("{role} artifact {path} checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch {
        role: &'static str,
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("unsupported {role} artifact format for {path} (expected .json or .onnx)")]
    UnsupportedFormat { role: &'static str, path: PathBuf },

    #[error("{role} artifact {path} is corrupt: {reason}")]
    Corrupt {
        role: &'static str,
        path: PathBuf,
        reason: String,
    },
}

/// The scaler rejected a feature vector
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("scaler expects {expected} features, got {actual}")]
    Shape { expected: usize, actual: usize },

    #[error("scaler produced a non-finite value for feature {feature}")]
    NonFinite { feature: &'static str },
}

/// The model failed to produce a usable AQI value
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("model expects {expected} features, got {actual}")]
    Shape { expected: usize, actual: usize },

    #[error("model produced no output")]
    EmptyOutput,

    #[error("model produced a non-finite value ({0})")]
    NonFinite(f64),

    #[error("model inference failed: {0}")]
    Inference(String),
}

/// Per-prediction failure at the artifact boundary. Recoverable: report and allow retry.
#[derive(Debug, Error)]
pub enum AqiError {
    #[error("feature scaling failed: {0}")]
    Transform(#[from] TransformError),

    #[error("prediction failed: {0}")]
    Prediction(#[from] PredictionError),
}

impl AqiError {
    /// Pipeline stage that failed, used as a metric label
    pub fn stage(&self) -> &'static str {
        match self {
            AqiError::Transform(_) => "transform",
            AqiError::Prediction(_) => "predict",
        }
    }
}

/// Field-level input validation failure
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("{field} must be at least 0.0, got {value}")]
    Negative { field: Pollutant, value: f64 },

    #[error("{field} must be a finite number")]
    NotFinite { field: Pollutant },

    #[error("{field} is not a number: {raw:?}")]
    Unparseable { field: Pollutant, raw: String },
}

impl InputError {
    pub fn field(&self) -> Pollutant {
        match self {
            InputError::Negative { field, .. }
            | InputError::NotFinite { field }
            | InputError::Unparseable { field, .. } => *field,
        }
    }
}
