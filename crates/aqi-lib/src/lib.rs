//! Air quality index prediction library
//!
//! This crate provides the core functionality for:
//! - Pollutant readings and input validation
//! - Loading the trained scaler and regression model
//! - AQI prediction and category classification
//! - Health checks and observability

pub mod artifacts;
pub mod classifier;
pub mod error;
pub mod health;
pub mod models;
pub mod observability;
pub mod predictor;
pub mod presentation;

pub use artifacts::{ArtifactConfig, ArtifactLoader, Artifacts, FeatureScaler, Regressor};
pub use classifier::{classify, AqiCategory};
pub use error::{AqiError, ArtifactLoadError, InputError, PredictionError, TransformError};
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::*;
pub use observability::{AqiMetrics, StructuredLogger};
pub use predictor::AqiPredictor;
pub use presentation::{evaluate, Evaluation, FailureStage, PredictionOutcome};
