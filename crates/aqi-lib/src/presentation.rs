//! One user-triggered evaluation: validate, predict, classify
//!
//! Stateless: the result depends only on the reading passed in and the
//! predictor's immutable artifacts. Renderers (HTML, JSON, terminal) consume
//! the returned [`Evaluation`].

use crate::classifier::{classify, AqiCategory};
use crate::error::{AqiError, InputError};
use crate::models::{AqiScore, PollutantReading};
use crate::predictor::AqiPredictor;
use serde::Serialize;

/// A successful prediction, ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionOutcome {
    pub reading: PollutantReading,
    pub aqi: AqiScore,
    pub category: AqiCategory,
    pub category_label: &'static str,
    pub color: &'static str,
}

impl PredictionOutcome {
    pub fn new(reading: PollutantReading, aqi: AqiScore) -> Self {
        let category = classify(aqi.value());
        Self {
            reading,
            aqi,
            category,
            category_label: category.label(),
            color: category.color(),
        }
    }

    /// "Predicted AQI: 46.42"
    pub fn headline(&self) -> String {
        format!("Predicted AQI: {}", self.aqi)
    }

    /// "Category: Good (Green)"
    pub fn category_line(&self) -> String {
        format!("Category: {}", self.category)
    }
}

/// Where an evaluation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    /// A field was rejected before prediction
    Input,
    /// The scaler or model rejected the features
    Artifact,
}

#[derive(Debug)]
pub enum Evaluation {
    Success(PredictionOutcome),
    InvalidInput(InputError),
    Failed(AqiError),
}

impl Evaluation {
    pub fn outcome(&self) -> Option<&PredictionOutcome> {
        match self {
            Evaluation::Success(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn failure_stage(&self) -> Option<FailureStage> {
        match self {
            Evaluation::Success(_) => None,
            Evaluation::InvalidInput(_) => Some(FailureStage::Input),
            Evaluation::Failed(_) => Some(FailureStage::Artifact),
        }
    }

    /// User-facing error message, if the evaluation failed
    pub fn error_message(&self) -> Option<String> {
        match self {
            Evaluation::Success(_) => None,
            Evaluation::InvalidInput(e) => Some(format!("Invalid input: {}", e)),
            Evaluation::Failed(e) => Some(format!(
                "Could not predict AQI: {}. Your inputs were kept; please try again.",
                e
            )),
        }
    }
}

/// Validate the reading, then predict and classify it
pub fn evaluate(predictor: &AqiPredictor, reading: &PollutantReading) -> Evaluation {
    if let Err(e) = reading.validate() {
        return Evaluation::InvalidInput(e);
    }
    match predictor.predict(reading) {
        Ok(aqi) => Evaluation::Success(PredictionOutcome::new(*reading, aqi)),
        Err(e) => Evaluation::Failed(e),
    }
}
