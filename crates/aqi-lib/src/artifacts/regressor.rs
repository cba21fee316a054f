//! Regression models: linear coefficients exported as JSON, or an ONNX graph run with tract

use super::Regressor;
use crate::error::PredictionError;
use crate::models::NUM_FEATURES;
use anyhow::{Context, Result};
use serde::Deserialize;
use tract_onnx::prelude::*;

type TractModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

fn check_shape(features: &[f64]) -> Result<(), PredictionError> {
    if features.len() != NUM_FEATURES {
        return Err(PredictionError::Shape {
            expected: NUM_FEATURES,
            actual: features.len(),
        });
    }
    Ok(())
}

/// On-disk model description for JSON exports, tagged by `kind`
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ModelArtifact {
    Linear { coefficients: Vec<f64>, intercept: f64 },
}

/// `y = coefficients · x + intercept`
#[derive(Debug, Clone)]
pub struct LinearRegressor {
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearRegressor {
    pub fn new(coefficients: [f64; NUM_FEATURES], intercept: f64) -> Self {
        Self {
            coefficients: coefficients.to_vec(),
            intercept,
        }
    }

    /// Parse a JSON export and verify it fits the feature layout
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let ModelArtifact::Linear {
            coefficients,
            intercept,
        } = serde_json::from_slice(bytes).context("Failed to parse linear model")?;
        let model = LinearRegressor {
            coefficients,
            intercept,
        };

        if model.coefficients.len() != NUM_FEATURES {
            anyhow::bail!(
                "Linear model has {} coefficients, expected {}",
                model.coefficients.len(),
                NUM_FEATURES
            );
        }
        if !model.intercept.is_finite() || model.coefficients.iter().any(|c| !c.is_finite()) {
            anyhow::bail!("Linear model contains non-finite parameters");
        }
        Ok(model)
    }
}

impl Regressor for LinearRegressor {
    fn predict(&self, features: &[f64]) -> Result<f64, PredictionError> {
        check_shape(features)?;
        let dot: f64 = self
            .coefficients
            .iter()
            .zip(features)
            .map(|(c, x)| c * x)
            .sum();
        Ok(dot + self.intercept)
    }

    fn kind(&self) -> &'static str {
        "linear"
    }
}

/// ONNX regressor (e.g. a scikit-learn ensemble exported with skl2onnx)
pub struct OnnxRegressor {
    model: TractModel,
}

impl OnnxRegressor {
    /// Load and optimize an ONNX model from bytes
    pub fn from_bytes(model_bytes: &[u8]) -> Result<Self> {
        let model = tract_onnx::onnx()
            .model_for_read(&mut std::io::Cursor::new(model_bytes))
            .context("Failed to parse ONNX model")?
            .with_input_fact(0, f32::fact([1, NUM_FEATURES]).into())
            .context("Failed to set input shape")?
            .into_optimized()
            .context("Failed to optimize model")?
            .into_runnable()
            .context("Failed to create runnable model")?;
        Ok(Self { model })
    }

    fn features_to_tensor(features: &[f64]) -> Result<Tensor, PredictionError> {
        let data: Vec<f32> = features.iter().map(|v| *v as f32).collect();
        tract_ndarray::Array2::from_shape_vec((1, NUM_FEATURES), data)
            .map(Tensor::from)
            .map_err(|e| PredictionError::Inference(e.to_string()))
    }
}

impl Regressor for OnnxRegressor {
    fn predict(&self, features: &[f64]) -> Result<f64, PredictionError> {
        check_shape(features)?;
        let input = Self::features_to_tensor(features)?;

        let result = self
            .model
            .run(tvec!(input.into()))
            .map_err(|e| PredictionError::Inference(e.to_string()))?;
        let output = result.first().ok_or(PredictionError::EmptyOutput)?;

        let view = output
            .to_array_view::<f32>()
            .map_err(|e| PredictionError::Inference(e.to_string()))?;
        let value = view.iter().next().copied().ok_or(PredictionError::EmptyOutput)?;
        Ok(value as f64)
    }

    fn kind(&self) -> &'static str {
        "onnx"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_predict() {
        let model = LinearRegressor::new([1.0, 2.0, 0.0, 0.0, 0.0, -1.0], 10.0);
        let y = model.predict(&[1.0, 1.0, 5.0, 5.0, 5.0, 3.0]).unwrap();
        assert_eq!(y, 10.0);
    }

    #[test]
    fn test_linear_wrong_shape() {
        let model = LinearRegressor::new([1.0; 6], 0.0);
        assert!(matches!(
            model.predict(&[1.0; 7]),
            Err(PredictionError::Shape { expected: 6, actual: 7 })
        ));
    }

    #[test]
    fn test_linear_from_json() {
        let model = LinearRegressor::from_json(
            br#"{"kind":"linear","coefficients":[1,1,1,1,1,1],"intercept":2.5}"#,
        )
        .unwrap();
        assert_eq!(model.predict(&[0.0; 6]).unwrap(), 2.5);
    }

    #[test]
    fn test_linear_from_json_rejects_bad_width() {
        let err = LinearRegressor::from_json(
            br#"{"kind":"linear","coefficients":[1,1],"intercept":0}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("expected 6"));
    }

    #[test]
    fn test_linear_from_json_rejects_other_kind() {
        assert!(LinearRegressor::from_json(
            br#"{"kind":"random_forest","coefficients":[1,1,1,1,1,1],"intercept":0}"#
        )
        .is_err());
    }

    #[test]
    fn test_onnx_rejects_garbage() {
        assert!(OnnxRegressor::from_bytes(b"definitely not protobuf").is_err());
    }
}
