//! Feature scalers exported from the training pipeline as JSON

use super::FeatureScaler;
use crate::error::TransformError;
use crate::models::{FEATURE_NAMES, NUM_FEATURES};
use serde::Deserialize;

/// On-disk scaler description, tagged by `kind`
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerArtifact {
    /// `z = (x - mean) / scale`
    Standard {
        mean: Vec<f64>,
        scale: Vec<f64>,
        #[serde(default)]
        feature_names: Option<Vec<String>>,
    },
    /// `z = x * scale + min`
    MinMax {
        min: Vec<f64>,
        scale: Vec<f64>,
        #[serde(default)]
        feature_names: Option<Vec<String>>,
    },
}

impl ScalerArtifact {
    /// Check the artifact against the fixed feature layout and build a scaler
    pub fn into_scaler(self) -> Result<Box<dyn FeatureScaler>, String> {
        match self {
            ScalerArtifact::Standard {
                mean,
                scale,
                feature_names,
            } => {
                check_feature_names(feature_names.as_deref())?;
                let mean = fixed_width("mean", mean)?;
                let scale = fixed_width("scale", scale)?;
                if let Some(idx) = scale.iter().position(|s| *s == 0.0) {
                    return Err(format!("scale for {} is zero", FEATURE_NAMES[idx]));
                }
                Ok(Box::new(StandardScaler { mean, scale }))
            }
            ScalerArtifact::MinMax {
                min,
                scale,
                feature_names,
            } => {
                check_feature_names(feature_names.as_deref())?;
                let min = fixed_width("min", min)?;
                let scale = fixed_width("scale", scale)?;
                Ok(Box::new(MinMaxScaler { min, scale }))
            }
        }
    }
}

fn fixed_width(name: &str, values: Vec<f64>) -> Result<[f64; NUM_FEATURES], String> {
    if let Some(idx) = values.iter().position(|v| !v.is_finite()) {
        return Err(format!("{}[{}] is not finite", name, idx));
    }
    let len = values.len();
    values
        .try_into()
        .map_err(|_| format!("{} has {} values, expected {}", name, len, NUM_FEATURES))
}

fn check_feature_names(names: Option<&[String]>) -> Result<(), String> {
    match names {
        None => Ok(()),
        Some(names) if names.iter().map(String::as_str).eq(FEATURE_NAMES) => Ok(()),
        Some(names) => Err(format!(
            "feature order {:?} does not match {:?}",
            names, FEATURE_NAMES
        )),
    }
}

fn check_shape(features: &[f64]) -> Result<(), TransformError> {
    if features.len() != NUM_FEATURES {
        return Err(TransformError::Shape {
            expected: NUM_FEATURES,
            actual: features.len(),
        });
    }
    Ok(())
}

fn check_finite(scaled: Vec<f64>) -> Result<Vec<f64>, TransformError> {
    match scaled.iter().position(|v| !v.is_finite()) {
        Some(idx) => Err(TransformError::NonFinite {
            feature: FEATURE_NAMES[idx],
        }),
        None => Ok(scaled),
    }
}

/// Standardization with fitted per-feature mean and scale
#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: [f64; NUM_FEATURES],
    scale: [f64; NUM_FEATURES],
}

impl StandardScaler {
    pub fn new(mean: [f64; NUM_FEATURES], scale: [f64; NUM_FEATURES]) -> Self {
        Self { mean, scale }
    }
}

impl FeatureScaler for StandardScaler {
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, TransformError> {
        check_shape(features)?;
        let scaled = features
            .iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect();
        check_finite(scaled)
    }

    fn kind(&self) -> &'static str {
        "standard"
    }
}

/// Min-max scaling with fitted per-feature offset and scale
#[derive(Debug, Clone)]
pub struct MinMaxScaler {
    min: [f64; NUM_FEATURES],
    scale: [f64; NUM_FEATURES],
}

impl MinMaxScaler {
    pub fn new(min: [f64; NUM_FEATURES], scale: [f64; NUM_FEATURES]) -> Self {
        Self { min, scale }
    }
}

impl FeatureScaler for MinMaxScaler {
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, TransformError> {
        check_shape(features)?;
        let scaled = features
            .iter()
            .zip(self.min.iter().zip(self.scale.iter()))
            .map(|(x, (min, scale))| x * scale + min)
            .collect();
        check_finite(scaled)
    }

    fn kind(&self) -> &'static str {
        "min_max"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<Box<dyn FeatureScaler>, String> {
        serde_json::from_str::<ScalerArtifact>(json)
            .map_err(|e| e.to_string())?
            .into_scaler()
    }

    #[test]
    fn test_standard_transform() {
        let scaler = StandardScaler::new([10.0; 6], [2.0; 6]);
        let scaled = scaler.transform(&[12.0, 10.0, 8.0, 14.0, 10.0, 11.0]).unwrap();
        assert_eq!(scaled, vec![1.0, 0.0, -1.0, 2.0, 0.0, 0.5]);
    }

    #[test]
    fn test_min_max_transform() {
        let scaler = MinMaxScaler::new([-0.5; 6], [0.01; 6]);
        let scaled = scaler.transform(&[50.0, 100.0, 0.0, 50.0, 100.0, 0.0]).unwrap();
        for (actual, expected) in scaled.iter().zip([0.0, 0.5, -0.5, 0.0, 0.5, -0.5]) {
            assert!((actual - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_wrong_shape_rejected() {
        let scaler = StandardScaler::new([0.0; 6], [1.0; 6]);
        match scaler.transform(&[1.0, 2.0, 3.0]) {
            Err(TransformError::Shape { expected, actual }) => {
                assert_eq!(expected, 6);
                assert_eq!(actual, 3);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_overflow_reported_as_non_finite() {
        let scaler = MinMaxScaler::new([0.0; 6], [f64::MAX; 6]);
        let result = scaler.transform(&[0.0, 10.0, 0.0, 0.0, 0.0, 0.0]);
        assert!(matches!(
            result,
            Err(TransformError::NonFinite { feature: "pm10" })
        ));
    }

    #[test]
    fn test_parse_standard_artifact() {
        let scaler = parse(
            r#"{"kind":"standard","mean":[0,0,0,0,0,0],"scale":[1,1,1,1,1,1],
                "feature_names":["pm25","pm10","no2","so2","co","o3"]}"#,
        )
        .unwrap();
        assert_eq!(scaler.kind(), "standard");
    }

    #[test]
    fn test_parse_rejects_wrong_width() {
        let err = parse(r#"{"kind":"min_max","min":[0,0,0],"scale":[1,1,1]}"#)
            .err()
            .unwrap();
        assert!(err.contains("expected 6"), "{}", err);
    }

    #[test]
    fn test_parse_rejects_zero_scale() {
        let err = parse(r#"{"kind":"standard","mean":[0,0,0,0,0,0],"scale":[1,1,0,1,1,1]}"#)
            .err()
            .unwrap();
        assert!(err.contains("no2"), "{}", err);
    }

    #[test]
    fn test_parse_rejects_reordered_features() {
        let err = parse(
            r#"{"kind":"standard","mean":[0,0,0,0,0,0],"scale":[1,1,1,1,1,1],
                "feature_names":["pm10","pm25","no2","so2","co","o3"]}"#,
        )
        .err()
        .unwrap();
        assert!(err.contains("feature order"), "{}", err);
    }

    #[test]
    fn test_parse_rejects_unknown_kind() {
        assert!(parse(r#"{"kind":"robust","center":[0,0,0,0,0,0]}"#).is_err());
    }
}
