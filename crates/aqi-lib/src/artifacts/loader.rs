//! Artifact loader
//!
//! Reads the scaler and model once at startup, validating size and
//! (optionally) SHA256 checksum before deserializing. Any failure is fatal.

use super::{Artifacts, FeatureScaler, LinearRegressor, OnnxRegressor, Regressor, ScalerArtifact};
use crate::error::ArtifactLoadError;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Default upper bound on artifact size (64MB)
pub const DEFAULT_MAX_ARTIFACT_BYTES: u64 = 64 * 1024 * 1024;

const SCALER: &str = "scaler";
const MODEL: &str = "model";

enum ModelFormat {
    Onnx,
    Json,
}

/// Where to find the artifacts and how to verify them
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactConfig {
    /// Path to the scaler JSON export
    #[serde(default = "default_scaler_path")]
    pub scaler_path: PathBuf,

    /// Path to the model (.onnx or .json)
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    /// Expected SHA256 of the scaler file (hex)
    #[serde(default)]
    pub scaler_sha256: Option<String>,

    /// Expected SHA256 of the model file (hex)
    #[serde(default)]
    pub model_sha256: Option<String>,

    #[serde(default = "default_max_artifact_bytes")]
    pub max_artifact_bytes: u64,
}

fn default_scaler_path() -> PathBuf {
    PathBuf::from("artifacts/scaler.json")
}

fn default_model_path() -> PathBuf {
    PathBuf::from("artifacts/air_quality_model.json")
}

fn default_max_artifact_bytes() -> u64 {
    DEFAULT_MAX_ARTIFACT_BYTES
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            scaler_path: default_scaler_path(),
            model_path: default_model_path(),
            scaler_sha256: None,
            model_sha256: None,
            max_artifact_bytes: default_max_artifact_bytes(),
        }
    }
}

impl ArtifactConfig {
    pub fn new(scaler_path: impl Into<PathBuf>, model_path: impl Into<PathBuf>) -> Self {
        Self {
            scaler_path: scaler_path.into(),
            model_path: model_path.into(),
            ..Default::default()
        }
    }
}

/// Loads both artifacts; there is no retry and no partial result
pub struct ArtifactLoader {
    config: ArtifactConfig,
}

impl ArtifactLoader {
    pub fn new(config: ArtifactConfig) -> Self {
        Self { config }
    }

    /// Load the scaler and the model. Both must succeed.
    pub fn load(&self) -> Result<Artifacts, ArtifactLoadError> {
        let scaler = self.load_scaler()?;
        let model = self.load_model()?;

        info!(
            scaler = scaler.kind(),
            model = model.kind(),
            "Artifacts loaded successfully"
        );

        Ok(Artifacts::new(Arc::from(scaler), Arc::from(model)))
    }

    /// Load the feature scaler from its JSON export
    pub fn load_scaler(&self) -> Result<Box<dyn FeatureScaler>, ArtifactLoadError> {
        let path = &self.config.scaler_path;
        let bytes = self.read_verified(
            SCALER,
            path,
            self.config.scaler_sha256.as_deref(),
        )?;

        let artifact: ScalerArtifact =
            serde_json::from_slice(&bytes).map_err(|e| corrupt(SCALER, path, e.to_string()))?;
        artifact
            .into_scaler()
            .map_err(|reason| corrupt(SCALER, path, reason))
    }

    /// Load the regression model; the format is chosen by file extension
    pub fn load_model(&self) -> Result<Box<dyn Regressor>, ArtifactLoadError> {
        let path = &self.config.model_path;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let format = match extension.as_deref() {
            Some("onnx") => ModelFormat::Onnx,
            Some("json") => ModelFormat::Json,
            _ => {
                return Err(ArtifactLoadError::UnsupportedFormat {
                    role: MODEL,
                    path: path.clone(),
                })
            }
        };

        let bytes = self.read_verified(MODEL, path, self.config.model_sha256.as_deref())?;
        let model: Box<dyn Regressor> = match format {
            ModelFormat::Onnx => Box::new(
                OnnxRegressor::from_bytes(&bytes)
                    .map_err(|e| corrupt(MODEL, path, format!("{:#}", e)))?,
            ),
            ModelFormat::Json => Box::new(
                LinearRegressor::from_json(&bytes)
                    .map_err(|e| corrupt(MODEL, path, format!("{:#}", e)))?,
            ),
        };
        Ok(model)
    }

    fn read_verified(
        &self,
        role: &'static str,
        path: &Path,
        expected_checksum: Option<&str>,
    ) -> Result<Vec<u8>, ArtifactLoadError> {
        info!(role = role, path = %path.display(), "Loading artifact");

        let metadata = fs::metadata(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ArtifactLoadError::Missing {
                role,
                path: path.to_path_buf(),
            },
            _ => ArtifactLoadError::Unreadable {
                role,
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        if metadata.len() > self.config.max_artifact_bytes {
            return Err(ArtifactLoadError::TooLarge {
                role,
                path: path.to_path_buf(),
                size: metadata.len(),
                limit: self.config.max_artifact_bytes,
            });
        }

        let bytes = fs::read(path).map_err(|e| ArtifactLoadError::Unreadable {
            role,
            path: path.to_path_buf(),
            source: e,
        })?;

        let checksum = compute_checksum(&bytes);
        if let Some(expected) = expected_checksum {
            if !checksum.eq_ignore_ascii_case(expected.trim()) {
                return Err(ArtifactLoadError::ChecksumMismatch {
                    role,
                    path: path.to_path_buf(),
                    expected: expected.to_string(),
                    actual: checksum,
                });
            }
        }

        debug!(role = role, size = bytes.len(), checksum = %checksum, "Artifact read");
        Ok(bytes)
    }
}

fn corrupt(role: &'static str, path: &Path, reason: String) -> ArtifactLoadError {
    ArtifactLoadError::Corrupt {
        role,
        path: path.to_path_buf(),
        reason,
    }
}

/// Compute SHA256 checksum of data
pub fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SCALER_JSON: &str = r#"{"kind":"standard","mean":[0,0,0,0,0,0],"scale":[1,1,1,1,1,1]}"#;
    const MODEL_JSON: &str = r#"{"kind":"linear","coefficients":[1,1,1,1,1,1],"intercept":0}"#;

    fn write_pair(dir: &TempDir, scaler: &str, model_name: &str, model: &[u8]) -> ArtifactConfig {
        let scaler_path = dir.path().join("scaler.json");
        let model_path = dir.path().join(model_name);
        fs::write(&scaler_path, scaler).unwrap();
        fs::write(&model_path, model).unwrap();
        ArtifactConfig::new(scaler_path, model_path)
    }

    #[test]
    fn test_compute_checksum() {
        let checksum = compute_checksum(b"scaler bytes");
        assert_eq!(checksum.len(), 64); // SHA256 hex is 64 chars
        assert_eq!(checksum, compute_checksum(b"scaler bytes"));
        assert_ne!(checksum, compute_checksum(b"model bytes"));
    }

    #[test]
    fn test_load_valid_pair() {
        let dir = TempDir::new().unwrap();
        let config = write_pair(&dir, SCALER_JSON, "model.json", MODEL_JSON.as_bytes());

        let artifacts = ArtifactLoader::new(config).load().unwrap();
        assert_eq!(artifacts.scaler.kind(), "standard");
        assert_eq!(artifacts.model.kind(), "linear");
    }

    #[test]
    fn test_missing_model_fails() {
        let dir = TempDir::new().unwrap();
        let mut config = write_pair(&dir, SCALER_JSON, "model.json", MODEL_JSON.as_bytes());
        config.model_path = dir.path().join("absent.json");

        match ArtifactLoader::new(config).load() {
            Err(ArtifactLoadError::Missing { role, .. }) => assert_eq!(role, "model"),
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_missing_scaler_fails() {
        let dir = TempDir::new().unwrap();
        let config = ArtifactConfig::new(dir.path().join("nope.json"), dir.path().join("m.json"));

        assert!(matches!(
            ArtifactLoader::new(config).load(),
            Err(ArtifactLoadError::Missing { role: "scaler", .. })
        ));
    }

    #[test]
    fn test_corrupt_model_fails() {
        let dir = TempDir::new().unwrap();
        let config = write_pair(&dir, SCALER_JSON, "model.json", b"{ not json");

        assert!(matches!(
            ArtifactLoader::new(config).load(),
            Err(ArtifactLoadError::Corrupt { role: "model", .. })
        ));
    }

    #[test]
    fn test_corrupt_onnx_model_fails() {
        let dir = TempDir::new().unwrap();
        let config = write_pair(&dir, SCALER_JSON, "model.onnx", b"\x00\x01garbage");

        assert!(matches!(
            ArtifactLoader::new(config).load(),
            Err(ArtifactLoadError::Corrupt { role: "model", .. })
        ));
    }

    #[test]
    fn test_unsupported_extension_fails() {
        let dir = TempDir::new().unwrap();
        let config = write_pair(&dir, SCALER_JSON, "model.pkl", MODEL_JSON.as_bytes());

        assert!(matches!(
            ArtifactLoader::new(config).load(),
            Err(ArtifactLoadError::UnsupportedFormat { role: "model", .. })
        ));
    }

    #[test]
    fn test_checksum_verified() {
        let dir = TempDir::new().unwrap();
        let mut config = write_pair(&dir, SCALER_JSON, "model.json", MODEL_JSON.as_bytes());

        config.model_sha256 = Some(compute_checksum(MODEL_JSON.as_bytes()).to_uppercase());
        assert!(ArtifactLoader::new(config.clone()).load().is_ok());

        config.scaler_sha256 = Some("00".repeat(32));
        assert!(matches!(
            ArtifactLoader::new(config).load(),
            Err(ArtifactLoadError::ChecksumMismatch { role: "scaler", .. })
        ));
    }

    #[test]
    fn test_size_limit_enforced() {
        let dir = TempDir::new().unwrap();
        let mut config = write_pair(&dir, SCALER_JSON, "model.json", MODEL_JSON.as_bytes());
        config.max_artifact_bytes = 16;

        assert!(matches!(
            ArtifactLoader::new(config).load(),
            Err(ArtifactLoadError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_default_config() {
        let config = ArtifactConfig::default();
        assert_eq!(config.scaler_path, PathBuf::from("artifacts/scaler.json"));
        assert_eq!(config.max_artifact_bytes, DEFAULT_MAX_ARTIFACT_BYTES);
        assert!(config.model_sha256.is_none());
    }
}
