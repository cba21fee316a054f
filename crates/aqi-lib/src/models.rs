//! Core data models for the AQI predictor

use crate::error::InputError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of pollutant features the scaler and model were fit on
pub const NUM_FEATURES: usize = 6;

/// Feature column names, in the order the artifacts expect them
pub const FEATURE_NAMES: [&str; NUM_FEATURES] = ["pm25", "pm10", "no2", "so2", "co", "o3"];

/// The six pollutants collected from the user, in feature order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pollutant {
    Pm25,
    Pm10,
    No2,
    So2,
    Co,
    O3,
}

impl Pollutant {
    /// All pollutants in feature-vector order
    pub const ALL: [Pollutant; NUM_FEATURES] = [
        Pollutant::Pm25,
        Pollutant::Pm10,
        Pollutant::No2,
        Pollutant::So2,
        Pollutant::Co,
        Pollutant::O3,
    ];

    /// Wire and form field name
    pub fn key(&self) -> &'static str {
        FEATURE_NAMES[self.index()]
    }

    /// Position of this pollutant in the feature vector
    pub fn index(&self) -> usize {
        match self {
            Pollutant::Pm25 => 0,
            Pollutant::Pm10 => 1,
            Pollutant::No2 => 2,
            Pollutant::So2 => 3,
            Pollutant::Co => 4,
            Pollutant::O3 => 5,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Pollutant::Pm25 => "PM2.5",
            Pollutant::Pm10 => "PM10",
            Pollutant::No2 => "NO2",
            Pollutant::So2 => "SO2",
            Pollutant::Co => "CO",
            Pollutant::O3 => "O3",
        }
    }

    /// Concentration unit (CO is reported in mg/m³, the rest in µg/m³)
    pub fn unit(&self) -> &'static str {
        match self {
            Pollutant::Co => "mg/m³",
            _ => "µg/m³",
        }
    }

    /// Input label, e.g. "PM2.5 (µg/m³)"
    pub fn label(&self) -> String {
        format!("{} ({})", self.name(), self.unit())
    }

    /// Advisory input step. Not a correctness constraint.
    pub fn step(&self) -> f64 {
        match self {
            Pollutant::Co => 0.01,
            _ => 0.1,
        }
    }

    pub fn min_value(&self) -> f64 {
        0.0
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One set of pollutant concentrations as entered by the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PollutantReading {
    #[serde(default)]
    pub pm25: f64,
    #[serde(default)]
    pub pm10: f64,
    #[serde(default)]
    pub no2: f64,
    #[serde(default)]
    pub so2: f64,
    #[serde(default)]
    pub co: f64,
    #[serde(default)]
    pub o3: f64,
}

impl PollutantReading {
    pub fn new(pm25: f64, pm10: f64, no2: f64, so2: f64, co: f64, o3: f64) -> Self {
        Self {
            pm25,
            pm10,
            no2,
            so2,
            co,
            o3,
        }
    }

    pub fn get(&self, pollutant: Pollutant) -> f64 {
        match pollutant {
            Pollutant::Pm25 => self.pm25,
            Pollutant::Pm10 => self.pm10,
            Pollutant::No2 => self.no2,
            Pollutant::So2 => self.so2,
            Pollutant::Co => self.co,
            Pollutant::O3 => self.o3,
        }
    }

    /// Edit a single field; other fields are never touched
    pub fn set(&mut self, pollutant: Pollutant, value: f64) {
        match pollutant {
            Pollutant::Pm25 => self.pm25 = value,
            Pollutant::Pm10 => self.pm10 = value,
            Pollutant::No2 => self.no2 = value,
            Pollutant::So2 => self.so2 = value,
            Pollutant::Co => self.co = value,
            Pollutant::O3 => self.o3 = value,
        }
    }

    /// Field-level validation: every value finite and non-negative.
    ///
    /// There are deliberately no cross-field rules (PM2.5 may exceed PM10).
    pub fn validate(&self) -> Result<(), InputError> {
        for pollutant in Pollutant::ALL {
            validate_value(pollutant, self.get(pollutant))?;
        }
        Ok(())
    }
}

/// Validate a single field value
pub fn validate_value(pollutant: Pollutant, value: f64) -> Result<(), InputError> {
    if !value.is_finite() {
        return Err(InputError::NotFinite { field: pollutant });
    }
    if value < pollutant.min_value() {
        return Err(InputError::Negative {
            field: pollutant,
            value,
        });
    }
    Ok(())
}

/// Fixed-order feature vector: [pm25, pm10, no2, so2, co, o3]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector(pub [f64; NUM_FEATURES]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl From<&PollutantReading> for FeatureVector {
    fn from(reading: &PollutantReading) -> Self {
        FeatureVector(Pollutant::ALL.map(|p| reading.get(p)))
    }
}

/// Predicted AQI, already rounded to 2 decimal places
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AqiScore(f64);

impl AqiScore {
    /// Round a raw model output to an AQI score
    pub fn from_raw(raw: f64) -> Self {
        AqiScore(crate::predictor::round_half_away_from_zero(raw, 2))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for AqiScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
