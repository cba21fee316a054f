//! AQI severity classification
//!
//! Maps a score onto six contiguous bands. Each band's upper bound is
//! inclusive, so a score sitting exactly on a breakpoint belongs to the
//! lower band. Everything at or below 50 (negative scores included) is Good.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper (inclusive) bounds of the first five bands; Hazardous is unbounded
pub const BREAKPOINTS: [f64; 5] = [50.0, 100.0, 150.0, 200.0, 300.0];

/// Severity category, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AqiCategory {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiCategory {
    pub const ALL: [AqiCategory; 6] = [
        AqiCategory::Good,
        AqiCategory::Moderate,
        AqiCategory::UnhealthyForSensitiveGroups,
        AqiCategory::Unhealthy,
        AqiCategory::VeryUnhealthy,
        AqiCategory::Hazardous,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::VeryUnhealthy => "Very Unhealthy",
            AqiCategory::Hazardous => "Hazardous",
        }
    }

    /// Conventional display colour for the band
    pub fn color(&self) -> &'static str {
        match self {
            AqiCategory::Good => "Green",
            AqiCategory::Moderate => "Yellow",
            AqiCategory::UnhealthyForSensitiveGroups => "Orange",
            AqiCategory::Unhealthy => "Red",
            AqiCategory::VeryUnhealthy => "Purple",
            AqiCategory::Hazardous => "Maroon",
        }
    }

    /// Stable identifier used on the wire and as a metric label
    pub fn key(&self) -> &'static str {
        match self {
            AqiCategory::Good => "good",
            AqiCategory::Moderate => "moderate",
            AqiCategory::UnhealthyForSensitiveGroups => "unhealthy_for_sensitive_groups",
            AqiCategory::Unhealthy => "unhealthy",
            AqiCategory::VeryUnhealthy => "very_unhealthy",
            AqiCategory::Hazardous => "hazardous",
        }
    }

    /// Band bounds as (exclusive lower, inclusive upper); `None` means unbounded
    pub fn range(&self) -> (Option<f64>, Option<f64>) {
        let idx = *self as usize;
        let lower = if idx == 0 { None } else { Some(BREAKPOINTS[idx - 1]) };
        let upper = BREAKPOINTS.get(idx).copied();
        (lower, upper)
    }
}

impl fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.color())
    }
}

/// Classify a score. Total over every `f64`; NaN fails each `<=` test and lands in Hazardous.
pub fn classify(score: f64) -> AqiCategory {
    if score <= BREAKPOINTS[0] {
        AqiCategory::Good
    } else if score <= BREAKPOINTS[1] {
        AqiCategory::Moderate
    } else if score <= BREAKPOINTS[2] {
        AqiCategory::UnhealthyForSensitiveGroups
    } else if score <= BREAKPOINTS[3] {
        AqiCategory::Unhealthy
    } else if score <= BREAKPOINTS[4] {
        AqiCategory::VeryUnhealthy
    } else {
        AqiCategory::Hazardous
    }
}
