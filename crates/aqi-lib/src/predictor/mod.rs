//! AQI prediction engine

mod inference;
mod output;

pub use inference::{AqiPredictor, InferenceStats};
pub use output::round_half_away_from_zero;
