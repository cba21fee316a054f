//! Rounding of raw model outputs
//!
//! Convention: round half away from zero, applied to the shortest decimal
//! representation of the value. A raw output of 72.345 is a decimal tie and
//! becomes 72.35, even though the nearest binary double sits slightly below it.

/// Above this every double is an integer, so there is nothing left to round
const EXACT_INTEGER_LIMIT: f64 = 4_503_599_627_370_496.0; // 2^52

/// Round `raw` to `decimals` places, half away from zero.
///
/// Non-finite values are returned unchanged, as are values too large to
/// carry any digits below `decimals`.
pub fn round_half_away_from_zero(raw: f64, decimals: i32) -> f64 {
    if !raw.is_finite() {
        return raw;
    }
    if raw < 0.0 {
        return -round_half_away_from_zero(-raw, decimals);
    }

    let factor = 10f64.powi(decimals);
    let scaled = raw * factor;
    if !scaled.is_finite() || scaled >= EXACT_INTEGER_LIMIT {
        return raw;
    }
    let lower = scaled.floor();
    // The double nearest to the decimal midpoint between lower and lower + 1.
    // Comparing against it decides ties exactly, independent of the error in
    // `raw * factor`.
    let midpoint = (lower + 0.5) / factor;
    let steps = if raw >= midpoint { lower + 1.0 } else { lower };
    steps / factor
}
