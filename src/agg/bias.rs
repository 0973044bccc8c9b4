//! Directional bias axis.
//!
//! The signed energy compresses the mean score through a steep sigmoid
//! (`tanh((|avg|×3)^1.8)`) so strong adverse/supportive clusters register
//! without unbounded blow-up, then scales by `ln(count+1) × 3.2`. The result
//! is amplified by the day's magnitude (high-energy days show clearer
//! direction), normalized by the bias divisor, and scaled to ±K.

use crate::agg::scale::{finalize_axis, Scaled};
use crate::domain::{EngineConfig, ScoredRecord};

/// Raw signed bias energy for the day.
pub fn bias_energy(scored: &[ScoredRecord], config: &EngineConfig) -> f64 {
    let count = scored.len().max(1) as f64;
    let avg = scored.iter().map(|r| r.score).sum::<f64>() / count;
    if avg == 0.0 {
        return 0.0;
    }
    let cal = &config.calibration;
    let compressed = ((avg.abs() * cal.bias_inner_gain).powf(cal.bias_exponent)).tanh();
    avg.signum() * compressed * (count + 1.0).ln() * cal.bias_outer_gain
}

/// Amplify the signed energy by the day's published magnitude.
pub fn amplify_by_magnitude(energy: f64, magnitude: f64, config: &EngineConfig) -> f64 {
    if !(energy.is_finite() && magnitude.is_finite()) {
        return 0.0;
    }
    let cal = &config.calibration;
    energy * (cal.bias_amp_base + cal.bias_amp_slope * magnitude)
}

/// Normalize amplified bias and scale it to the symmetric public range.
///
/// The clamp happens once, at the scaled stage, so clamp provenance survives
/// into the transform trace.
pub fn normalize_bias(amplified: f64, config: &EngineConfig) -> Scaled {
    let ceiling = config.scale_ceiling;
    let normalized = if amplified.is_finite() {
        amplified / config.bias_divisor
    } else {
        0.0
    };
    finalize_axis(normalized * ceiling, -ceiling, ceiling)
}
