//! Engine configuration and calibration constants.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Empirically tuned calibration constants, preserved exactly from the
/// reference calibration and grouped here so an alternate profile can be
/// shipped without touching pipeline code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Calibration {
    /// Profile label, recorded in the transform trace.
    pub version: String,
    /// Exponent applied to the mean absolute score (magnitude energy).
    pub magnitude_exponent: f64,
    /// Gain inside the bias sigmoid (`|avg| × gain`).
    pub bias_inner_gain: f64,
    /// Exponent inside the bias sigmoid.
    pub bias_exponent: f64,
    /// Gain outside the bias sigmoid.
    pub bias_outer_gain: f64,
    /// Base of the magnitude-driven bias amplification (`base + slope × magnitude`).
    pub bias_amp_base: f64,
    pub bias_amp_slope: f64,
    /// Numerator and reference gain of the rolling normalization
    /// (`numerator × raw / (reference × gain)`).
    pub reference_numerator: f64,
    pub reference_gain: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            version: "5.0".to_string(),
            magnitude_exponent: 1.3,
            bias_inner_gain: 3.0,
            bias_exponent: 1.8,
            bias_outer_gain: 3.2,
            bias_amp_base: 0.8,
            bias_amp_slope: 0.4,
            reference_numerator: 5.0,
            reference_gain: 1.6,
        }
    }
}

/// All tunable engine settings, with defaults matching the reference
/// calibration. Every threshold the pipeline consults lives here; the
/// pipeline itself holds no constants besides structural ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Public scale ceiling K: magnitude ∈ [0,K], bias ∈ [-K,K].
    pub scale_ceiling: f64,
    /// System prior for rolling normalization (a "typical" day's energy).
    pub magnitude_divisor: f64,
    /// Cap on the per-mover hub bonus.
    pub hub_bonus_cap: f64,
    /// Cap on the per-target stacking bonus.
    pub same_target_bonus_cap: f64,
    /// Orb at or below which a record counts as "tight" for volatility.
    pub tight_band_deg: f64,
    /// Minimum day-over-day orb decrease that counts as tightening.
    pub outer_tighten_step: f64,
    /// Orb at or below which the fast outer member flags volatility signal D.
    pub fast_outer_flag_deg: f64,
    /// Supportive-score cap as a fraction of |adverse sum| during crisis.
    pub crisis_supportive_cap: f64,
    /// Rolling-window length in days.
    pub rolling_window: usize,
    /// Divisor normalizing amplified bias before scaling to ±K.
    pub bias_divisor: f64,
    /// Divisor normalizing the volatility index before scaling to 0..K.
    pub volatility_divisor: f64,
    /// Minimum |bias| on both sides before a sign flip counts (signal B).
    pub sign_noise_floor: f64,
    /// Apply geometry amplification (tightness/outer/catastrophe boosts).
    pub amplification: bool,
    pub calibration: Calibration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scale_ceiling: 5.0,
            magnitude_divisor: 2.0,
            hub_bonus_cap: 0.6,
            same_target_bonus_cap: 0.3,
            tight_band_deg: 1.5,
            outer_tighten_step: 0.2,
            fast_outer_flag_deg: 3.0,
            crisis_supportive_cap: 0.6,
            rolling_window: 14,
            bias_divisor: 100.0,
            volatility_divisor: 50.0,
            sign_noise_floor: 0.05,
            amplification: true,
            calibration: Calibration::default(),
        }
    }
}

impl EngineConfig {
    /// Validate settings that would otherwise corrupt the pipeline silently.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(self.scale_ceiling.is_finite() && self.scale_ceiling > 0.0) {
            return Err(EngineError::invalid("Invalid scale_ceiling (must be finite and > 0)."));
        }
        if !(self.magnitude_divisor.is_finite() && self.magnitude_divisor > 0.0) {
            return Err(EngineError::invalid(
                "Invalid magnitude_divisor (must be finite and > 0).",
            ));
        }
        if !(0.0..=1.0).contains(&self.crisis_supportive_cap) {
            return Err(EngineError::invalid(
                "Invalid crisis_supportive_cap (must be within [0, 1]).",
            ));
        }
        if self.rolling_window == 0 {
            return Err(EngineError::invalid("Invalid rolling_window (must be >= 1)."));
        }
        if !(self.bias_divisor.is_finite() && self.bias_divisor > 0.0) {
            return Err(EngineError::invalid("Invalid bias_divisor (must be finite and > 0)."));
        }
        if !(self.volatility_divisor.is_finite() && self.volatility_divisor > 0.0) {
            return Err(EngineError::invalid(
                "Invalid volatility_divisor (must be finite and > 0).",
            ));
        }
        Ok(())
    }
}
