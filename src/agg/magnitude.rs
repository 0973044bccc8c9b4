//! Magnitude axis: raw energy plus rolling-window normalization.
//!
//! The raw energy is `avg(|score|)^1.3 × ln(count + 1)`: averaging measures
//! density, the power term adds nonlinear gain so crises still register, and
//! the log term gives diminishing returns as record count grows.
//!
//! Normalization compares today's energy against a reference drawn from the
//! rolling window:
//!
//! - no context → raw energy published directly (clamped to 0..K)
//! - 1 sample → reference is the system prior
//! - 2..13 samples → `λ·median + (1−λ)·prior`, `λ = min(1, n/14)`
//! - ≥14 samples → median of the most recent 14
//!
//! then `clip(5 × raw / (reference × 1.6), 0, K)`.

use crate::agg::scale::{finalize_axis, Scaled};
use crate::domain::{EngineConfig, RollingContext, ScalingMethod, ScoredRecord};

/// Outcome of magnitude normalization, with provenance for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagnitudeOutcome {
    pub scaled: Scaled,
    pub method: ScalingMethod,
    /// Reference energy the day was measured against (None for raw-direct).
    pub reference: Option<f64>,
    /// `min(1, n / window)`: how much history backed the reference.
    pub confidence: f64,
}

/// Raw magnitude energy for the day.
pub fn magnitude_energy(scored: &[ScoredRecord], config: &EngineConfig) -> f64 {
    let count = scored.len().max(1) as f64;
    let avg = scored.iter().map(|r| r.score.abs()).sum::<f64>() / count;
    if avg <= 0.0 {
        return 0.0;
    }
    avg.powf(config.calibration.magnitude_exponent) * (count + 1.0).ln()
}

/// Normalize the day's energy against the rolling window.
pub fn normalize_magnitude(
    energy: f64,
    rolling: Option<&RollingContext>,
    config: &EngineConfig,
) -> MagnitudeOutcome {
    let ceiling = config.scale_ceiling;
    let prior = config.magnitude_divisor;
    let window = config.rolling_window;
    let epsilon = 1e-6;

    let samples = rolling.map(|r| r.magnitudes.as_slice()).unwrap_or(&[]);
    let n = samples.len();
    let confidence = (n as f64 / window as f64).min(1.0);

    if n == 0 {
        return MagnitudeOutcome {
            scaled: finalize_axis(energy, 0.0, ceiling),
            method: ScalingMethod::RawDirect,
            reference: None,
            confidence,
        };
    }

    let lambda = confidence;
    let (mut reference, method) = if n >= window {
        let recent = &samples[n - window..];
        (
            median(recent).unwrap_or(prior),
            ScalingMethod::FullWindowMedian,
        )
    } else if n >= 2 {
        let available = median(samples).unwrap_or(prior);
        (
            lambda * available + (1.0 - lambda) * prior,
            ScalingMethod::PartialWindowBlend,
        )
    } else {
        (prior, ScalingMethod::SingleDayPrior)
    };

    if !(reference.is_finite() && reference >= epsilon) {
        reference = prior;
    }

    let normalized = config.calibration.reference_numerator * energy
        / (reference * config.calibration.reference_gain);

    MagnitudeOutcome {
        scaled: finalize_axis(normalized, 0.0, ceiling),
        method,
        reference: Some(reference),
        confidence,
    }
}

fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}
