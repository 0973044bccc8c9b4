//! The daily aggregation pipeline.
//!
//! Order of operations: normalize → score → amplify → crisis-cap →
//! {magnitude, bias} → volatility → final scale/clamp/round → invariant check.
//!
//! The pipeline is a pure function of its explicit inputs; repeated calls over
//! a date-sorted sequence form a left-fold (see `range`).

use crate::agg::bias::{amplify_by_magnitude, bias_energy, normalize_bias};
use crate::agg::magnitude::{magnitude_energy, normalize_magnitude};
use crate::agg::scale::finalize_axis;
use crate::agg::volatility::volatility_signals;
use crate::catalog::Catalog;
use crate::domain::{
    AggregateResult, BiasValue, DayDiagnostics, EnergyBreakdown, EngineConfig, Multiplicity,
    PrevDayContext, RawRecord, RollingContext, ScalingMethod,
};
use crate::error::EngineError;
use crate::ingest::normalize_all;
use crate::score::{amplify_score, apply_supportive_cap, multiplicity_bonus, score_all};
use crate::trace::{NullTrace, TraceEvent, TraceSink, TransformTrace};

/// Aggregate one day's records without external tracing.
pub fn aggregate(
    records: &[RawRecord],
    prev: Option<&PrevDayContext>,
    rolling: Option<&RollingContext>,
    catalog: &Catalog,
    config: &EngineConfig,
) -> Result<AggregateResult, EngineError> {
    aggregate_traced(records, prev, rolling, catalog, config, &mut NullTrace)
}

/// Aggregate one day's records, reporting every intermediate value to `sink`.
pub fn aggregate_traced(
    records: &[RawRecord],
    prev: Option<&PrevDayContext>,
    rolling: Option<&RollingContext>,
    catalog: &Catalog,
    config: &EngineConfig,
    sink: &mut dyn TraceSink,
) -> Result<AggregateResult, EngineError> {
    config.validate()?;

    sink.record(&TraceEvent::InputReceived {
        record_count: records.len(),
        has_prev_context: prev.is_some(),
        rolling_samples: rolling.map(RollingContext::len).unwrap_or(0),
    });

    if records.is_empty() {
        return Ok(empty_day(prev, config, sink));
    }

    // 1) Normalize and score.
    let canonical = normalize_all(records);
    let mut scored = score_all(&canonical, catalog);

    // 2) Geometry amplification on the signed scores.
    if config.amplification {
        for (rec, canon) in scored.iter_mut().zip(canonical.iter()) {
            rec.score = amplify_score(rec.score, canon, catalog);
        }
    }

    let positive = scored.iter().filter(|r| r.score > 0.0).count();
    let negative = scored.iter().filter(|r| r.score < 0.0).count();
    sink.record(&TraceEvent::RecordsScored {
        count: scored.len(),
        positive,
        negative,
        min: scored.iter().map(|r| r.score).fold(f64::INFINITY, f64::min),
        max: scored
            .iter()
            .map(|r| r.score)
            .fold(f64::NEG_INFINITY, f64::max),
    });

    // 3) Crisis-conditional supportive cap.
    let crisis = apply_supportive_cap(&mut scored, catalog, config);
    sink.record(&TraceEvent::CrisisCap {
        triggered: crisis.triggered,
        reduction: crisis.reduction,
    });

    // 4) Informational stacking bonuses (diagnostics only).
    let multiplicity = multiplicity_bonus(&scored, config);

    // 5) Magnitude.
    let energy = magnitude_energy(&scored, config);
    let magnitude = normalize_magnitude(energy, rolling, config);
    sink.record(&TraceEvent::RollingWindow {
        method: magnitude.method,
        samples: rolling.map(RollingContext::len).unwrap_or(0),
        reference: magnitude.reference,
        lambda: magnitude.confidence,
    });
    sink.record(&TraceEvent::MagnitudeNormalized {
        energy,
        value: magnitude.scaled.value,
        clamped: magnitude.scaled.clamped(),
    });

    // 6) Directional bias, amplified by the day's magnitude.
    let bias_raw = bias_energy(&scored, config);
    let bias_amplified = amplify_by_magnitude(bias_raw, magnitude.scaled.value, config);
    let bias = normalize_bias(bias_amplified, config);
    sink.record(&TraceEvent::BiasNormalized {
        energy: bias_raw,
        amplified: bias_amplified,
        value: bias.value,
        clamped: bias.clamped(),
    });

    // 7) Volatility.
    let signals = volatility_signals(&scored, prev, catalog, config);
    let index = signals.index();
    let vi_normalized = (index / config.volatility_divisor).min(1.0);
    let volatility = finalize_axis(vi_normalized * config.scale_ceiling, 0.0, config.scale_ceiling);
    sink.record(&TraceEvent::Volatility {
        tight_band_changes: signals.tight_band_changes,
        sign_flip: signals.sign_flip,
        outer_tightening: signals.outer_tightening,
        fast_outer_active: signals.fast_outer_active,
        dispersion: signals.dispersion,
        index,
    });

    // 8) Transform trace.
    let mut trace = TransformTrace {
        calibration_version: config.calibration.version.clone(),
        ..Default::default()
    };
    trace.push_stage("raw", energy, bias_raw, index);
    trace.push_stage("amplified", energy, bias_amplified, index);
    trace.push_stage(
        "scaled",
        magnitude.scaled.raw,
        bias.raw,
        vi_normalized * config.scale_ceiling,
    );
    trace.push_stage(
        "final",
        magnitude.scaled.value,
        bias.value,
        volatility.value,
    );
    if magnitude.scaled.clamped() {
        trace.push_clamp("magnitude", magnitude.scaled.raw, magnitude.scaled.value);
    }
    if bias.clamped() {
        trace.push_clamp("directional_bias", bias.raw, bias.value);
    }

    sink.record(&TraceEvent::Final {
        magnitude: magnitude.scaled.value,
        directional_bias: bias.value,
        volatility: volatility.value,
    });

    let result = AggregateResult {
        magnitude: magnitude.scaled.value,
        magnitude_clamped: magnitude.scaled.clamped(),
        directional_bias: BiasValue {
            value: bias.value,
            clamped: bias.clamped(),
            range: [-config.scale_ceiling, config.scale_ceiling],
        },
        volatility: volatility.value,
        scored,
        energies: EnergyBreakdown {
            magnitude: energy,
            bias: bias_raw,
            bias_amplified,
        },
        diagnostics: Some(DayDiagnostics {
            record_count: records.len(),
            multiplicity,
            crisis_triggered: crisis.triggered,
            crisis_reduction: crisis.reduction,
            scaling_method: magnitude.method,
            scaling_confidence: magnitude.confidence,
            volatility_index: index,
            trace,
            warnings: Vec::new(),
        }),
    };

    assert_bounds(&result, config)?;
    Ok(result)
}

/// Well-defined empty-day result: zero magnitude, bias continuity from the
/// previous day, zero volatility.
fn empty_day(
    prev: Option<&PrevDayContext>,
    config: &EngineConfig,
    sink: &mut dyn TraceSink,
) -> AggregateResult {
    let ceiling = config.scale_ceiling;
    let carried = prev.map(|p| p.effective_bias).unwrap_or(0.0);
    let bias = finalize_axis(carried, -ceiling, ceiling);

    sink.record(&TraceEvent::Final {
        magnitude: 0.0,
        directional_bias: bias.value,
        volatility: 0.0,
    });

    let mut trace = TransformTrace {
        calibration_version: config.calibration.version.clone(),
        ..Default::default()
    };
    trace.push_stage("final", 0.0, bias.value, 0.0);

    AggregateResult {
        magnitude: 0.0,
        magnitude_clamped: false,
        directional_bias: BiasValue {
            value: bias.value,
            clamped: bias.clamped(),
            range: [-ceiling, ceiling],
        },
        volatility: 0.0,
        scored: Vec::new(),
        energies: EnergyBreakdown::default(),
        diagnostics: Some(DayDiagnostics {
            record_count: 0,
            multiplicity: Multiplicity::default(),
            crisis_triggered: false,
            crisis_reduction: 1.0,
            scaling_method: ScalingMethod::RawDirect,
            scaling_confidence: 0.0,
            volatility_index: 0.0,
            trace,
            warnings: vec!["empty_record_set".to_string()],
        }),
    }
}

/// Final invariant: published axes must lie within their declared bounds.
/// A violation is a calibration defect upstream and must fail loudly.
fn assert_bounds(result: &AggregateResult, config: &EngineConfig) -> Result<(), EngineError> {
    let k = config.scale_ceiling;
    let magnitude = result.magnitude;
    let bias = result.directional_bias.value;

    if !magnitude.is_finite() || !bias.is_finite() || !result.volatility.is_finite() {
        return Err(EngineError::invariant(format!(
            "Non-finite published axis (magnitude={magnitude}, bias={bias}, volatility={})",
            result.volatility
        )));
    }
    if !(0.0..=k).contains(&magnitude) {
        return Err(EngineError::invariant(format!(
            "Magnitude out of range: {magnitude} not in [0, {k}]"
        )));
    }
    if !(-k..=k).contains(&bias) {
        return Err(EngineError::invariant(format!(
            "Directional bias out of range: {bias} not in [-{k}, {k}]"
        )));
    }
    Ok(())
}
