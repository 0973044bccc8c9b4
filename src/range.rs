//! Date-range orchestration.
//!
//! Drives the daily pipeline across a chronologically sorted map of dates,
//! threading `PrevDayContext` and `RollingContext` between calls, and
//! computes the range-level summary (arithmetic mean of each public per-date
//! value, with the same bounds/clamp semantics).
//!
//! Within one subject the fold is strictly sequential: each call's output
//! context is the next call's input. Independent subjects have no shared
//! state and run in parallel via [`run_subjects`].

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::agg::aggregate;
use crate::catalog::Catalog;
use crate::domain::{AggregateResult, BiasValue, EngineConfig, RawRecord, RollingContext};
use crate::error::EngineError;
use crate::ingest::apply_motion_flags;

/// The input contract: records per date, plus optional per-date motion flags
/// keyed by entity id. `BTreeMap` keys give chronological iteration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RangeInput {
    pub records: BTreeMap<NaiveDate, Vec<RawRecord>>,
    #[serde(default)]
    pub motion: BTreeMap<NaiveDate, HashMap<String, bool>>,
}

/// One aggregated day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayResult {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub result: AggregateResult,
}

/// Range-level summary: mean of the daily public values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub days: usize,
    pub magnitude: f64,
    pub magnitude_clamped: bool,
    pub directional_bias: BiasValue,
    pub volatility: f64,
}

/// All computed outputs of one range run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeOutput {
    pub days: Vec<DayResult>,
    pub summary: Summary,
}

/// A named, independent subject for batch runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    #[serde(flatten)]
    pub input: RangeInput,
}

/// Aggregate every day of a range in chronological order.
pub fn run_range(
    input: &RangeInput,
    catalog: &Catalog,
    config: &EngineConfig,
) -> Result<RangeOutput, EngineError> {
    if input.records.is_empty() {
        return Err(EngineError::new(3, "No dates in range input."));
    }

    let mut prev = None;
    let mut rolling = RollingContext::default();
    let mut days = Vec::with_capacity(input.records.len());

    for (date, raw_records) in &input.records {
        let records = match input.motion.get(date) {
            Some(flags) if !flags.is_empty() => apply_motion_flags(raw_records, flags),
            _ => raw_records.clone(),
        };

        let result = aggregate(
            &records,
            prev.as_ref(),
            (!rolling.is_empty()).then_some(&rolling),
            catalog,
            config,
        )?;

        prev = Some(result.carry_forward());
        rolling.observe(result.energies.magnitude, config.rolling_window);
        days.push(DayResult {
            date: *date,
            result,
        });
    }

    let summary = summarize(&days, config);
    Ok(RangeOutput { days, summary })
}

/// Run independent subjects in parallel. Date order is preserved within each
/// subject; subjects share no state, so rayon may interleave them freely.
pub fn run_subjects(
    subjects: &[Subject],
    catalog: &Catalog,
    config: &EngineConfig,
) -> Result<Vec<(String, RangeOutput)>, EngineError> {
    subjects
        .par_iter()
        .map(|subject| {
            run_range(&subject.input, catalog, config).map(|out| (subject.id.clone(), out))
        })
        .collect()
}

fn summarize(days: &[DayResult], config: &EngineConfig) -> Summary {
    let n = days.len().max(1) as f64;
    let ceiling = config.scale_ceiling;

    let magnitude = crate::agg::scale::round_half_up(
        days.iter().map(|d| d.result.magnitude).sum::<f64>() / n,
        1,
    );
    let bias = crate::agg::scale::round_half_up(
        days.iter()
            .map(|d| d.result.directional_bias.value)
            .sum::<f64>()
            / n,
        1,
    );
    let volatility = crate::agg::scale::round_half_up(
        days.iter().map(|d| d.result.volatility).sum::<f64>() / n,
        1,
    );

    Summary {
        days: days.len(),
        magnitude,
        magnitude_clamped: magnitude <= 0.0 || magnitude >= ceiling,
        directional_bias: BiasValue {
            value: bias,
            clamped: bias <= -ceiling || bias >= ceiling,
            range: [-ceiling, ceiling],
        },
        volatility,
    }
}
