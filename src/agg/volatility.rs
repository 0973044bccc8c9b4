//! Day-over-day volatility detection.
//!
//! Five independent signals, summed into an unscaled index:
//!
//! - **A**: records whose tight-band (≤1.5°) status changed since yesterday,
//!   matched by mover|target|kind key
//! - **B**: aggregate bias sign flip above the noise floor
//! - **C**: outer-involved hard records that tightened by at least the step
//! - **D**: the fastest tracked outer-class member active within its flag orb
//! - **E**: dispersion of catalog-weighted scores (std dev × 0.5, capped at 2)

use std::collections::{HashMap, HashSet};

use crate::catalog::Catalog;
use crate::domain::{EngineConfig, PrevDayContext, ScoredRecord};

/// The five volatility signals, kept separate for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VolatilitySignals {
    pub tight_band_changes: usize,
    pub sign_flip: bool,
    pub outer_tightening: usize,
    pub fast_outer_active: bool,
    pub dispersion: f64,
}

impl VolatilitySignals {
    /// The unscaled index: A + B + C + D + round(E).
    pub fn index(&self) -> f64 {
        self.tight_band_changes as f64
            + if self.sign_flip { 1.0 } else { 0.0 }
            + self.outer_tightening as f64
            + if self.fast_outer_active { 1.0 } else { 0.0 }
            + self.dispersion.round()
    }
}

/// Compare today's scored set against yesterday's context.
pub fn volatility_signals(
    today: &[ScoredRecord],
    prev: Option<&PrevDayContext>,
    catalog: &Catalog,
    config: &EngineConfig,
) -> VolatilitySignals {
    let mut signals = VolatilitySignals::default();

    // A: tight-band entries and exits.
    if let Some(prev) = prev {
        let tight_keys = |records: &[ScoredRecord]| -> HashSet<String> {
            records
                .iter()
                .filter(|r| r.proximity_deg <= config.tight_band_deg)
                .map(ScoredRecord::key)
                .collect()
        };
        let prev_tight = tight_keys(&prev.scored);
        let now_tight = tight_keys(today);
        signals.tight_band_changes = now_tight.symmetric_difference(&prev_tight).count();
    }

    // B: bias sign flip between yesterday's effective bias and today's raw sum.
    if let Some(prev) = prev {
        let prev_bias = prev.effective_bias;
        let now_bias: f64 = today.iter().map(|r| r.score).sum();
        signals.sign_flip = prev_bias.signum() != now_bias.signum()
            && prev_bias.abs() > config.sign_noise_floor
            && now_bias.abs() > config.sign_noise_floor;
    }

    // C: outer-involved hard records tightening since yesterday.
    if let Some(prev) = prev {
        let prev_by_key: HashMap<String, &ScoredRecord> =
            prev.scored.iter().map(|r| (r.key(), r)).collect();
        for rec in today {
            let outer_involved =
                catalog.lookup(&rec.mover.id).outer || catalog.lookup(&rec.target.id).outer;
            if !(outer_involved && rec.kind.is_hard()) {
                continue;
            }
            if let Some(prev_rec) = prev_by_key.get(&rec.key()) {
                if prev_rec.proximity_deg - rec.proximity_deg >= config.outer_tighten_step {
                    signals.outer_tightening += 1;
                }
            }
        }
    }

    // D: fastest outer member active today.
    signals.fast_outer_active = today.iter().any(|rec| {
        (catalog.lookup(&rec.mover.id).fast_outer || catalog.lookup(&rec.target.id).fast_outer)
            && rec.proximity_deg <= config.fast_outer_flag_deg
    });

    // E: dispersion of catalog-weighted scores.
    let weighted: Vec<f64> = today
        .iter()
        .map(|rec| {
            let w_mover = catalog.lookup(&rec.mover.id).dispersion_weight;
            let w_target = catalog.lookup(&rec.target.id).dispersion_weight;
            rec.score * w_mover.max(w_target)
        })
        .collect();
    if weighted.len() >= 3 {
        let mean = weighted.iter().sum::<f64>() / weighted.len() as f64;
        let variance =
            weighted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / weighted.len() as f64;
        signals.dispersion = (variance.sqrt() * 0.5).min(2.0);
    }

    signals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Mover, RecordKind, Target};

    fn rec(mover: &str, target: &str, kind: RecordKind, orb: f64, score: f64) -> ScoredRecord {
        ScoredRecord {
            mover: Mover {
                id: mover.into(),
                retrograde: false,
            },
            target: Target { id: target.into() },
            kind,
            proximity_deg: orb,
            score,
        }
    }

    fn prev_ctx(scored: Vec<ScoredRecord>, effective_bias: f64) -> PrevDayContext {
        PrevDayContext {
            scored,
            effective_bias,
        }
    }

    #[test]
    fn no_context_leaves_comparison_signals_silent() {
        let catalog = Catalog::new();
        let config = EngineConfig::default();
        let today = vec![rec("Mars", "Sun", RecordKind::Square, 1.0, -1.5)];
        let signals = volatility_signals(&today, None, &catalog, &config);
        assert_eq!(signals.tight_band_changes, 0);
        assert!(!signals.sign_flip);
        assert_eq!(signals.outer_tightening, 0);
        assert_eq!(signals.index(), 0.0);
    }

    #[test]
    fn leaving_the_tight_band_counts_once() {
        let catalog = Catalog::new();
        let config = EngineConfig::default();
        let yesterday = prev_ctx(
            vec![rec("Mars", "Sun", RecordKind::Square, 1.0, -1.5)],
            -1.0,
        );
        let today = vec![rec("Mars", "Sun", RecordKind::Square, 4.0, -0.6)];
        let signals = volatility_signals(&today, Some(&yesterday), &catalog, &config);
        assert_eq!(signals.tight_band_changes, 1);
    }

    #[test]
    fn entering_and_leaving_both_count() {
        let catalog = Catalog::new();
        let config = EngineConfig::default();
        let yesterday = prev_ctx(
            vec![
                rec("Mars", "Sun", RecordKind::Square, 1.0, -1.5),
                rec("Venus", "Moon", RecordKind::Trine, 3.0, 0.5),
            ],
            -1.0,
        );
        let today = vec![
            rec("Mars", "Sun", RecordKind::Square, 4.0, -0.6),
            rec("Venus", "Moon", RecordKind::Trine, 1.2, 1.0),
        ];
        let signals = volatility_signals(&today, Some(&yesterday), &catalog, &config);
        assert_eq!(signals.tight_band_changes, 2);
    }

    #[test]
    fn sign_flip_requires_clearing_the_noise_floor() {
        let catalog = Catalog::new();
        let config = EngineConfig::default();

        let flips = volatility_signals(
            &[rec("Venus", "Sun", RecordKind::Trine, 1.0, 1.2)],
            Some(&prev_ctx(vec![], -2.0)),
            &catalog,
            &config,
        );
        assert!(flips.sign_flip);

        let too_quiet = volatility_signals(
            &[rec("Venus", "Sun", RecordKind::Trine, 1.0, 0.01)],
            Some(&prev_ctx(vec![], -2.0)),
            &catalog,
            &config,
        );
        assert!(!too_quiet.sign_flip);
    }

    #[test]
    fn outer_hard_tightening_counts_per_record() {
        let catalog = Catalog::new();
        let config = EngineConfig::default();
        let yesterday = prev_ctx(
            vec![
                rec("Saturn", "Sun", RecordKind::Square, 2.0, -3.0),
                rec("Pluto", "Moon", RecordKind::Opposition, 3.0, -2.0),
                rec("Mars", "Sun", RecordKind::Square, 2.0, -1.0),
            ],
            -3.0,
        );
        let today = vec![
            // Tightened by 0.3: counts.
            rec("Saturn", "Sun", RecordKind::Square, 1.7, -3.2),
            // Tightened by only 0.1: below the step.
            rec("Pluto", "Moon", RecordKind::Opposition, 2.9, -2.1),
            // Tightened, but no outer party.
            rec("Mars", "Sun", RecordKind::Square, 1.5, -1.2),
        ];
        let signals = volatility_signals(&today, Some(&yesterday), &catalog, &config);
        assert_eq!(signals.outer_tightening, 1);
    }

    #[test]
    fn fast_outer_flag_fires_without_context() {
        let catalog = Catalog::new();
        let config = EngineConfig::default();
        let active = volatility_signals(
            &[rec("Uranus", "Mercury", RecordKind::Square, 2.9, -2.0)],
            None,
            &catalog,
            &config,
        );
        assert!(active.fast_outer_active);

        let wide = volatility_signals(
            &[rec("Uranus", "Mercury", RecordKind::Square, 3.1, -2.0)],
            None,
            &catalog,
            &config,
        );
        assert!(!wide.fast_outer_active);
    }

    #[test]
    fn dispersion_needs_three_records_and_caps_at_two() {
        let catalog = Catalog::new();
        let config = EngineConfig::default();

        let two = volatility_signals(
            &[
                rec("Mars", "Sun", RecordKind::Square, 1.0, -3.0),
                rec("Venus", "Moon", RecordKind::Trine, 1.0, 3.0),
            ],
            None,
            &catalog,
            &config,
        );
        assert_eq!(two.dispersion, 0.0);

        let spread = volatility_signals(
            &[
                rec("Mars", "Sun", RecordKind::Square, 1.0, -8.0),
                rec("Venus", "Moon", RecordKind::Trine, 1.0, 8.0),
                rec("Mercury", "Mars", RecordKind::Sextile, 1.0, 0.0),
            ],
            None,
            &catalog,
            &config,
        );
        assert_eq!(spread.dispersion, 2.0);
    }

    #[test]
    fn index_sums_all_five_signals() {
        let signals = VolatilitySignals {
            tight_band_changes: 2,
            sign_flip: true,
            outer_tightening: 1,
            fast_outer_active: true,
            dispersion: 1.4,
        };
        assert_eq!(signals.index(), 6.0);
    }
}
