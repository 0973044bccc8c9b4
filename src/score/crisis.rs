//! Crisis-conditional capping of supportive scores.
//!
//! On days dominated by tight, adverse, high-importance contacts, incidental
//! supportive contacts must not dilute the signature. When the crisis
//! condition holds, the positive sum is scaled down to exactly
//! `cap_fraction × |negative sum|` if it exceeds that cap.

use crate::catalog::Catalog;
use crate::domain::{EngineConfig, RecordKind, ScoredRecord};

/// Orb ceiling for contacts that can arm the crisis condition.
const CRISIS_ORB_DEG: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrisisOutcome {
    pub triggered: bool,
    /// Factor applied to every positive score (1.0 when no capping occurred).
    pub reduction: f64,
}

impl CrisisOutcome {
    pub fn capped(&self) -> bool {
        self.reduction < 1.0
    }
}

fn is_hard(rec: &ScoredRecord) -> bool {
    rec.kind.is_hard() || (rec.kind == RecordKind::Conjunction && rec.score < 0.0)
}

/// Detect the crisis condition and cap positive scores in place.
pub fn apply_supportive_cap(
    scored: &mut [ScoredRecord],
    catalog: &Catalog,
    config: &EngineConfig,
) -> CrisisOutcome {
    let hard_outer_hits = scored
        .iter()
        .filter(|rec| {
            is_hard(rec)
                && catalog.lookup(&rec.mover.id).outer
                && rec.proximity_deg <= CRISIS_ORB_DEG
        })
        .count();

    let hard_anchor_hits = scored
        .iter()
        .filter(|rec| {
            is_hard(rec)
                && catalog.lookup(&rec.target.id).primary_angle
                && rec.proximity_deg <= CRISIS_ORB_DEG
        })
        .count();

    let triggered = hard_outer_hits >= 2 || hard_anchor_hits >= 1;
    if !triggered {
        return CrisisOutcome {
            triggered: false,
            reduction: 1.0,
        };
    }

    let positive: f64 = scored.iter().map(|r| r.score.max(0.0)).sum();
    let negative: f64 = scored.iter().map(|r| r.score.min(0.0)).sum();
    let cap = negative.abs() * config.crisis_supportive_cap;

    if positive <= cap {
        return CrisisOutcome {
            triggered: true,
            reduction: 1.0,
        };
    }

    let reduction = cap / positive;
    for rec in scored.iter_mut() {
        if rec.score > 0.0 {
            rec.score *= reduction;
        }
    }

    CrisisOutcome {
        triggered: true,
        reduction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Mover, Target};

    fn scored(mover: &str, target: &str, kind: RecordKind, orb: f64, score: f64) -> ScoredRecord {
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

    #[test]
    fn two_tight_outer_hard_hits_trigger_and_cap() {
        let catalog = Catalog::new();
        let config = EngineConfig::default();
        let mut records = vec![
            scored("Saturn", "Sun", RecordKind::Square, 1.0, -4.0),
            scored("Pluto", "Moon", RecordKind::Opposition, 1.5, -2.0),
            scored("Jupiter", "Venus", RecordKind::Trine, 0.5, 5.0),
        ];

        let outcome = apply_supportive_cap(&mut records, &catalog, &config);
        assert!(outcome.triggered);
        assert!(outcome.capped());

        let positive: f64 = records.iter().map(|r| r.score.max(0.0)).sum();
        // Capped at exactly 60% of |−6|.
        assert!((positive - 3.6).abs() < 1e-12);
        // Negative scores untouched.
        assert_eq!(records[0].score, -4.0);
        assert_eq!(records[1].score, -2.0);
    }

    #[test]
    fn single_anchor_hit_is_enough() {
        let catalog = Catalog::new();
        let config = EngineConfig::default();
        let mut records = vec![
            scored("Mars", "MC", RecordKind::Square, 1.8, -3.0),
            scored("Jupiter", "Venus", RecordKind::Trine, 0.5, 4.0),
        ];

        let outcome = apply_supportive_cap(&mut records, &catalog, &config);
        assert!(outcome.triggered);
        let positive: f64 = records.iter().map(|r| r.score.max(0.0)).sum();
        assert!((positive - 1.8).abs() < 1e-12);
    }

    #[test]
    fn secondary_angles_do_not_arm_the_trigger() {
        let catalog = Catalog::new();
        let config = EngineConfig::default();
        let mut records = vec![
            scored("Mars", "IC", RecordKind::Square, 1.0, -3.0),
            scored("Jupiter", "Venus", RecordKind::Trine, 0.5, 4.0),
        ];
        let outcome = apply_supportive_cap(&mut records, &catalog, &config);
        assert!(!outcome.triggered);
        assert_eq!(records[1].score, 4.0);
    }

    #[test]
    fn wide_or_single_outer_hits_do_not_trigger() {
        let catalog = Catalog::new();
        let config = EngineConfig::default();

        // Only one tight outer hit.
        let mut one = vec![
            scored("Saturn", "Sun", RecordKind::Square, 1.0, -4.0),
            scored("Jupiter", "Venus", RecordKind::Trine, 0.5, 5.0),
        ];
        assert!(!apply_supportive_cap(&mut one, &catalog, &config).triggered);

        // Two outer hits, but outside the crisis orb.
        let mut wide = vec![
            scored("Saturn", "Sun", RecordKind::Square, 2.5, -4.0),
            scored("Pluto", "Moon", RecordKind::Opposition, 3.0, -2.0),
            scored("Jupiter", "Venus", RecordKind::Trine, 0.5, 5.0),
        ];
        assert!(!apply_supportive_cap(&mut wide, &catalog, &config).triggered);
    }

    #[test]
    fn negative_conjunction_counts_as_hard() {
        let catalog = Catalog::new();
        let config = EngineConfig::default();
        let mut records = vec![
            scored("Saturn", "Sun", RecordKind::Conjunction, 1.0, -4.0),
            scored("Pluto", "Mercury", RecordKind::Conjunction, 1.0, -2.0),
            scored("Jupiter", "Venus", RecordKind::Trine, 0.5, 5.0),
        ];
        let outcome = apply_supportive_cap(&mut records, &catalog, &config);
        assert!(outcome.triggered);
    }

    #[test]
    fn trigger_without_excess_support_changes_nothing() {
        let catalog = Catalog::new();
        let config = EngineConfig::default();
        let mut records = vec![
            scored("Saturn", "Sun", RecordKind::Square, 1.0, -6.0),
            scored("Pluto", "Moon", RecordKind::Opposition, 1.0, -4.0),
            scored("Jupiter", "Venus", RecordKind::Trine, 0.5, 2.0),
        ];
        let outcome = apply_supportive_cap(&mut records, &catalog, &config);
        assert!(outcome.triggered);
        assert!(!outcome.capped());
        assert_eq!(records[2].score, 2.0);
    }
}
