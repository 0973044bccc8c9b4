//! Informational stacking bonuses.
//!
//! Repeated structural involvement of one mover (a "hub") or one target is
//! surfaced as an explanatory signal. It is reported in diagnostics only and
//! never feeds the published axes; wiring it into magnitude is a documented
//! extension point.

use std::collections::HashMap;

use crate::domain::{EngineConfig, Multiplicity, ScoredRecord};

pub fn multiplicity_bonus(scored: &[ScoredRecord], config: &EngineConfig) -> Multiplicity {
    let mut by_mover: HashMap<&str, usize> = HashMap::new();
    for rec in scored {
        *by_mover.entry(rec.mover.id.as_str()).or_default() += 1;
    }
    let mut hub = 0.0;
    for count in by_mover.values() {
        if *count >= 3 {
            hub += 0.2 * (*count as f64 - 2.0);
        }
    }
    hub = hub.min(config.hub_bonus_cap);

    let mut by_target: HashMap<&str, usize> = HashMap::new();
    for rec in scored {
        *by_target.entry(rec.target.id.as_str()).or_default() += 1;
    }
    let mut same_target = 0.0;
    for count in by_target.values() {
        if *count >= 2 {
            same_target += 0.1 * (*count as f64 - 1.0);
        }
    }
    same_target = same_target.min(config.same_target_bonus_cap);

    Multiplicity { hub, same_target }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Mover, RecordKind, Target};

    fn rec(mover: &str, target: &str) -> ScoredRecord {
        ScoredRecord {
            mover: Mover {
                id: mover.into(),
                retrograde: false,
            },
            target: Target { id: target.into() },
            kind: RecordKind::Square,
            proximity_deg: 2.0,
            score: -1.0,
        }
    }

    #[test]
    fn hub_bonus_starts_at_three_records() {
        let config = EngineConfig::default();
        let two = vec![rec("Saturn", "Sun"), rec("Saturn", "Moon")];
        assert_eq!(multiplicity_bonus(&two, &config).hub, 0.0);

        let four = vec![
            rec("Saturn", "Sun"),
            rec("Saturn", "Moon"),
            rec("Saturn", "Mercury"),
            rec("Saturn", "Venus"),
        ];
        let bonus = multiplicity_bonus(&four, &config);
        assert!((bonus.hub - 0.4).abs() < 1e-12);
    }

    #[test]
    fn hub_bonus_caps_at_limit() {
        let config = EngineConfig::default();
        let records: Vec<_> = (0..8).map(|i| rec("Saturn", &format!("T{i}"))).collect();
        let bonus = multiplicity_bonus(&records, &config);
        assert_eq!(bonus.hub, config.hub_bonus_cap);
    }

    #[test]
    fn same_target_bonus_starts_at_two_and_caps() {
        let config = EngineConfig::default();
        let two = vec![rec("Saturn", "Sun"), rec("Mars", "Sun")];
        let bonus = multiplicity_bonus(&two, &config);
        assert!((bonus.same_target - 0.1).abs() < 1e-12);

        let many: Vec<_> = (0..8).map(|i| rec(&format!("M{i}"), "Sun")).collect();
        let capped = multiplicity_bonus(&many, &config);
        assert_eq!(capped.same_target, config.same_target_bonus_cap);
        assert!((capped.total() - 0.3).abs() < 1e-12);
    }
}
