//! Fixed weighting tables: valence, proximity taper, and target sensitivity.
//!
//! These tables are behavioral calibration, not heuristics: change a value
//! here and every published axis shifts. Keep them in one place.

use crate::catalog::EntityInfo;
use crate::domain::RecordKind;

/// Signed base valence for a record kind, given both parties' classes.
///
/// Conjunctions are context-sensitive: adverse against outer-class parties
/// and anchor/luminary targets, supportive with a benefic in the pair,
/// adverse with a malefic in the pair, weakly supportive otherwise.
pub fn base_valence(kind: &RecordKind, mover: &EntityInfo, target: &EntityInfo) -> f64 {
    match kind {
        RecordKind::Opposition => -1.0,
        RecordKind::Square => -0.85,
        RecordKind::Trine => 0.9,
        RecordKind::Sextile => 0.55,
        RecordKind::Quincunx => -0.35,
        RecordKind::Semisextile => 0.2,
        RecordKind::Conjunction => {
            if mover.outer || target.outer || target.angle || target.luminary {
                return -1.0;
            }
            if mover.benefic || target.benefic {
                return 1.0;
            }
            if mover.malefic || target.malefic {
                return -1.0;
            }
            0.2
        }
        _ => 0.0,
    }
}

/// Proximity taper. Hard kinds stay meaningful over a wider window than soft
/// kinds, so they share step values but not breakpoints.
pub fn proximity_multiplier(proximity_deg: f64, kind: &RecordKind) -> f64 {
    let orb = proximity_deg.abs();
    if kind.is_hard() {
        if orb <= 1.0 {
            1.5
        } else if orb <= 2.0 {
            1.3
        } else if orb <= 3.0 {
            1.1
        } else {
            0.6
        }
    } else if orb <= 0.6 {
        1.5
    } else if orb <= 1.2 {
        1.3
    } else if orb <= 2.0 {
        1.1
    } else {
        0.6
    }
}

/// Target-side sensitivity: anchors > luminaries > other personals, with an
/// extra boost when the caller marks the contact degree as critical.
pub fn sensitivity_multiplier(target: &EntityInfo, critical_degree: bool) -> f64 {
    let mut s = 1.0;
    if target.angle {
        s *= 1.3;
    } else if target.luminary {
        s *= 1.2;
    } else if target.personal {
        s *= 1.1;
    }
    if critical_degree {
        s *= 1.1;
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    #[test]
    fn fixed_valences_match_table() {
        let catalog = Catalog::new();
        let mars = catalog.lookup("Mars");
        let mercury = catalog.lookup("Mercury");
        assert_eq!(base_valence(&RecordKind::Opposition, mars, mercury), -1.0);
        assert_eq!(base_valence(&RecordKind::Square, mars, mercury), -0.85);
        assert_eq!(base_valence(&RecordKind::Trine, mars, mercury), 0.9);
        assert_eq!(base_valence(&RecordKind::Sextile, mars, mercury), 0.55);
        assert_eq!(base_valence(&RecordKind::Quincunx, mars, mercury), -0.35);
        assert_eq!(base_valence(&RecordKind::Semisextile, mars, mercury), 0.2);
        assert_eq!(
            base_valence(&RecordKind::Other("septile".into()), mars, mercury),
            0.0
        );
    }

    #[test]
    fn conjunction_context_rules() {
        let catalog = Catalog::new();
        let sun = catalog.lookup("Sun");
        let venus = catalog.lookup("Venus");
        let mars = catalog.lookup("Mars");
        let saturn = catalog.lookup("Saturn");
        let mercury = catalog.lookup("Mercury");
        let chiron = catalog.lookup("Chiron");
        let asc = catalog.lookup("ASC");

        // Outer party or anchor/luminary target dominates everything else.
        assert_eq!(base_valence(&RecordKind::Conjunction, saturn, venus), -1.0);
        assert_eq!(base_valence(&RecordKind::Conjunction, venus, sun), -1.0);
        assert_eq!(base_valence(&RecordKind::Conjunction, mars, asc), -1.0);
        // Benefic pair.
        assert_eq!(base_valence(&RecordKind::Conjunction, sun, venus), 1.0);
        // Malefic pair (non-outer malefic).
        assert_eq!(base_valence(&RecordKind::Conjunction, chiron, mercury), -1.0);
        // Neutral-ish default.
        assert_eq!(base_valence(&RecordKind::Conjunction, mars, mercury), 0.2);
    }

    #[test]
    fn hard_taper_is_wider_than_soft() {
        let hard = RecordKind::Square;
        let soft = RecordKind::Trine;
        assert_eq!(proximity_multiplier(0.5, &hard), 1.5);
        assert_eq!(proximity_multiplier(1.5, &hard), 1.3);
        assert_eq!(proximity_multiplier(2.5, &hard), 1.1);
        assert_eq!(proximity_multiplier(3.5, &hard), 0.6);

        assert_eq!(proximity_multiplier(0.5, &soft), 1.5);
        assert_eq!(proximity_multiplier(1.0, &soft), 1.3);
        assert_eq!(proximity_multiplier(1.5, &soft), 1.1);
        assert_eq!(proximity_multiplier(2.5, &soft), 0.6);
    }

    #[test]
    fn sensitivity_prefers_anchor_over_luminary_over_personal() {
        let catalog = Catalog::new();
        assert_eq!(sensitivity_multiplier(catalog.lookup("MC"), false), 1.3);
        assert_eq!(sensitivity_multiplier(catalog.lookup("Moon"), false), 1.2);
        assert_eq!(sensitivity_multiplier(catalog.lookup("Mercury"), false), 1.1);
        assert_eq!(sensitivity_multiplier(catalog.lookup("Jupiter"), false), 1.0);
        let critical = sensitivity_multiplier(catalog.lookup("Mercury"), true);
        assert!((critical - 1.21).abs() < 1e-12);
    }
}
