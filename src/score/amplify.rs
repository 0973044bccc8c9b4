//! Geometry amplification applied to signed scores before crisis capping.
//!
//! Three independent multiplicative boosts:
//! - tightness: up to ×1.35 for exact major contacts (3° window; 1° for minors)
//! - outer potency: ×1.20 with one outer-class party, ×1.35 with two
//! - catastrophe kicker: ×1.15 when an outer malefic participates within 1°

use crate::catalog::Catalog;
use crate::domain::CanonicalRecord;

pub fn amplify_score(score: f64, rec: &CanonicalRecord, catalog: &Catalog) -> f64 {
    let mover = catalog.lookup(&rec.mover.id);
    let target = catalog.lookup(&rec.target.id);

    let window = if rec.kind.is_major() { 3.0 } else { 1.0 };
    let tightness = (1.0 - rec.proximity_deg / window).max(0.0);
    let tight_boost = 1.0 + 0.35 * tightness;

    let outer_boost = if mover.outer && target.outer {
        1.35
    } else if mover.outer || target.outer {
        1.20
    } else {
        1.0
    };

    let outer_malefic =
        (mover.outer && mover.malefic) || (target.outer && target.malefic);
    let catastrophe = if outer_malefic && rec.proximity_deg <= 1.0 {
        1.15
    } else {
        1.0
    };

    score * tight_boost * outer_boost * catastrophe
}
