//! Per-record signed scoring.
//!
//! `score = valence × tier × proximity × sensitivity`, then two conditional
//! adjustments: the outer-interaction boost for hard contacts and retrograde
//! moderation of supportive contacts.

use crate::catalog::Catalog;
use crate::domain::{CanonicalRecord, RecordKind, ScoredRecord};
use crate::score::weights::{base_valence, proximity_multiplier, sensitivity_multiplier};

/// Score one canonical record.
///
/// `critical_degree` is caller-supplied context (the engine itself cannot
/// tell whether a contact degree is critical for the subject).
pub fn score_record(rec: &CanonicalRecord, catalog: &Catalog, critical_degree: bool) -> ScoredRecord {
    let mover = catalog.lookup(&rec.mover.id);
    let target = catalog.lookup(&rec.target.id);

    let v = base_valence(&rec.kind, mover, target);
    let p = mover.tier.max(target.tier);
    let o = proximity_multiplier(rec.proximity_deg, &rec.kind);
    let s = sensitivity_multiplier(target, critical_degree);
    let mut score = v * p * o * s;

    // Outer-interaction boost: a hard contact bridging exactly one outer-class
    // party hits the personal side harder. Classified by the non-outer party.
    let hard = rec.kind.is_hard() || (rec.kind == RecordKind::Conjunction && v < 0.0);
    if hard && (mover.outer != target.outer) {
        let other = if mover.outer { target } else { mover };
        if other.angle || other.luminary {
            score *= 1.40;
        } else if other.personal {
            score *= 1.25;
        }
    }

    // Retrograde softens otherwise-supportive contact.
    if rec.mover.retrograde && matches!(rec.kind, RecordKind::Trine | RecordKind::Sextile) {
        score *= 0.90;
    }

    ScoredRecord {
        mover: rec.mover.clone(),
        target: rec.target.clone(),
        kind: rec.kind.clone(),
        proximity_deg: rec.proximity_deg,
        score,
    }
}

/// Score a normalized day.
pub fn score_all(records: &[CanonicalRecord], catalog: &Catalog) -> Vec<ScoredRecord> {
    records
        .iter()
        .map(|rec| score_record(rec, catalog, false))
        .collect()
}
