//! Record normalization.
//!
//! This module turns heterogeneous raw records into canonical ones that are
//! safe to score.
//!
//! Design goals:
//! - **Documented alias precedence** (first match wins), not ad hoc fallbacks
//! - **Row-level tolerance**: malformed fields degrade, they never throw
//! - **Deterministic behavior** (no hidden state)
//!
//! Alias precedence:
//! - mover: `mover` then `a`; target: `target` then `b`
//! - within a party node: `id` then `name` then `body`
//! - kind: `type` then `aspect` (lower-cased; unknown labels pass through)
//! - proximity: `orb` then `orbit` (decimal degrees or a `D°M'` string)

use std::collections::HashMap;

use crate::domain::{CanonicalRecord, Mover, OrbInput, PartyRef, RawRecord, RecordKind, Target};

/// Neutral wide-proximity fallback for unparsable orb values, chosen so
/// unscorable records contribute near-zero instead of failing the day.
pub const WIDE_ORB_DEG: f64 = 6.01;

/// Placeholder id for records whose party could not be resolved.
pub const UNKNOWN_ENTITY: &str = "?";

/// Normalize one raw record. Infallible by design: every field has a
/// documented degradation path.
pub fn normalize(raw: &RawRecord) -> CanonicalRecord {
    let (mover_id, retrograde) =
        resolve_party(raw.mover.as_ref().or(raw.a.as_ref())).unwrap_or((UNKNOWN_ENTITY.to_string(), false));
    let (target_id, _) =
        resolve_party(raw.target.as_ref().or(raw.b.as_ref())).unwrap_or((UNKNOWN_ENTITY.to_string(), false));

    let kind = raw
        .kind
        .as_deref()
        .or(raw.aspect.as_deref())
        .map(RecordKind::parse)
        .unwrap_or_else(|| RecordKind::Other(String::new()));

    let proximity_deg = raw
        .orb
        .as_ref()
        .or(raw.orbit.as_ref())
        .and_then(parse_orb)
        .unwrap_or(WIDE_ORB_DEG);

    CanonicalRecord {
        mover: Mover {
            id: mover_id,
            retrograde,
        },
        target: Target { id: target_id },
        kind,
        proximity_deg,
    }
}

/// Normalize a day's worth of raw records.
pub fn normalize_all(records: &[RawRecord]) -> Vec<CanonicalRecord> {
    records.iter().map(normalize).collect()
}

/// Overlay per-date motion flags (keyed by entity id) onto raw records.
///
/// Providers often ship retrograde state in a separate per-date map; this
/// merges it onto each record's mover without mutating the originals.
pub fn apply_motion_flags(records: &[RawRecord], flags: &HashMap<String, bool>) -> Vec<RawRecord> {
    records
        .iter()
        .map(|raw| {
            let Some((id, already)) = resolve_party(raw.mover.as_ref().or(raw.a.as_ref())) else {
                return raw.clone();
            };
            let flagged = flags.get(&id).copied().unwrap_or(false);
            if !flagged || already {
                return raw.clone();
            }
            let mut out = raw.clone();
            let node = crate::domain::PartyNode {
                id: Some(id),
                retrograde: true,
                ..Default::default()
            };
            // Whichever alias carried the mover is the one we rewrite.
            if out.mover.is_some() {
                out.mover = Some(PartyRef::Node(node));
            } else {
                out.a = Some(PartyRef::Node(node));
            }
            out
        })
        .collect()
}

fn resolve_party(party: Option<&PartyRef>) -> Option<(String, bool)> {
    match party? {
        PartyRef::Name(name) => {
            let name = name.trim();
            (!name.is_empty()).then(|| (name.to_string(), false))
        }
        PartyRef::Node(node) => {
            let id = node
                .id
                .as_deref()
                .or(node.name.as_deref())
                .or(node.body.as_deref())
                .map(str::trim)
                .filter(|s| !s.is_empty())?;
            Some((id.to_string(), node.retrograde))
        }
    }
}

/// Parse a proximity input to decimal degrees.
///
/// Accepted string forms, tried in order: a plain float (`"3.5"`), then
/// `D°M'` / `D:M` / `D M` (degrees + minutes). Anything else is rejected so
/// the caller can fall back to [`WIDE_ORB_DEG`].
pub fn parse_orb(input: &OrbInput) -> Option<f64> {
    match input {
        OrbInput::Degrees(v) => v.is_finite().then_some(*v),
        OrbInput::Text(s) => parse_orb_text(s),
    }
}

fn parse_orb_text(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(v) = s.parse::<f64>() {
        return v.is_finite().then_some(v);
    }

    // D°M' form: signed integer degrees, a separator, integer minutes.
    let (sign, rest) = match s.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, s),
    };
    let deg_end = rest.find(|c: char| !c.is_ascii_digit())?;
    if deg_end == 0 {
        return None;
    }
    let degrees: f64 = rest[..deg_end].parse().ok()?;

    let tail = rest[deg_end..].trim_start_matches(['°', ':', '\'', ' ', '\t']);
    let min_end = tail
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(tail.len());
    let minutes: f64 = if min_end == 0 {
        0.0
    } else {
        tail[..min_end].parse().ok()?
    };

    Some(sign * (degrees + minutes / 60.0))
}
