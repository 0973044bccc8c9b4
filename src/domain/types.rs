//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during aggregation
//! - exported as JSON by any reporting layer
//! - reconstructed by callers threading context from one day to the next

use serde::{Deserialize, Serialize};

/// Relationship-type label between the mover and the target.
///
/// Unknown labels are carried through as `Other` (lower-cased) and score as
/// neutral rather than being rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordKind {
    Conjunction,
    Opposition,
    Square,
    Trine,
    Sextile,
    Quincunx,
    Semisextile,
    Semisquare,
    Sesquisquare,
    Quintile,
    Biquintile,
    Other(String),
}

impl RecordKind {
    /// Parse a free-form label (case-insensitive; `inconjunct` is accepted as
    /// an alias for `quincunx`).
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "conjunction" => RecordKind::Conjunction,
            "opposition" => RecordKind::Opposition,
            "square" => RecordKind::Square,
            "trine" => RecordKind::Trine,
            "sextile" => RecordKind::Sextile,
            "quincunx" | "inconjunct" => RecordKind::Quincunx,
            "semisextile" => RecordKind::Semisextile,
            "semisquare" => RecordKind::Semisquare,
            "sesquisquare" => RecordKind::Sesquisquare,
            "quintile" => RecordKind::Quintile,
            "biquintile" => RecordKind::Biquintile,
            other => RecordKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RecordKind::Conjunction => "conjunction",
            RecordKind::Opposition => "opposition",
            RecordKind::Square => "square",
            RecordKind::Trine => "trine",
            RecordKind::Sextile => "sextile",
            RecordKind::Quincunx => "quincunx",
            RecordKind::Semisextile => "semisextile",
            RecordKind::Semisquare => "semisquare",
            RecordKind::Sesquisquare => "sesquisquare",
            RecordKind::Quintile => "quintile",
            RecordKind::Biquintile => "biquintile",
            RecordKind::Other(label) => label,
        }
    }

    /// High-friction kinds with the wider proximity taper.
    pub fn is_hard(&self) -> bool {
        matches!(self, RecordKind::Opposition | RecordKind::Square)
    }

    /// Major kinds eligible for the full tightness amplification window.
    pub fn is_major(&self) -> bool {
        matches!(
            self,
            RecordKind::Conjunction
                | RecordKind::Opposition
                | RecordKind::Square
                | RecordKind::Trine
                | RecordKind::Sextile
        )
    }
}

impl From<String> for RecordKind {
    fn from(label: String) -> Self {
        RecordKind::parse(&label)
    }
}

impl From<RecordKind> for String {
    fn from(kind: RecordKind) -> Self {
        kind.as_str().to_string()
    }
}

/// A loosely-shaped party reference: either a bare id string or a node object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PartyRef {
    Name(String),
    Node(PartyNode),
}

/// Object form of a party reference.
///
/// Producers disagree on the id key; resolution precedence is
/// `id` > `name` > `body` (first match wins).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PartyNode {
    pub id: Option<String>,
    pub name: Option<String>,
    pub body: Option<String>,
    pub retrograde: bool,
}

/// Proximity input: a decimal degree value or a `D°M'`-style string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrbInput {
    Degrees(f64),
    Text(String),
}

/// A raw relationship record as supplied by an external geometry provider.
///
/// Field aliases (`mover`|`a`, `target`|`b`, `kind`|`aspect`, `orb`|`orbit`)
/// are resolved by the normalizer with first-match-wins precedence in that
/// order. Raw records are never mutated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    pub mover: Option<PartyRef>,
    pub a: Option<PartyRef>,
    pub target: Option<PartyRef>,
    pub b: Option<PartyRef>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub aspect: Option<String>,
    pub orb: Option<OrbInput>,
    pub orbit: Option<OrbInput>,
}

impl RawRecord {
    /// Convenience constructor for the common fully-specified case.
    pub fn from_parts(mover: &str, target: &str, kind: &str, orb_deg: f64) -> Self {
        Self {
            mover: Some(PartyRef::Name(mover.to_string())),
            target: Some(PartyRef::Name(target.to_string())),
            kind: Some(kind.to_string()),
            orb: Some(OrbInput::Degrees(orb_deg)),
            ..Self::default()
        }
    }

    /// Same as [`from_parts`](Self::from_parts) with the mover flagged retrograde.
    pub fn from_parts_retrograde(mover: &str, target: &str, kind: &str, orb_deg: f64) -> Self {
        Self {
            mover: Some(PartyRef::Node(PartyNode {
                name: Some(mover.to_string()),
                retrograde: true,
                ..PartyNode::default()
            })),
            target: Some(PartyRef::Name(target.to_string())),
            kind: Some(kind.to_string()),
            orb: Some(OrbInput::Degrees(orb_deg)),
            ..Self::default()
        }
    }
}

/// The moving party of a canonical record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mover {
    pub id: String,
    pub retrograde: bool,
}

/// The fixed party of a canonical record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: String,
}

/// A normalized record, safe to score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub mover: Mover,
    pub target: Target,
    pub kind: RecordKind,
    /// Proximity in decimal degrees; lower is tighter.
    pub proximity_deg: f64,
}

/// A canonical record plus its signed intensity score.
///
/// Immutable once the day's pipeline finishes; the full list for a day is the
/// unit of state carried forward as [`PrevDayContext`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecord {
    pub mover: Mover,
    pub target: Target,
    pub kind: RecordKind,
    pub proximity_deg: f64,
    pub score: f64,
}

impl ScoredRecord {
    /// Identity key used to match records across consecutive days.
    pub fn key(&self) -> String {
        format!("{}|{}|{}", self.mover.id, self.target.id, self.kind.as_str())
    }
}

/// The only state threaded from day N to day N+1.
///
/// Caller-owned: construct it from the previous day's result (see
/// [`AggregateResult::carry_forward`]) and pass it into the next call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrevDayContext {
    pub scored: Vec<ScoredRecord>,
    pub effective_bias: f64,
}

/// Rolling FIFO of recent raw magnitude energies (pre-normalization).
///
/// Caller-owned; append today's energy after each call via [`observe`](Self::observe).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RollingContext {
    pub magnitudes: Vec<f64>,
}

impl RollingContext {
    /// Append a raw magnitude energy, truncating to the most recent `window`.
    pub fn observe(&mut self, energy: f64, window: usize) {
        self.magnitudes.push(energy);
        if self.magnitudes.len() > window {
            let excess = self.magnitudes.len() - window;
            self.magnitudes.drain(..excess);
        }
    }

    pub fn len(&self) -> usize {
        self.magnitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }
}

/// A bounded signed axis value with clamp provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiasValue {
    pub value: f64,
    pub clamped: bool,
    pub range: [f64; 2],
}

/// How the day's magnitude was normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalingMethod {
    /// No rolling context: raw energy published directly (clamped).
    RawDirect,
    /// One historical sample: the system prior is the reference.
    SingleDayPrior,
    /// 2..13 samples: median blended with the prior by `λ = n/14`.
    PartialWindowBlend,
    /// Full window: median of the most recent 14 samples.
    FullWindowMedian,
}

/// Informational hub / same-target stacking bonuses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Multiplicity {
    pub hub: f64,
    pub same_target: f64,
}

impl Multiplicity {
    pub fn total(&self) -> f64 {
        self.hub + self.same_target
    }
}

/// Raw (pre-scaling) pipeline energies, kept for observability and for the
/// caller's rolling-window bookkeeping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EnergyBreakdown {
    /// `avg(|score|)^1.3 × ln(count+1)`; feeds the rolling window.
    pub magnitude: f64,
    /// Signed sigmoidal bias energy before magnitude amplification.
    pub bias: f64,
    /// Bias energy after magnitude amplification.
    pub bias_amplified: f64,
}

/// Per-day diagnostics: never affects the published axes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayDiagnostics {
    pub record_count: usize,
    pub multiplicity: Multiplicity,
    pub crisis_triggered: bool,
    /// Factor applied to positive scores when the crisis cap engaged (1.0 = untouched).
    pub crisis_reduction: f64,
    pub scaling_method: ScalingMethod,
    /// `min(1, n/14)`: how much history backed the normalization.
    pub scaling_confidence: f64,
    /// Unscaled volatility index (sum of the five signals).
    pub volatility_index: f64,
    pub trace: crate::trace::TransformTrace,
    pub warnings: Vec<String>,
}

/// The published result of one aggregation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Unsigned intensity in `[0, K]`, rounded to 1 decimal.
    pub magnitude: f64,
    pub magnitude_clamped: bool,
    /// Signed favorability in `[-K, K]`, rounded to 1 decimal.
    pub directional_bias: BiasValue,
    /// Instability, scaled to `[0, K]`, rounded to 1 decimal.
    pub volatility: f64,
    pub scored: Vec<ScoredRecord>,
    pub energies: EnergyBreakdown,
    pub diagnostics: Option<DayDiagnostics>,
}

impl AggregateResult {
    /// Build the context object the next day's call needs.
    pub fn carry_forward(&self) -> PrevDayContext {
        PrevDayContext {
            scored: self.scored.clone(),
            effective_bias: self.directional_bias.value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parse_accepts_aliases_and_case() {
        assert_eq!(RecordKind::parse("Square"), RecordKind::Square);
        assert_eq!(RecordKind::parse("INCONJUNCT"), RecordKind::Quincunx);
        assert_eq!(
            RecordKind::parse("Novile"),
            RecordKind::Other("novile".to_string())
        );
    }

    #[test]
    fn kind_roundtrips_through_serde() {
        let kind = RecordKind::Sesquisquare;
        let json = serde_json::to_string(&kind).unwrap();
        assert_eq!(json, "\"sesquisquare\"");
        let back: RecordKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, kind);
    }

    #[test]
    fn rolling_context_truncates_to_window() {
        let mut rolling = RollingContext::default();
        for i in 0..20 {
            rolling.observe(i as f64, 14);
        }
        assert_eq!(rolling.len(), 14);
        assert_eq!(rolling.magnitudes[0], 6.0);
        assert_eq!(*rolling.magnitudes.last().unwrap(), 19.0);
    }

    #[test]
    fn scored_record_key_is_stable() {
        let rec = ScoredRecord {
            mover: Mover {
                id: "Saturn".into(),
                retrograde: false,
            },
            target: Target { id: "Sun".into() },
            kind: RecordKind::Square,
            proximity_deg: 1.0,
            score: -2.0,
        };
        assert_eq!(rec.key(), "Saturn|Sun|square");
    }
}
