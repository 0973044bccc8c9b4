//! Entity catalog: importance tiers, class membership, and dispersion weights.
//!
//! All class-dependent weighting in the scorer and the volatility detector
//! goes through this catalog instead of free functions over hidden tables, so:
//!
//! - the full weighting surface is inspectable and overridable in tests
//! - unknown entity ids degrade to a neutral sentinel instead of failing
//! - `reset()` restores the built-in defaults after experiments

use std::collections::HashMap;

/// Per-entity classification and weights.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityInfo {
    /// Importance tier used by the scorer (max over the pair).
    pub tier: f64,
    /// Weight applied to scores in the volatility dispersion term.
    pub dispersion_weight: f64,
    /// Slow outer-class member (drives crisis detection and hard-contact boosts).
    pub outer: bool,
    /// Personal-class member (includes luminaries and angles).
    pub personal: bool,
    /// Chart angle (ASC/MC/IC/DSC).
    pub angle: bool,
    /// One of the two primary angles (ASC/MC); arms the single-record crisis trigger.
    pub primary_angle: bool,
    /// Primary luminary (Sun/Moon).
    pub luminary: bool,
    /// Benefic-class member; flips ambiguous conjunctions positive.
    pub benefic: bool,
    /// Malefic-class member; flips ambiguous conjunctions negative.
    pub malefic: bool,
    /// The fastest-moving tracked outer-class member (volatility signal).
    pub fast_outer: bool,
}

impl EntityInfo {
    /// Neutral sentinel used for ids the catalog does not know.
    fn sentinel() -> Self {
        Self {
            tier: 1.0,
            dispersion_weight: 0.5,
            outer: false,
            personal: false,
            angle: false,
            primary_angle: false,
            luminary: false,
            benefic: false,
            malefic: false,
            fast_outer: false,
        }
    }
}

/// Lookup service for entity classification.
///
/// Constructed once (usually via `Catalog::new()`) and passed by reference
/// through the pipeline. There is no global instance.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: HashMap<String, EntityInfo>,
    sentinel: EntityInfo,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    /// Build the catalog with the built-in entity table.
    pub fn new() -> Self {
        let mut catalog = Self {
            entries: HashMap::new(),
            sentinel: EntityInfo::sentinel(),
        };
        catalog.install_defaults();
        catalog
    }

    /// Resolve an entity id; unknown ids resolve to the neutral sentinel.
    pub fn lookup(&self, id: &str) -> &EntityInfo {
        self.entries.get(id).unwrap_or(&self.sentinel)
    }

    /// Insert or replace a single entry (e.g. a custom tracked point).
    pub fn insert(&mut self, id: impl Into<String>, info: EntityInfo) {
        self.entries.insert(id.into(), info);
    }

    /// Restore the built-in defaults, discarding any overrides.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.install_defaults();
    }

    fn install_defaults(&mut self) {
        let base = EntityInfo::sentinel();

        // Luminaries.
        self.entries.insert(
            "Sun".into(),
            EntityInfo {
                dispersion_weight: 1.2,
                personal: true,
                luminary: true,
                ..base.clone()
            },
        );
        self.entries.insert(
            "Moon".into(),
            EntityInfo {
                tier: 0.5,
                dispersion_weight: 1.5,
                personal: true,
                luminary: true,
                ..base.clone()
            },
        );

        // Inner personals.
        self.entries.insert(
            "Mercury".into(),
            EntityInfo {
                dispersion_weight: 1.0,
                personal: true,
                ..base.clone()
            },
        );
        self.entries.insert(
            "Venus".into(),
            EntityInfo {
                dispersion_weight: 1.0,
                personal: true,
                benefic: true,
                ..base.clone()
            },
        );
        self.entries.insert(
            "Mars".into(),
            EntityInfo {
                dispersion_weight: 1.1,
                personal: true,
                ..base.clone()
            },
        );
        self.entries.insert(
            "Jupiter".into(),
            EntityInfo {
                dispersion_weight: 0.9,
                benefic: true,
                ..base.clone()
            },
        );

        // Outer class.
        self.entries.insert(
            "Saturn".into(),
            EntityInfo {
                tier: 1.5,
                dispersion_weight: 0.8,
                outer: true,
                malefic: true,
                ..base.clone()
            },
        );
        self.entries.insert(
            "Uranus".into(),
            EntityInfo {
                tier: 1.5,
                dispersion_weight: 0.7,
                outer: true,
                fast_outer: true,
                ..base.clone()
            },
        );
        self.entries.insert(
            "Neptune".into(),
            EntityInfo {
                tier: 1.5,
                dispersion_weight: 0.6,
                outer: true,
                ..base.clone()
            },
        );
        self.entries.insert(
            "Pluto".into(),
            EntityInfo {
                tier: 1.5,
                dispersion_weight: 0.6,
                outer: true,
                malefic: true,
                ..base.clone()
            },
        );

        // Special class.
        self.entries.insert(
            "Chiron".into(),
            EntityInfo {
                tier: 1.2,
                dispersion_weight: 0.8,
                malefic: true,
                ..base.clone()
            },
        );
        self.entries.insert(
            "Mean_Node".into(),
            EntityInfo {
                dispersion_weight: 0.7,
                ..base.clone()
            },
        );
        self.entries.insert(
            "Mean_South_Node".into(),
            EntityInfo {
                dispersion_weight: 0.7,
                ..base.clone()
            },
        );

        // Angles.
        for (id, weight, primary) in [
            ("ASC", 1.3, true),
            ("MC", 1.3, true),
            ("IC", 1.1, false),
            ("DSC", 1.1, false),
        ] {
            self.entries.insert(
                id.into(),
                EntityInfo {
                    dispersion_weight: weight,
                    personal: true,
                    angle: true,
                    primary_angle: primary,
                    ..base.clone()
                },
            );
        }
    }
}
