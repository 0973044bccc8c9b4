//! Per-record scoring: weighting tables, the scorer itself, geometry
//! amplification, crisis capping, and the informational multiplicity bonus.

pub mod amplify;
pub mod crisis;
pub mod multiplicity;
pub mod scorer;
pub mod weights;

pub use amplify::amplify_score;
pub use crisis::{apply_supportive_cap, CrisisOutcome};
pub use multiplicity::multiplicity_bonus;
pub use scorer::{score_record, score_all};
