//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - loosely-shaped input records (`RawRecord`) and their canonical form
//! - scored records and the contexts threaded between days
//! - the published per-day result (`AggregateResult`)
//! - engine configuration (`EngineConfig`, `Calibration`)

pub mod config;
pub mod types;

pub use config::*;
pub use types::*;
