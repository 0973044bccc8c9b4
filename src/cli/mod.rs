//! Command-line parsing for the field aggregation engine.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the scoring/aggregation code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "seismo", version, about = "Field Aggregation Engine (daily magnitude / bias / volatility)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Aggregate a JSON records file and print the daily table + summary.
    Run(RunArgs),
    /// Generate a synthetic records file (seeded, deterministic).
    Sample(SampleArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    /// Input JSON file: `{ "records": { "YYYY-MM-DD": [...] }, "motion": {...} }`.
    pub input: PathBuf,

    /// Emit the full result as JSON instead of a formatted report.
    #[arg(long)]
    pub json: bool,

    /// Also print the per-day orb-band record tables (markdown).
    #[arg(long)]
    pub tables: bool,
}

#[derive(Debug, Parser, Clone)]
pub struct SampleArgs {
    /// Output JSON file path.
    pub out: PathBuf,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Range start date (YYYY-MM-DD).
    #[arg(long, default_value = "2025-01-01")]
    pub start: chrono::NaiveDate,

    /// Number of days to generate.
    #[arg(long, default_value_t = 14)]
    pub days: usize,

    /// Number of persistent mover/target pairs.
    #[arg(long, default_value_t = 8)]
    pub pairs: usize,
}
