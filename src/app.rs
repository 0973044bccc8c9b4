//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads the JSON input contract
//! - runs the range fold
//! - prints reports or JSON
//! - writes sample files

use std::fs;

use clap::Parser;

use crate::catalog::Catalog;
use crate::cli::{Command, RunArgs, SampleArgs};
use crate::domain::EngineConfig;
use crate::error::EngineError;
use crate::range::{run_range, RangeInput};
use crate::report;
use crate::sample::{generate_range, SampleConfig};

/// Entry point for the `seismo` binary.
pub fn run() -> Result<(), EngineError> {
    let cli = crate::cli::Cli::parse();
    match cli.command {
        Command::Run(args) => handle_run(args),
        Command::Sample(args) => handle_sample(args),
    }
}

fn handle_run(args: RunArgs) -> Result<(), EngineError> {
    let text = fs::read_to_string(&args.input).map_err(|e| {
        EngineError::invalid(format!("Failed to read input '{}': {e}", args.input.display()))
    })?;
    let input: RangeInput = serde_json::from_str(&text).map_err(|e| {
        EngineError::invalid(format!("Failed to parse input '{}': {e}", args.input.display()))
    })?;

    let catalog = Catalog::new();
    let config = EngineConfig::default();
    let output = run_range(&input, &catalog, &config)?;

    if args.json {
        let json = serde_json::to_string_pretty(&output)
            .map_err(|e| EngineError::new(4, format!("Failed to serialize output: {e}")))?;
        println!("{json}");
        return Ok(());
    }

    println!("{}", report::format_daily_rows(&output.days));
    println!("{}", report::format_range_summary(&output));

    if args.tables {
        let mut prev: Option<&[crate::domain::ScoredRecord]> = None;
        for day in &output.days {
            let bands = report::record_table(&day.result.scored, prev);
            println!("## {}\n{}", day.date, bands.markdown);
            prev = Some(&day.result.scored);
        }
    }

    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), EngineError> {
    let config = SampleConfig {
        seed: args.seed,
        start: args.start,
        days: args.days,
        pairs: args.pairs,
        ..SampleConfig::default()
    };
    let input = generate_range(&config)?;
    let json = serde_json::to_string_pretty(&input)
        .map_err(|e| EngineError::new(4, format!("Failed to serialize sample: {e}")))?;
    fs::write(&args.out, json).map_err(|e| {
        EngineError::invalid(format!("Failed to write sample '{}': {e}", args.out.display()))
    })?;
    println!(
        "Wrote {} days × {} pairs to {} (seed {}).",
        args.days,
        args.pairs,
        args.out.display(),
        args.seed
    );
    Ok(())
}
