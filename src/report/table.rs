//! Orb-band record table with day-over-day phase tracking.
//!
//! Scored records are grouped by proximity band (exact ≤0.5°, tight ≤2°,
//! moderate ≤6°, wide beyond), annotated with a phase arrow versus the
//! previous day (tightening/separating), and rendered as markdown for
//! narrative consumers.

use std::collections::HashMap;

use crate::agg::scale::round_half_up;
use crate::domain::ScoredRecord;

/// Phase of a record relative to the previous day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Tightening,
    Separating,
    Steady,
}

impl Phase {
    pub fn arrow(self) -> &'static str {
        match self {
            Phase::Tightening => "↑",
            Phase::Separating => "↓",
            Phase::Steady => "—",
        }
    }
}

/// One table row, sorted tightest-first within its band.
#[derive(Debug, Clone)]
pub struct TableRow {
    pub mover: String,
    pub kind: String,
    pub target: String,
    pub orb: f64,
    pub phase: Phase,
    pub score: f64,
}

/// Records grouped by orb band, plus a rendered markdown table.
#[derive(Debug, Clone)]
pub struct RecordBands {
    pub exact: Vec<TableRow>,
    pub tight: Vec<TableRow>,
    pub moderate: Vec<TableRow>,
    pub wide: Vec<TableRow>,
    pub markdown: String,
}

/// Build the banded table for a day, with phases against the previous day.
pub fn record_table(today: &[ScoredRecord], prev: Option<&[ScoredRecord]>) -> RecordBands {
    if today.is_empty() {
        return RecordBands {
            exact: Vec::new(),
            tight: Vec::new(),
            moderate: Vec::new(),
            wide: Vec::new(),
            markdown: "No records for this date.".to_string(),
        };
    }

    let prev_orbs: HashMap<String, f64> = prev
        .unwrap_or(&[])
        .iter()
        .map(|r| (r.key(), r.proximity_deg))
        .collect();

    let mut rows: Vec<TableRow> = today
        .iter()
        .map(|rec| {
            let phase = match prev_orbs.get(&rec.key()) {
                Some(prev_orb) if rec.proximity_deg < *prev_orb => Phase::Tightening,
                Some(prev_orb) if rec.proximity_deg > *prev_orb => Phase::Separating,
                _ => Phase::Steady,
            };
            TableRow {
                mover: rec.mover.id.clone(),
                kind: rec.kind.as_str().to_string(),
                target: rec.target.id.clone(),
                orb: round_half_up(rec.proximity_deg, 1),
                phase,
                score: round_half_up(rec.score, 2),
            }
        })
        .collect();
    rows.sort_by(|a, b| a.orb.partial_cmp(&b.orb).unwrap_or(std::cmp::Ordering::Equal));

    let mut bands = RecordBands {
        exact: Vec::new(),
        tight: Vec::new(),
        moderate: Vec::new(),
        wide: Vec::new(),
        markdown: String::new(),
    };
    for row in rows {
        if row.orb <= 0.5 {
            bands.exact.push(row);
        } else if row.orb <= 2.0 {
            bands.tight.push(row);
        } else if row.orb <= 6.0 {
            bands.moderate.push(row);
        } else {
            bands.wide.push(row);
        }
    }

    let mut markdown = String::new();
    for (rows, title) in [
        (&bands.exact, "Exact (≤0.5°)"),
        (&bands.tight, "Tight (0.5° - 2°)"),
        (&bands.moderate, "Moderate (2° - 6°)"),
        (&bands.wide, "Wide (>6°)"),
    ] {
        if !rows.is_empty() {
            markdown.push_str(&band_markdown(rows, title));
        }
    }
    if markdown.is_empty() {
        markdown = "No records for this date.".to_string();
    }
    bands.markdown = markdown;
    bands
}

fn band_markdown(rows: &[TableRow], title: &str) -> String {
    let mut out = format!("\n**{title}**\n\n");
    out.push_str("| Mover | Kind | Target | Orb (°) | Phase | Score |\n");
    out.push_str("| - | - | - | - | - | - |\n");
    for row in rows {
        out.push_str(&format!(
            "| {} | {} | {} | {:.1} | {} | {}{} |\n",
            row.mover,
            row.kind,
            row.target,
            row.orb,
            row.phase.arrow(),
            if row.score >= 0.0 { "+" } else { "" },
            row.score
        ));
    }
    out
}
