//! Reporting utilities: axis labels, record tables, and formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the scoring/aggregation code stays clean and testable
//! - output changes are localized

pub mod format;
pub mod table;

pub use format::{
    bias_label, format_daily_rows, format_range_summary, magnitude_label, volatility_label,
};
pub use table::{record_table, Phase, RecordBands};
