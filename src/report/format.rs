//! Axis classification labels and terminal report formatting.

use crate::range::{DayResult, RangeOutput};

/// Magnitude band label.
pub fn magnitude_label(value: f64) -> &'static str {
    if !value.is_finite() {
        return "n/a";
    }
    if value >= 4.0 {
        "Peak"
    } else if value >= 2.0 {
        "Active"
    } else if value >= 1.0 {
        "Murmur"
    } else {
        "Latent"
    }
}

/// Directional bias band label.
pub fn bias_label(value: f64) -> &'static str {
    if !value.is_finite() {
        return "Equilibrium";
    }
    if value >= 3.0 {
        "Strong Outward"
    } else if value >= 1.0 {
        "Mild Outward"
    } else if value >= -1.0 {
        "Equilibrium"
    } else if value >= -3.0 {
        "Mild Inward"
    } else {
        "Strong Inward"
    }
}

/// Volatility band label.
pub fn volatility_label(value: f64) -> &'static str {
    if !value.is_finite() {
        return "n/a";
    }
    if value <= 0.5 {
        "Aligned Flow"
    } else if value <= 2.0 {
        "Cycled Pull"
    } else if value <= 3.0 {
        "Mixed Paths"
    } else if value <= 5.0 {
        "Fragment Scatter"
    } else {
        "Vortex Dispersion"
    }
}

/// Format the range summary block.
pub fn format_range_summary(output: &RangeOutput) -> String {
    let s = &output.summary;
    let mut out = String::new();

    out.push_str("=== seismo - Field Aggregation Summary ===\n");
    out.push_str(&format!("Days: {}\n", s.days));
    out.push_str(&format!(
        "Magnitude: {:.1} ({}){}\n",
        s.magnitude,
        magnitude_label(s.magnitude),
        if s.magnitude_clamped { " [clamped]" } else { "" }
    ));
    out.push_str(&format!(
        "Directional bias: {:+.1} ({}){}\n",
        s.directional_bias.value,
        bias_label(s.directional_bias.value),
        if s.directional_bias.clamped {
            " [clamped]"
        } else {
            ""
        }
    ));
    out.push_str(&format!(
        "Volatility: {:.1} ({})\n",
        s.volatility,
        volatility_label(s.volatility)
    ));
    out
}

/// Format one row per day: date, axes, record count, crisis marker.
pub fn format_daily_rows(days: &[DayResult]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<12} {:>9} {:>6} {:>10} {:>8} {:<6}\n",
        "date", "magnitude", "bias", "volatility", "records", "crisis"
    ));
    out.push_str(&format!(
        "{:-<12} {:-<9} {:-<6} {:-<10} {:-<8} {:-<6}\n",
        "", "", "", "", "", ""
    ));

    for day in days {
        let r = &day.result;
        let crisis = r
            .diagnostics
            .as_ref()
            .map(|d| d.crisis_triggered)
            .unwrap_or(false);
        out.push_str(&format!(
            "{:<12} {:>9.1} {:>+6.1} {:>10.1} {:>8} {:<6}\n",
            day.date,
            r.magnitude,
            r.directional_bias.value,
            r.volatility,
            r.scored.len(),
            if crisis { "*" } else { "" }
        ));
    }
    out
}
