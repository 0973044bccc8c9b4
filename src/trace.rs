//! Diagnostics tracing.
//!
//! Two layers:
//!
//! - [`TransformTrace`], a compact audit of the normalize→scale→clamp→round
//!   pipeline, embedded in every result's diagnostics
//! - [`TraceSink`], a caller-injected sink that receives every intermediate
//!   value as a structured event
//!
//! Tracing is additive instrumentation: a sink receives events by reference
//! and must swallow its own failures; nothing it does can alter the
//! published axes.

use serde::{Deserialize, Serialize};

use crate::domain::ScalingMethod;

/// One pipeline stage snapshot (magnitude / bias / volatility triple).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceStage {
    pub stage: String,
    pub magnitude: f64,
    pub bias: f64,
    pub volatility: f64,
}

/// A clamp that changed a published value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClampEvent {
    pub axis: String,
    pub raw: f64,
    pub clamped: f64,
}

/// Compact transformation audit carried in the result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformTrace {
    /// Calibration profile the values were produced under.
    pub calibration_version: String,
    pub stages: Vec<TraceStage>,
    pub clamp_events: Vec<ClampEvent>,
}

impl TransformTrace {
    pub fn push_stage(&mut self, stage: &str, magnitude: f64, bias: f64, volatility: f64) {
        self.stages.push(TraceStage {
            stage: stage.to_string(),
            magnitude,
            bias,
            volatility,
        });
    }

    pub fn push_clamp(&mut self, axis: &str, raw: f64, clamped: f64) {
        self.clamp_events.push(ClampEvent {
            axis: axis.to_string(),
            raw,
            clamped,
        });
    }
}

/// Fine-grained pipeline events for an injected sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum TraceEvent {
    InputReceived {
        record_count: usize,
        has_prev_context: bool,
        rolling_samples: usize,
    },
    RecordsScored {
        count: usize,
        positive: usize,
        negative: usize,
        min: f64,
        max: f64,
    },
    CrisisCap {
        triggered: bool,
        reduction: f64,
    },
    RollingWindow {
        method: ScalingMethod,
        samples: usize,
        reference: Option<f64>,
        lambda: f64,
    },
    MagnitudeNormalized {
        energy: f64,
        value: f64,
        clamped: bool,
    },
    BiasNormalized {
        energy: f64,
        amplified: f64,
        value: f64,
        clamped: bool,
    },
    Volatility {
        tight_band_changes: usize,
        sign_flip: bool,
        outer_tightening: usize,
        fast_outer_active: bool,
        dispersion: f64,
        index: f64,
    },
    Final {
        magnitude: f64,
        directional_bias: f64,
        volatility: f64,
    },
}

/// Caller-injected structured sink.
///
/// Implementations must not fail the pipeline: swallow I/O errors internally.
pub trait TraceSink {
    fn record(&mut self, event: &TraceEvent);
}

/// Sink that discards everything (the default).
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTrace;

impl TraceSink for NullTrace {
    fn record(&mut self, _event: &TraceEvent) {}
}

/// Sink that collects events in memory, for tests and offline inspection.
#[derive(Debug, Clone, Default)]
pub struct MemoryTrace {
    pub events: Vec<TraceEvent>,
}

impl TraceSink for MemoryTrace {
    fn record(&mut self, event: &TraceEvent) {
        self.events.push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_trace_collects_in_order() {
        let mut sink = MemoryTrace::default();
        sink.record(&TraceEvent::InputReceived {
            record_count: 3,
            has_prev_context: false,
            rolling_samples: 0,
        });
        sink.record(&TraceEvent::Final {
            magnitude: 1.0,
            directional_bias: -0.5,
            volatility: 0.0,
        });
        assert_eq!(sink.events.len(), 2);
        assert!(matches!(sink.events[0], TraceEvent::InputReceived { record_count: 3, .. }));
    }

    #[test]
    fn transform_trace_serializes_to_plain_json() {
        let mut trace = TransformTrace {
            calibration_version: "5.0".into(),
            ..Default::default()
        };
        trace.push_stage("raw", 2.0, -1.0, 0.0);
        trace.push_clamp("directional_bias", -7.2, -5.0);
        let json = serde_json::to_value(&trace).unwrap();
        assert_eq!(json["stages"][0]["stage"], "raw");
        assert_eq!(json["clamp_events"][0]["axis"], "directional_bias");
    }
}
