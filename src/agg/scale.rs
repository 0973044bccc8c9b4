//! Clamp/round helpers with clamp provenance.
//!
//! Every published axis passes through here so clamping is recorded, not
//! silent, and rounding is identical everywhere (half away from zero, one
//! decimal).

/// A value after the final clamp/round step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scaled {
    /// Pre-clamp value (full precision).
    pub raw: f64,
    /// Published value: clamped, rounded to 1 decimal.
    pub value: f64,
    pub hit_min: bool,
    pub hit_max: bool,
}

impl Scaled {
    pub fn clamped(&self) -> bool {
        self.hit_min || self.hit_max
    }
}

/// Round half away from zero at `decimals` places; non-finite becomes 0.
pub fn round_half_up(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Clamp into `[min, max]` and round to 1 decimal, recording which bound hit.
/// Non-finite input collapses to `min` (flagged).
pub fn finalize_axis(raw: f64, min: f64, max: f64) -> Scaled {
    if !raw.is_finite() {
        return Scaled {
            raw,
            value: min,
            hit_min: true,
            hit_max: false,
        };
    }
    let (value, hit_min, hit_max) = if raw < min {
        (min, true, false)
    } else if raw > max {
        (max, false, true)
    } else {
        (raw, false, false)
    };
    Scaled {
        raw,
        value: round_half_up(value, 1),
        hit_min,
        hit_max,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(round_half_up(2.25, 1), 2.3);
        assert_eq!(round_half_up(-2.25, 1), -2.3);
        assert_eq!(round_half_up(2.24, 1), 2.2);
        assert_eq!(round_half_up(f64::NAN, 1), 0.0);
    }

    #[test]
    fn finalize_records_which_bound_hit() {
        let over = finalize_axis(7.3, 0.0, 5.0);
        assert_eq!(over.value, 5.0);
        assert!(over.hit_max && !over.hit_min);
        assert_eq!(over.raw, 7.3);

        let under = finalize_axis(-6.0, -5.0, 5.0);
        assert_eq!(under.value, -5.0);
        assert!(under.hit_min);

        let inside = finalize_axis(3.27, 0.0, 5.0);
        assert_eq!(inside.value, 3.3);
        assert!(!inside.clamped());
    }

    #[test]
    fn non_finite_collapses_to_min() {
        let bad = finalize_axis(f64::NAN, 0.0, 5.0);
        assert_eq!(bad.value, 0.0);
        assert!(bad.hit_min);
    }
}
