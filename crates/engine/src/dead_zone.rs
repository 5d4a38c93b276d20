//! Dead-zone suppression of sub-threshold output.

/// Suppresses output magnitudes at or below a threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeadZoneGate {
    threshold: f64,
}

impl DeadZoneGate {
    /// Negative or non-finite thresholds behave as zero (no suppression).
    pub fn new(dead_zone: f64) -> Self {
        let threshold = if dead_zone.is_finite() {
            dead_zone.max(0.0)
        } else {
            0.0
        };
        Self { threshold }
    }

    #[inline]
    pub fn apply(&self, filtered: f64) -> f64 {
        if filtered.abs() > self.threshold {
            filtered
        } else {
            0.0
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_boundary_is_suppressed() {
        let gate = DeadZoneGate::new(1.0);
        assert_eq!(gate.apply(1.0), 0.0);
        assert_eq!(gate.apply(-1.0), 0.0);
        assert_eq!(gate.apply(1.0001), 1.0001);
        assert_eq!(gate.apply(-3.5), -3.5);
    }

    #[test]
    fn test_negative_dead_zone_is_zero() {
        let gate = DeadZoneGate::new(-4.0);
        assert_eq!(gate.threshold(), 0.0);
        assert_eq!(gate.apply(0.25), 0.25);
        assert_eq!(gate.apply(0.0), 0.0);
        assert_eq!(DeadZoneGate::new(f64::NAN).threshold(), 0.0);
    }

    proptest! {
        #[test]
        fn prop_inside_dead_zone_is_exactly_zero(
            dead_zone in 0.0f64..50.0,
            fraction in -1.0f64..=1.0,
        ) {
            let gate = DeadZoneGate::new(dead_zone);
            let filtered = dead_zone * fraction;
            prop_assert_eq!(gate.apply(filtered), 0.0);
        }

        #[test]
        fn prop_outside_dead_zone_is_untouched(
            dead_zone in 0.0f64..50.0,
            excess in 0.001f64..100.0,
            negative in any::<bool>(),
        ) {
            let gate = DeadZoneGate::new(dead_zone);
            let filtered = if negative { -(dead_zone + excess) } else { dead_zone + excess };
            prop_assert_eq!(gate.apply(filtered), filtered);
        }
    }
}
