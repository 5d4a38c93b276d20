//! Duration knob to per-tick convergence coefficient.

use smoothwheel_model::config::MAX_DURATION;

/// Headroom above `MAX_DURATION` so the coefficient never reaches zero.
pub const TRANSITION_UPPER_LIMIT: f64 = 5.2;

/// Map the user-facing `duration` to the interpolation coefficient.
///
/// `trans = round3(1 - sqrt(clamp(duration, 0, 5) / 5.2))`. The result lies
/// in `(0, 1]`; `duration = 0` yields `1` (snap to target), larger durations
/// give smaller coefficients and longer tails. Non-finite input is treated
/// as zero.
pub fn generate_duration_transition(duration: f64) -> f64 {
    let clamped = if duration.is_finite() {
        duration.clamp(0.0, MAX_DURATION)
    } else {
        0.0
    };
    round3(1.0 - (clamped / TRANSITION_UPPER_LIMIT).sqrt())
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_duration_snaps() {
        assert_eq!(generate_duration_transition(0.0), 1.0);
    }

    #[test]
    fn test_default_duration() {
        assert_eq!(generate_duration_transition(4.35), 0.085);
    }

    #[test]
    fn test_clamps_out_of_range() {
        assert_eq!(
            generate_duration_transition(12.0),
            generate_duration_transition(MAX_DURATION)
        );
        assert_eq!(generate_duration_transition(-3.0), 1.0);
        assert_eq!(generate_duration_transition(f64::NAN), 1.0);
    }

    #[test]
    fn test_never_reaches_zero() {
        let slowest = generate_duration_transition(MAX_DURATION);
        assert!(slowest > 0.0 && slowest < 0.05, "got {slowest}");
    }

    #[test]
    fn test_monotonic_in_duration() {
        let mut prev = f64::INFINITY;
        for i in 0..=50 {
            let trans = generate_duration_transition(i as f64 / 10.0);
            assert!(trans <= prev, "not monotonic at {}", i as f64 / 10.0);
            prev = trans;
        }
    }
}
