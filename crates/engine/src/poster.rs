//! Scroll poster: owns both axis states and drives the per-tick pipeline.

use smoothwheel_model::config::ScrollConfig;
use smoothwheel_model::event::{Axis, OutputEvent, TimestampNs};

use crate::axis::{AxisSnapshot, AxisState};
use crate::dead_zone::DeadZoneGate;
use crate::duration::generate_duration_transition;
use crate::sink::ScrollSink;

/// Orchestrates raw-delta ingestion and tick processing for both axes.
#[derive(Debug, Clone)]
pub struct ScrollPoster {
    config: ScrollConfig,
    trans: f64,
    vertical: AxisState,
    horizontal: AxisState,
}

impl ScrollPoster {
    pub fn new(config: ScrollConfig) -> Self {
        let config = config.sanitized();
        Self {
            trans: generate_duration_transition(config.effective_duration()),
            vertical: AxisState::new(Axis::Vertical, &config),
            horizontal: AxisState::new(Axis::Horizontal, &config),
            config,
        }
    }

    /// Swap the configuration. Running gestures keep their snapshot; the new
    /// values apply from the next gesture.
    pub fn set_config(&mut self, config: ScrollConfig) {
        let config = config.sanitized();
        if config.effective_duration() != self.config.effective_duration() {
            self.trans = generate_duration_transition(config.effective_duration());
            tracing::debug!(trans = self.trans, "duration transition recomputed");
        }
        self.config = config;
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    /// Coefficient for gestures started under the current config.
    pub fn transition(&self) -> f64 {
        self.trans
    }

    /// Ingest a stepped raw wheel delta.
    ///
    /// With smoothing off for the axis (after `invert_smoothing`), the delta
    /// is scaled, gated, sign-corrected and posted immediately.
    pub fn on_raw_delta<S: ScrollSink + ?Sized>(
        &mut self,
        axis: Axis,
        delta: f64,
        now_ns: TimestampNs,
        gain_multiplier: f64,
        invert_smoothing: bool,
        sink: &mut S,
    ) {
        if !delta.is_finite() || !gain_multiplier.is_finite() {
            tracing::warn!(axis = axis.as_str(), delta, "ignoring non-finite raw delta");
            return;
        }

        let options = self.config.axis(axis);
        if options.smooth != invert_smoothing {
            let config = self.config;
            self.axis_mut(axis)
                .on_raw_delta(delta, gain_multiplier, now_ns, &config);
            return;
        }

        let scaled = delta * self.config.gain * gain_multiplier;
        if !scaled.is_finite() {
            tracing::warn!(axis = axis.as_str(), delta, "dropping pass-through delta that overflows");
            return;
        }
        let gated = DeadZoneGate::new(self.config.dead_zone).apply(scaled);
        if gated != 0.0 {
            let value = if options.reverse { -gated } else { gated };
            sink.post(OutputEvent::pass_through(now_ns, axis, value));
        }
    }

    /// Run one tick for every axis with a live gesture.
    pub fn tick<S: ScrollSink + ?Sized>(&mut self, now_ns: TimestampNs, sink: &mut S) {
        for axis in Axis::ALL {
            let state = self.axis_mut(axis);
            if !state.is_ticking() {
                continue;
            }
            let out = state.tick(now_ns);
            if out.decision.tracking_end {
                sink.post(OutputEvent::tracking_end(now_ns, axis));
            }
            if out.value != 0.0 {
                sink.post(OutputEvent::smoothed(now_ns, axis, out.value));
            }
        }
    }

    /// Whether any axis still needs ticks.
    pub fn is_active(&self) -> bool {
        self.vertical.is_ticking() || self.horizontal.is_ticking()
    }

    pub fn axis_snapshot(&self, axis: Axis) -> AxisSnapshot {
        self.axis_ref(axis).snapshot()
    }

    fn axis_ref(&self, axis: Axis) -> &AxisState {
        match axis {
            Axis::Vertical => &self.vertical,
            Axis::Horizontal => &self.horizontal,
        }
    }

    fn axis_mut(&mut self, axis: Axis) -> &mut AxisState {
        match axis {
            Axis::Vertical => &mut self.vertical,
            Axis::Horizontal => &mut self.horizontal,
        }
    }
}

impl Default for ScrollPoster {
    fn default() -> Self {
        Self::new(ScrollConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::GesturePhase;
    use proptest::prelude::*;

    const TICK: TimestampNs = 16_666_666;

    fn run_until_idle(poster: &mut ScrollPoster, start: u64, out: &mut Vec<OutputEvent>) -> u64 {
        let mut k = start;
        while poster.is_active() {
            poster.tick(k * TICK, out);
            k += 1;
            assert!(k < start + 2_000, "poster never went idle");
        }
        k
    }

    #[test]
    fn test_single_delta_gesture() {
        let mut poster = ScrollPoster::default();
        let mut out: Vec<OutputEvent> = Vec::new();
        poster.on_raw_delta(Axis::Vertical, 33.6, 0, 1.0, false, &mut out);
        assert!(out.is_empty());
        assert!(poster.is_active());

        run_until_idle(&mut poster, 1, &mut out);

        let markers: Vec<_> = out.iter().filter(|e| e.tracking_end).collect();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].timestamp_ns, 11 * TICK);
        assert_eq!(markers[0].delta, 0.0);

        let values: Vec<f64> = out.iter().filter(|e| !e.tracking_end).map(|e| e.delta).collect();
        assert_eq!(values.len(), 28);
        assert!((values[0] - 1.773576).abs() < 1e-9);
        assert_eq!(out[0].timestamp_ns, 2 * TICK);
        assert!(values.iter().all(|v| *v > 1.0));
        assert!(out.iter().all(|e| e.synthetic && e.axis == Axis::Vertical));

        assert_eq!(poster.axis_snapshot(Axis::Vertical).phase, GesturePhase::Settled);
    }

    #[test]
    fn test_snap_duration_converges_in_one_tick() {
        let config = ScrollConfig {
            duration: 0.0,
            ..ScrollConfig::default()
        };
        let mut poster = ScrollPoster::new(config);
        let mut out: Vec<OutputEvent> = Vec::new();
        poster.on_raw_delta(Axis::Vertical, 33.6, 0, 1.0, false, &mut out);
        poster.tick(TICK, &mut out);

        let snap = poster.axis_snapshot(Axis::Vertical);
        assert_eq!(poster.transition(), 1.0);
        assert_eq!(snap.current, snap.buffer);
    }

    #[test]
    fn test_pass_through_when_smoothing_disabled() {
        let mut config = ScrollConfig::default();
        config.horizontal.smooth = false;
        config.reverse = true;
        let mut poster = ScrollPoster::new(config);
        let mut out: Vec<OutputEvent> = Vec::new();

        poster.on_raw_delta(Axis::Horizontal, 33.6, 500, 1.0, false, &mut out);
        assert_eq!(out.len(), 1);
        assert!(!out[0].synthetic);
        assert_eq!(out[0].timestamp_ns, 500);
        assert!((out[0].delta + 90.72).abs() < 1e-9);
        assert!(!poster.is_active());

        // Below the dead zone nothing is posted.
        out.clear();
        poster.on_raw_delta(Axis::Horizontal, 0.2, 600, 1.0, false, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_master_smooth_off_passes_both_axes_through() {
        let config = ScrollConfig {
            smooth: false,
            ..ScrollConfig::default()
        };
        let mut poster = ScrollPoster::new(config);
        let mut out: Vec<OutputEvent> = Vec::new();
        poster.on_raw_delta(Axis::Vertical, 33.6, 0, 1.0, false, &mut out);
        poster.on_raw_delta(Axis::Horizontal, -33.6, 0, 1.0, false, &mut out);

        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|e| !e.synthetic));
        assert!(!poster.is_active());
    }

    #[test]
    fn test_axis_reverse_needs_master_reverse() {
        let mut config = ScrollConfig::default();
        config.vertical.smooth = false;
        let mut poster = ScrollPoster::new(config);
        let mut out: Vec<OutputEvent> = Vec::new();

        // Per-axis reverse is on by default but the master switch is off.
        poster.on_raw_delta(Axis::Vertical, 33.6, 0, 1.0, false, &mut out);
        assert!((out[0].delta - 90.72).abs() < 1e-9);

        config.reverse = true;
        poster.set_config(config);
        poster.on_raw_delta(Axis::Vertical, 33.6, 100, 1.0, false, &mut out);
        assert!((out[1].delta + 90.72).abs() < 1e-9);
    }

    #[test]
    fn test_invert_smoothing_flips_axis_mode() {
        let mut poster = ScrollPoster::default();
        let mut out: Vec<OutputEvent> = Vec::new();
        poster.on_raw_delta(Axis::Vertical, 33.6, 0, 1.0, true, &mut out);
        assert_eq!(out.len(), 1);
        assert!(!out[0].synthetic);
        assert!(!poster.is_active());
    }

    #[test]
    fn test_gain_multiplier_scales_buffer() {
        let mut poster = ScrollPoster::default();
        let mut out: Vec<OutputEvent> = Vec::new();
        poster.on_raw_delta(Axis::Vertical, 33.6, 0, 5.0, false, &mut out);
        assert!((poster.axis_snapshot(Axis::Vertical).buffer - 453.6).abs() < 1e-9);
    }

    #[test]
    fn test_axes_are_independent() {
        let mut poster = ScrollPoster::default();
        let mut out: Vec<OutputEvent> = Vec::new();
        poster.on_raw_delta(Axis::Horizontal, -33.6, 0, 1.0, false, &mut out);
        run_until_idle(&mut poster, 1, &mut out);

        assert!(out.iter().all(|e| e.axis == Axis::Horizontal));
        assert!(out.iter().filter(|e| !e.tracking_end).all(|e| e.delta < 0.0));
        assert_eq!(poster.axis_snapshot(Axis::Vertical).phase, GesturePhase::Idle);
    }

    #[test]
    fn test_config_swap_applies_to_next_gesture() {
        let mut poster = ScrollPoster::default();
        let mut out: Vec<OutputEvent> = Vec::new();
        poster.on_raw_delta(Axis::Vertical, 33.6, 0, 1.0, false, &mut out);

        poster.set_config(ScrollConfig {
            duration: 0.0,
            ..ScrollConfig::default()
        });
        assert_eq!(poster.transition(), 1.0);
        poster.tick(TICK, &mut out);
        assert_eq!(poster.axis_snapshot(Axis::Vertical).transition, 0.085);

        let k = run_until_idle(&mut poster, 2, &mut out);
        poster.on_raw_delta(Axis::Vertical, 33.6, k * TICK, 1.0, false, &mut out);
        assert_eq!(poster.axis_snapshot(Axis::Vertical).transition, 1.0);
    }

    #[test]
    fn test_restart_after_settle_starts_clean() {
        let mut poster = ScrollPoster::default();
        let mut first: Vec<OutputEvent> = Vec::new();
        poster.on_raw_delta(Axis::Vertical, 33.6, 0, 1.0, false, &mut first);
        let k = run_until_idle(&mut poster, 1, &mut first);

        let offset = k * TICK;
        let mut second: Vec<OutputEvent> = Vec::new();
        poster.on_raw_delta(Axis::Vertical, 33.6, offset, 1.0, false, &mut second);
        let mut j = 1;
        while poster.is_active() {
            poster.tick(offset + j * TICK, &mut second);
            j += 1;
        }

        let first_deltas: Vec<f64> = first.iter().map(|e| e.delta).collect();
        let second_deltas: Vec<f64> = second.iter().map(|e| e.delta).collect();
        assert_eq!(first_deltas, second_deltas);
    }

    #[test]
    fn test_non_finite_delta_is_ignored() {
        let mut poster = ScrollPoster::default();
        let mut out: Vec<OutputEvent> = Vec::new();
        poster.on_raw_delta(Axis::Vertical, f64::NAN, 0, 1.0, false, &mut out);
        poster.on_raw_delta(Axis::Vertical, f64::INFINITY, 0, 1.0, false, &mut out);
        assert!(!poster.is_active());
        assert!(out.is_empty());

        // Pass-through scaling that overflows is dropped as well.
        poster.on_raw_delta(Axis::Vertical, f64::MAX, 0, 1.0, true, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_huge_finite_deltas_stay_finite_and_settle() {
        let mut poster = ScrollPoster::default();
        let mut out: Vec<OutputEvent> = Vec::new();
        poster.on_raw_delta(Axis::Vertical, 6e307, 0, 1.0, false, &mut out);
        poster.on_raw_delta(Axis::Vertical, 6e307, 0, 1.0, false, &mut out);

        let mut k = 1;
        while poster.is_active() {
            poster.tick(k * TICK, &mut out);
            let snap = poster.axis_snapshot(Axis::Vertical);
            assert!(snap.current.is_finite() && snap.buffer.is_finite());
            k += 1;
            assert!(k < 20_000, "saturated gesture never settled");
        }

        assert!(out.iter().all(|e| e.delta.is_finite()));
        assert_eq!(out.iter().filter(|e| e.tracking_end).count(), 1);
    }

    #[test]
    fn test_zero_dead_zone_posts_every_value_before_settling() {
        let config = ScrollConfig {
            dead_zone: 0.0,
            ..ScrollConfig::default()
        };
        let mut poster = ScrollPoster::new(config);
        let mut out: Vec<OutputEvent> = Vec::new();
        poster.on_raw_delta(Axis::Vertical, 33.6, 0, 1.0, false, &mut out);

        let mut k = 1;
        while poster.is_active() {
            let before = out.len();
            poster.tick(k * TICK, &mut out);
            let posted_value = out[before..].iter().any(|e| !e.tracking_end);
            if posted_value {
                assert_eq!(poster.axis_snapshot(Axis::Vertical).settled_tick_count, 0);
            }
            k += 1;
            assert!(k < 2_000, "poster never went idle");
        }

        let last_value = out.iter().rev().find(|e| !e.tracking_end).unwrap();
        assert!(last_value.timestamp_ns <= (k - 7) * TICK);
    }

    proptest! {
        #[test]
        fn prop_reverse_is_bitwise_negation(
            deltas in proptest::collection::vec((-200.0f64..200.0, 0u64..15), 1..8),
            duration in 0.0f64..5.0,
            dead_zone in 0.0f64..3.0,
        ) {
            let base = ScrollConfig { duration, dead_zone, ..ScrollConfig::default() };
            let mut reversed = base;
            reversed.reverse = true;

            let mut plain_poster = ScrollPoster::new(base);
            let mut rev_poster = ScrollPoster::new(reversed);
            let mut plain_out: Vec<OutputEvent> = Vec::new();
            let mut rev_out: Vec<OutputEvent> = Vec::new();

            let mut k = 0u64;
            for (delta, gap) in deltas {
                if delta == 0.0 {
                    continue;
                }
                plain_poster.on_raw_delta(Axis::Vertical, delta, k * TICK, 1.0, false, &mut plain_out);
                rev_poster.on_raw_delta(Axis::Vertical, delta, k * TICK, 1.0, false, &mut rev_out);
                for _ in 0..gap {
                    k += 1;
                    plain_poster.tick(k * TICK, &mut plain_out);
                    rev_poster.tick(k * TICK, &mut rev_out);
                }
            }
            while plain_poster.is_active() && k < 5_000 {
                k += 1;
                plain_poster.tick(k * TICK, &mut plain_out);
                rev_poster.tick(k * TICK, &mut rev_out);
            }

            prop_assert_eq!(plain_out.len(), rev_out.len());
            for (a, b) in plain_out.iter().zip(&rev_out) {
                prop_assert_eq!(a.tracking_end, b.tracking_end);
                prop_assert_eq!(a.timestamp_ns, b.timestamp_ns);
                if !a.tracking_end {
                    prop_assert_eq!(a.delta.to_bits(), (-b.delta).to_bits());
                }
            }
        }

        #[test]
        fn prop_tracking_end_once_per_burst(
            count in 1usize..6,
            spacing in 1u64..10,
        ) {
            let mut poster = ScrollPoster::default();
            let mut out: Vec<OutputEvent> = Vec::new();
            let mut k = 0u64;
            for _ in 0..count {
                poster.on_raw_delta(Axis::Vertical, 33.6, k * TICK, 1.0, false, &mut out);
                for _ in 0..spacing {
                    k += 1;
                    poster.tick(k * TICK, &mut out);
                }
            }
            while poster.is_active() && k < 5_000 {
                k += 1;
                poster.tick(k * TICK, &mut out);
            }
            prop_assert_eq!(out.iter().filter(|e| e.tracking_end).count(), 1);
            prop_assert!(!poster.is_active());
        }
    }
}
