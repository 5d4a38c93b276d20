//! Per-axis smoothing state.

use smoothwheel_model::config::ScrollConfig;
use smoothwheel_model::event::{Axis, TimestampNs};

use crate::dead_zone::DeadZoneGate;
use crate::duration::generate_duration_transition;
use crate::filter::ScrollFilter;
use crate::interpolator;
use crate::lifecycle::{GestureLifecycleTracker, GesturePhase, TickDecision, SETTLE_EPSILON};

/// Parameters frozen for the duration of one gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSnapshot {
    pub trans: f64,
    pub gain: f64,
    pub gate: DeadZoneGate,
    pub reverse: bool,
}

impl GestureSnapshot {
    pub fn capture(config: &ScrollConfig, axis: Axis) -> Self {
        Self {
            trans: generate_duration_transition(config.effective_duration()),
            gain: config.gain,
            gate: DeadZoneGate::new(config.dead_zone),
            reverse: config.axis(axis).reverse,
        }
    }
}

/// Result of running the pipeline for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutput {
    /// Value to emit (already sign-corrected), or `0.0` for nothing.
    pub value: f64,
    pub decision: TickDecision,
}

/// Smoothing state of one axis.
///
/// Lives as long as the engine; a gesture is a sub-lifetime tracked by the
/// lifecycle tracker.
#[derive(Debug, Clone)]
pub struct AxisState {
    axis: Axis,
    current: f64,
    buffer: f64,
    delta_prev: f64,
    filter: ScrollFilter,
    lifecycle: GestureLifecycleTracker,
    snapshot: GestureSnapshot,
    last_interpolated: f64,
    last_filtered: f64,
}

impl AxisState {
    pub fn new(axis: Axis, config: &ScrollConfig) -> Self {
        Self {
            axis,
            current: 0.0,
            buffer: 0.0,
            delta_prev: 0.0,
            filter: ScrollFilter::new(),
            lifecycle: GestureLifecycleTracker::new(),
            snapshot: GestureSnapshot::capture(config, axis),
            last_interpolated: 0.0,
            last_filtered: 0.0,
        }
    }

    /// Ingest a stepped raw delta.
    ///
    /// A delta with the same sign as the previous one accumulates into the
    /// target; an opposite-sign or first delta replaces it and snaps
    /// `current` to zero.
    pub fn on_raw_delta(
        &mut self,
        delta: f64,
        gain_multiplier: f64,
        now_ns: TimestampNs,
        config: &ScrollConfig,
    ) {
        if !self.lifecycle.phase().is_ticking() {
            self.reset_motion();
            self.snapshot = GestureSnapshot::capture(config, self.axis);
            tracing::debug!(
                axis = self.axis.as_str(),
                trans = self.snapshot.trans,
                gain = self.snapshot.gain,
                "gesture started"
            );
        }

        let scaled = delta * self.snapshot.gain * gain_multiplier;
        if !scaled.is_finite() {
            tracing::warn!(axis = self.axis.as_str(), delta, "dropping non-finite delta");
            return;
        }

        if delta * self.delta_prev > 0.0 {
            let next = self.buffer + scaled;
            self.buffer = if next.is_finite() {
                next
            } else {
                tracing::warn!(axis = self.axis.as_str(), "scroll target saturated");
                f64::MAX.copysign(next)
            };
        } else {
            self.buffer = scaled;
            self.current = 0.0;
        }
        self.delta_prev = delta;
        self.lifecycle.on_manual_input(now_ns);
    }

    /// Run interpolation, filtering, gating, and the lifecycle for one tick.
    pub fn tick(&mut self, now_ns: TimestampNs) -> TickOutput {
        let interpolated = interpolator::advance(&mut self.current, self.buffer, self.snapshot.trans);
        let mut filtered = self.filter.fill(interpolated);
        let residual = (self.buffer - self.current).abs();

        if !(residual.is_finite() && filtered.is_finite()) {
            tracing::warn!(axis = self.axis.as_str(), "non-finite smoothing state, ending gesture");
            let decision = self.lifecycle.abort();
            self.reset_motion();
            return TickOutput { value: 0.0, decision };
        }

        // Once coasting below float noise, finish the approach so the tail
        // reaches exactly zero.
        if self.lifecycle.manual_input_ended()
            && residual <= SETTLE_EPSILON
            && filtered.abs() <= SETTLE_EPSILON
        {
            self.current = self.buffer;
            self.filter.reset();
            filtered = 0.0;
        }

        let gated = self.snapshot.gate.apply(filtered);
        self.last_interpolated = interpolated;
        self.last_filtered = filtered;

        let decision = self
            .lifecycle
            .decide(now_ns, residual, gated, self.snapshot.gate.threshold());

        if decision.tracking_end {
            tracing::debug!(axis = self.axis.as_str(), "manual input ended, coasting");
        }

        let value = if decision.settled {
            tracing::debug!(axis = self.axis.as_str(), "gesture settled");
            self.reset_motion();
            0.0
        } else if self.snapshot.reverse {
            -gated
        } else {
            gated
        };

        TickOutput { value, decision }
    }

    fn reset_motion(&mut self) {
        self.current = 0.0;
        self.buffer = 0.0;
        self.delta_prev = 0.0;
        self.filter.reset();
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn phase(&self) -> GesturePhase {
        self.lifecycle.phase()
    }

    pub fn is_ticking(&self) -> bool {
        self.lifecycle.phase().is_ticking()
    }

    /// Copy of the state for tuning and visualization tools.
    pub fn snapshot(&self) -> AxisSnapshot {
        AxisSnapshot {
            axis: self.axis,
            phase: self.lifecycle.phase(),
            current: self.current,
            buffer: self.buffer,
            delta_prev: self.delta_prev,
            filter_baseline: self.filter.baseline(),
            last_manual_input_ns: self.lifecycle.last_manual_input_ns(),
            manual_input_ended: self.lifecycle.manual_input_ended(),
            tracking_end_inserted: self.lifecycle.tracking_end_inserted(),
            settled_tick_count: self.lifecycle.settled_tick_count(),
            transition: self.snapshot.trans,
            last_interpolated: self.last_interpolated,
            last_filtered: self.last_filtered,
        }
    }
}

/// Read-only view of an axis for introspection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisSnapshot {
    pub axis: Axis,
    pub phase: GesturePhase,
    pub current: f64,
    pub buffer: f64,
    pub delta_prev: f64,
    pub filter_baseline: f64,
    pub last_manual_input_ns: TimestampNs,
    pub manual_input_ended: bool,
    pub tracking_end_inserted: bool,
    pub settled_tick_count: u32,
    pub transition: f64,
    pub last_interpolated: f64,
    pub last_filtered: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: TimestampNs = 16_666_666;

    fn state() -> AxisState {
        AxisState::new(Axis::Vertical, &ScrollConfig::default())
    }

    #[test]
    fn test_same_sign_accumulates() {
        let config = ScrollConfig::default();
        let mut axis = state();
        axis.on_raw_delta(33.6, 1.0, 0, &config);
        let first = axis.snapshot().buffer;
        axis.tick(TICK);
        axis.on_raw_delta(33.6, 1.0, TICK, &config);
        let second = axis.snapshot();

        assert!((first - 90.72).abs() < 1e-9);
        assert!(second.buffer.abs() > first.abs());
        assert!((second.buffer - 181.44).abs() < 1e-9);
        assert!(second.current > 0.0);
    }

    #[test]
    fn test_opposite_sign_resets() {
        let config = ScrollConfig::default();
        let mut axis = state();
        axis.on_raw_delta(33.6, 1.0, 0, &config);
        axis.tick(TICK);
        axis.tick(2 * TICK);
        axis.on_raw_delta(-33.6, 1.0, 2 * TICK, &config);

        let snap = axis.snapshot();
        assert!((snap.buffer + 90.72).abs() < 1e-9);
        assert_eq!(snap.current, 0.0);
        assert_eq!(snap.delta_prev, -33.6);
    }

    #[test]
    fn test_first_tick_interpolates_but_emits_baseline() {
        let config = ScrollConfig::default();
        let mut axis = state();
        axis.on_raw_delta(33.6, 1.0, 0, &config);
        let out = axis.tick(TICK);

        let snap = axis.snapshot();
        assert!((snap.last_interpolated - 7.7112).abs() < 1e-9);
        assert!((snap.current - 7.7112).abs() < 1e-9);
        assert_eq!(snap.last_filtered, 0.0);
        assert_eq!(out.value, 0.0);

        let out = axis.tick(2 * TICK);
        assert!((out.value - 1.773576).abs() < 1e-9);
    }

    #[test]
    fn test_reverse_negates_output() {
        let mut config = ScrollConfig::default();
        let mut plain = state();
        plain.on_raw_delta(33.6, 1.0, 0, &config);

        config.reverse = true;
        let mut reversed = AxisState::new(Axis::Vertical, &config);
        reversed.on_raw_delta(33.6, 1.0, 0, &config);

        for k in 1..30 {
            let a = plain.tick(k * TICK).value;
            let b = reversed.tick(k * TICK).value;
            assert_eq!(a.to_bits(), (-b).to_bits());
        }
    }

    #[test]
    fn test_settlement_resets_motion() {
        let config = ScrollConfig::default();
        let mut axis = state();
        axis.on_raw_delta(33.6, 1.0, 0, &config);
        let mut k = 1;
        while axis.is_ticking() {
            axis.tick(k * TICK);
            k += 1;
            assert!(k < 1_000, "gesture never settled");
        }
        let snap = axis.snapshot();
        assert_eq!(snap.phase, GesturePhase::Settled);
        assert_eq!(snap.buffer, 0.0);
        assert_eq!(snap.current, 0.0);
        assert_eq!(snap.filter_baseline, 0.0);
    }

    #[test]
    fn test_overflowing_accumulation_saturates() {
        let config = ScrollConfig::default();
        let mut axis = state();
        axis.on_raw_delta(6e307, 1.0, 0, &config);
        axis.on_raw_delta(6e307, 1.0, 0, &config);
        assert_eq!(axis.snapshot().buffer, f64::MAX);

        axis.on_raw_delta(-6e307, 1.0, 0, &config);
        axis.on_raw_delta(-6e307, 1.0, 0, &config);
        assert_eq!(axis.snapshot().buffer, -f64::MAX);

        let out = axis.tick(TICK);
        assert!(out.value.is_finite());
        assert!(axis.snapshot().current.is_finite());
    }

    #[test]
    fn test_non_finite_state_ends_gesture() {
        let config = ScrollConfig::default();
        let mut axis = state();
        axis.on_raw_delta(33.6, 1.0, 0, &config);
        axis.current = f64::NEG_INFINITY;

        let out = axis.tick(TICK);
        assert_eq!(out.value, 0.0);
        assert!(out.decision.tracking_end && out.decision.settled);
        assert!(!axis.is_ticking());
        assert_eq!(axis.snapshot().current, 0.0);
        assert_eq!(axis.snapshot().buffer, 0.0);
    }

    #[test]
    fn test_zero_dead_zone_tail_reaches_zero() {
        let config = ScrollConfig {
            dead_zone: 0.0,
            ..ScrollConfig::default()
        };
        let mut axis = AxisState::new(Axis::Vertical, &config);
        axis.on_raw_delta(33.6, 1.0, 0, &config);

        let mut k = 1;
        let mut last_value = 0.0;
        while axis.is_ticking() {
            let out = axis.tick(k * TICK);
            if out.value != 0.0 {
                assert_eq!(axis.snapshot().settled_tick_count, 0);
                assert!(!out.decision.settled);
            }
            last_value = out.value;
            k += 1;
            assert!(k < 2_000, "gesture never settled");
        }
        assert_eq!(last_value, 0.0);
    }

    #[test]
    fn test_snapshot_is_frozen_until_next_gesture() {
        let mut config = ScrollConfig::default();
        let mut axis = state();
        axis.on_raw_delta(33.6, 1.0, 0, &config);

        config.duration = 0.0;
        config.gain = 1.0;
        axis.on_raw_delta(33.6, 1.0, TICK, &config);
        assert_eq!(axis.snapshot().transition, 0.085);
        assert!((axis.snapshot().buffer - 181.44).abs() < 1e-9);
    }
}
