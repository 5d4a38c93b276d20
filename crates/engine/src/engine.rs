//! Engine facade: classifier, hotkey gate, and poster behind one entry point.

use smoothwheel_model::config::ScrollProfile;
use smoothwheel_model::event::{Axis, InputEvent, TimestampNs};

use crate::axis::AxisSnapshot;
use crate::classifier::{Classified, EventClassifier};
use crate::hotkey_gate::{GateDecision, HotkeyGate};
use crate::poster::ScrollPoster;
use crate::sink::{MarkersOnly, ScrollSink};

/// Complete scroll shaping pipeline for one session.
///
/// Not thread-safe by construction: the owner serializes event intake and
/// ticks on a single execution context.
#[derive(Debug, Clone)]
pub struct ScrollEngine {
    classifier: EventClassifier,
    gate: HotkeyGate,
    poster: ScrollPoster,
}

impl ScrollEngine {
    pub fn new(profile: ScrollProfile, dash_multiplier: f64) -> Self {
        Self {
            classifier: EventClassifier::new(profile.scroll.step),
            gate: HotkeyGate::new(profile.hotkeys, dash_multiplier),
            poster: ScrollPoster::new(profile.scroll),
        }
    }

    /// Replace config and bindings. In-flight gestures finish with the
    /// parameters they started with.
    pub fn set_profile(&mut self, profile: ScrollProfile) {
        self.classifier.set_step(profile.scroll.step);
        self.gate.set_bindings(profile.hotkeys);
        self.poster.set_config(profile.scroll);
        tracing::debug!("scroll profile updated");
    }

    pub fn set_dash_multiplier(&mut self, dash_multiplier: f64) {
        self.gate.set_dash_multiplier(dash_multiplier);
    }

    /// Feed one input event. Pass-through output is posted immediately.
    pub fn handle<S: ScrollSink + ?Sized>(&mut self, event: &InputEvent, sink: &mut S) {
        match self.classifier.classify(event) {
            Some(Classified::Wheel { axis, delta }) => match self.gate.evaluate(self.classifier.held()) {
                GateDecision::Block => {
                    tracing::trace!(axis = axis.as_str(), delta, "wheel delta blocked");
                }
                GateDecision::Pass {
                    gain_multiplier,
                    invert_smoothing,
                } => self.poster.on_raw_delta(
                    axis,
                    delta,
                    event.timestamp_ns,
                    gain_multiplier,
                    invert_smoothing,
                    sink,
                ),
            },
            Some(Classified::Hotkey {
                descriptor,
                pressed,
            }) => {
                tracing::trace!(
                    kind = ?descriptor.kind,
                    code = descriptor.code,
                    pressed,
                    "hotkey input"
                );
            }
            None => {}
        }
    }

    /// Run one tick. While blocked only tracking-end markers get through.
    pub fn tick<S: ScrollSink + ?Sized>(&mut self, now_ns: TimestampNs, sink: &mut S) {
        if self.gate.evaluate(self.classifier.held()).is_blocked() {
            self.poster.tick(now_ns, &mut MarkersOnly::new(sink));
        } else {
            self.poster.tick(now_ns, sink);
        }
    }

    pub fn is_active(&self) -> bool {
        self.poster.is_active()
    }

    pub fn axis_snapshot(&self, axis: Axis) -> AxisSnapshot {
        self.poster.axis_snapshot(axis)
    }

    pub fn poster(&self) -> &ScrollPoster {
        &self.poster
    }

    pub fn gate(&self) -> &HotkeyGate {
        &self.gate
    }
}

impl Default for ScrollEngine {
    fn default() -> Self {
        Self::new(ScrollProfile::default(), crate::hotkey_gate::DEFAULT_DASH_MULTIPLIER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smoothwheel_model::event::{ButtonState, OutputEvent};
    use smoothwheel_model::hotkey::{HotkeyBindings, ScrollHotkey};

    const TICK: TimestampNs = 16_666_666;
    const KEY_B: u16 = 48;
    const KEY_D: u16 = 32;
    const KEY_T: u16 = 20;

    fn engine_with_hotkeys() -> ScrollEngine {
        let profile = ScrollProfile {
            hotkeys: HotkeyBindings {
                dash: Some(ScrollHotkey::keyboard(KEY_D)),
                toggle: Some(ScrollHotkey::keyboard(KEY_T)),
                block: Some(ScrollHotkey::keyboard(KEY_B)),
            },
            ..ScrollProfile::default()
        };
        ScrollEngine::new(profile, 5.0)
    }

    #[test]
    fn test_raw_unit_delta_hits_step_floor() {
        let mut engine = ScrollEngine::default();
        let mut out: Vec<OutputEvent> = Vec::new();
        engine.handle(&InputEvent::wheel(0, Axis::Vertical, 1.0), &mut out);
        assert!((engine.axis_snapshot(Axis::Vertical).buffer - 90.72).abs() < 1e-9);
        assert!(engine.is_active());
    }

    #[test]
    fn test_block_drops_wheel_deltas() {
        let mut engine = engine_with_hotkeys();
        let mut out: Vec<OutputEvent> = Vec::new();
        engine.handle(&InputEvent::key(0, KEY_B, ButtonState::Down), &mut out);
        engine.handle(&InputEvent::wheel(1, Axis::Vertical, 1.0), &mut out);
        assert!(!engine.is_active());
        assert!(out.is_empty());
    }

    #[test]
    fn test_block_mid_gesture_keeps_only_marker() {
        let mut engine = engine_with_hotkeys();
        let mut out: Vec<OutputEvent> = Vec::new();
        engine.handle(&InputEvent::wheel(0, Axis::Vertical, 1.0), &mut out);
        engine.handle(&InputEvent::key(1, KEY_B, ButtonState::Down), &mut out);

        let mut k = 1;
        while engine.is_active() {
            engine.tick(k * TICK, &mut out);
            k += 1;
        }
        assert_eq!(out, vec![OutputEvent::tracking_end(11 * TICK, Axis::Vertical)]);
    }

    #[test]
    fn test_dash_multiplies_gain() {
        let mut engine = engine_with_hotkeys();
        let mut out: Vec<OutputEvent> = Vec::new();
        engine.handle(&InputEvent::key(0, KEY_D, ButtonState::Down), &mut out);
        engine.handle(&InputEvent::wheel(1, Axis::Vertical, 1.0), &mut out);
        assert!((engine.axis_snapshot(Axis::Vertical).buffer - 453.6).abs() < 1e-9);
    }

    #[test]
    fn test_toggle_bypasses_smoothing() {
        let mut engine = engine_with_hotkeys();
        let mut out: Vec<OutputEvent> = Vec::new();
        engine.handle(&InputEvent::key(0, KEY_T, ButtonState::Down), &mut out);
        engine.handle(&InputEvent::wheel(5, Axis::Vertical, -1.0), &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].timestamp_ns, 5);
        assert!(!out[0].synthetic);
        assert!((out[0].delta + 90.72).abs() < 1e-9);
        assert!(!engine.is_active());
    }

    #[test]
    fn test_set_profile_updates_step() {
        let mut engine = ScrollEngine::default();
        let mut profile = ScrollProfile::default();
        profile.scroll.step = 0.0;
        engine.set_profile(profile);

        let mut out: Vec<OutputEvent> = Vec::new();
        engine.handle(&InputEvent::wheel(0, Axis::Horizontal, 2.0), &mut out);
        assert!((engine.axis_snapshot(Axis::Horizontal).buffer - 5.4).abs() < 1e-9);
    }
}
