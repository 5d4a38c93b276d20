//! Input event classification and held-input tracking.

use std::collections::HashSet;

use smoothwheel_model::event::{Axis, ButtonState, EventKind, InputEvent};
use smoothwheel_model::hotkey::{EventDescriptor, ModifierMask};

/// Keys and buttons currently held down.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeldInputs {
    held: HashSet<EventDescriptor>,
    modifiers: ModifierMask,
}

impl HeldInputs {
    pub fn is_held(&self, descriptor: &EventDescriptor) -> bool {
        self.held.contains(descriptor)
    }

    /// Mask derived from the held modifier keys.
    pub fn modifiers(&self) -> ModifierMask {
        self.modifiers
    }

    pub fn len(&self) -> usize {
        self.held.len()
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }

    fn update(&mut self, descriptor: EventDescriptor, pressed: bool) {
        if pressed {
            self.held.insert(descriptor);
        } else {
            self.held.remove(&descriptor);
        }
        if descriptor.is_modifier_key() {
            self.modifiers = self
                .held
                .iter()
                .filter(|d| d.is_modifier_key())
                .filter_map(|d| ModifierMask::from_key_code(d.code))
                .fold(ModifierMask::empty(), |acc, m| acc | m);
        }
    }
}

/// A classified input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Classified {
    /// A wheel delta raised to the step floor.
    Wheel { axis: Axis, delta: f64 },
    /// A key or button transition.
    Hotkey {
        descriptor: EventDescriptor,
        pressed: bool,
    },
}

/// Turns raw input events into engine-facing classifications.
#[derive(Debug, Clone, Default)]
pub struct EventClassifier {
    step: f64,
    held: HeldInputs,
}

impl EventClassifier {
    pub fn new(step: f64) -> Self {
        Self {
            step: sanitize_step(step),
            held: HeldInputs::default(),
        }
    }

    pub fn set_step(&mut self, step: f64) {
        self.step = sanitize_step(step);
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn held(&self) -> &HeldInputs {
        &self.held
    }

    /// Classify one event, updating the held-input snapshot.
    ///
    /// Zero and non-finite wheel deltas yield `None`.
    pub fn classify(&mut self, event: &InputEvent) -> Option<Classified> {
        match event.kind {
            EventKind::Wheel { axis, delta } => {
                if delta == 0.0 || !delta.is_finite() {
                    return None;
                }
                Some(Classified::Wheel {
                    axis,
                    delta: delta.signum() * delta.abs().max(self.step),
                })
            }
            EventKind::Key { code, state } => {
                Some(self.transition(EventDescriptor::keyboard(code), state))
            }
            EventKind::Button { code, state } => {
                Some(self.transition(EventDescriptor::mouse(code), state))
            }
        }
    }

    fn transition(&mut self, descriptor: EventDescriptor, state: ButtonState) -> Classified {
        let pressed = state == ButtonState::Down;
        self.held.update(descriptor, pressed);
        Classified::Hotkey {
            descriptor,
            pressed,
        }
    }
}

fn sanitize_step(step: f64) -> f64 {
    if step.is_finite() {
        step.max(0.0)
    } else {
        0.0
    }
}
