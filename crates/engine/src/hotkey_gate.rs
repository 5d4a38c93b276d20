//! Dash, toggle, and block hotkey evaluation.

use smoothwheel_model::hotkey::{HotkeyBindings, ScrollHotkey};

use crate::classifier::HeldInputs;

/// Default gain multiplier while the dash hotkey is held.
pub const DEFAULT_DASH_MULTIPLIER: f64 = 5.0;

/// How the current hotkey state modifies raw deltas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateDecision {
    /// Drop deltas and suppress output.
    Block,
    Pass {
        gain_multiplier: f64,
        invert_smoothing: bool,
    },
}

impl GateDecision {
    pub fn is_blocked(&self) -> bool {
        matches!(self, GateDecision::Block)
    }
}

/// Stateless evaluator: every decision is derived from the held inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HotkeyGate {
    bindings: HotkeyBindings,
    dash_multiplier: f64,
}

impl HotkeyGate {
    pub fn new(bindings: HotkeyBindings, dash_multiplier: f64) -> Self {
        Self {
            bindings,
            dash_multiplier: sanitize_multiplier(dash_multiplier),
        }
    }

    pub fn set_bindings(&mut self, bindings: HotkeyBindings) {
        self.bindings = bindings;
    }

    pub fn set_dash_multiplier(&mut self, dash_multiplier: f64) {
        self.dash_multiplier = sanitize_multiplier(dash_multiplier);
    }

    pub fn bindings(&self) -> &HotkeyBindings {
        &self.bindings
    }

    pub fn dash_multiplier(&self) -> f64 {
        self.dash_multiplier
    }

    /// Block wins over dash and toggle.
    pub fn evaluate(&self, held: &HeldInputs) -> GateDecision {
        if is_active(self.bindings.block.as_ref(), held) {
            return GateDecision::Block;
        }
        let gain_multiplier = if is_active(self.bindings.dash.as_ref(), held) {
            self.dash_multiplier
        } else {
            1.0
        };
        GateDecision::Pass {
            gain_multiplier,
            invert_smoothing: is_active(self.bindings.toggle.as_ref(), held),
        }
    }
}

impl Default for HotkeyGate {
    fn default() -> Self {
        Self::new(HotkeyBindings::default(), DEFAULT_DASH_MULTIPLIER)
    }
}

/// Trigger held, and the modifier mask equal to the recorded one if any.
pub fn is_active(hotkey: Option<&ScrollHotkey>, held: &HeldInputs) -> bool {
    match hotkey {
        Some(hotkey) => {
            held.is_held(&hotkey.trigger)
                && hotkey
                    .modifiers
                    .map_or(true, |mask| mask == held.modifiers())
        }
        None => false,
    }
}

fn sanitize_multiplier(multiplier: f64) -> f64 {
    if multiplier.is_finite() && multiplier > 0.0 {
        multiplier
    } else {
        DEFAULT_DASH_MULTIPLIER
    }
}
