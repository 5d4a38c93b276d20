//! Scroll configuration snapshots and per-application resolution.

use serde::{Deserialize, Serialize};

use crate::event::Axis;
use crate::hotkey::HotkeyBindings;

/// Upper bound of the user-facing duration knob.
pub const MAX_DURATION: f64 = 5.0;

/// Duration locked in while trackpad simulation is enabled.
pub const SIMULATE_TRACKPAD_DURATION: f64 = 4.5;

/// Per-axis switches. Each one only takes effect while the matching master
/// switch on [`ScrollConfig`] is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisOptions {
    /// Run deltas through the smoothing pipeline.
    pub smooth: bool,
    /// Negate output deltas.
    pub reverse: bool,
}

impl Default for AxisOptions {
    fn default() -> Self {
        Self {
            smooth: true,
            reverse: true,
        }
    }
}

/// Immutable scroll parameters for one resolved scope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Minimum magnitude of a single wheel delta.
    pub step: f64,
    /// Multiplier applied to incoming deltas.
    pub gain: f64,
    /// Smoothing time constant in `[0, 5]`.
    pub duration: f64,
    /// Output magnitudes at or below this are suppressed.
    pub dead_zone: f64,
    /// Lock the duration to the trackpad-like preset.
    pub simulate_trackpad: bool,
    /// Master smoothing switch.
    pub smooth: bool,
    /// Master reverse switch.
    pub reverse: bool,
    pub vertical: AxisOptions,
    pub horizontal: AxisOptions,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            step: 33.6,
            gain: 2.7,
            duration: 4.35,
            dead_zone: 1.0,
            simulate_trackpad: false,
            smooth: true,
            reverse: false,
            vertical: AxisOptions::default(),
            horizontal: AxisOptions::default(),
        }
    }
}

impl ScrollConfig {
    /// Effective options for one axis: a per-axis switch applies only while
    /// its master switch is on.
    pub fn axis(&self, axis: Axis) -> AxisOptions {
        let options = match axis {
            Axis::Vertical => self.vertical,
            Axis::Horizontal => self.horizontal,
        };
        AxisOptions {
            smooth: self.smooth && options.smooth,
            reverse: self.reverse && options.reverse,
        }
    }

    /// Duration after applying the trackpad-simulation lock.
    pub fn effective_duration(&self) -> f64 {
        if self.simulate_trackpad {
            SIMULATE_TRACKPAD_DURATION
        } else {
            self.duration
        }
    }

    /// Coerce every field into its valid range.
    ///
    /// Out-of-range values are clamped rather than rejected.
    pub fn sanitized(&self) -> ScrollConfig {
        let defaults = ScrollConfig::default();
        ScrollConfig {
            step: if self.step.is_finite() {
                self.step.max(0.0)
            } else {
                0.0
            },
            gain: if self.gain.is_finite() {
                self.gain
            } else {
                defaults.gain
            },
            duration: if self.duration.is_finite() {
                self.duration.clamp(0.0, MAX_DURATION)
            } else {
                defaults.duration
            },
            dead_zone: if self.dead_zone.is_finite() {
                self.dead_zone.max(0.0)
            } else {
                0.0
            },
            ..*self
        }
    }
}

/// Scroll parameters plus the hotkeys bound for the same scope.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollProfile {
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub hotkeys: HotkeyBindings,
}

/// A per-application profile override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppOverride {
    /// Application identifier (desktop file id, WM_CLASS, or executable path).
    pub app_id: String,

    /// When true the global profile applies and `profile` is ignored.
    #[serde(default = "default_inherit")]
    pub inherit: bool,

    #[serde(default)]
    pub profile: ScrollProfile,
}

fn default_inherit() -> bool {
    true
}

/// Resolve the profile in effect for an application.
///
/// An override applies only when one exists for `app_id` and it does not
/// inherit the global profile.
pub fn resolve(
    app_id: Option<&str>,
    global: &ScrollProfile,
    overrides: &[AppOverride],
) -> ScrollProfile {
    app_id
        .and_then(|id| overrides.iter().find(|o| o.app_id == id))
        .filter(|o| !o.inherit)
        .map(|o| o.profile)
        .unwrap_or(*global)
}
