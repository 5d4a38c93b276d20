//! Smoothwheel Engine
//!
//! Turns bursty wheel deltas into a continuous momentum stream:
//! - **Duration transition:** maps the user-facing duration to a per-tick coefficient
//! - **Interpolation + filtering:** exponential approach followed by an ease filter
//! - **Dead zone + lifecycle:** suppresses residual noise, marks tracking end, detects settlement
//! - **Hotkeys:** dash, toggle, and block modifiers evaluated from held inputs
//!
//! This crate is pure computation: no I/O, no platform dependencies.
//! Time is passed in explicitly; all outputs go to a [`ScrollSink`].

pub mod axis;
pub mod classifier;
pub mod dead_zone;
pub mod duration;
pub mod engine;
pub mod filter;
pub mod hotkey_gate;
pub mod interpolator;
pub mod lifecycle;
pub mod poster;
pub mod replay;
pub mod sink;

pub use axis::AxisSnapshot;
pub use classifier::{Classified, EventClassifier, HeldInputs};
pub use dead_zone::DeadZoneGate;
pub use duration::generate_duration_transition;
pub use engine::ScrollEngine;
pub use filter::ScrollFilter;
pub use hotkey_gate::{GateDecision, HotkeyGate, DEFAULT_DASH_MULTIPLIER};
pub use lifecycle::{GestureLifecycleTracker, GesturePhase};
pub use poster::ScrollPoster;
pub use replay::{replay, tick_interval_ns, ReplayStats};
pub use sink::ScrollSink;
