//! Smoothwheel Data Model
//!
//! Defines the data contracts shared by every Smoothwheel crate:
//! - **Events:** Timestamped raw input (wheel, key, button) and shaped output
//! - **Config:** Scroll parameters, per-axis switches, per-app resolution
//! - **Hotkeys:** Typed key/button descriptors for dash, toggle, and block
//!
//! Timestamps are monotonic nanoseconds since the session clock started.

pub mod config;
pub mod event;
pub mod hotkey;

pub use config::*;
pub use event::*;
pub use hotkey::*;
