//! Input backend implementations.
//!
//! Each backend turns a source of raw input into timestamped
//! [`InputEvent`]s on the session clock.

#[cfg(target_os = "linux")]
mod linux;
#[cfg(not(target_os = "linux"))]
mod non_linux;

#[cfg(target_os = "linux")]
pub use linux::{detect_best_backend, EvdevBackend};
#[cfg(not(target_os = "linux"))]
pub use non_linux::detect_best_backend;

use std::collections::VecDeque;

use smoothwheel_common::error::SmoothwheelResult;
use smoothwheel_model::event::InputEvent;

use crate::InputBackend;

/// Stub backend for tests and offline runs: yields pre-loaded events.
pub struct StubBackend {
    events: VecDeque<InputEvent>,
}

impl StubBackend {
    /// Create a stub backend with pre-loaded events.
    pub fn new(events: Vec<InputEvent>) -> Self {
        Self {
            events: events.into(),
        }
    }

    /// Create an empty stub that never produces events.
    pub fn empty() -> Self {
        Self {
            events: VecDeque::new(),
        }
    }

    /// Events not yet polled.
    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl InputBackend for StubBackend {
    fn poll(&mut self) -> SmoothwheelResult<Option<InputEvent>> {
        Ok(self.events.pop_front())
    }

    fn name(&self) -> &str {
        "stub"
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smoothwheel_model::event::Axis;

    #[test]
    fn test_stub_yields_in_order() {
        let mut backend = StubBackend::new(vec![
            InputEvent::wheel(1, Axis::Vertical, 1.0),
            InputEvent::wheel(2, Axis::Horizontal, -1.0),
        ]);
        assert_eq!(backend.remaining(), 2);
        assert_eq!(backend.poll().unwrap().unwrap().timestamp_ns, 1);
        assert_eq!(backend.poll().unwrap().unwrap().timestamp_ns, 2);
        assert!(backend.poll().unwrap().is_none());
        assert!(StubBackend::empty().poll().unwrap().is_none());
    }
}
