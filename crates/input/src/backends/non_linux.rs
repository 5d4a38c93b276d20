//! Fallback for platforms without an input backend.

use crate::backends::StubBackend;
use crate::InputBackend;

use smoothwheel_common::clock::SessionClock;

pub fn detect_best_backend(_clock: SessionClock) -> Box<dyn InputBackend> {
    tracing::warn!(
        "Wheel capture backends for this platform are not implemented yet; using stub backend"
    );
    Box::new(StubBackend::empty())
}
