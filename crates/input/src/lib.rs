//! Smoothwheel Input
//!
//! Captures wheel, keyboard, and mouse button events and drives the scroll
//! engine from a single serialized loop. Uses a pluggable backend
//! architecture:
//!
//! - **Evdev:** Direct device access on Linux (requires `input` group)
//! - **Stub:** Pre-loaded events for tests and offline runs
//!
//! Shaped output can be written in append-only JSONL format.

pub mod backends;
pub mod writer;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use smoothwheel_common::clock::{RateController, SessionClock};
use smoothwheel_common::config::EngineSettings;
use smoothwheel_common::error::SmoothwheelResult;
use smoothwheel_engine::sink::ScrollSink;
use smoothwheel_engine::ScrollEngine;
use smoothwheel_model::event::InputEvent;

/// Trait for input backends.
pub trait InputBackend: Send {
    /// Poll for the next input event. Returns `None` if no event is available.
    fn poll(&mut self) -> SmoothwheelResult<Option<InputEvent>>;

    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Check if the backend is available on this system.
    fn is_available(&self) -> bool;
}

/// Counters reported when the driver stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DriverStats {
    pub events_handled: u64,
    pub ticks: u64,
}

/// Owns the engine and feeds it from a backend on one execution context.
///
/// Backend events are drained at tick boundaries, so engine state is never
/// touched concurrently. Ticks run at `tick_hz` while a gesture is live;
/// otherwise the loop sleeps for the idle poll interval.
pub struct ScrollDriver {
    backend: Box<dyn InputBackend>,
    engine: ScrollEngine,
    clock: SessionClock,
    rate: RateController,
    idle_poll: Duration,
    stop_flag: Arc<AtomicBool>,
    stats: DriverStats,
}

impl ScrollDriver {
    pub fn new(
        backend: Box<dyn InputBackend>,
        engine: ScrollEngine,
        clock: SessionClock,
        settings: &EngineSettings,
    ) -> Self {
        Self {
            backend,
            engine,
            clock,
            rate: RateController::new(settings.tick_hz),
            idle_poll: Duration::from_millis(settings.idle_poll_ms.max(1)),
            stop_flag: Arc::new(AtomicBool::new(false)),
            stats: DriverStats::default(),
        }
    }

    /// Run the loop until the stop flag is set.
    pub async fn run<S: ScrollSink + ?Sized>(&mut self, sink: &mut S) -> SmoothwheelResult<DriverStats> {
        tracing::info!(
            backend = %self.backend.name(),
            interval_ns = self.rate.interval_ns(),
            "Scroll driver started"
        );

        while !self.stop_flag.load(Ordering::Relaxed) {
            self.drain(sink);

            if self.engine.is_active() {
                let now = self.clock.elapsed_ns();
                if self.rate.should_tick(now) {
                    self.engine.tick(now, sink);
                    self.stats.ticks += 1;
                }
                tokio::time::sleep(self.rate.until_next(self.clock.elapsed_ns())).await;
            } else {
                self.rate.reset();
                tokio::time::sleep(self.idle_poll).await;
            }
        }

        tracing::info!(
            events = self.stats.events_handled,
            ticks = self.stats.ticks,
            "Scroll driver stopped"
        );
        Ok(self.stats)
    }

    /// Feed every pending backend event to the engine.
    fn drain<S: ScrollSink + ?Sized>(&mut self, sink: &mut S) {
        loop {
            match self.backend.poll() {
                Ok(Some(event)) => {
                    self.engine.handle(&event, sink);
                    self.stats.events_handled += 1;
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "Input backend error");
                    break;
                }
            }
        }
    }

    /// Set the stop flag.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::SeqCst);
    }

    /// Get the stop flag for external coordination.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    pub fn engine(&self) -> &ScrollEngine {
        &self.engine
    }

    pub fn stats(&self) -> DriverStats {
        self.stats
    }
}
