//! Deterministic offline replay of recorded input.
//!
//! Ticks fall on the fixed grid `k * interval_ns` (k >= 1). Every event with
//! `t <= now` is fed before the tick at `now`. While the engine is idle the
//! clock jumps to the first grid point at or after the next event, so long
//! pauses cost nothing.

use smoothwheel_model::event::{InputEvent, TimestampNs};

use crate::engine::ScrollEngine;
use crate::sink::ScrollSink;

/// Counters describing one replay run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub events_fed: usize,
    pub ticks: u64,
    /// Time of the last tick, or of the last event if no tick ran after it.
    pub end_ns: TimestampNs,
}

/// Nanoseconds between ticks for a given rate.
pub fn tick_interval_ns(tick_hz: u32) -> TimestampNs {
    1_000_000_000 / tick_hz.max(1) as u64
}

/// Replay `events` (sorted by timestamp) through `engine` until every
/// gesture has settled.
pub fn replay<S: ScrollSink + ?Sized>(
    engine: &mut ScrollEngine,
    events: &[InputEvent],
    interval_ns: TimestampNs,
    sink: &mut S,
) -> ReplayStats {
    let interval_ns = interval_ns.max(1);
    let mut stats = ReplayStats::default();
    let mut next = 0usize;
    let mut k: u64 = 1;

    loop {
        if !engine.is_active() {
            match events.get(next) {
                Some(event) => k = k.max(event.timestamp_ns.div_ceil(interval_ns)),
                None => break,
            }
        }

        let now = k * interval_ns;
        while let Some(event) = events.get(next).filter(|e| e.timestamp_ns <= now) {
            engine.handle(event, sink);
            stats.end_ns = stats.end_ns.max(event.timestamp_ns);
            next += 1;
        }
        stats.events_fed = next;

        if engine.is_active() {
            engine.tick(now, sink);
            stats.ticks += 1;
            stats.end_ns = now;
        }
        k += 1;
    }

    tracing::debug!(
        events = stats.events_fed,
        ticks = stats.ticks,
        end_ns = stats.end_ns,
        "replay finished"
    );
    stats
}
