//! Gesture lifecycle: tracking-end detection and settlement.
//!
//! ```text
//!   Idle ──raw delta──▶ Active ──silence > 180ms──▶ Coasting ──6 quiet ticks──▶ Settled
//!                        ▲  │                          │                          │
//!                        └──┘ raw delta                └────────raw delta─────────┘
//! ```

use smoothwheel_model::event::TimestampNs;

/// Silence after the last raw delta before manual input counts as ended.
pub const CONTINUATION_THRESHOLD_NS: TimestampNs = 180_000_000;

/// Consecutive quiet ticks required to declare a gesture settled.
pub const SETTLE_TICKS: u32 = 6;

/// Floor for the residual check, so a zero dead zone still settles once the
/// residual is below float noise.
pub const SETTLE_EPSILON: f64 = 1e-3;

/// Lifecycle phase of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GesturePhase {
    /// No gesture has run yet.
    #[default]
    Idle,
    /// Raw deltas are arriving.
    Active,
    /// Manual input stopped; momentum is still being emitted.
    Coasting,
    /// The last gesture finished; behaves like `Idle`.
    Settled,
}

impl GesturePhase {
    /// Whether ticks should run the pipeline for this axis.
    pub fn is_ticking(&self) -> bool {
        matches!(self, GesturePhase::Active | GesturePhase::Coasting)
    }

    pub fn name(&self) -> &'static str {
        match self {
            GesturePhase::Idle => "idle",
            GesturePhase::Active => "active",
            GesturePhase::Coasting => "coasting",
            GesturePhase::Settled => "settled",
        }
    }
}

/// What the tracker decided for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickDecision {
    /// Emit the tracking-end marker this tick.
    pub tracking_end: bool,
    /// The gesture settled; emit nothing further.
    pub settled: bool,
}

/// Per-axis gesture lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GestureLifecycleTracker {
    phase: GesturePhase,
    last_manual_input_ns: TimestampNs,
    manual_input_ended: bool,
    tracking_end_inserted: bool,
    settled_tick_count: u32,
}

impl GestureLifecycleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a raw delta. Returns true when this delta starts a new gesture
    /// from `Idle`/`Settled`.
    pub fn on_manual_input(&mut self, now_ns: TimestampNs) -> bool {
        let fresh = !self.phase.is_ticking();
        if self.phase != GesturePhase::Active {
            tracing::trace!(from = self.phase.name(), "gesture active");
        }
        self.phase = GesturePhase::Active;
        self.last_manual_input_ns = now_ns;
        self.manual_input_ended = false;
        self.tracking_end_inserted = false;
        self.settled_tick_count = 0;
        fresh
    }

    /// Advance the lifecycle for one tick.
    ///
    /// `residual` is `|buffer - current|` after interpolation and `gated` the
    /// dead-zone-gated output of this tick. Only ticks that output nothing
    /// count toward settlement.
    pub fn decide(
        &mut self,
        now_ns: TimestampNs,
        residual: f64,
        gated: f64,
        dead_zone: f64,
    ) -> TickDecision {
        let mut decision = TickDecision::default();
        if !self.phase.is_ticking() {
            return decision;
        }

        if !self.manual_input_ended
            && now_ns.saturating_sub(self.last_manual_input_ns) > CONTINUATION_THRESHOLD_NS
        {
            self.manual_input_ended = true;
            self.phase = GesturePhase::Coasting;
            if !self.tracking_end_inserted {
                self.tracking_end_inserted = true;
                decision.tracking_end = true;
            }
        }

        let quiet =
            self.manual_input_ended && residual <= dead_zone.max(SETTLE_EPSILON) && gated == 0.0;
        if quiet {
            self.settled_tick_count += 1;
            if self.settled_tick_count >= SETTLE_TICKS {
                self.phase = GesturePhase::Settled;
                decision.settled = true;
            }
        } else {
            self.settled_tick_count = 0;
        }

        decision
    }

    /// End the running gesture at once. The tracking-end marker is still
    /// emitted if this gesture has not had one.
    pub fn abort(&mut self) -> TickDecision {
        let tracking_end = self.phase.is_ticking() && !self.tracking_end_inserted;
        if self.phase.is_ticking() {
            tracing::trace!(from = self.phase.name(), "gesture aborted");
        }
        self.phase = GesturePhase::Settled;
        self.manual_input_ended = true;
        self.tracking_end_inserted = true;
        self.settled_tick_count = 0;
        TickDecision {
            tracking_end,
            settled: true,
        }
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    pub fn last_manual_input_ns(&self) -> TimestampNs {
        self.last_manual_input_ns
    }

    pub fn manual_input_ended(&self) -> bool {
        self.manual_input_ended
    }

    pub fn tracking_end_inserted(&self) -> bool {
        self.tracking_end_inserted
    }

    pub fn settled_tick_count(&self) -> u32 {
        self.settled_tick_count
    }
}
