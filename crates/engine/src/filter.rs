//! Secondary easing stage applied to interpolated deltas.
//!
//! Each new interpolated value is expanded into a five-point ease profile
//! running from the carried baseline toward the new value. The first point
//! is emitted for this tick and the second becomes the next baseline, so a
//! sudden jump in the interpolator output is spread over several ticks.

/// Offsets of the ease profile, as fractions of the baseline-to-value gap.
pub const EASE_OFFSETS: [f64; 5] = [0.0, 0.23, 0.5, 0.77, 1.0];

/// Per-axis ease filter.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollFilter {
    baseline: f64,
}

impl ScrollFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next interpolated delta and return this tick's filtered value.
    #[inline]
    pub fn fill(&mut self, value: f64) -> f64 {
        let profile = ease_profile(self.baseline, value);
        self.baseline = profile[1];
        profile[0]
    }

    /// The carried baseline (next tick's first tap).
    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    pub fn reset(&mut self) {
        self.baseline = 0.0;
    }
}

/// The five-point ease profile from `baseline` toward `value`.
#[inline]
pub fn ease_profile(baseline: f64, value: f64) -> [f64; 5] {
    let diff = value - baseline;
    EASE_OFFSETS.map(|offset| baseline + diff * offset)
}
