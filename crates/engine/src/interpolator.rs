//! Exponential-approach interpolation toward the buffered target.

/// Single-pole low-pass step: move `current` toward `buffer` by `trans` of
/// the remaining distance and return the step taken.
///
/// With `trans` in `(0, 1]` the approach is monotonic and never overshoots;
/// `trans == 1` lands on the target in one call. Once the step is too small
/// to change `current` at its magnitude, `current` lands on `buffer`.
#[inline]
pub fn advance(current: &mut f64, buffer: f64, trans: f64) -> f64 {
    let delta = (buffer - *current) * trans;
    let next = *current + delta;
    if next == *current && buffer != *current && trans > 0.0 {
        let rest = buffer - *current;
        *current = buffer;
        return rest;
    }
    *current = next;
    delta
}

/// Upper bound on the ticks needed to bring a gap of `distance` within
/// `tolerance`, given coefficient `trans`.
///
/// Returns `None` when the gap never closes (`trans` outside `(0, 1]`).
pub fn ticks_to_converge(distance: f64, tolerance: f64, trans: f64) -> Option<u32> {
    let distance = distance.abs();
    if distance <= tolerance {
        return Some(0);
    }
    if !(trans > 0.0 && trans <= 1.0) || tolerance <= 0.0 {
        return None;
    }
    if trans >= 1.0 {
        return Some(1);
    }
    // |gap_n| = |gap_0| * (1 - trans)^n
    let ticks = (tolerance / distance).ln() / (1.0 - trans).ln();
    Some(ticks.ceil().max(1.0) as u32)
}
