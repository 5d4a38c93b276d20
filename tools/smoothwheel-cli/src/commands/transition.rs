//! Show the duration transition for a duration value.

use smoothwheel_common::config::AppConfig;
use smoothwheel_engine::duration::generate_duration_transition;
use smoothwheel_engine::interpolator::ticks_to_converge;
use smoothwheel_model::config::MAX_DURATION;

pub fn run(config: &AppConfig, duration: f64) -> anyhow::Result<()> {
    if !duration.is_finite() {
        anyhow::bail!("duration must be a finite number");
    }

    let scroll = config.profile.scroll.sanitized();
    let trans = generate_duration_transition(duration);
    let target = scroll.step * scroll.gain;
    let tolerance = scroll.dead_zone.max(1e-3);
    let tick_hz = config.engine.tick_hz.max(1) as f64;

    println!("Duration: {duration}");
    if !(0.0..=MAX_DURATION).contains(&duration) {
        println!("  (clamped to {})", duration.clamp(0.0, MAX_DURATION));
    }
    println!("Transition: {trans:.3}");

    match ticks_to_converge(target, tolerance, trans) {
        Some(ticks) => println!(
            "One step ({target:.2}) settles within {tolerance} after {ticks} ticks (~{:.0} ms at {} Hz)",
            ticks as f64 * 1000.0 / tick_hz,
            config.engine.tick_hz
        ),
        None => println!("One step ({target:.2}) never converges"),
    }

    Ok(())
}
