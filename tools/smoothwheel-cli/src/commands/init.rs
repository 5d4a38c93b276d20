//! Write a default configuration file.

use std::path::Path;

use smoothwheel_common::config::AppConfig;

pub fn run(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        );
    }

    let config = AppConfig::default();
    config
        .save_to(path)
        .map_err(|e| anyhow::anyhow!("Failed to write config: {e}"))?;

    let scroll = &config.profile.scroll;
    println!("Configuration written to {}", path.display());
    println!("  Step: {}", scroll.step);
    println!("  Gain: {}", scroll.gain);
    println!("  Duration: {}", scroll.duration);
    println!("  Dead zone: {}", scroll.dead_zone);
    println!("  Tick rate: {} Hz", config.engine.tick_hz);
    println!("  Dash multiplier: {}", config.engine.dash_multiplier);

    Ok(())
}
