//! Check configuration and input device access.

use std::path::Path;

use smoothwheel_common::clock::SessionClock;
use smoothwheel_common::config::AppConfig;
use smoothwheel_engine::duration::generate_duration_transition;
use smoothwheel_model::hotkey::ScrollHotkey;

pub fn run(config: &AppConfig, config_path: &Path) -> anyhow::Result<()> {
    println!("Smoothwheel System Check");
    println!("{}", "=".repeat(50));

    if config_path.exists() {
        println!("[OK] Config: {}", config_path.display());
    } else {
        println!(
            "[WARN] Config: {} not found, using defaults (run `smoothwheel init`)",
            config_path.display()
        );
    }

    let mut ready = match config.validate() {
        Ok(()) => {
            println!("[OK] Engine settings valid");
            true
        }
        Err(e) => {
            println!("[FAIL] {e}");
            false
        }
    };

    let scroll = config.profile.scroll.sanitized();
    println!(
        "     step {} gain {} duration {} (transition {:.3}) dead zone {}",
        scroll.step,
        scroll.gain,
        scroll.effective_duration(),
        generate_duration_transition(scroll.effective_duration()),
        scroll.dead_zone
    );
    println!("     {} application override(s)", config.applications.len());

    let hotkeys = &config.profile.hotkeys;
    println!("     dash:   {}", describe(hotkeys.dash.as_ref()));
    println!("     toggle: {}", describe(hotkeys.toggle.as_ref()));
    println!("     block:  {}", describe(hotkeys.block.as_ref()));

    let backend = smoothwheel_input::backends::detect_best_backend(SessionClock::start());
    if backend.name() == "stub" {
        println!("[FAIL] Input: no readable wheel device (see log for details)");
        ready = false;
    } else {
        println!("[OK] Input backend: {}", backend.name());
    }

    println!();
    if ready {
        println!("All required capabilities are available. Smoothwheel is ready.");
    } else {
        println!("Some required capabilities are missing. See above for fixes.");
    }

    Ok(())
}

fn describe(hotkey: Option<&ScrollHotkey>) -> String {
    hotkey
        .map(ScrollHotkey::display_name)
        .unwrap_or_else(|| "unbound".to_string())
}
