//! Replay a recorded input stream through the engine.

use std::path::PathBuf;

use smoothwheel_common::clock::SessionClock;
use smoothwheel_common::config::AppConfig;
use smoothwheel_engine::replay::{replay, tick_interval_ns};
use smoothwheel_engine::ScrollEngine;
use smoothwheel_input::writer::OutputWriter;
use smoothwheel_model::event::{parse_jsonl, Axis, InputEvent, OutputEvent, OutputStreamHeader};

pub fn run(
    config: &AppConfig,
    events_path: PathBuf,
    output: Option<PathBuf>,
    tick_hz: Option<u32>,
    app: Option<String>,
) -> anyhow::Result<()> {
    println!("Simulating: {}", events_path.display());

    let content = std::fs::read_to_string(&events_path)
        .map_err(|_| anyhow::anyhow!("Events file not found: {}", events_path.display()))?;
    let mut events: Vec<InputEvent> =
        parse_jsonl(&content).map_err(|e| anyhow::anyhow!("Failed to parse events: {e}"))?;
    events.sort_by_key(|e| e.timestamp_ns);
    println!("  Loaded {} events", events.len());

    let tick_hz = tick_hz.unwrap_or(config.engine.tick_hz).clamp(1, 1000);
    let profile = config.profile_for(app.as_deref());
    let mut engine = ScrollEngine::new(profile, config.engine.dash_multiplier);
    println!(
        "  Profile: {} (transition {:.3}, tick {tick_hz} Hz)",
        app.as_deref().unwrap_or("global"),
        engine.poster().transition()
    );

    let mut shaped: Vec<OutputEvent> = Vec::new();
    let stats = replay(&mut engine, &events, tick_interval_ns(tick_hz), &mut shaped);

    println!("  Ticks run: {}", stats.ticks);
    println!("  Output events: {}", shaped.len());
    println!(
        "  Tracking-end markers: {}",
        shaped.iter().filter(|e| e.tracking_end).count()
    );
    for axis in Axis::ALL {
        let values: Vec<f64> = shaped
            .iter()
            .filter(|e| e.axis == axis && !e.tracking_end)
            .map(|e| e.delta)
            .collect();
        if values.is_empty() {
            continue;
        }
        println!(
            "  {}: {} values, total {:.3}, peak {:.3}",
            axis.as_str(),
            values.len(),
            values.iter().sum::<f64>(),
            values.iter().fold(0.0f64, |acc, v| acc.max(v.abs()))
        );
    }
    println!(
        "  Simulated span: {:.3}s",
        SessionClock::ns_to_secs(stats.end_ns)
    );

    if let Some(path) = output {
        let header = OutputStreamHeader {
            schema_version: "1.0".to_string(),
            epoch_wall: SessionClock::start().epoch_wall().to_string(),
            tick_hz,
            config: profile.scroll,
        };
        let mut writer = OutputWriter::new(path.clone(), &header)?;
        for event in &shaped {
            writer.write_event(event)?;
        }
        writer.flush()?;
        println!("  Output written to: {}", path.display());
    }

    Ok(())
}
