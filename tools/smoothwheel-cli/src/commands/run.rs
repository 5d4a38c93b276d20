//! Shape live wheel input.

use std::path::PathBuf;

use smoothwheel_common::clock::SessionClock;
use smoothwheel_common::config::AppConfig;
use smoothwheel_engine::sink::ScrollSink;
use smoothwheel_engine::ScrollEngine;
use smoothwheel_input::backends::detect_best_backend;
use smoothwheel_input::writer::OutputWriter;
use smoothwheel_input::ScrollDriver;
use smoothwheel_model::event::{OutputEvent, OutputStreamHeader};

/// Logs shaped events when no output file is requested.
struct TraceSink;

impl ScrollSink for TraceSink {
    fn post(&mut self, event: OutputEvent) {
        tracing::debug!(
            t = event.timestamp_ns,
            axis = event.axis.as_str(),
            delta = event.delta,
            tracking_end = event.tracking_end,
            "scroll"
        );
    }
}

pub async fn run(config: &AppConfig, output: Option<PathBuf>, app: Option<String>) -> anyhow::Result<()> {
    let profile = config.profile_for(app.as_deref());
    let clock = SessionClock::start();
    let backend = detect_best_backend(clock.clone());
    let engine = ScrollEngine::new(profile, config.engine.dash_multiplier);
    let mut driver = ScrollDriver::new(backend, engine, clock.clone(), &config.engine);

    let stop = driver.stop_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stop.store(true, std::sync::atomic::Ordering::SeqCst);
        }
    });

    println!("Shaping wheel input at {} Hz", config.engine.tick_hz);
    println!("Press Ctrl+C to stop...");
    println!();

    let stats = match output {
        Some(path) => {
            let header = OutputStreamHeader {
                schema_version: "1.0".to_string(),
                epoch_wall: clock.epoch_wall().to_string(),
                tick_hz: config.engine.tick_hz,
                config: profile.scroll,
            };
            let mut writer = OutputWriter::new(path.clone(), &header)?;
            let stats = driver.run(&mut writer).await?;
            writer.flush()?;
            if let Some(e) = writer.take_error() {
                return Err(anyhow::anyhow!("Output writing failed: {e}"));
            }
            println!(
                "Wrote {} events to {}",
                writer.events_written(),
                path.display()
            );
            stats
        }
        None => driver.run(&mut TraceSink).await?,
    };

    println!(
        "Stopped after {} input events and {} ticks",
        stats.events_handled, stats.ticks
    );
    Ok(())
}
