//! Smoothwheel CLI: command-line interface for the scroll shaping engine.
//!
//! Usage:
//!   smoothwheel simulate <EVENTS>   Replay recorded input through the engine
//!   smoothwheel run                 Shape live wheel input
//!   smoothwheel transition <D>      Show the per-tick coefficient for a duration
//!   smoothwheel check               Check configuration and input devices
//!   smoothwheel init                Write a default configuration file

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use smoothwheel_common::config::{config_file_path, AppConfig};

mod commands;

#[derive(Parser)]
#[command(
    name = "smoothwheel",
    about = "Trackpad-like momentum for ordinary scroll wheels",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to $XDG_CONFIG_HOME/smoothwheel/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded input stream through the engine
    Simulate {
        /// Path to an input events JSONL file
        events: PathBuf,

        /// Write shaped output events to this JSONL file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Tick rate override (Hz)
        #[arg(long)]
        tick_hz: Option<u32>,

        /// Resolve the profile for this application id
        #[arg(long)]
        app: Option<String>,
    },

    /// Shape live wheel input until Ctrl+C
    Run {
        /// Write shaped output events to this JSONL file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Resolve the profile for this application id
        #[arg(long)]
        app: Option<String>,
    },

    /// Show the duration transition and convergence for a duration value
    Transition {
        /// Smoothing duration in [0, 5]
        duration: f64,
    },

    /// Check configuration and input device access
    Check,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, load_error) = load_config(cli.config.as_ref());

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    smoothwheel_common::logging::init_logging(&logging);

    if let Some(e) = load_error {
        if cli.config.is_some() && !matches!(cli.command, Commands::Init { .. }) {
            return Err(e);
        }
        tracing::warn!(error = %e, "Using default configuration");
    }

    let config_path = cli.config.clone().unwrap_or_else(config_file_path);

    match cli.command {
        Commands::Simulate {
            events,
            output,
            tick_hz,
            app,
        } => commands::simulate::run(&config, events, output, tick_hz, app),
        Commands::Run { output, app } => commands::run::run(&config, output, app).await,
        Commands::Transition { duration } => commands::transition::run(&config, duration),
        Commands::Check => commands::check::run(&config, &config_path),
        Commands::Init { force } => commands::init::run(&config_path, force),
    }
}

/// Load the config before logging exists; the error is reported afterwards.
fn load_config(explicit: Option<&PathBuf>) -> (AppConfig, Option<anyhow::Error>) {
    let path = match explicit {
        Some(path) => path.clone(),
        None => {
            let path = config_file_path();
            if !path.exists() {
                return (AppConfig::default(), None);
            }
            path
        }
    };

    match AppConfig::load_from(&path) {
        Ok(config) => (config, None),
        Err(e) => (
            AppConfig::default(),
            Some(anyhow::anyhow!("Failed to load config {}: {e}", path.display())),
        ),
    }
}
