//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use smoothwheel_model::config::{resolve, AppOverride, ScrollProfile};

use crate::error::{SmoothwheelError, SmoothwheelResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Tick loop and hotkey tuning.
    pub engine: EngineSettings,

    /// Global scroll profile.
    pub profile: ScrollProfile,

    /// Per-application overrides of the global profile.
    pub applications: Vec<AppOverride>,
}

/// Driver and engine tuning knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Tick cadence (Hz), nominally the display refresh rate.
    pub tick_hz: u32,

    /// Poll interval while no gesture is in flight (ms).
    pub idle_poll_ms: u64,

    /// Gain multiplier applied while the dash hotkey is held.
    pub dash_multiplier: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "smoothwheel_engine=trace,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            tick_hz: 60,
            idle_poll_ms: 8,
            dash_multiplier: 5.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load config from an explicit path, failing on any error.
    pub fn load_from(path: &Path) -> SmoothwheelResult<Self> {
        if !path.exists() {
            return Err(SmoothwheelError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> SmoothwheelResult<()> {
        self.save_to(&config_file_path())
    }

    /// Save config to an explicit path.
    pub fn save_to(&self, path: &Path) -> SmoothwheelResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Reject settings the driver cannot run with.
    pub fn validate(&self) -> SmoothwheelResult<()> {
        if self.engine.tick_hz == 0 || self.engine.tick_hz > 1000 {
            return Err(SmoothwheelError::config(format!(
                "tick_hz must be in 1..=1000, got {}",
                self.engine.tick_hz
            )));
        }
        if !self.engine.dash_multiplier.is_finite() || self.engine.dash_multiplier <= 0.0 {
            return Err(SmoothwheelError::config(format!(
                "dash_multiplier must be a positive number, got {}",
                self.engine.dash_multiplier
            )));
        }
        Ok(())
    }

    /// The profile in effect for an application (global when `None`).
    pub fn profile_for(&self, app_id: Option<&str>) -> ScrollProfile {
        resolve(app_id, &self.profile, &self.applications)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("smoothwheel").join("config.json")
}
