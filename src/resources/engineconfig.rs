//! Engine configuration resource.
//!
//! Manages playback settings loaded from an INI configuration file. Provides
//! defaults for safe startup and methods to load/save configuration.
//!
//! # Configuration File Format
//!
//! ```ini
//! [playback]
//! tick_rate = 60
//! duration = 3.0
//! time_scale = 1.0
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

/// Default safe values for startup
const DEFAULT_TICK_RATE: u32 = 60;
const DEFAULT_DURATION_SECS: f32 = 3.0;
const DEFAULT_TIME_SCALE: f32 = 1.0;
const DEFAULT_CONFIG_PATH: &str = "./flipbook.ini";

/// Engine configuration resource.
///
/// Stores the fixed update rate and run duration of the headless loop plus
/// the global time scale applied to [`WorldTime`](super::worldtime::WorldTime).
#[derive(Resource, Debug, Clone)]
pub struct EngineConfig {
    /// Fixed updates per simulated second.
    pub tick_rate: u32,
    /// Simulated seconds the demo loop runs for.
    pub duration_secs: f32,
    /// Global multiplier applied to every time delta.
    pub time_scale: f32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            tick_rate: DEFAULT_TICK_RATE,
            duration_secs: DEFAULT_DURATION_SECS,
            time_scale: DEFAULT_TIME_SCALE,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [playback] section
        if let Some(rate) = config.getuint("playback", "tick_rate").ok().flatten() {
            self.tick_rate = rate as u32;
        }
        if let Some(duration) = config.getfloat("playback", "duration").ok().flatten() {
            self.duration_secs = duration as f32;
        }
        if let Some(scale) = config.getfloat("playback", "time_scale").ok().flatten() {
            self.time_scale = scale as f32;
        }

        info!(
            "Loaded config: tick_rate={}, duration={}s, time_scale={}",
            self.tick_rate, self.duration_secs, self.time_scale
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        // [playback] section
        config.set("playback", "tick_rate", Some(self.tick_rate.to_string()));
        config.set("playback", "duration", Some(self.duration_secs.to_string()));
        config.set("playback", "time_scale", Some(self.time_scale.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Seconds of one fixed update step.
    pub fn step(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }
}
