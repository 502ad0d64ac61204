//! Configuration management for sensordeck.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use sensordeck_core::EngineConfig;
use sensordeck_sim::{ColorSourceConfig, DistanceSourceConfig};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default config directory name.
const CONFIG_DIR_NAME: &str = "sensordeck";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `SENSORDECK_`, sections
///    separated by `__`, e.g. `SENSORDECK_DISTANCE__INTERVAL_MS`)
/// 2. TOML config file at `~/.config/sensordeck/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Engine store sizing.
    pub engine: EngineSection,
    /// Distance source parameters.
    pub distance: DistanceSection,
    /// Color source parameters.
    pub color: ColorSection,
}

/// Engine-related configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSection {
    /// Maximum number of distance samples retained for charting.
    pub window_size: usize,
    /// Maximum number of event-log entries retained.
    pub event_capacity: usize,
    /// Buffer size of the reading and update channels.
    pub channel_capacity: usize,
}

/// Distance-source configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistanceSection {
    /// Interval between distance readings in milliseconds.
    pub interval_ms: u64,
    /// Center of the simulated signal, in centimeters.
    pub base_cm: f64,
    /// Amplitude of the sinusoidal drift, in centimeters.
    pub drift_cm: f64,
    /// Millisecond divisor of the sine phase; larger values drift slower.
    pub drift_scale_ms: f64,
    /// Half-width of the uniform noise band, in centimeters.
    pub noise_cm: f64,
    /// Lower clamp of emitted readings.
    pub min_cm: f64,
    /// Upper clamp of emitted readings.
    pub max_cm: f64,
    /// Fixed RNG seed for reproducible runs.
    pub seed: Option<u64>,
}

/// Color-source configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorSection {
    /// Interval between color classifications in milliseconds.
    pub interval_ms: u64,
    /// Fixed RNG seed for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            window_size: 50,
            event_capacity: 100,
            channel_capacity: 100,
        }
    }
}

impl Default for DistanceSection {
    fn default() -> Self {
        Self {
            interval_ms: 500,
            base_cm: 40.0,
            drift_cm: 15.0,
            drift_scale_ms: 5000.0,
            noise_cm: 2.0,
            min_cm: 5.0,
            max_cm: 100.0,
            seed: None,
        }
    }
}

impl Default for ColorSection {
    fn default() -> Self {
        Self {
            interval_ms: 1500,
            seed: None,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override
    /// earlier): defaults, then the TOML config file (if it exists), then
    /// `SENSORDECK_`-prefixed environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or validation fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("SENSORDECK_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.engine.window_size == 0 {
            return Err(Error::validation("window_size must be greater than 0"));
        }
        if self.engine.event_capacity == 0 {
            return Err(Error::validation("event_capacity must be greater than 0"));
        }
        if self.engine.channel_capacity == 0 {
            return Err(Error::validation(
                "channel_capacity must be greater than 0",
            ));
        }
        if self.distance.interval_ms == 0 {
            return Err(Error::validation(
                "distance interval_ms must be greater than 0",
            ));
        }
        if self.color.interval_ms == 0 {
            return Err(Error::validation(
                "color interval_ms must be greater than 0",
            ));
        }
        if self.distance.min_cm >= self.distance.max_cm {
            return Err(Error::validation(format!(
                "min_cm ({}) must be less than max_cm ({})",
                self.distance.min_cm, self.distance.max_cm
            )));
        }
        if self.distance.noise_cm < 0.0 {
            return Err(Error::validation("noise_cm cannot be negative"));
        }
        if self.distance.drift_cm < 0.0 {
            return Err(Error::validation("drift_cm cannot be negative"));
        }
        if self.distance.drift_scale_ms <= 0.0 {
            return Err(Error::validation(
                "drift_scale_ms must be greater than 0",
            ));
        }
        Ok(())
    }

    /// Engine sizing derived from the `[engine]` section.
    #[must_use]
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            window_capacity: self.engine.window_size,
            event_capacity: self.engine.event_capacity,
            channel_capacity: self.engine.channel_capacity,
        }
    }

    /// Distance source parameters derived from the `[distance]` section.
    #[must_use]
    pub fn distance_config(&self) -> DistanceSourceConfig {
        DistanceSourceConfig {
            sample_interval: self.distance_interval(),
            base_cm: self.distance.base_cm,
            drift_cm: self.distance.drift_cm,
            drift_scale_ms: self.distance.drift_scale_ms,
            noise_cm: self.distance.noise_cm,
            min_cm: self.distance.min_cm,
            max_cm: self.distance.max_cm,
            seed: self.distance.seed,
        }
    }

    /// Color source parameters derived from the `[color]` section.
    #[must_use]
    pub fn color_config(&self) -> ColorSourceConfig {
        ColorSourceConfig {
            sample_interval: self.color_interval(),
            seed: self.color.seed,
        }
    }

    /// The distance sampling interval as a Duration.
    #[must_use]
    pub fn distance_interval(&self) -> Duration {
        Duration::from_millis(self.distance.interval_ms)
    }

    /// The color sampling interval as a Duration.
    #[must_use]
    pub fn color_interval(&self) -> Duration {
        Duration::from_millis(self.color.interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.engine.window_size, 50);
        assert_eq!(config.engine.event_capacity, 100);
        assert_eq!(config.distance.interval_ms, 500);
        assert_eq!(config.color.interval_ms, 1500);
        assert!((config.distance.base_cm - 40.0).abs() < f64::EPSILON);
        assert!((config.distance.drift_cm - 15.0).abs() < f64::EPSILON);
        assert!((config.distance.noise_cm - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_window_size() {
        let mut config = Config::default();
        config.engine.window_size = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("window_size"));
    }

    #[test]
    fn test_validate_zero_event_capacity() {
        let mut config = Config::default();
        config.engine.event_capacity = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("event_capacity"));
    }

    #[test]
    fn test_validate_zero_distance_interval() {
        let mut config = Config::default();
        config.distance.interval_ms = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("distance interval_ms"));
    }

    #[test]
    fn test_validate_zero_color_interval() {
        let mut config = Config::default();
        config.color.interval_ms = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("color interval_ms"));
    }

    #[test]
    fn test_validate_inverted_clamp_range() {
        let mut config = Config::default();
        config.distance.min_cm = 100.0;
        config.distance.max_cm = 5.0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("min_cm"));
    }

    #[test]
    fn test_validate_negative_noise() {
        let mut config = Config::default();
        config.distance.noise_cm = -1.0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("noise_cm"));
    }

    #[test]
    fn test_validate_zero_drift_scale() {
        let mut config = Config::default();
        config.distance.drift_scale_ms = 0.0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("drift_scale_ms"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        // Loading from a nonexistent path should work (uses defaults)
        let result = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")));
        assert!(result.is_ok());

        let config = result.unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::string(
                r"
                [distance]
                interval_ms = 250
                noise_cm = 0.5

                [engine]
                window_size = 25
                ",
            ));

        let config: Config = figment.extract().unwrap();
        assert_eq!(config.distance.interval_ms, 250);
        assert!((config.distance.noise_cm - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.engine.window_size, 25);
        // Untouched sections keep their defaults
        assert_eq!(config.color.interval_ms, 1500);
    }

    #[test]
    fn test_engine_config_conversion() {
        let config = Config::default();
        let engine = config.engine_config();

        assert_eq!(engine.window_capacity, 50);
        assert_eq!(engine.event_capacity, 100);
        assert_eq!(engine.channel_capacity, 100);
    }

    #[test]
    fn test_distance_config_conversion() {
        let mut config = Config::default();
        config.distance.seed = Some(42);
        let distance = config.distance_config();

        assert_eq!(distance.sample_interval, Duration::from_millis(500));
        assert!((distance.base_cm - 40.0).abs() < f64::EPSILON);
        assert_eq!(distance.seed, Some(42));
    }

    #[test]
    fn test_color_config_conversion() {
        let config = Config::default();
        let color = config.color_config();

        assert_eq!(color.sample_interval, Duration::from_millis(1500));
        assert!(color.seed.is_none());
    }

    #[test]
    fn test_intervals() {
        let config = Config::default();
        assert_eq!(config.distance_interval(), Duration::from_millis(500));
        assert_eq!(config.color_interval(), Duration::from_millis(1500));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("sensordeck"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_config_serialize() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("window_size"));
        assert!(json.contains("interval_ms"));
    }
}
