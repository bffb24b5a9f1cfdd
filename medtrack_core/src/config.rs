//! Configuration file support for medtrack.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/medtrack/config.toml`.
//! Every section is optional.

use crate::adherence::AdherenceThresholds;
use crate::{Error, Result, TimeSlot};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub adherence: AdherenceConfig,

    #[serde(default)]
    pub schedule: ScheduleConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Calendar tier cut-offs, in percent
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AdherenceConfig {
    #[serde(default = "default_high_threshold")]
    pub high_threshold: u32,

    #[serde(default = "default_medium_threshold")]
    pub medium_threshold: u32,
}

impl Default for AdherenceConfig {
    fn default() -> Self {
        Self {
            high_threshold: default_high_threshold(),
            medium_threshold: default_medium_threshold(),
        }
    }
}

impl AdherenceConfig {
    pub fn thresholds(&self) -> AdherenceThresholds {
        AdherenceThresholds {
            high: self.high_threshold,
            medium: self.medium_threshold,
        }
    }
}

/// Time slot presets offered when adding medications
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_time_options")]
    pub time_options: Vec<String>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            time_options: default_time_options(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("medtrack")
}

fn default_high_threshold() -> u32 {
    AdherenceThresholds::default().high
}

fn default_medium_threshold() -> u32 {
    AdherenceThresholds::default().medium
}

fn default_time_options() -> Vec<String> {
    TimeSlot::PRESETS.iter().map(|s| s.to_string()).collect()
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Check that threshold and preset values are usable
    pub fn validate(&self) -> Result<()> {
        let a = &self.adherence;
        if a.high_threshold > 100 {
            return Err(Error::Config(format!(
                "high_threshold must be at most 100, got {}",
                a.high_threshold
            )));
        }
        if a.medium_threshold > a.high_threshold {
            return Err(Error::Config(format!(
                "medium_threshold ({}) must not exceed high_threshold ({})",
                a.medium_threshold, a.high_threshold
            )));
        }
        if let Some(blank) = self.schedule.time_options.iter().find(|t| t.trim().is_empty()) {
            return Err(Error::Config(format!(
                "time_options contains a blank entry: {:?}",
                blank
            )));
        }
        Ok(())
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("medtrack")
            .join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
