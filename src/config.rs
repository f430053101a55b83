//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the watchface.toml file.
//! It provides a centralized way to configure which fields the face shows, the clock
//! style, and the display layout.

use crate::layout::LayoutVariant;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE: &str = "watchface.toml";

/// Errors raised while reading or writing the config file
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File could not be read or written
    #[error("config IO: {0}")]
    Io(#[from] io::Error),

    /// File is not valid TOML for [`Config`]
    #[error("config parse: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config could not be serialized
    #[error("config serialize: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Application configuration loaded from watchface.toml
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Optional fields of the face
    pub features: FeatureConfig,
    /// Clock style
    pub clock: ClockConfig,
    /// Display geometry
    pub display: DisplayConfig,
}

/// Optional fields; all shown by default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Seconds text, refreshed every tick
    pub show_seconds: bool,
    /// Date and month text
    pub show_date: bool,
    /// Moon-phase glyph
    pub show_moon: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        FeatureConfig {
            show_seconds: true,
            show_date: true,
            show_moon: true,
        }
    }
}

/// 12-hour or 24-hour wall clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockStyle {
    #[default]
    TwelveHour,
    TwentyFourHour,
}

/// Clock configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ClockConfig {
    pub style: ClockStyle,
}

/// Display configuration. The screen itself is fixed at
/// [`SCREEN_WIDTH`](crate::layout::SCREEN_WIDTH) ×
/// [`SCREEN_HEIGHT`](crate::layout::SCREEN_HEIGHT).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Text field arrangement
    pub layout: LayoutVariant,
}

impl Config {
    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::try_load_from_path(path) {
            Ok(config) => {
                info!("Loaded configuration from {}", path.display());
                config
            }
            Err(ConfigError::Io(_)) => {
                info!(
                    "No config file at {}, using default configuration",
                    path.display()
                );
                Self::default()
            }
            Err(e) => {
                warn!("Invalid config file {}: {e}", path.display());
                warn!("Using default configuration");
                Self::default()
            }
        }
    }

    /// Load configuration from specified path, reporting failures
    pub fn try_load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str::<Config>(&contents)?)
    }

    /// Save current configuration to the given path
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents)?;
        info!("Configuration saved to {}", path.as_ref().display());
        Ok(())
    }

    /// True when the hour row shows 0 – 23
    pub fn use_24h(&self) -> bool {
        self.clock.style == ClockStyle::TwentyFourHour
    }
}
