//! Configuration management for medview
//!
//! Provides configuration file handling and validation for the annotation
//! engine. Supports JSON and TOML file formats stored in the platform
//! configuration directory.
//!
//! Configuration is organized into logical sections:
//! - Graphic defaults (paint color, line thickness, label, handles)
//! - Pixel statistics
//! - Per-graphic measurement overrides (computed, quick, shown on label)

use medview_core::Color;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{ConfigError, SettingsError, SettingsResult};

/// Directory name under the platform configuration directory
pub const APP_DIR: &str = "medview";

/// Default configuration file name
pub const CONFIG_FILE: &str = "config.toml";

/// Maximum number of decimals shown on labels
pub const MAX_LABEL_DECIMALS: usize = 10;

/// Defaults applied to newly created graphics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphicsSettings {
    /// Paint color
    pub color: Color,
    /// Stroke width in screen pixels
    pub line_thickness: f64,
    /// Show the measurement label
    pub label_visible: bool,
    /// Fill closed shapes
    pub filled: bool,
    /// Handle square size in screen pixels
    pub handle_size: f64,
    /// Decimals used when formatting label values
    pub label_decimals: usize,
}

impl Default for GraphicsSettings {
    fn default() -> Self {
        Self {
            color: Color::YELLOW,
            line_thickness: 1.0,
            label_visible: true,
            filled: false,
            handle_size: 6.0,
            label_decimals: 2,
        }
    }
}

/// Pixel statistics settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatisticsSettings {
    /// Compute statistics for closed shapes on release
    pub enabled: bool,
    /// Ignore samples inside the image padding range
    pub exclude_padding: bool,
}

impl Default for StatisticsSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            exclude_padding: true,
        }
    }
}

/// Override of the flags of one measurement. Unset fields keep the
/// graphic's built-in value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementFlags {
    /// Compute the measurement at all
    #[serde(skip_serializing_if = "Option::is_none")]
    pub computed: Option<bool>,
    /// Recompute on every drag step instead of only on release
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quick_computing: Option<bool>,
    /// Show the measurement on the graphic label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graphic_label: Option<bool>,
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Graphic defaults
    pub graphics: GraphicsSettings,
    /// Statistics settings
    pub statistics: StatisticsSettings,
    /// Measurement overrides keyed by graphic class id, then measurement name
    pub measurements: BTreeMap<String, BTreeMap<String, MeasurementFlags>>,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config file location in the platform configuration directory
    pub fn default_path() -> SettingsResult<PathBuf> {
        let dir = dirs::config_dir().ok_or_else(|| {
            SettingsError::ConfigDirectory("no configuration directory on this platform".into())
        })?;
        Ok(dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load the config from its default location, or defaults when absent
    pub fn load_or_default() -> SettingsResult<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = match file_format(path)? {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match file_format(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        debug!("Saved configuration to {}", path.display());

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        let graphics = &self.graphics;
        if !(graphics.line_thickness.is_finite() && graphics.line_thickness > 0.0) {
            return Err(SettingsError::InvalidSetting {
                key: "graphics.line_thickness".to_string(),
                reason: "must be > 0".to_string(),
            });
        }

        if !(graphics.handle_size.is_finite() && graphics.handle_size > 0.0) {
            return Err(SettingsError::InvalidSetting {
                key: "graphics.handle_size".to_string(),
                reason: "must be > 0".to_string(),
            });
        }

        if graphics.label_decimals > MAX_LABEL_DECIMALS {
            return Err(ConfigError::ValueOutOfRange {
                key: "graphics.label_decimals".to_string(),
                value: graphics.label_decimals.to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Flags override for one measurement of a graphic class
    pub fn measurement_override(&self, class_id: &str, name: &str) -> Option<&MeasurementFlags> {
        self.measurements.get(class_id)?.get(name)
    }

    /// Set the flags override for one measurement of a graphic class
    pub fn set_measurement_override(
        &mut self,
        class_id: impl Into<String>,
        name: impl Into<String>,
        flags: MeasurementFlags,
    ) {
        self.measurements
            .entry(class_id.into())
            .or_default()
            .insert(name.into(), flags);
    }
}

enum Format {
    Json,
    Toml,
}

fn file_format(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(ConfigError::UnsupportedFormat(other.unwrap_or("").to_string()).into()),
    }
}
