//! Medview Settings Crate
//!
//! Handles configuration of the annotation engine: graphic defaults,
//! pixel statistics and per-measurement overrides, persisted as TOML or JSON.

pub mod config;
pub mod error;

pub use config::{Config, GraphicsSettings, MeasurementFlags, StatisticsSettings};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
