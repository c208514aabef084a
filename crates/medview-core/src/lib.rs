//! # Medview Core
//!
//! Core types and utilities shared by the medview crates.
//! Provides the error hierarchy, image calibration (pixel spacing,
//! units, modality rescale) and paint colors.

pub mod color;
pub mod error;
pub mod units;

pub use color::Color;
pub use error::{CalibrationError, Error, GraphicError, Result};
pub use units::{format_value, Calibration, Unit};
