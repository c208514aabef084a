//! Calibration and unit utilities
//!
//! Maps image-space pixel distances to physical values. A [`Calibration`]
//! carries the pixel spacing ratio, the physical unit, the origin offset used
//! for calibrated coordinates, and the modality rescale (slope/intercept)
//! applied to raw pixel values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CalibrationError;

/// Physical unit of a calibrated image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Uncalibrated image, values stay in pixels
    Pixel,
    /// Nanometer
    Nanometer,
    /// Micrometer
    Micrometer,
    /// Millimeter
    Millimeter,
    /// Centimeter
    Centimeter,
    /// Meter
    Meter,
    /// Inch
    Inch,
}

impl Default for Unit {
    fn default() -> Self {
        Self::Pixel
    }
}

impl Unit {
    /// Abbreviation appended to calibrated values
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Self::Pixel => "pix",
            Self::Nanometer => "nm",
            Self::Micrometer => "µm",
            Self::Millimeter => "mm",
            Self::Centimeter => "cm",
            Self::Meter => "m",
            Self::Inch => "in",
        }
    }

    /// Length of one unit in millimeters, `None` for pixels
    pub fn millimeters(&self) -> Option<f64> {
        match self {
            Self::Pixel => None,
            Self::Nanometer => Some(1.0e-6),
            Self::Micrometer => Some(1.0e-3),
            Self::Millimeter => Some(1.0),
            Self::Centimeter => Some(10.0),
            Self::Meter => Some(1000.0),
            Self::Inch => Some(25.4),
        }
    }

    /// Returns true when this is a physical unit
    pub fn is_physical(&self) -> bool {
        !matches!(self, Self::Pixel)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl FromStr for Unit {
    type Err = CalibrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pix" | "pixel" | "px" => Ok(Self::Pixel),
            "nm" | "nanometer" => Ok(Self::Nanometer),
            "µm" | "um" | "micrometer" => Ok(Self::Micrometer),
            "mm" | "millimeter" => Ok(Self::Millimeter),
            "cm" | "centimeter" => Ok(Self::Centimeter),
            "m" | "meter" => Ok(Self::Meter),
            "in" | "inch" => Ok(Self::Inch),
            _ => Err(CalibrationError::UnknownUnit {
                unit: s.to_string(),
            }),
        }
    }
}

/// Pixel-to-physical-unit mapping of an image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    pixel_size: f64,
    unit: Unit,
    #[serde(default)]
    offset_x: f64,
    #[serde(default)]
    offset_y: f64,
    #[serde(default)]
    up_y_axis: bool,
    #[serde(default)]
    image_height: f64,
    #[serde(default = "default_slope")]
    rescale_slope: f64,
    #[serde(default)]
    rescale_intercept: f64,
    #[serde(default)]
    pixel_value_unit: Option<String>,
}

fn default_slope() -> f64 {
    1.0
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            pixel_size: 1.0,
            unit: Unit::Pixel,
            offset_x: 0.0,
            offset_y: 0.0,
            up_y_axis: false,
            image_height: 0.0,
            rescale_slope: 1.0,
            rescale_intercept: 0.0,
            pixel_value_unit: None,
        }
    }
}

impl Calibration {
    /// Uncalibrated mapping, one pixel per unit
    pub fn pixel() -> Self {
        Self::default()
    }

    /// Create a calibration from a pixel spacing expressed in `unit`
    pub fn new(pixel_size: f64, unit: Unit) -> Result<Self, CalibrationError> {
        if !pixel_size.is_finite() || pixel_size <= 0.0 {
            return Err(CalibrationError::InvalidPixelSpacing { value: pixel_size });
        }
        Ok(Self {
            pixel_size,
            unit,
            ..Self::default()
        })
    }

    /// Shift the origin of calibrated coordinates
    pub fn with_offset(mut self, offset_x: f64, offset_y: f64) -> Self {
        self.offset_x = offset_x;
        self.offset_y = offset_y;
        self
    }

    /// Flip calibrated Y so that it grows upwards from the bottom of the image
    pub fn with_up_y_axis(mut self, image_height: f64) -> Self {
        self.up_y_axis = true;
        self.image_height = image_height;
        self
    }

    /// Apply a modality rescale to raw pixel values
    pub fn with_rescale(mut self, slope: f64, intercept: f64) -> Result<Self, CalibrationError> {
        if !slope.is_finite() || slope == 0.0 {
            return Err(CalibrationError::InvalidRescaleSlope { value: slope });
        }
        self.rescale_slope = slope;
        self.rescale_intercept = intercept;
        Ok(self)
    }

    /// Unit attached to rescaled pixel values (e.g. "HU")
    pub fn with_pixel_value_unit(mut self, unit: impl Into<String>) -> Self {
        self.pixel_value_unit = Some(unit.into());
        self
    }

    /// Express the same spacing in another physical unit.
    ///
    /// Pixel calibrations cannot be converted and are returned unchanged.
    pub fn converted_to(&self, target: Unit) -> Self {
        match (self.unit.millimeters(), target.millimeters()) {
            (Some(from), Some(to)) => Self {
                pixel_size: self.pixel_size * from / to,
                unit: target,
                ..self.clone()
            },
            _ => self.clone(),
        }
    }

    /// Physical size of one pixel
    pub fn ratio(&self) -> f64 {
        self.pixel_size
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Unit string for lengths and coordinates
    pub fn length_unit(&self) -> String {
        self.unit.abbreviation().to_string()
    }

    /// Unit string for areas; the pixel unit is never squared
    pub fn area_unit(&self) -> String {
        if self.unit.is_physical() {
            format!("{}2", self.unit.abbreviation())
        } else {
            self.unit.abbreviation().to_string()
        }
    }

    /// Calibrated X coordinate of an image-space abscissa
    pub fn x_calibrated(&self, x: f64) -> f64 {
        self.pixel_size * (x + self.offset_x)
    }

    /// Calibrated Y coordinate of an image-space ordinate. The offset is
    /// applied after the flip of an upward axis.
    pub fn y_calibrated(&self, y: f64) -> f64 {
        let y = if self.up_y_axis {
            self.image_height - y
        } else {
            y
        };
        self.pixel_size * (y + self.offset_y)
    }

    /// Calibrated length of a pixel distance
    pub fn length(&self, pixels: f64) -> f64 {
        pixels * self.pixel_size
    }

    /// Calibrated area of a squared-pixel area
    pub fn area(&self, square_pixels: f64) -> f64 {
        square_pixels * self.pixel_size * self.pixel_size
    }

    /// Modality value of a raw pixel sample
    pub fn pixel_to_real(&self, raw: f64) -> f64 {
        raw * self.rescale_slope + self.rescale_intercept
    }

    /// Returns true when a non-identity rescale is configured
    pub fn has_rescale(&self) -> bool {
        self.rescale_slope != 1.0 || self.rescale_intercept != 0.0
    }

    pub fn pixel_value_unit(&self) -> Option<&str> {
        self.pixel_value_unit.as_deref()
    }
}

/// Format a measurement value for display
///
/// * `value` - Value to format
/// * `decimals` - Number of decimal places
pub fn format_value(value: f64, decimals: usize) -> String {
    let text = format!("{:.*}", decimals, value);
    // Avoid "-0.00" for values that round to zero
    if text.starts_with('-') && text[1..].chars().all(|c| c == '0' || c == '.') {
        text[1..].to_string()
    } else {
        text
    }
}
