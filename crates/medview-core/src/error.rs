//! Error handling for medview
//!
//! Provides error types for the layers of the annotation engine:
//! - Graphic errors (shape construction, handle manipulation)
//! - Calibration errors (pixel spacing, units)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Graphic error type
///
/// Represents errors raised while building or editing an annotation graphic.
/// Degenerate geometry met during interaction is not an error; only
/// construction from unusable input is.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphicError {
    /// The graphic cannot be built from the supplied geometry
    #[error("Invalid shape: {reason}")]
    InvalidShape {
        /// Why the geometry was rejected.
        reason: String,
    },

    /// Handle index does not address a point of the graphic
    #[error("Handle index {index} out of range for {len} handle points")]
    HandleOutOfRange {
        /// The requested handle index.
        index: usize,
        /// The number of handle points.
        len: usize,
    },

    /// Unknown graphic class identifier
    #[error("Unknown graphic class: {class_id}")]
    UnknownClass {
        /// The class identifier that was not recognized.
        class_id: String,
    },
}

impl GraphicError {
    /// Build an invalid shape error from a reason
    pub fn invalid_shape(reason: impl Into<String>) -> Self {
        GraphicError::InvalidShape {
            reason: reason.into(),
        }
    }
}

/// Calibration error type
///
/// Represents errors related to the pixel-to-physical-unit mapping of an image.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalibrationError {
    /// Pixel spacing must be a finite, strictly positive value
    #[error("Invalid pixel spacing: {value}")]
    InvalidPixelSpacing {
        /// The rejected spacing value.
        value: f64,
    },

    /// Rescale slope must be finite and non-zero
    #[error("Invalid rescale slope: {value}")]
    InvalidRescaleSlope {
        /// The rejected slope value.
        value: f64,
    },

    /// Unknown unit name or abbreviation
    #[error("Unknown unit: {unit}")]
    UnknownUnit {
        /// The unit string that was not recognized.
        unit: String,
    },
}

/// Main error type for medview
///
/// A unified error type that can represent any error from the engine layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Graphic error
    #[error(transparent)]
    Graphic(#[from] GraphicError),

    /// Calibration error
    #[error(transparent)]
    Calibration(#[from] CalibrationError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is an invalid shape error
    pub fn is_invalid_shape(&self) -> bool {
        matches!(self, Error::Graphic(GraphicError::InvalidShape { .. }))
    }

    /// Check if this is a calibration error
    pub fn is_calibration_error(&self) -> bool {
        matches!(self, Error::Calibration(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
