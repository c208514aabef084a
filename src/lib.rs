//! # Medview
//!
//! Annotation and measurement engine for medical image viewers:
//! - Lines, rectangles, ellipses, polygons and polylines
//! - Angle, open angle, four-points angle and Cobb angle tools
//! - Parallel and perpendicular line pairs, points, pixel info and
//!   three-point circles
//! - Calibrated measurements and pixel statistics
//!
//! ## Architecture
//!
//! 1. **medview-core** - Calibration, units, colors and errors
//! 2. **medview-settings** - Configuration file and measurement overrides
//! 3. **medview-graphics** - Handle points, tools, drag sequences, layer and
//!    annotation documents
//! 4. **medview** - Command line report over annotation files

pub mod report;

pub use medview_core::{format_value, Calibration, Color, Error, GraphicError, Result, Unit};
pub use medview_graphics::{
    AnnotationDocument, DragOutcome, DragSequence, Graphic, GraphicKind, GraphicLayer,
    ImageSampler, MeasureContext, MeasureItem, MeasurementCatalog, PointerEvent,
};
pub use medview_settings::{Config, MeasurementFlags};
pub use report::{GraphicReport, ReportOptions};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Pretty console output on stderr
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
