//! Measurement descriptors, measured values and the context a graphic is
//! measured in.

use std::collections::BTreeMap;

use medview_core::{format_value, Calibration};
use medview_settings::{Config, ConfigError, ConfigResult, MeasurementFlags};

use crate::model::{GraphicKind, GraphicTool};
use crate::statistics::PixelSampler;

/// Unit of every angle measurement
pub const DEGREE: &str = "deg";

/// Static description of one measurement a graphic can provide
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurement {
    pub name: &'static str,
    pub id: u16,
    /// Recomputed during the drag, not only on release
    pub quick_computing: bool,
    pub computed: bool,
    /// Shown on the graphic label
    pub graphic_label: bool,
}

impl Measurement {
    pub const fn new(name: &'static str, id: u16, quick_computing: bool, graphic_label: bool) -> Self {
        Self {
            name,
            id,
            quick_computing,
            computed: true,
            graphic_label,
        }
    }

    fn with_flags(mut self, flags: &MeasurementFlags) -> Self {
        if let Some(computed) = flags.computed {
            self.computed = computed;
        }
        if let Some(quick) = flags.quick_computing {
            self.quick_computing = quick;
        }
        if let Some(label) = flags.graphic_label {
            self.graphic_label = label;
        }
        self
    }
}

pub mod names {
    use super::Measurement;

    pub const CENTER_X: Measurement = Measurement::new("Center X", 1, true, false);
    pub const CENTER_Y: Measurement = Measurement::new("Center Y", 2, true, false);
    pub const FIRST_POINT_X: Measurement = Measurement::new("Start X", 3, true, false);
    pub const FIRST_POINT_Y: Measurement = Measurement::new("Start Y", 4, true, false);
    pub const LAST_POINT_X: Measurement = Measurement::new("End X", 5, true, false);
    pub const LAST_POINT_Y: Measurement = Measurement::new("End Y", 6, true, false);
    pub const LINE_LENGTH: Measurement = Measurement::new("Line length", 7, true, true);
    pub const ORIENTATION: Measurement = Measurement::new("Orientation", 8, true, false);
    pub const AZIMUTH: Measurement = Measurement::new("Azimuth", 9, true, false);
    pub const TOP_LEFT_X: Measurement = Measurement::new("Top Left X", 10, true, false);
    pub const TOP_LEFT_Y: Measurement = Measurement::new("Top Left Y", 11, true, false);
    pub const WIDTH: Measurement = Measurement::new("Width", 12, true, false);
    pub const HEIGHT: Measurement = Measurement::new("Height", 13, true, false);
    pub const AREA: Measurement = Measurement::new("Area", 14, true, true);
    pub const PERIMETER: Measurement = Measurement::new("Perimeter", 15, true, false);
    pub const RADIUS: Measurement = Measurement::new("Radius", 16, true, false);
    pub const DIAMETER: Measurement = Measurement::new("Diameter", 17, true, false);
    pub const ANGLE: Measurement = Measurement::new("Angle", 18, true, true);
    pub const COMPLEMENTARY_ANGLE: Measurement = Measurement::new("Compl. Angle", 19, true, true);
    pub const REFLEX_ANGLE: Measurement = Measurement::new("Reflex angle", 20, true, false);
    pub const DISTANCE: Measurement = Measurement::new("Distance", 21, true, true);
    pub const OMBB_WIDTH: Measurement = Measurement::new("Width (OMBB)", 22, false, false);
    pub const OMBB_LENGTH: Measurement = Measurement::new("Length (OMBB)", 23, false, false);
    pub const OMBB_ORIENTATION: Measurement =
        Measurement::new("Orientation (OMBB)", 24, false, false);
    pub const ANCHOR_X: Measurement = Measurement::new("Anchor X", 25, true, false);
    pub const ANCHOR_Y: Measurement = Measurement::new("Anchor Y", 26, true, false);
    pub const PIXEL_X: Measurement = Measurement::new("Pixel X", 27, true, false);
    pub const PIXEL_Y: Measurement = Measurement::new("Pixel Y", 28, true, false);
    pub const PIXEL_VALUE: Measurement = Measurement::new("Pixel value", 29, true, true);

    pub const IMAGE_PIXELS: Measurement = Measurement::new("Pixels", 40, false, false);
    pub const IMAGE_MIN: Measurement = Measurement::new("Min", 41, false, false);
    pub const IMAGE_MAX: Measurement = Measurement::new("Max", 42, false, false);
    pub const IMAGE_MEDIAN: Measurement = Measurement::new("Median", 43, false, false);
    pub const IMAGE_MEAN: Measurement = Measurement::new("Mean", 44, false, true);
    pub const IMAGE_STD: Measurement = Measurement::new("StDev", 45, false, true);
    pub const IMAGE_SKEW: Measurement = Measurement::new("Skewness", 46, false, false);
    pub const IMAGE_KURTOSIS: Measurement = Measurement::new("Kurtosis", 47, false, false);

    /// Statistics provided by every closed shape
    pub const IMAGE_STATISTICS: [Measurement; 8] = [
        IMAGE_PIXELS,
        IMAGE_MIN,
        IMAGE_MAX,
        IMAGE_MEDIAN,
        IMAGE_MEAN,
        IMAGE_STD,
        IMAGE_SKEW,
        IMAGE_KURTOSIS,
    ];
}

/// Measured value. `value` is `None` when the measurement is not
/// available yet (slow measurement during a drag) or undefined.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasureItem {
    pub measurement: Measurement,
    /// Appended to the name, e.g. the band index of a color image
    pub label_extension: Option<String>,
    pub value: Option<f64>,
    pub unit: String,
}

impl MeasureItem {
    pub fn name(&self) -> String {
        match &self.label_extension {
            Some(ext) => format!("{}{}", self.measurement.name, ext),
            None => self.measurement.name.to_string(),
        }
    }

    /// `name : value unit`, or `name : ` when no value is available
    pub fn label_line(&self, decimals: usize) -> String {
        match self.value {
            Some(value) if self.unit.is_empty() => {
                format!("{} : {}", self.name(), format_value(value, decimals))
            }
            Some(value) => format!(
                "{} : {} {}",
                self.name(),
                format_value(value, decimals),
                self.unit
            ),
            None => format!("{} : ", self.name()),
        }
    }
}

/// Measurement flags after applying the configuration overrides
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementCatalog {
    overrides: BTreeMap<String, BTreeMap<String, MeasurementFlags>>,
    statistics_enabled: bool,
    exclude_padding: bool,
}

impl Default for MeasurementCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MeasurementCatalog {
    pub fn new() -> Self {
        Self {
            overrides: BTreeMap::new(),
            statistics_enabled: true,
            exclude_padding: true,
        }
    }

    /// Build the catalog from the configuration, rejecting overrides that
    /// name an unknown graphic or measurement
    pub fn from_config(config: &Config) -> ConfigResult<Self> {
        for (class_id, measurements) in &config.measurements {
            let kind = GraphicKind::from_class_id(class_id).ok_or_else(|| {
                ConfigError::UnknownMeasurement {
                    class_id: class_id.clone(),
                    measurement: measurements.keys().next().cloned().unwrap_or_default(),
                }
            })?;
            let available = kind.measurement_list();
            for name in measurements.keys() {
                if !available.iter().any(|m| m.name == name.as_str()) {
                    return Err(ConfigError::UnknownMeasurement {
                        class_id: class_id.clone(),
                        measurement: name.clone(),
                    });
                }
            }
        }
        Ok(Self {
            overrides: config.measurements.clone(),
            statistics_enabled: config.statistics.enabled,
            exclude_padding: config.statistics.exclude_padding,
        })
    }

    pub fn resolve(&self, class_id: &str, measurement: Measurement) -> Measurement {
        match self
            .overrides
            .get(class_id)
            .and_then(|m| m.get(measurement.name))
        {
            Some(flags) => measurement.with_flags(flags),
            None => measurement,
        }
    }

    pub fn statistics_enabled(&self) -> bool {
        self.statistics_enabled
    }

    pub fn exclude_padding(&self) -> bool {
        self.exclude_padding
    }
}

/// Everything a graphic needs from its host to measure itself
#[derive(Clone, Copy)]
pub struct MeasureContext<'a> {
    calibration: &'a Calibration,
    sampler: Option<&'a dyn PixelSampler>,
    catalog: Option<&'a MeasurementCatalog>,
    release_event: bool,
    label_decimals: usize,
}

impl<'a> MeasureContext<'a> {
    pub fn new(calibration: &'a Calibration) -> Self {
        Self {
            calibration,
            sampler: None,
            catalog: None,
            release_event: true,
            label_decimals: 2,
        }
    }

    pub fn with_sampler(mut self, sampler: &'a dyn PixelSampler) -> Self {
        self.sampler = Some(sampler);
        self
    }

    pub fn with_catalog(mut self, catalog: &'a MeasurementCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn with_label_decimals(mut self, decimals: usize) -> Self {
        self.label_decimals = decimals;
        self
    }

    /// Copy of the context flagged as a release (`true`) or a drag step
    pub fn released(mut self, release: bool) -> Self {
        self.release_event = release;
        self
    }

    pub fn calibration(&self) -> &'a Calibration {
        self.calibration
    }

    pub fn sampler(&self) -> Option<&'a dyn PixelSampler> {
        self.sampler
    }

    pub fn is_release(&self) -> bool {
        self.release_event
    }

    pub fn label_decimals(&self) -> usize {
        self.label_decimals
    }

    pub fn statistics_enabled(&self) -> bool {
        self.catalog.map_or(true, |c| c.statistics_enabled())
    }

    pub fn exclude_padding(&self) -> bool {
        self.catalog.map_or(true, |c| c.exclude_padding())
    }

    pub fn resolve(&self, class_id: &str, measurement: Measurement) -> Measurement {
        match self.catalog {
            Some(catalog) => catalog.resolve(class_id, measurement),
            None => measurement,
        }
    }
}

/// Accumulates the items of one measurement pass, honoring the computed
/// and quick flags
pub struct MeasureCollector<'a, 'c> {
    class_id: &'static str,
    ctx: &'c MeasureContext<'a>,
    items: Vec<MeasureItem>,
}

impl<'a, 'c> MeasureCollector<'a, 'c> {
    pub fn new(class_id: &'static str, ctx: &'c MeasureContext<'a>) -> Self {
        Self {
            class_id,
            ctx,
            items: Vec::new(),
        }
    }

    pub fn ctx(&self) -> &MeasureContext<'a> {
        self.ctx
    }

    /// Add a measurement; `value` is only evaluated when the measurement is
    /// due in this pass
    pub fn add(
        &mut self,
        measurement: Measurement,
        unit: impl Into<String>,
        value: impl FnOnce() -> Option<f64>,
    ) {
        self.add_with_extension(measurement, None, unit, value);
    }

    pub fn add_with_extension(
        &mut self,
        measurement: Measurement,
        label_extension: Option<String>,
        unit: impl Into<String>,
        value: impl FnOnce() -> Option<f64>,
    ) {
        let measurement = self.ctx.resolve(self.class_id, measurement);
        if !measurement.computed {
            return;
        }
        let value = if self.ctx.is_release() || measurement.quick_computing {
            value()
        } else {
            None
        };
        self.items.push(MeasureItem {
            measurement,
            label_extension,
            value,
            unit: unit.into(),
        });
    }

    pub fn finish(self) -> Vec<MeasureItem> {
        self.items
    }
}
