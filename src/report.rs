//! Measurement report of an annotation file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use medview_core::{Calibration, Unit};
use medview_graphics::{
    AnnotationDocument, GraphicTool, ImageSampler, MeasureContext, MeasureItem,
    MeasurementCatalog,
};
use medview_settings::Config;
use tracing::info;

/// How the annotations are measured
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    pub pixel_size: f64,
    pub unit: Unit,
    /// Image the statistics and pixel values are read from
    pub image: Option<PathBuf>,
    pub label_decimals: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            pixel_size: 1.0,
            unit: Unit::Pixel,
            image: None,
            label_decimals: 2,
        }
    }
}

impl ReportOptions {
    pub fn calibration(&self) -> Result<Calibration> {
        if self.unit == Unit::Pixel {
            return Ok(Calibration::pixel());
        }
        Calibration::new(self.pixel_size, self.unit)
            .with_context(|| format!("Invalid pixel size {}", self.pixel_size))
    }
}

/// Measurements and label of one graphic
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicReport {
    pub class_id: String,
    pub name: String,
    pub label: Vec<String>,
    pub measurements: Vec<MeasureItem>,
}

/// Load the annotation file at `path` and measure every graphic
pub fn report_file(path: &Path, config: &Config, options: &ReportOptions) -> Result<Vec<GraphicReport>> {
    let doc = AnnotationDocument::load_from_file(path)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    report_document(&doc, config, options)
}

pub fn report_document(
    doc: &AnnotationDocument,
    config: &Config,
    options: &ReportOptions,
) -> Result<Vec<GraphicReport>> {
    let calibration = options.calibration()?;
    let catalog =
        MeasurementCatalog::from_config(config).context("Invalid measurement configuration")?;
    let sampler = match &options.image {
        Some(path) => {
            let image = image::open(path)
                .with_context(|| format!("Failed to open image {}", path.display()))?;
            Some(ImageSampler::new(image))
        }
        None => None,
    };

    let mut ctx = MeasureContext::new(&calibration)
        .with_catalog(&catalog)
        .with_label_decimals(options.label_decimals);
    if let Some(sampler) = &sampler {
        ctx = ctx.with_sampler(sampler);
    }

    let mut layer = doc.to_layer();
    layer.refresh_all(&ctx);
    info!(
        document = %doc.metadata.name,
        graphics = layer.len(),
        "measuring annotations"
    );

    Ok(layer
        .graphics()
        .iter()
        .map(|graphic| GraphicReport {
            class_id: graphic.class_id().to_string(),
            name: graphic.kind().name().to_string(),
            label: graphic
                .label()
                .map(|label| label.lines().to_vec())
                .unwrap_or_default(),
            measurements: graphic.compute_measurements(&ctx),
        })
        .collect())
}

impl GraphicReport {
    /// Report text: the graphic name followed by one line per measurement
    pub fn to_text(&self, decimals: usize) -> String {
        let mut text = format!("{} ({})\n", self.name, self.class_id);
        for item in &self.measurements {
            text.push_str("  ");
            text.push_str(&item.label_line(decimals));
            text.push('\n');
        }
        text
    }
}
