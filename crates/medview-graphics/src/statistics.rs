//! Pixel statistics over the area of a closed graphic.
//!
//! A pixel belongs to the region when its center lies inside the shape.
//! Samples are rescaled to modality values before aggregation, and samples
//! within the image padding range can be excluded.

use image::{DynamicImage, GenericImageView};
use medview_core::Calibration;
use tracing::debug;

use crate::measure::{names, MeasureCollector, Measurement};
use crate::model::GraphicShape;

/// Read access to the raw samples of the image under a graphic
pub trait PixelSampler {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn band_count(&self) -> usize;
    /// Raw sample, `None` outside the image
    fn sample(&self, x: u32, y: u32, band: usize) -> Option<f64>;
    /// Raw padding value range, bounds included
    fn padding_range(&self) -> Option<(f64, f64)> {
        None
    }
}

/// [`PixelSampler`] over a decoded image
#[derive(Debug, Clone)]
pub struct ImageSampler {
    image: DynamicImage,
    padding: Option<(f64, f64)>,
}

impl ImageSampler {
    pub fn new(image: DynamicImage) -> Self {
        let image = match image {
            DynamicImage::ImageLuma8(_)
            | DynamicImage::ImageLuma16(_)
            | DynamicImage::ImageRgb8(_)
            | DynamicImage::ImageRgb16(_)
            | DynamicImage::ImageRgb32F(_) => image,
            DynamicImage::ImageLumaA8(_) => DynamicImage::ImageLuma8(image.to_luma8()),
            DynamicImage::ImageLumaA16(_) => DynamicImage::ImageLuma16(image.to_luma16()),
            DynamicImage::ImageRgba16(_) => DynamicImage::ImageRgb16(image.to_rgb16()),
            DynamicImage::ImageRgba32F(_) => DynamicImage::ImageRgb32F(image.to_rgb32f()),
            other => DynamicImage::ImageRgb8(other.to_rgb8()),
        };
        Self {
            image,
            padding: None,
        }
    }

    /// Padding range of the raw values. A reversed range is accepted.
    pub fn with_padding(mut self, value: f64, limit: f64) -> Self {
        self.padding = Some((value.min(limit), value.max(limit)));
        self
    }
}

impl PixelSampler for ImageSampler {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn band_count(&self) -> usize {
        match self.image {
            DynamicImage::ImageLuma8(_) | DynamicImage::ImageLuma16(_) => 1,
            _ => 3,
        }
    }

    fn sample(&self, x: u32, y: u32, band: usize) -> Option<f64> {
        if x >= self.width() || y >= self.height() || band >= self.band_count() {
            return None;
        }
        let value = match &self.image {
            DynamicImage::ImageLuma8(img) => img.get_pixel(x, y)[0] as f64,
            DynamicImage::ImageLuma16(img) => img.get_pixel(x, y)[0] as f64,
            DynamicImage::ImageRgb16(img) => img.get_pixel(x, y)[band] as f64,
            DynamicImage::ImageRgb32F(img) => img.get_pixel(x, y)[band] as f64,
            DynamicImage::ImageRgb8(img) => img.get_pixel(x, y)[band] as f64,
            other => other.get_pixel(x, y)[band] as f64,
        };
        Some(value)
    }

    fn padding_range(&self) -> Option<(f64, f64)> {
        self.padding
    }
}

/// Statistics of one band of the region
#[derive(Debug, Clone, PartialEq)]
pub struct BandStatistics {
    pub pixels: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation
    pub std_dev: f64,
    pub skewness: Option<f64>,
    /// Excess kurtosis
    pub kurtosis: Option<f64>,
}

impl BandStatistics {
    /// Statistics of `values`, `None` when empty. The slice is sorted.
    pub fn from_values(values: &mut [f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        values.sort_by(f64::total_cmp);
        let n = values.len();
        let count = n as f64;
        let mean = values.iter().sum::<f64>() / count;

        let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
        for v in values.iter() {
            let d = v - mean;
            let d2 = d * d;
            m2 += d2;
            m3 += d2 * d;
            m4 += d2 * d2;
        }
        let std_dev = (m2 / (count - 1.0).max(1.0)).sqrt();
        m2 /= count;
        m3 /= count;
        m4 /= count;
        let (skewness, kurtosis) = if m2 > 0.0 {
            (Some(m3 / m2.powf(1.5)), Some(m4 / (m2 * m2) - 3.0))
        } else {
            (None, None)
        };

        let median = if n % 2 == 1 {
            values[n / 2]
        } else {
            (values[n / 2 - 1] + values[n / 2]) / 2.0
        };

        Some(Self {
            pixels: n,
            min: values[0],
            max: values[n - 1],
            mean,
            median,
            std_dev,
            skewness,
            kurtosis,
        })
    }
}

/// Per-band statistics of the pixels whose center lies inside `shape`,
/// indexed by band. A band left without samples is `None`.
pub fn region_statistics(
    shape: &GraphicShape,
    sampler: &dyn PixelSampler,
    calibration: &Calibration,
    exclude_padding: bool,
) -> Vec<Option<BandStatistics>> {
    let Some(bounds) = shape.bounds() else {
        return Vec::new();
    };
    let x0 = bounds.min_x.floor().max(0.0) as u32;
    let y0 = bounds.min_y.floor().max(0.0) as u32;
    let x1 = (bounds.max_x.ceil().max(0.0) as u32).min(sampler.width());
    let y1 = (bounds.max_y.ceil().max(0.0) as u32).min(sampler.height());
    let padding = if exclude_padding {
        sampler.padding_range()
    } else {
        None
    };

    let bands = sampler.band_count();
    let mut values: Vec<Vec<f64>> = vec![Vec::new(); bands];
    for y in y0..y1 {
        for x in x0..x1 {
            let center = crate::model::Point::new(x as f64 + 0.5, y as f64 + 0.5);
            if !shape.contains_area(center) {
                continue;
            }
            for (band, band_values) in values.iter_mut().enumerate() {
                let Some(raw) = sampler.sample(x, y, band) else {
                    continue;
                };
                if let Some((low, high)) = padding {
                    if raw >= low && raw <= high {
                        continue;
                    }
                }
                band_values.push(calibration.pixel_to_real(raw));
            }
        }
    }

    let stats: Vec<Option<BandStatistics>> = values
        .iter_mut()
        .map(|v| BandStatistics::from_values(v))
        .collect();
    debug!(
        "Region statistics over {} bands, {} pixels",
        stats.len(),
        region_pixels(&stats).unwrap_or(0)
    );
    stats
}

/// Largest sample count over the bands
fn region_pixels(stats: &[Option<BandStatistics>]) -> Option<usize> {
    stats.iter().flatten().map(|s| s.pixels).max()
}

type StatField = fn(&BandStatistics) -> Option<f64>;

/// Append the pixel statistics of a closed shape. Values are only
/// computed on release.
pub fn append_image_statistics(collector: &mut MeasureCollector<'_, '_>, shape: Option<&GraphicShape>) {
    let ctx = *collector.ctx();
    if !ctx.statistics_enabled() {
        return;
    }
    let Some(sampler) = ctx.sampler() else {
        return;
    };

    let stats = match shape {
        Some(shape) if ctx.is_release() => {
            region_statistics(shape, sampler, ctx.calibration(), ctx.exclude_padding())
        }
        _ => Vec::new(),
    };
    let unit = ctx.calibration().pixel_value_unit().unwrap_or("");

    collector.add(names::IMAGE_PIXELS, "pix", || {
        region_pixels(&stats).map(|pixels| pixels as f64)
    });

    let fields: [(Measurement, StatField, &str); 7] = [
        (names::IMAGE_MIN, |s| Some(s.min), unit),
        (names::IMAGE_MAX, |s| Some(s.max), unit),
        (names::IMAGE_MEDIAN, |s| Some(s.median), unit),
        (names::IMAGE_MEAN, |s| Some(s.mean), unit),
        (names::IMAGE_STD, |s| Some(s.std_dev), unit),
        (names::IMAGE_SKEW, |s| s.skewness, ""),
        (names::IMAGE_KURTOSIS, |s| s.kurtosis, ""),
    ];

    let bands = sampler.band_count();
    for (measurement, field, unit) in fields {
        if bands == 1 {
            collector.add(measurement, unit, || {
                stats.first().and_then(Option::as_ref).and_then(field)
            });
        } else {
            for band in 0..bands {
                collector.add_with_extension(
                    measurement,
                    Some(format!(" {}", band + 1)),
                    unit,
                    || stats.get(band).and_then(Option::as_ref).and_then(field),
                );
            }
        }
    }
}
