use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use medview_core::Calibration;
use medview_graphics::{
    names, Bounds, Graphic, ImageSampler, MeasureContext, MeasureItem, MeasurementCatalog,
};
use medview_settings::{Config, MeasurementFlags};

fn value(items: &[MeasureItem], name: &str) -> Option<f64> {
    items
        .iter()
        .find(|i| i.name() == name)
        .and_then(|i| i.value)
}

/// 8x8 ramp where pixel (x, y) holds `x + 8y`
fn ramp() -> ImageSampler {
    let img = GrayImage::from_fn(8, 8, |x, y| Luma([(x + 8 * y) as u8]));
    ImageSampler::new(DynamicImage::ImageLuma8(img))
}

fn square() -> Graphic {
    Graphic::rectangle(Bounds::new(0.0, 0.0, 4.0, 4.0)).unwrap()
}

#[test]
fn test_rectangle_statistics() {
    let cal = Calibration::pixel();
    let sampler = ramp();
    let ctx = MeasureContext::new(&cal).with_sampler(&sampler);
    let items = square().compute_measurements(&ctx);
    assert_eq!(value(&items, names::IMAGE_PIXELS.name), Some(16.0));
    assert_eq!(value(&items, names::IMAGE_MIN.name), Some(0.0));
    assert_eq!(value(&items, names::IMAGE_MAX.name), Some(27.0));
    assert_eq!(value(&items, names::IMAGE_MEAN.name), Some(13.5));
    assert_eq!(value(&items, names::IMAGE_MEDIAN.name), Some(13.5));
    assert!(value(&items, names::IMAGE_SKEW.name).unwrap().abs() < 1e-9);
}

#[test]
fn test_statistics_wait_for_release() {
    let cal = Calibration::pixel();
    let sampler = ramp();
    let ctx = MeasureContext::new(&cal).with_sampler(&sampler).released(false);
    let items = square().compute_measurements(&ctx);
    let mean = items.iter().find(|i| i.measurement == names::IMAGE_MEAN).unwrap();
    assert_eq!(mean.value, None);
    assert_eq!(value(&items, names::AREA.name), Some(16.0));
}

#[test]
fn test_statistics_are_rescaled() {
    let cal = Calibration::pixel()
        .with_rescale(2.0, -10.0)
        .unwrap()
        .with_pixel_value_unit("HU");
    let sampler = ramp();
    let ctx = MeasureContext::new(&cal).with_sampler(&sampler);
    let items = square().compute_measurements(&ctx);
    let mean = items.iter().find(|i| i.measurement == names::IMAGE_MEAN).unwrap();
    assert_eq!(mean.value, Some(17.0));
    assert_eq!(mean.unit, "HU");
    assert_eq!(value(&items, names::IMAGE_MIN.name), Some(-10.0));
}

#[test]
fn test_padding_is_excluded() {
    let cal = Calibration::pixel();
    let sampler = ramp().with_padding(0.0, 1.0);
    let ctx = MeasureContext::new(&cal).with_sampler(&sampler);
    let items = square().compute_measurements(&ctx);
    assert_eq!(value(&items, names::IMAGE_PIXELS.name), Some(14.0));
    assert_eq!(value(&items, names::IMAGE_MIN.name), Some(2.0));

    let mut config = Config::default();
    config.statistics.exclude_padding = false;
    let catalog = MeasurementCatalog::from_config(&config).unwrap();
    let ctx = ctx.with_catalog(&catalog);
    let items = square().compute_measurements(&ctx);
    assert_eq!(value(&items, names::IMAGE_PIXELS.name), Some(16.0));
}

#[test]
fn test_empty_region_has_no_values() {
    let cal = Calibration::pixel();
    let sampler = ramp();
    let ctx = MeasureContext::new(&cal).with_sampler(&sampler);
    let outside = Graphic::rectangle(Bounds::new(20.0, 20.0, 30.0, 30.0)).unwrap();
    let items = outside.compute_measurements(&ctx);
    let pixels = items.iter().find(|i| i.measurement == names::IMAGE_PIXELS).unwrap();
    assert_eq!(pixels.value, None);
}

#[test]
fn test_color_image_has_one_item_per_band() {
    let cal = Calibration::pixel();
    let img = RgbImage::from_pixel(8, 8, Rgb([10, 20, 30]));
    let sampler = ImageSampler::new(DynamicImage::ImageRgb8(img));
    let ctx = MeasureContext::new(&cal).with_sampler(&sampler);
    let items = square().compute_measurements(&ctx);
    assert_eq!(value(&items, "Mean 1"), Some(10.0));
    assert_eq!(value(&items, "Mean 2"), Some(20.0));
    assert_eq!(value(&items, "Mean 3"), Some(30.0));
    assert_eq!(value(&items, "StDev 3"), Some(0.0));
    assert_eq!(value(&items, "Skewness 1"), None);
}

#[test]
fn test_padded_band_keeps_its_index() {
    let cal = Calibration::pixel();
    let img = RgbImage::from_pixel(8, 8, Rgb([10, 20, 30]));
    // every red sample falls in the padding range
    let sampler = ImageSampler::new(DynamicImage::ImageRgb8(img)).with_padding(5.0, 15.0);
    let ctx = MeasureContext::new(&cal).with_sampler(&sampler);
    let items = square().compute_measurements(&ctx);
    assert_eq!(value(&items, "Mean 1"), None);
    assert_eq!(value(&items, "Mean 2"), Some(20.0));
    assert_eq!(value(&items, "Mean 3"), Some(30.0));
    assert_eq!(value(&items, names::IMAGE_PIXELS.name), Some(16.0));
}

#[test]
fn test_statistics_can_be_disabled() {
    let cal = Calibration::pixel();
    let sampler = ramp();
    let mut config = Config::default();
    config.statistics.enabled = false;
    let catalog = MeasurementCatalog::from_config(&config).unwrap();
    let ctx = MeasureContext::new(&cal)
        .with_sampler(&sampler)
        .with_catalog(&catalog);
    let items = square().compute_measurements(&ctx);
    assert!(items.iter().all(|i| i.measurement != names::IMAGE_PIXELS));
    assert!(value(&items, names::AREA.name).is_some());
}

#[test]
fn test_label_follows_configured_flags() {
    let cal = Calibration::pixel();
    let sampler = ramp();
    let mut config = Config::default();
    config.set_measurement_override(
        "rectangle",
        names::IMAGE_STD.name,
        MeasurementFlags {
            graphic_label: Some(false),
            ..Default::default()
        },
    );
    config.set_measurement_override(
        "rectangle",
        names::PERIMETER.name,
        MeasurementFlags {
            computed: Some(false),
            ..Default::default()
        },
    );
    let catalog = MeasurementCatalog::from_config(&config).unwrap();
    let ctx = MeasureContext::new(&cal)
        .with_sampler(&sampler)
        .with_catalog(&catalog);

    let mut rect = square();
    rect.refresh(&ctx);
    assert_eq!(
        rect.label().unwrap().lines(),
        &["Area : 16.00 pix".to_string(), "Mean : 13.50".to_string()]
    );
    let items = rect.compute_measurements(&ctx);
    assert!(items.iter().all(|i| i.measurement.id != names::PERIMETER.id));
}
