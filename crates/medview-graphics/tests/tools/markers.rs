use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use medview_core::{Calibration, Unit};
use medview_graphics::model::NO_VALUE;
use medview_graphics::{
    names, Graphic, GraphicKind, ImageSampler, MeasureContext, MeasureItem, PixelInfoTool, Point,
    PointTool, ThreePointsCircleTool,
};
use std::f64::consts::PI;

fn value(items: &[MeasureItem], name: &str) -> Option<f64> {
    items
        .iter()
        .find(|i| i.measurement.name == name)
        .and_then(|i| i.value)
}

fn gray() -> ImageSampler {
    let img = GrayImage::from_fn(10, 10, |x, y| Luma([(x * 10 + y) as u8]));
    ImageSampler::new(DynamicImage::ImageLuma8(img))
}

fn pixel_info(anchor: (f64, f64)) -> Graphic {
    Graphic::from_points(
        GraphicKind::PixelInfo(PixelInfoTool),
        &[Point::new(anchor.0, anchor.1), Point::new(anchor.0 + 20.0, anchor.1 - 20.0)],
    )
    .unwrap()
}

#[test]
fn test_point_center_is_calibrated() {
    let cal = Calibration::new(0.5, Unit::Millimeter)
        .unwrap()
        .with_offset(10.0, 0.0);
    let ctx = MeasureContext::new(&cal);
    let g = Graphic::from_points(GraphicKind::Point(PointTool), &[Point::new(4.0, 6.0)]).unwrap();
    let items = g.compute_measurements(&ctx);
    assert_eq!(value(&items, names::CENTER_X.name), Some(7.0));
    assert_eq!(value(&items, names::CENTER_Y.name), Some(3.0));
}

#[test]
fn test_point_marker_is_hit_at_any_zoom() {
    let g = Graphic::from_points(GraphicKind::Point(PointTool), &[Point::new(4.0, 6.0)]).unwrap();
    assert!(g.contains_point(Point::new(4.5, 6.0), 4.0));
    assert!(!g.contains_point(Point::new(40.0, 6.0), 4.0));
}

#[test]
fn test_up_y_axis_flips_ordinate() {
    let cal = Calibration::pixel().with_up_y_axis(100.0);
    let ctx = MeasureContext::new(&cal);
    let g = Graphic::from_points(GraphicKind::Point(PointTool), &[Point::new(4.0, 6.0)]).unwrap();
    assert_eq!(value(&g.compute_measurements(&ctx), names::CENTER_Y.name), Some(94.0));
}

#[test]
fn test_three_points_circle() {
    let cal = Calibration::pixel();
    let ctx = MeasureContext::new(&cal);
    let g = Graphic::from_points(
        GraphicKind::ThreePointsCircle(ThreePointsCircleTool),
        &[Point::new(0.0, 5.0), Point::new(5.0, 0.0), Point::new(0.0, -5.0)],
    )
    .unwrap();
    let items = g.compute_measurements(&ctx);
    assert!((value(&items, names::RADIUS.name).unwrap() - 5.0).abs() < 1e-9);
    assert!((value(&items, names::DIAMETER.name).unwrap() - 10.0).abs() < 1e-9);
    assert!((value(&items, names::AREA.name).unwrap() - 25.0 * PI).abs() < 1e-9);
    assert!(value(&items, names::CENTER_X.name).unwrap().abs() < 1e-9);
}

#[test]
fn test_colinear_circle_is_rejected() {
    let result = Graphic::from_points(
        GraphicKind::ThreePointsCircle(ThreePointsCircleTool),
        &[Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(2.0, 2.0)],
    );
    assert!(result.is_err());
}

#[test]
fn test_pixel_info_label_shows_value() {
    let cal = Calibration::pixel();
    let sampler = gray();
    let ctx = MeasureContext::new(&cal).with_sampler(&sampler);
    let mut g = pixel_info((3.4, 2.9));
    g.refresh(&ctx);
    let label = g.label().unwrap();
    assert_eq!(label.lines(), &["32.00".to_string()]);
    assert_eq!(label.anchor(), Point::new(3.4 + 20.0, 2.9 - 20.0));
}

#[test]
fn test_pixel_info_rescaled_value() {
    let cal = Calibration::pixel()
        .with_rescale(2.0, -1024.0)
        .unwrap()
        .with_pixel_value_unit("HU");
    let sampler = gray();
    let ctx = MeasureContext::new(&cal).with_sampler(&sampler).with_label_decimals(0);
    let mut g = pixel_info((1.0, 1.0));
    g.refresh(&ctx);
    assert_eq!(g.label().unwrap().lines(), &["-1002 HU".to_string()]);
}

#[test]
fn test_pixel_info_outside_image() {
    let cal = Calibration::pixel();
    let sampler = gray();
    let ctx = MeasureContext::new(&cal).with_sampler(&sampler);
    let mut g = pixel_info((-3.0, 4.0));
    g.refresh(&ctx);
    assert_eq!(g.label().unwrap().lines(), &[NO_VALUE.to_string()]);
}

#[test]
fn test_pixel_info_color_bands() {
    let cal = Calibration::new(0.1, Unit::Millimeter).unwrap();
    let img = RgbImage::from_pixel(4, 4, Rgb([10, 20, 30]));
    let sampler = ImageSampler::new(DynamicImage::ImageRgb8(img));
    let ctx = MeasureContext::new(&cal)
        .with_sampler(&sampler)
        .with_label_decimals(0);
    let mut g = pixel_info((2.0, 2.0));
    g.refresh(&ctx);
    assert_eq!(g.label().unwrap().lines(), &["10, 20, 30".to_string()]);

    let items = g.compute_measurements(&ctx);
    let names_seen: Vec<String> = items.iter().map(MeasureItem::name).collect();
    assert!(names_seen.contains(&"Pixel value 3".to_string()));
    assert_eq!(value(&items, names::PIXEL_X.name), Some(2.0));
}
