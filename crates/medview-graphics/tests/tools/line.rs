use medview_core::{Calibration, Unit};
use medview_graphics::{names, Graphic, GraphicKind, LineTool, MeasureContext, MeasureItem, Point};

fn line(a: (f64, f64), b: (f64, f64)) -> Graphic {
    Graphic::from_points(
        GraphicKind::Line(LineTool),
        &[Point::new(a.0, a.1), Point::new(b.0, b.1)],
    )
    .unwrap()
}

fn item<'a>(items: &'a [MeasureItem], name: &str) -> &'a MeasureItem {
    items.iter().find(|i| i.measurement.name == name).unwrap()
}

#[test]
fn test_line_length_in_pixels() {
    let cal = Calibration::pixel();
    let ctx = MeasureContext::new(&cal);
    let items = line((0.0, 0.0), (3.0, 4.0)).compute_measurements(&ctx);
    let length = item(&items, names::LINE_LENGTH.name);
    assert_eq!(length.value, Some(5.0));
    assert_eq!(length.unit, "pix");
    assert_eq!(item(&items, names::LAST_POINT_X.name).value, Some(3.0));
    assert_eq!(item(&items, names::LAST_POINT_Y.name).value, Some(4.0));
}

#[test]
fn test_line_length_calibrated() {
    let cal = Calibration::new(0.5, Unit::Millimeter).unwrap();
    let ctx = MeasureContext::new(&cal);
    let items = line((0.0, 0.0), (30.0, 40.0)).compute_measurements(&ctx);
    let length = item(&items, names::LINE_LENGTH.name);
    assert_eq!(length.value, Some(25.0));
    assert_eq!(length.unit, "mm");
    assert_eq!(item(&items, names::LAST_POINT_X.name).value, Some(15.0));
}

#[test]
fn test_line_orientation_and_azimuth() {
    let cal = Calibration::pixel();
    let ctx = MeasureContext::new(&cal);
    let items = line((0.0, 10.0), (10.0, 0.0)).compute_measurements(&ctx);
    let orientation = item(&items, names::ORIENTATION.name).value.unwrap();
    let azimuth = item(&items, names::AZIMUTH.name).value.unwrap();
    assert!((orientation - 45.0).abs() < 1e-9);
    assert!((azimuth - 45.0).abs() < 1e-9);
}

#[test]
fn test_line_label() {
    let cal = Calibration::new(0.5, Unit::Millimeter).unwrap();
    let ctx = MeasureContext::new(&cal);
    let mut g = line((0.0, 0.0), (30.0, 40.0));
    g.refresh(&ctx);
    let label = g.label().unwrap();
    assert_eq!(label.lines(), &["Line length : 25.00 mm".to_string()]);
    // right of the shape, vertically centered
    assert_eq!(label.anchor(), Point::new(33.0, 20.0));

    let ctx = ctx.with_label_decimals(0);
    g.refresh(&ctx);
    assert_eq!(g.label().unwrap().lines(), &["Line length : 25 mm".to_string()]);
}

#[test]
fn test_hidden_label_is_not_built() {
    let cal = Calibration::pixel();
    let ctx = MeasureContext::new(&cal);
    let mut g = line((0.0, 0.0), (3.0, 4.0));
    g.set_label_visible(false, &ctx);
    g.refresh(&ctx);
    assert!(g.label().is_none());
    g.set_label_visible(true, &ctx);
    assert!(g.label().is_some());
}
