use medview_core::Calibration;
use medview_graphics::{
    names, Graphic, GraphicKind, GraphicTool, HandlePoints, MeasureContext, MeasureItem, Point,
    PointCount, PolygonTool, PolylineTool,
};
use proptest::prelude::*;
use std::f64::consts::PI;

fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
    coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
}

fn value(items: &[MeasureItem], name: &str) -> Option<f64> {
    items
        .iter()
        .find(|i| i.measurement.name == name)
        .and_then(|i| i.value)
}

fn polygon(coords: &[(f64, f64)]) -> Graphic {
    Graphic::from_points(GraphicKind::Polygon(PolygonTool), &pts(coords)).unwrap()
}

#[test]
fn test_square_measurements() {
    let cal = Calibration::pixel();
    let ctx = MeasureContext::new(&cal);
    let items = polygon(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]).compute_measurements(&ctx);
    assert_eq!(value(&items, names::AREA.name), Some(100.0));
    assert_eq!(value(&items, names::PERIMETER.name), Some(40.0));
    assert_eq!(value(&items, names::WIDTH.name), Some(10.0));
    let cx = value(&items, names::CENTER_X.name).unwrap();
    let cy = value(&items, names::CENTER_Y.name).unwrap();
    assert!((cx - 5.0).abs() < 1e-9 && (cy - 5.0).abs() < 1e-9);
}

#[test]
fn test_pentagram_counts_overlap_once() {
    let cal = Calibration::pixel();
    let ctx = MeasureContext::new(&cal);
    let pentagram: Vec<Point> = (0..5)
        .map(|k| {
            let a = (-90.0 + 144.0 * k as f64).to_radians();
            Point::new(50.0 + 10.0 * a.cos(), 50.0 + 10.0 * a.sin())
        })
        .collect();
    let g = Graphic::from_points(GraphicKind::Polygon(PolygonTool), &pentagram).unwrap();
    let items = g.compute_measurements(&ctx);

    // star outline only, the inner pentagon is not counted twice
    let area = value(&items, names::AREA.name).unwrap();
    assert!((area - 112.256_994_144_896).abs() < 1e-6);

    let phi = (1.0 + 5f64.sqrt()) / 2.0;
    let chord = 20.0 * 72f64.to_radians().sin();
    let perimeter = value(&items, names::PERIMETER.name).unwrap();
    assert!((perimeter - 10.0 * chord * phi / (2.0 * phi + 1.0)).abs() < 1e-6);

    let cx = value(&items, names::CENTER_X.name).unwrap();
    let cy = value(&items, names::CENTER_Y.name).unwrap();
    assert!((cx - 50.0).abs() < 1e-6 && (cy - 50.0).abs() < 1e-6);
}

#[test]
fn test_coincident_successive_points_are_invalid() {
    let coords = [(0.0, 0.0), (5.0, 5.0), (5.0, 5.0), (10.0, 0.0)];
    assert!(Graphic::from_points(GraphicKind::Polygon(PolygonTool), &pts(&coords)).is_err());

    let handles = HandlePoints::with_points(PointCount::Fixed(4), &pts(&coords));
    assert!(handles.is_complete());
    assert!(!PolygonTool.is_shape_valid(&handles));
}

#[test]
fn test_closing_point_is_dropped() {
    // double-click leftovers: the last point repeated, and equal to the first
    let g = polygon(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 0.0), (0.0, 0.0)]);
    assert_eq!(g.points(), pts(&[(10.0, 0.0), (10.0, 10.0), (0.0, 0.0)]).as_slice());
    assert!(g.is_shape_valid());
}

#[test]
fn test_oriented_box_waits_for_release() {
    let cal = Calibration::pixel();
    let ctx = MeasureContext::new(&cal);
    let g = polygon(&[(0.0, 0.0), (10.0, 10.0), (5.0, 15.0), (-5.0, 5.0)]);

    let dragging = g.compute_measurements(&ctx.released(false));
    assert!(value(&dragging, names::AREA.name).is_some());
    let ombb = dragging
        .iter()
        .find(|i| i.measurement == names::OMBB_LENGTH)
        .unwrap();
    assert_eq!(ombb.value, None);

    let released = g.compute_measurements(&ctx);
    let length = value(&released, names::OMBB_LENGTH.name).unwrap();
    let width = value(&released, names::OMBB_WIDTH.name).unwrap();
    assert!((length - 200f64.sqrt()).abs() < 1e-9);
    assert!((width - 50f64.sqrt()).abs() < 1e-9);
    let orientation = value(&released, names::OMBB_ORIENTATION.name).unwrap();
    assert!((orientation - 135.0).abs() < 1e-9 || (orientation - 45.0).abs() < 1e-9);
}

#[test]
fn test_polyline_length() {
    let cal = Calibration::pixel();
    let ctx = MeasureContext::new(&cal);
    let g = Graphic::from_points(
        GraphicKind::Polyline(PolylineTool),
        &pts(&[(0.0, 0.0), (3.0, 4.0), (3.0, 10.0)]),
    )
    .unwrap();
    let items = g.compute_measurements(&ctx);
    assert_eq!(value(&items, names::LINE_LENGTH.name), Some(11.0));
    assert_eq!(value(&items, names::LAST_POINT_Y.name), Some(10.0));
    assert!(!g.kind().is_area());
}

#[test]
fn test_polyline_needs_two_points() {
    let result = Graphic::from_points(GraphicKind::Polyline(PolylineTool), &pts(&[(1.0, 1.0)]));
    assert!(result.is_err());
}

fn star(radii: &[f64]) -> Vec<Point> {
    let n = radii.len() as f64;
    radii
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let a = 2.0 * PI * i as f64 / n;
            Point::new(100.0 + r * a.cos(), 100.0 + r * a.sin())
        })
        .collect()
}

proptest! {
    #[test]
    fn test_area_ignores_winding(radii in prop::collection::vec(5.0f64..80.0, 3..10)) {
        let cal = Calibration::pixel();
        let ctx = MeasureContext::new(&cal);
        let forward = star(&radii);
        let mut backward = forward.clone();
        backward.reverse();

        let a = Graphic::from_points(GraphicKind::Polygon(PolygonTool), &forward).unwrap();
        let b = Graphic::from_points(GraphicKind::Polygon(PolygonTool), &backward).unwrap();
        let area_a = value(&a.compute_measurements(&ctx), names::AREA.name).unwrap();
        let area_b = value(&b.compute_measurements(&ctx), names::AREA.name).unwrap();
        prop_assert!(area_a > 0.0);
        prop_assert!((area_a - area_b).abs() < 1e-6 * area_a.max(1.0));
    }
}
