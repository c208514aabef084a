use medview_core::Calibration;
use medview_graphics::geometry::lines_parallel;
use medview_graphics::{
    names, DragTarget, Graphic, GraphicKind, MeasureContext, MeasureItem, ParallelLineTool,
    PerpendicularLineTool, Point,
};

fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
    coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
}

fn value(items: &[MeasureItem], name: &str) -> Option<f64> {
    items
        .iter()
        .find(|i| i.measurement.name == name)
        .and_then(|i| i.value)
}

fn parallel() -> Graphic {
    Graphic::from_points(
        GraphicKind::ParallelLine(ParallelLineTool),
        &pts(&[(0.0, 0.0), (10.0, 0.0), (0.0, 5.0), (10.0, 5.0), (5.0, 0.0), (5.0, 5.0)]),
    )
    .unwrap()
}

fn perpendicular() -> Graphic {
    Graphic::from_points(
        GraphicKind::PerpendicularLine(PerpendicularLineTool),
        &pts(&[(0.0, 0.0), (10.0, 0.0), (4.0, 6.0), (4.0, 0.0)]),
    )
    .unwrap()
}

fn assert_near(actual: Point, expected: Point) {
    assert!(actual.distance_to(&expected) < 1e-9, "{actual:?} != {expected:?}");
}

fn dot(a: Point, b: Point, c: Point, d: Point) -> f64 {
    (b.x - a.x) * (d.x - c.x) + (b.y - a.y) * (d.y - c.y)
}

#[test]
fn test_parallel_distance() {
    let cal = Calibration::pixel();
    let ctx = MeasureContext::new(&cal);
    let items = parallel().compute_measurements(&ctx);
    assert_eq!(value(&items, names::DISTANCE.name), Some(5.0));
    assert_eq!(value(&items, names::ORIENTATION.name), Some(0.0));
}

#[test]
fn test_parallel_rotation_follows_ab() {
    let mut g = parallel();
    g.move_and_resize(DragTarget::Handle(0), 0.0, -10.0, Point::new(0.0, -10.0));
    let p = g.points();
    assert!(lines_parallel(p[0], p[1], p[2], p[3]));
    assert_eq!(p[4], Point::new(5.0, -5.0));
    assert!((p[2].distance_to(&p[3]) - 10.0).abs() < 1e-9);
}

#[test]
fn test_parallel_middle_handle_translates_line() {
    let cal = Calibration::pixel();
    let ctx = MeasureContext::new(&cal);
    let mut g = parallel();
    g.move_and_resize(DragTarget::Handle(4), 1.0, 2.0, Point::new(6.0, 2.0));
    let p = g.points();
    assert_eq!(p[0], Point::new(0.0, 2.0));
    assert_eq!(p[1], Point::new(10.0, 2.0));
    assert_eq!(p[4], Point::new(5.0, 2.0));
    g.rebuild();
    assert_eq!(value(&g.compute_measurements(&ctx), names::DISTANCE.name), Some(3.0));
}

#[test]
fn test_parallel_endpoint_keeps_direction() {
    let mut g = parallel();
    g.move_and_resize(DragTarget::Handle(3), 0.0, 3.0, Point::new(10.0, 8.0));
    let p = g.points();
    assert!(lines_parallel(p[0], p[1], p[2], p[3]));
    assert_eq!(p[5], Point::new(5.0, 8.0));
}

#[test]
fn test_perpendicular_length() {
    let cal = Calibration::pixel();
    let ctx = MeasureContext::new(&cal);
    let items = perpendicular().compute_measurements(&ctx);
    assert_eq!(value(&items, names::LINE_LENGTH.name), Some(6.0));
    assert_eq!(value(&items, names::ORIENTATION.name), Some(90.0));
}

#[test]
fn test_perpendicular_survives_rotation_of_ab() {
    let mut g = perpendicular();
    g.move_and_resize(DragTarget::Handle(1), 0.0, 10.0, Point::new(10.0, 10.0));
    let p = g.points();
    assert!(dot(p[0], p[1], p[2], p[3]).abs() < 1e-9);
    assert!((p[2].distance_to(&p[3]) - 6.0).abs() < 1e-9);
}

#[test]
fn test_perpendicular_c_drag_moves_foot() {
    let mut g = perpendicular();
    g.move_and_resize(DragTarget::Handle(2), 3.0, 2.0, Point::new(7.0, 8.0));
    assert_near(g.points()[3], Point::new(7.0, 0.0));
}

#[test]
fn test_perpendicular_d_drag_carries_c() {
    let mut g = perpendicular();
    g.move_and_resize(DragTarget::Handle(3), 2.0, 3.0, Point::new(6.0, 3.0));
    let p = g.points();
    assert_near(p[3], Point::new(6.0, 0.0));
    assert_near(p[2], Point::new(6.0, 6.0));
}

#[test]
fn test_perpendicular_foot_outside_segment_is_dashed() {
    let g = Graphic::from_points(
        GraphicKind::PerpendicularLine(PerpendicularLineTool),
        &pts(&[(0.0, 0.0), (10.0, 0.0), (15.0, 6.0), (15.0, 0.0)]),
    )
    .unwrap();
    let shape = g.shape().unwrap();
    assert!(shape.items().iter().any(|item| item.dashed));
}
