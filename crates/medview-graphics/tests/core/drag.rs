use medview_core::Calibration;
use medview_graphics::{
    names, AngleTool, DragOutcome, DragSequence, DragState, DragTarget, Graphic, GraphicKind,
    LabelDragSequence, LineTool, MeasureContext, Point, PointerEvent, PolygonTool, PolylineTool,
    RectangleTool,
};

fn value_of(graphic: &Graphic, ctx: &MeasureContext<'_>, name: &str) -> Option<f64> {
    graphic
        .compute_measurements(ctx)
        .into_iter()
        .find(|item| item.measurement.name == name)
        .and_then(|item| item.value)
}

#[test]
fn test_polygon_placed_click_by_click() {
    let cal = Calibration::pixel();
    let ctx = MeasureContext::new(&cal);
    let mut polygon = Graphic::new(GraphicKind::Polygon(PolygonTool));
    let mut seq = DragSequence::drawing();

    seq.start_drag(&mut polygon, &PointerEvent::at(0.0, 0.0));
    seq.drag(&mut polygon, &PointerEvent::at(10.0, 0.0), &ctx);
    let (outcome, _) = seq.complete_drag(&mut polygon, &PointerEvent::at(10.0, 0.0), &ctx);
    assert_eq!(outcome, DragOutcome::Placing);

    for (x, y) in [(10.0, 10.0), (0.0, 10.0)] {
        seq.drag(&mut polygon, &PointerEvent::at(x, y), &ctx);
        let press = seq.complete_drag(&mut polygon, &PointerEvent::at(x, y), &ctx);
        assert_eq!(press.0, DragOutcome::Placing);
        let release = seq.complete_drag(&mut polygon, &PointerEvent::at(x, y), &ctx);
        assert_eq!(release.0, DragOutcome::Placing);
    }

    let double = PointerEvent::at(0.0, 10.0).with_click_count(2);
    let (outcome, dirty) = seq.complete_drag(&mut polygon, &double, &ctx);
    assert_eq!(outcome, DragOutcome::Completed);
    assert!(!dirty.is_empty());
    assert_eq!(seq.state(), DragState::Completed);
    assert_eq!(
        polygon.points(),
        &[
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]
    );
    assert_eq!(value_of(&polygon, &ctx, names::AREA.name), Some(100.0));
}

#[test]
fn test_polyline_double_click_drops_repeated_point() {
    let cal = Calibration::pixel();
    let ctx = MeasureContext::new(&cal);
    let mut polyline = Graphic::new(GraphicKind::Polyline(PolylineTool));
    let mut seq = DragSequence::drawing();

    seq.start_drag(&mut polyline, &PointerEvent::at(0.0, 0.0));
    seq.drag(&mut polyline, &PointerEvent::at(10.0, 0.0), &ctx);
    seq.complete_drag(&mut polyline, &PointerEvent::at(10.0, 0.0), &ctx);
    seq.drag(&mut polyline, &PointerEvent::at(10.0, 5.0), &ctx);
    seq.complete_drag(&mut polyline, &PointerEvent::at(10.0, 5.0), &ctx);
    assert_eq!(polyline.points().len(), 4);

    let double = PointerEvent::at(10.0, 5.0).with_click_count(2);
    let (outcome, _) = seq.complete_drag(&mut polyline, &double, &ctx);
    assert_eq!(outcome, DragOutcome::Completed);
    assert_eq!(polyline.points().len(), 3);
    assert_eq!(value_of(&polyline, &ctx, names::LINE_LENGTH.name), Some(15.0));
}

#[test]
fn test_angle_completes_on_third_press() {
    let cal = Calibration::pixel();
    let ctx = MeasureContext::new(&cal);
    let mut angle = Graphic::new(GraphicKind::Angle(AngleTool));
    let mut seq = DragSequence::drawing();

    seq.start_drag(&mut angle, &PointerEvent::at(10.0, 0.0));
    seq.drag(&mut angle, &PointerEvent::at(0.0, 0.0), &ctx);
    let (outcome, _) = seq.complete_drag(&mut angle, &PointerEvent::at(0.0, 0.0), &ctx);
    assert_eq!(outcome, DragOutcome::Placing);
    assert!(angle.is_graphic_complete());
    assert_eq!(seq.target(), DragTarget::Handle(2));

    seq.drag(&mut angle, &PointerEvent::at(0.0, 10.0), &ctx);
    let (outcome, _) = seq.complete_drag(&mut angle, &PointerEvent::at(0.0, 10.0), &ctx);
    assert!(outcome.is_completed());
    let value = value_of(&angle, &ctx, names::ANGLE.name).unwrap();
    assert!((value - 90.0).abs() < 1e-9);
}

#[test]
fn test_rectangle_drawn_from_corner() {
    let cal = Calibration::pixel();
    let ctx = MeasureContext::new(&cal);
    let mut rect = Graphic::new(GraphicKind::Rectangle(RectangleTool));
    let mut seq = DragSequence::drawing();

    seq.start_drag(&mut rect, &PointerEvent::at(0.0, 0.0));
    seq.drag(&mut rect, &PointerEvent::at(10.0, 20.0), &ctx);
    let (outcome, _) = seq.complete_drag(&mut rect, &PointerEvent::at(10.0, 20.0), &ctx);
    assert_eq!(outcome, DragOutcome::Completed);
    assert_eq!(rect.points().len(), 8);
    assert_eq!(value_of(&rect, &ctx, names::AREA.name), Some(200.0));
}

#[test]
fn test_degenerate_drag_is_rejected() {
    let cal = Calibration::pixel();
    let ctx = MeasureContext::new(&cal);
    let mut line = Graphic::new(GraphicKind::Line(LineTool));
    let mut seq = DragSequence::drawing();
    seq.start_drag(&mut line, &PointerEvent::at(5.0, 5.0));
    let (outcome, _) = seq.complete_drag(&mut line, &PointerEvent::at(5.0, 5.0), &ctx);
    assert_eq!(outcome, DragOutcome::Rejected);
    assert!(line.label().is_none());
}

#[test]
fn test_editing_existing_handle() {
    let cal = Calibration::pixel();
    let ctx = MeasureContext::new(&cal);
    let mut line = Graphic::from_points(
        GraphicKind::Line(LineTool),
        &[Point::new(0.0, 0.0), Point::new(3.0, 4.0)],
    )
    .unwrap();
    let mut seq = DragSequence::new(DragTarget::Handle(1));

    let dirty = seq.start_drag(&mut line, &PointerEvent::at(3.0, 4.0));
    assert!(dirty.is_empty());
    assert!(line.is_resizing());
    seq.drag(&mut line, &PointerEvent::at(6.0, 8.0), &ctx);
    let (outcome, _) = seq.complete_drag(&mut line, &PointerEvent::at(6.0, 8.0), &ctx);
    assert_eq!(outcome, DragOutcome::Completed);
    assert!(!line.is_resizing());
    assert_eq!(value_of(&line, &ctx, names::LINE_LENGTH.name), Some(10.0));
}

#[test]
fn test_moving_whole_graphic() {
    let cal = Calibration::pixel();
    let ctx = MeasureContext::new(&cal);
    let mut line = Graphic::from_points(
        GraphicKind::Line(LineTool),
        &[Point::new(0.0, 0.0), Point::new(3.0, 4.0)],
    )
    .unwrap();
    let mut seq = DragSequence::new(DragTarget::Whole);
    seq.start_drag(&mut line, &PointerEvent::at(1.0, 1.0));
    seq.drag(&mut line, &PointerEvent::at(11.0, 6.0), &ctx);
    seq.complete_drag(&mut line, &PointerEvent::at(11.0, 6.0), &ctx);
    assert_eq!(line.points(), &[Point::new(10.0, 5.0), Point::new(13.0, 9.0)]);
}

#[test]
fn test_zero_delta_drag_is_ignored() {
    let cal = Calibration::pixel();
    let ctx = MeasureContext::new(&cal);
    let mut line = Graphic::from_points(
        GraphicKind::Line(LineTool),
        &[Point::new(0.0, 0.0), Point::new(3.0, 4.0)],
    )
    .unwrap();
    let mut seq = DragSequence::new(DragTarget::Whole);
    seq.start_drag(&mut line, &PointerEvent::at(1.0, 1.0));
    let dirty = seq.drag(&mut line, &PointerEvent::at(1.0, 1.0), &ctx);
    assert!(dirty.is_empty());
    assert_eq!(seq.state(), DragState::Started);
}

#[test]
fn test_label_drag_moves_offset() {
    let cal = Calibration::pixel();
    let ctx = MeasureContext::new(&cal);
    let mut line = Graphic::from_points(
        GraphicKind::Line(LineTool),
        &[Point::new(0.0, 0.0), Point::new(3.0, 4.0)],
    )
    .unwrap();
    line.refresh(&ctx);
    let before = line.label().unwrap().position();

    let mut seq = LabelDragSequence::new();
    seq.start_drag(&PointerEvent::at(10.0, 10.0));
    seq.drag(&mut line, &PointerEvent::at(15.0, 12.0));
    seq.complete_drag(&mut line, &PointerEvent::at(20.0, 10.0));
    assert_eq!(seq.state(), DragState::Completed);

    let label = line.label().unwrap();
    assert_eq!(label.offset(), Point::new(10.0, 0.0));
    assert_eq!(label.position(), Point::new(before.x + 10.0, before.y));

    // the offset survives a recomputation of the label
    line.refresh(&ctx);
    assert_eq!(line.label().unwrap().offset(), Point::new(10.0, 0.0));
}
