use medview_core::Calibration;
use medview_graphics::{
    Bounds, DoubleClickAction, Graphic, GraphicKind, GraphicLayer, LayerHit, LineTool,
    MeasureContext, Point, PolylineTool,
};

fn line(a: (f64, f64), b: (f64, f64)) -> Graphic {
    Graphic::from_points(
        GraphicKind::Line(LineTool),
        &[Point::new(a.0, a.1), Point::new(b.0, b.1)],
    )
    .unwrap()
}

#[test]
fn test_filled_rectangle_hit_inside() {
    let mut layer = GraphicLayer::new();
    let mut rect = Graphic::rectangle(Bounds::new(0.0, 0.0, 100.0, 100.0)).unwrap();
    let id = rect.id();
    layer.add(rect.clone());
    assert_eq!(layer.hit(Point::new(50.0, 50.0), 1.0), None);

    rect.set_filled(true);
    layer.remove(id);
    layer.add(rect);
    assert_eq!(layer.hit(Point::new(50.0, 50.0), 1.0), Some(LayerHit::Body { id }));
}

#[test]
fn test_label_hit_before_body() {
    let cal = Calibration::pixel();
    let ctx = MeasureContext::new(&cal);
    let mut layer = GraphicLayer::new();
    let g = line((0.0, 0.0), (100.0, 0.0));
    let id = g.id();
    layer.add(g);
    layer.refresh_all(&ctx);

    let label = layer.get(id).unwrap().label().unwrap();
    let inside = label.bounds(1.0).unwrap().center();
    let hit = layer.hit(inside, 1.0).unwrap();
    assert_eq!(hit, LayerHit::Label { id });
    assert_eq!(hit.drag_target(), None);
}

#[test]
fn test_locked_layer_ignores_hits() {
    let mut layer = GraphicLayer::new();
    let g = line((0.0, 0.0), (100.0, 0.0));
    let id = g.id();
    layer.add(g);
    layer.select_only(id);
    layer.set_locked(true);
    assert_eq!(layer.hit(Point::new(50.0, 0.0), 1.0), None);
    assert_eq!(layer.double_click(Point::new(50.0, 0.0), 1.0), DoubleClickAction::None);
}

#[test]
fn test_double_click_needs_single_selection() {
    let mut layer = GraphicLayer::new();
    let first = line((0.0, 0.0), (100.0, 0.0));
    let second = line((0.0, 50.0), (100.0, 50.0));
    let (first_id, second_id) = (first.id(), second.id());
    layer.add(first);
    layer.add(second);
    layer.select_only(first_id);
    layer.get_mut(second_id).unwrap().set_selected(true);
    assert_eq!(layer.selected().count(), 2);
    assert_eq!(layer.double_click(Point::new(50.0, 0.0), 1.0), DoubleClickAction::None);

    layer.clear_selection();
    assert_eq!(layer.selected().count(), 0);
}

#[test]
fn test_remove_invalid_drops_unfinished() {
    let mut layer = GraphicLayer::new();
    let mut unfinished = Graphic::new(GraphicKind::Polyline(PolylineTool));
    unfinished.set_handle_point(0, Point::new(1.0, 1.0));
    unfinished.set_handle_point(1, Point::new(5.0, 1.0));
    layer.add(unfinished);
    layer.add(line((0.0, 0.0), (10.0, 0.0)));

    let dirty = layer.remove_invalid();
    assert!(!dirty.is_empty());
    assert_eq!(layer.len(), 1);
    assert_eq!(layer.graphics()[0].class_id(), "line");
}
