use medview_core::Color;
use medview_graphics::{
    AnnotationDocument, Bounds, Graphic, GraphicKind, GraphicLayer, LineTool, Point, PolygonTool,
};
use tempfile::TempDir;

fn layer() -> GraphicLayer {
    let mut layer = GraphicLayer::new();
    let mut line = Graphic::from_points(
        GraphicKind::Line(LineTool),
        &[Point::new(0.0, 0.0), Point::new(3.0, 4.0)],
    )
    .unwrap();
    line.set_color(Color::RED);
    line.set_thickness(2.5);
    line.hide_label();
    layer.add(line);

    let mut rect = Graphic::rectangle(Bounds::new(5.0, 5.0, 15.0, 25.0)).unwrap();
    rect.set_filled(true);
    rect.set_layer(2);
    layer.add(rect);

    layer.add(
        Graphic::from_points(
            GraphicKind::Polygon(PolygonTool),
            &[Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(5.0, 8.0)],
        )
        .unwrap(),
    );
    layer
}

#[test]
fn test_document_file_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("study.json");
    let original = layer();

    let mut doc = AnnotationDocument::from_layer("study", &original);
    doc.metadata.image = Some("IMG0001".to_string());
    doc.save_to_file(&path).unwrap();
    assert!(path.exists());

    let loaded = AnnotationDocument::load_from_file(&path).unwrap();
    assert_eq!(loaded.version, "1.0");
    assert_eq!(loaded.metadata.name, "study");
    assert_eq!(loaded.metadata.image.as_deref(), Some("IMG0001"));
    assert!(loaded.metadata.modified >= loaded.metadata.created);

    let restored = loaded.to_layer();
    assert_eq!(restored.len(), original.len());
    for (before, after) in original.graphics().iter().zip(restored.graphics()) {
        assert_eq!(before.id(), after.id());
        assert_eq!(before.class_id(), after.class_id());
        assert_eq!(before.points(), after.points());
        assert_eq!(before.color(), after.color());
        assert_eq!(before.thickness(), after.thickness());
        assert_eq!(before.is_filled(), after.is_filled());
        assert_eq!(before.is_label_visible(), after.is_label_visible());
        assert_eq!(before.layer(), after.layer());
        assert!(after.shape().is_some());
    }
}

#[test]
fn test_missing_fields_use_defaults() {
    let json = r#"{
        "version": "1.0",
        "metadata": {
            "name": "minimal",
            "created": "2024-01-01T00:00:00Z",
            "modified": "2024-01-01T00:00:00Z"
        },
        "graphics": [
            {
                "id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
                "class_id": "line",
                "points": [{"x": 0.0, "y": 0.0}, {"x": 6.0, "y": 8.0}]
            }
        ]
    }"#;
    let doc: AnnotationDocument = serde_json::from_str(json).unwrap();
    let layer = doc.to_layer();
    assert_eq!(layer.len(), 1);
    let line = &layer.graphics()[0];
    assert_eq!(line.thickness(), 1.0);
    assert!(line.is_label_visible());
    assert!(!line.is_filled());
}

#[test]
fn test_invalid_points_are_skipped() {
    let mut doc = AnnotationDocument::from_layer("study", &layer());
    doc.graphics[0].points = vec![Point::new(1.0, 1.0), Point::new(1.0, 1.0)];
    let restored = doc.to_layer();
    assert_eq!(restored.len(), 2);
    assert!(restored.graphics().iter().all(|g| g.class_id() != "line"));
}

#[test]
fn test_load_reports_malformed_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();
    let err = AnnotationDocument::load_from_file(&path).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to parse annotation file"));

    let missing = temp_dir.path().join("missing.json");
    assert!(AnnotationDocument::load_from_file(&missing).is_err());
}
