use crate::measure::{names, MeasureCollector, MeasureContext, MeasureItem, Measurement};
use crate::model::shape::{circle_path, polyline_path, GraphicShape};
use crate::model::{GraphicTool, Point, PointCount};

/// Marker radius in screen pixels
const MARKER_RADIUS: f64 = 3.0;

/// Single point drawn with a constant-size marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointTool;

impl GraphicTool for PointTool {
    fn class_id(&self) -> &'static str {
        "point"
    }

    fn name(&self) -> &'static str {
        "Point"
    }

    fn point_count(&self) -> PointCount {
        PointCount::Fixed(1)
    }

    fn build_shape(&self, points: &[Point]) -> Option<GraphicShape> {
        let p = *points.first()?;
        let mut shape = GraphicShape::new(polyline_path(&[p], false), false);
        shape.add_invariant(circle_path(Point::default(), MARKER_RADIUS), p);
        Some(shape)
    }

    fn measurement_list(&self) -> Vec<Measurement> {
        vec![names::CENTER_X, names::CENTER_Y]
    }

    fn compute_measurements(
        &self,
        points: &[Point],
        _shape: Option<&GraphicShape>,
        ctx: &MeasureContext<'_>,
    ) -> Vec<MeasureItem> {
        let Some(p) = points.first().copied() else {
            return Vec::new();
        };
        let cal = ctx.calibration();
        let unit = cal.length_unit();
        let mut m = MeasureCollector::new(self.class_id(), ctx);
        m.add(names::CENTER_X, unit.as_str(), || Some(cal.x_calibrated(p.x)));
        m.add(names::CENTER_Y, unit.as_str(), || Some(cal.y_calibrated(p.y)));
        m.finish()
    }
}
