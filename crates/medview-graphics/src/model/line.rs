use crate::geometry::{azimuth_deg, orientation_deg};
use crate::measure::{names, MeasureCollector, MeasureContext, MeasureItem, Measurement, DEGREE};
use crate::model::shape::{segment_path, GraphicShape};
use crate::model::{GraphicTool, Point, PointCount};

/// Straight segment between two points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineTool;

impl GraphicTool for LineTool {
    fn class_id(&self) -> &'static str {
        "line"
    }

    fn name(&self) -> &'static str {
        "Line"
    }

    fn point_count(&self) -> PointCount {
        PointCount::Fixed(2)
    }

    fn build_shape(&self, points: &[Point]) -> Option<GraphicShape> {
        match points {
            [a, b, ..] if a != b => Some(GraphicShape::new(segment_path(*a, *b), false)),
            _ => None,
        }
    }

    fn measurement_list(&self) -> Vec<Measurement> {
        vec![
            names::FIRST_POINT_X,
            names::FIRST_POINT_Y,
            names::LAST_POINT_X,
            names::LAST_POINT_Y,
            names::LINE_LENGTH,
            names::ORIENTATION,
            names::AZIMUTH,
        ]
    }

    fn compute_measurements(
        &self,
        points: &[Point],
        _shape: Option<&GraphicShape>,
        ctx: &MeasureContext<'_>,
    ) -> Vec<MeasureItem> {
        let (a, b) = match points {
            [a, b, ..] => (*a, *b),
            _ => return Vec::new(),
        };
        let cal = ctx.calibration();
        let unit = cal.length_unit();
        let mut m = MeasureCollector::new(self.class_id(), ctx);
        m.add(names::FIRST_POINT_X, unit.as_str(), || Some(cal.x_calibrated(a.x)));
        m.add(names::FIRST_POINT_Y, unit.as_str(), || Some(cal.y_calibrated(a.y)));
        m.add(names::LAST_POINT_X, unit.as_str(), || Some(cal.x_calibrated(b.x)));
        m.add(names::LAST_POINT_Y, unit.as_str(), || Some(cal.y_calibrated(b.y)));
        m.add(names::LINE_LENGTH, unit.as_str(), || Some(cal.length(a.distance_to(&b))));
        m.add(names::ORIENTATION, DEGREE, || Some(orientation_deg(a, b)));
        m.add(names::AZIMUTH, DEGREE, || Some(azimuth_deg(a, b)));
        m.finish()
    }
}
