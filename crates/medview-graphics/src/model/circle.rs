use std::f64::consts::PI;

use crate::geometry::circle_center;
use crate::measure::{names, MeasureCollector, MeasureContext, MeasureItem, Measurement};
use crate::model::shape::{circle_path, polyline_path, GraphicShape};
use crate::model::{GraphicTool, HandlePoints, Point, PointCount};
use crate::statistics::append_image_statistics;

/// Circle passing through three points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThreePointsCircleTool;

fn center_and_radius(points: &[Point]) -> Option<(Point, f64)> {
    match points {
        [a, b, c, ..] => circle_center(*a, *b, *c).map(|center| (center, center.distance_to(a))),
        _ => None,
    }
}

impl GraphicTool for ThreePointsCircleTool {
    fn class_id(&self) -> &'static str {
        "three_points_circle"
    }

    fn name(&self) -> &'static str {
        "Three Points Circle"
    }

    fn point_count(&self) -> PointCount {
        PointCount::Fixed(3)
    }

    fn is_area(&self) -> bool {
        true
    }

    fn build_shape(&self, points: &[Point]) -> Option<GraphicShape> {
        if let Some((center, radius)) = center_and_radius(points) {
            return Some(GraphicShape::new(circle_path(center, radius), true));
        }
        // Still placing the points, or colinear ones
        match points {
            [a, rest @ ..] if rest.iter().any(|p| p != a) => {
                Some(GraphicShape::new(polyline_path(points, false), false))
            }
            _ => None,
        }
    }

    fn is_shape_valid(&self, handles: &HandlePoints) -> bool {
        handles.is_complete()
            && !handles.has_coincident_points()
            && center_and_radius(handles.points()).is_some()
    }

    fn measurement_list(&self) -> Vec<Measurement> {
        let mut list = vec![
            names::CENTER_X,
            names::CENTER_Y,
            names::RADIUS,
            names::DIAMETER,
            names::AREA,
            names::PERIMETER,
        ];
        list.extend(names::IMAGE_STATISTICS);
        list
    }

    fn compute_measurements(
        &self,
        points: &[Point],
        shape: Option<&GraphicShape>,
        ctx: &MeasureContext<'_>,
    ) -> Vec<MeasureItem> {
        let Some((center, radius)) = center_and_radius(points) else {
            return Vec::new();
        };
        let cal = ctx.calibration();
        let unit = cal.length_unit();
        let mut m = MeasureCollector::new(self.class_id(), ctx);
        m.add(names::CENTER_X, unit.as_str(), || Some(cal.x_calibrated(center.x)));
        m.add(names::CENTER_Y, unit.as_str(), || Some(cal.y_calibrated(center.y)));
        m.add(names::RADIUS, unit.as_str(), || Some(cal.length(radius)));
        m.add(names::DIAMETER, unit.as_str(), || Some(cal.length(2.0 * radius)));
        m.add(names::AREA, cal.area_unit(), || Some(cal.area(PI * radius * radius)));
        m.add(names::PERIMETER, unit.as_str(), || Some(cal.length(2.0 * PI * radius)));
        append_image_statistics(&mut m, shape.filter(|s| s.is_closed()));
        m.finish()
    }
}
