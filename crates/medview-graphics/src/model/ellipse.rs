use std::f64::consts::PI;

use crate::measure::{names, MeasureCollector, MeasureContext, MeasureItem, Measurement};
use crate::model::rectangle::{box_bounds, resize_box, BOX_HANDLE_COUNT};
use crate::model::shape::{ellipse_path, GraphicShape};
use crate::model::{DragTarget, GraphicTool, HandlePoints, Point, PointCount};
use crate::statistics::append_image_statistics;

/// Ellipse inscribed in an axis-aligned box, edited with the rectangle handles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EllipseTool;

/// Quadratic-mean approximation of the perimeter from the semi-axes
fn ellipse_perimeter(a: f64, b: f64) -> f64 {
    2.0 * PI * ((a * a + b * b) / 2.0).sqrt()
}

impl GraphicTool for EllipseTool {
    fn class_id(&self) -> &'static str {
        "ellipse"
    }

    fn name(&self) -> &'static str {
        "Ellipse"
    }

    fn point_count(&self) -> PointCount {
        PointCount::Fixed(BOX_HANDLE_COUNT)
    }

    fn is_area(&self) -> bool {
        true
    }

    fn build_shape(&self, points: &[Point]) -> Option<GraphicShape> {
        box_bounds(points).map(|b| GraphicShape::new(ellipse_path(&b), true))
    }

    fn measurement_list(&self) -> Vec<Measurement> {
        let mut list = vec![
            names::CENTER_X,
            names::CENTER_Y,
            names::WIDTH,
            names::HEIGHT,
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
        let Some(b) = box_bounds(points) else {
            return Vec::new();
        };
        let cal = ctx.calibration();
        let unit = cal.length_unit();
        let center = b.center();
        let (rx, ry) = (b.width() / 2.0, b.height() / 2.0);
        let mut m = MeasureCollector::new(self.class_id(), ctx);
        m.add(names::CENTER_X, unit.as_str(), || Some(cal.x_calibrated(center.x)));
        m.add(names::CENTER_Y, unit.as_str(), || Some(cal.y_calibrated(center.y)));
        m.add(names::WIDTH, unit.as_str(), || Some(cal.length(b.width())));
        m.add(names::HEIGHT, unit.as_str(), || Some(cal.length(b.height())));
        m.add(names::AREA, cal.area_unit(), || Some(cal.area(PI * rx * ry)));
        m.add(names::PERIMETER, unit.as_str(), || {
            Some(cal.length(ellipse_perimeter(rx, ry)))
        });
        append_image_statistics(&mut m, shape);
        m.finish()
    }

    fn move_and_resize(
        &self,
        handles: &mut HandlePoints,
        target: DragTarget,
        dx: f64,
        dy: f64,
        cursor: Point,
    ) -> DragTarget {
        resize_box(handles, target, dx, dy, cursor)
    }
}
