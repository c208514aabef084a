//! Segment CD kept perpendicular to a reference line AB, D being the foot
//! of the perpendicular dropped from C.

use crate::geometry::{
    angle_rad, azimuth_deg, corner_points, is_line_valid, midpoint, orientation_deg,
    perpendicular_point_to_line, rotate_point,
};
use crate::measure::{names, MeasureCollector, MeasureContext, MeasureItem, Measurement, DEGREE};
use crate::model::open_angle::valid_segments;
use crate::model::shape::{polyline_path, segment_path, segments_path, GraphicShape};
use crate::model::{move_points, DragTarget, GraphicTool, HandlePoints, Point, PointCount};

/// Corner mark size in screen pixels
const CORNER_SIZE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PerpendicularLineTool;

impl GraphicTool for PerpendicularLineTool {
    fn class_id(&self) -> &'static str {
        "perpendicular_line"
    }

    fn name(&self) -> &'static str {
        "Perpendicular Line"
    }

    fn point_count(&self) -> PointCount {
        PointCount::Fixed(4)
    }

    fn move_and_resize(
        &self,
        handles: &mut HandlePoints,
        target: DragTarget,
        dx: f64,
        dy: f64,
        cursor: Point,
    ) -> DragTarget {
        let previous = handles.clone();
        let target = move_points(handles, target, dx, dy, cursor);
        let DragTarget::Handle(index) = target else {
            return target;
        };
        let pt = |h: &HandlePoints, i: usize| h.get(i);
        let (Some(a), Some(b)) = (pt(handles, 0), pt(handles, 1)) else {
            return target;
        };
        if a == b {
            return target;
        }

        match index {
            0 | 1 => {
                let prev = (pt(&previous, 0), pt(&previous, 1));
                if let ((Some(pa), Some(pb)), Some(c), Some(d)) =
                    (prev, pt(handles, 2), pt(handles, 3))
                {
                    if pa != pb {
                        let theta = angle_rad(pa, pb) - angle_rad(a, b);
                        let anchor = if index == 0 { b } else { a };
                        handles.set(2, rotate_point(c, anchor, theta));
                        handles.set(3, rotate_point(d, anchor, theta));
                    }
                }
            }
            2 => {
                if let Some(d) = pt(handles, 2).and_then(|c| perpendicular_point_to_line(a, b, c)) {
                    handles.set(3, d);
                }
            }
            3 => {
                if let (Some(prev_d), Some(c), Some(d)) =
                    (pt(&previous, 3), pt(handles, 2), pt(handles, 3))
                {
                    if let Some(foot) = perpendicular_point_to_line(a, b, d) {
                        handles.set(2, c.translated(foot.x - prev_d.x, foot.y - prev_d.y));
                        handles.set(3, foot);
                    }
                }
            }
            _ => {}
        }
        target
    }

    fn build_shape(&self, points: &[Point]) -> Option<GraphicShape> {
        let pt = |i: usize| points.get(i).copied();
        let segments = valid_segments(&[(pt(0), pt(1)), (pt(2), pt(3))]);
        if segments.is_empty() {
            return None;
        }
        let mut shape = GraphicShape::new(segments_path(&segments), false);

        if let [a, b, c, d, ..] = *points {
            if a != b && c != d && d != a && d != b {
                // D lies on the line AB, outside the segment
                let outside = (a.x - d.x) * (b.x - d.x) + (a.y - d.y) * (b.y - d.y) > 0.0;
                if outside {
                    let nearest = if d.distance_to(&a) < d.distance_to(&b) { a } else { b };
                    shape.add_dashed(segment_path(d, nearest));
                }
            }
            if a != b && c != d {
                let rel = |p: Point| Point::new(p.x - d.x, p.y - d.y);
                let toward_ab = if d == midpoint(a, b) { a } else { midpoint(a, b) };
                if let Some(mark) =
                    corner_points(rel(toward_ab), Point::default(), rel(c), CORNER_SIZE)
                {
                    shape.add_invariant(polyline_path(&mark, false), d);
                }
            }
        }
        Some(shape)
    }

    fn is_shape_valid(&self, handles: &HandlePoints) -> bool {
        let pt = |i: usize| handles.get(i);
        handles.is_complete()
            && !handles.has_coincident_points()
            && is_line_valid(pt(0), pt(1))
            && is_line_valid(pt(2), pt(3))
    }

    fn measurement_list(&self) -> Vec<Measurement> {
        vec![names::LINE_LENGTH, names::ORIENTATION, names::AZIMUTH]
    }

    fn compute_measurements(
        &self,
        points: &[Point],
        _shape: Option<&GraphicShape>,
        ctx: &MeasureContext<'_>,
    ) -> Vec<MeasureItem> {
        let (c, d) = match points {
            [_, _, c, d, ..] if c != d => (*c, *d),
            _ => return Vec::new(),
        };
        let cal = ctx.calibration();
        let mut m = MeasureCollector::new(self.class_id(), ctx);
        m.add(names::LINE_LENGTH, cal.length_unit(), || Some(cal.length(c.distance_to(&d))));
        m.add(names::ORIENTATION, DEGREE, || Some(orientation_deg(c, d)));
        m.add(names::AZIMUTH, DEGREE, || Some(azimuth_deg(c, d)));
        m.finish()
    }
}
