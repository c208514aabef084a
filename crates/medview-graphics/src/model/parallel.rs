//! Two lines kept parallel while editing. Handles are A, B, C, D and the
//! middles E of AB and F of CD, which translate their line along its normal.

use crate::geometry::{
    angle_rad, azimuth_deg, is_line_valid, midpoint, orientation_deg,
    perpendicular_point_to_line, rotate_point, smallest_angle_rad,
};
use crate::measure::{names, MeasureCollector, MeasureContext, MeasureItem, Measurement, DEGREE};
use crate::model::open_angle::valid_segments;
use crate::model::shape::{segments_path, GraphicShape};
use crate::model::{move_points, DragTarget, GraphicTool, HandlePoints, Point, PointCount};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParallelLineTool;

fn lines(handles: &HandlePoints) -> Option<(Point, Point, Point, Point)> {
    let pt = |i: usize| handles.get(i);
    if is_line_valid(pt(0), pt(1)) && is_line_valid(pt(2), pt(3)) {
        Some((pt(0)?, pt(1)?, pt(2)?, pt(3)?))
    } else {
        None
    }
}

impl GraphicTool for ParallelLineTool {
    fn class_id(&self) -> &'static str {
        "parallel_line"
    }

    fn name(&self) -> &'static str {
        "Parallel Line"
    }

    fn point_count(&self) -> PointCount {
        PointCount::Fixed(6)
    }

    fn move_and_resize(
        &self,
        handles: &mut HandlePoints,
        target: DragTarget,
        dx: f64,
        dy: f64,
        cursor: Point,
    ) -> DragTarget {
        let target = move_points(handles, target, dx, dy, cursor);
        let DragTarget::Handle(index) = target else {
            return target;
        };
        let Some((mut a, mut b, mut c, mut d)) = lines(handles) else {
            return target;
        };

        match index {
            0 | 1 => {
                let anchor = if index == 0 { b } else { a };
                let theta = smallest_angle_rad(angle_rad(c, d) - angle_rad(a, b));
                c = rotate_point(c, anchor, theta);
                d = rotate_point(d, anchor, theta);
            }
            2 | 3 => {
                let (moved, other) = if index == 2 { (c, d) } else { (d, c) };
                if let (Some(i), Some(j)) = (
                    perpendicular_point_to_line(a, b, moved),
                    perpendicular_point_to_line(a, b, other),
                ) {
                    let shifted = Point::new(
                        other.x + (moved.x - i.x) - (other.x - j.x),
                        other.y + (moved.y - i.y) - (other.y - j.y),
                    );
                    if index == 2 {
                        d = shifted;
                    } else {
                        c = shifted;
                    }
                }
            }
            4 | 5 => {
                let (p1, p2) = if index == 4 { (a, b) } else { (c, d) };
                if let Some(grip) = handles.get(index) {
                    if let Some(i) = perpendicular_point_to_line(p1, p2, grip) {
                        let (tx, ty) = (grip.x - i.x, grip.y - i.y);
                        if index == 4 {
                            a = a.translated(tx, ty);
                            b = b.translated(tx, ty);
                        } else {
                            c = c.translated(tx, ty);
                            d = d.translated(tx, ty);
                        }
                    }
                }
            }
            _ => {}
        }

        for (i, p) in [a, b, c, d, midpoint(a, b), midpoint(c, d)].into_iter().enumerate() {
            handles.set(i, p);
        }
        target
    }

    fn build_shape(&self, points: &[Point]) -> Option<GraphicShape> {
        let pt = |i: usize| points.get(i).copied();
        let segments = valid_segments(&[(pt(0), pt(1)), (pt(2), pt(3))]);
        (!segments.is_empty()).then(|| GraphicShape::new(segments_path(&segments), false))
    }

    fn is_shape_valid(&self, handles: &HandlePoints) -> bool {
        handles.is_complete() && !handles.has_coincident_points() && lines(handles).is_some()
    }

    fn measurement_list(&self) -> Vec<Measurement> {
        vec![names::DISTANCE, names::ORIENTATION, names::AZIMUTH]
    }

    fn compute_measurements(
        &self,
        points: &[Point],
        _shape: Option<&GraphicShape>,
        ctx: &MeasureContext<'_>,
    ) -> Vec<MeasureItem> {
        let (a, b, c) = match points {
            [a, b, c, _, ..] if a != b => (*a, *b, *c),
            _ => return Vec::new(),
        };
        let cal = ctx.calibration();
        let mut m = MeasureCollector::new(self.class_id(), ctx);
        m.add(names::DISTANCE, cal.length_unit(), || {
            perpendicular_point_to_line(a, b, c).map(|i| cal.length(c.distance_to(&i)))
        });
        m.add(names::ORIENTATION, DEGREE, || Some(orientation_deg(a, b)));
        m.add(names::AZIMUTH, DEGREE, || Some(azimuth_deg(a, b)));
        m.finish()
    }
}
