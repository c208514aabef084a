//! Cobb angle: two endplate lines AB and CD and a fifth point O on their
//! bisector, from which perpendiculars are dropped onto both lines.

use crate::geometry::{
    angle_between_deg, angle_deg, colinear_point_with_length, corner_points, median_line,
    midpoint, perpendicular_point_to_line, rotate_point, smallest_rotation_deg,
};
use crate::measure::{names, MeasureCollector, MeasureContext, MeasureItem, Measurement};
use crate::model::angle::add_angle_measurements;
use crate::model::open_angle::{line_pair_angle, valid_segments, LinePairAngle};
use crate::model::shape::{arc_path, polyline_path, segment_path, segments_path, GraphicShape};
use crate::model::{move_points, DragTarget, GraphicTool, HandlePoints, Point, PointCount};

/// Corner mark size in screen pixels
const CORNER_SIZE: f64 = 10.0;

/// Length of the bisector extensions beyond O, in screen pixels
const EXTENSION_LENGTH: f64 = 32.0;

const O_INDEX: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CobbAngleTool;

fn endplates(points: &[Point]) -> Option<(Point, Point, Point, Point, LinePairAngle)> {
    match points {
        [a, b, c, d, ..] => line_pair_angle(*a, *b, *c, *d).map(|pair| (*a, *b, *c, *d, pair)),
        _ => None,
    }
}

/// Bisector of the endplates, or their median line when parallel
fn bisector(a: Point, b: Point, c: Point, d: Point, pair: &LinePairAngle) -> (Point, Point) {
    match pair.crossing {
        Some(x) => {
            let m = rotate_point(x.ab[0], x.point, -pair.angle.to_radians() / 2.0);
            (m, x.point)
        }
        None => median_line(a, b, c, d),
    }
}

/// Relative offset of length `len` from `from` towards `to`
fn direction(from: Point, to: Point, len: f64) -> Option<Point> {
    colinear_point_with_length(Point::default(), Point::new(to.x - from.x, to.y - from.y), len)
}

impl GraphicTool for CobbAngleTool {
    fn class_id(&self) -> &'static str {
        "cobb_angle"
    }

    fn name(&self) -> &'static str {
        "Cobb's Angle"
    }

    fn point_count(&self) -> PointCount {
        PointCount::Fixed(5)
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
        if handles.len() < 4 {
            return target;
        }
        let Some((a, b, c, d, pair)) = endplates(handles.points()) else {
            return target;
        };
        let (m, n) = bisector(a, b, c, d, &pair);

        let o = match (index, handles.get(O_INDEX)) {
            (O_INDEX, Some(o)) => perpendicular_point_to_line(m, n, o),
            _ => match pair.crossing {
                None => Some(m),
                Some(x) => {
                    let h1 = midpoint(x.ab[1], midpoint(x.ab[0], x.ab[1]));
                    let h2 = midpoint(x.cd[1], midpoint(x.cd[0], x.cd[1]));
                    match (
                        perpendicular_point_to_line(m, n, h1),
                        perpendicular_point_to_line(m, n, h2),
                    ) {
                        (Some(o1), Some(o2)) => Some(midpoint(o1, o2)),
                        _ => None,
                    }
                }
            },
        };
        if let Some(o) = o {
            handles.set(O_INDEX, o);
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
        let (Some((a, b, c, d, pair)), Some(o)) = (endplates(points), pt(O_INDEX)) else {
            return Some(shape);
        };

        let ab2 = (b.x - a.x).powi(2) + (b.y - a.y).powi(2);
        let cd2 = (d.x - c.x).powi(2) + (d.y - c.y).powi(2);
        let r1 = ((a.y - o.y) * (a.y - b.y) + (a.x - o.x) * (a.x - b.x)) / ab2;
        let r2 = ((c.y - o.y) * (c.y - d.y) + (c.x - o.x) * (c.x - d.x)) / cd2;
        let i = Point::new(a.x + r1 * (b.x - a.x), a.y + r1 * (b.y - a.y));
        let j = Point::new(c.x + r2 * (d.x - c.x), c.y + r2 * (d.y - c.y));

        if !(0.0..=1.0).contains(&r1) {
            shape.add_dashed(segment_path(if r1 > 1.0 { b } else { a }, i));
        }
        if !(0.0..=1.0).contains(&r2) {
            shape.add_dashed(segment_path(if r2 > 1.0 { d } else { c }, j));
        }
        shape.add(segment_path(o, i));
        shape.add(segment_path(o, j));

        for (corner, end) in [(i, midpoint(a, b)), (j, midpoint(c, d))] {
            let rel = |p: Point| Point::new(p.x - corner.x, p.y - corner.y);
            if let Some(mark) = corner_points(rel(end), Point::default(), rel(o), CORNER_SIZE) {
                shape.add_invariant(polyline_path(&mark, false), corner);
            }
        }

        if pair.crossing.is_some() {
            let k = colinear_point_with_length(i, o, o.distance_to(&i) + EXTENSION_LENGTH);
            let l = colinear_point_with_length(j, o, o.distance_to(&j) + EXTENSION_LENGTH);
            if let (Some(k), Some(l)) = (k, l) {
                for end in [k, l] {
                    if let Some(ext) = direction(o, end, EXTENSION_LENGTH) {
                        shape.add_invariant(segment_path(Point::default(), ext), o);
                    }
                }
                let (start, extent) = if k.y > l.y {
                    (angle_deg(o, j), angle_between_deg(j, o, k))
                } else {
                    (angle_deg(o, i), angle_between_deg(i, o, l))
                };
                let radius = EXTENSION_LENGTH * 2.0 / 3.0;
                shape.add_invariant(
                    arc_path(Point::default(), radius, start, smallest_rotation_deg(extent)),
                    o,
                );
            }
        }
        Some(shape)
    }

    fn is_shape_valid(&self, handles: &HandlePoints) -> bool {
        handles.is_complete()
            && !handles.has_coincident_points()
            && endplates(handles.points()).is_some()
    }

    fn measurement_list(&self) -> Vec<Measurement> {
        vec![names::ANGLE, names::COMPLEMENTARY_ANGLE]
    }

    fn compute_measurements(
        &self,
        points: &[Point],
        _shape: Option<&GraphicShape>,
        ctx: &MeasureContext<'_>,
    ) -> Vec<MeasureItem> {
        let Some((.., pair)) = endplates(points) else {
            return Vec::new();
        };
        let mut m = MeasureCollector::new(self.class_id(), ctx);
        add_angle_measurements(&mut m, pair.angle, false);
        m.finish()
    }
}
