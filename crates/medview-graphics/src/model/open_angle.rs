//! Angle between two independent segments AB and CD, measured at the
//! intersection of their supporting lines.

use crate::geometry::{
    angle_between_deg, angle_deg, colinear_point_with_ratio, intersection_params, is_line_valid,
    smallest_rotation_deg,
};
use crate::measure::{names, MeasureCollector, MeasureContext, MeasureItem, Measurement};
use crate::model::angle::add_angle_measurements;
use crate::model::shape::{arc_path, crosshair_path, segment_path, segments_path, GraphicShape};
use crate::model::{GraphicTool, HandlePoints, Point, PointCount};

/// Below this angle, in degrees, no arc nor intersection mark is drawn
const MIN_DECORATED_ANGLE: f64 = 0.1;

/// Intersection marker size in screen pixels
const INTERSECTION_MARK_SIZE: f64 = 8.0;

/// Where two non-parallel lines meet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    pub point: Point,
    /// Far end of AB, near end of AB (or the crossing), remaining point
    pub ab: [Point; 3],
    pub cd: [Point; 3],
    /// The crossing lies on the segment AB
    pub on_ab: bool,
    pub on_cd: bool,
}

/// Angle between two lines, `crossing` is `None` for parallel lines
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePairAngle {
    /// Signed angle in `[-180, 180]` degrees, 0 for parallel lines
    pub angle: f64,
    pub crossing: Option<Crossing>,
}

/// Order the points of a line relative to the crossing at parameter `r`
fn order_on_line(a: Point, b: Point, p: Point, r: f64) -> ([Point; 3], bool) {
    let on_segment = (0.0..=1.0).contains(&r);
    let mut line = [
        if r >= 0.0 { a } else { b },
        if r < 0.0 {
            a
        } else if r > 1.0 {
            b
        } else {
            p
        },
        if !(0.0..=1.0).contains(&r) { p } else { b },
    ];
    if on_segment {
        if p.distance_to(&line[0]) < p.distance_to(&line[2]) {
            line.swap(0, 2);
        }
    } else if p.distance_to(&line[0]) < p.distance_to(&line[1]) {
        line.swap(0, 1);
    }
    (line, on_segment)
}

/// Angle between the lines AB and CD, `None` when a line is degenerate
pub fn line_pair_angle(a: Point, b: Point, c: Point, d: Point) -> Option<LinePairAngle> {
    if !is_line_valid(Some(a), Some(b)) || !is_line_valid(Some(c), Some(d)) {
        return None;
    }
    let Some((r, s)) = intersection_params(a, b, c, d) else {
        return Some(LinePairAngle {
            angle: 0.0,
            crossing: None,
        });
    };
    let p = Point::new(a.x + r * (b.x - a.x), a.y + r * (b.y - a.y));
    let (ab, on_ab) = order_on_line(a, b, p, r);
    let (cd, on_cd) = order_on_line(c, d, p, s);
    Some(LinePairAngle {
        angle: smallest_rotation_deg(angle_between_deg(ab[0], p, cd[0])),
        crossing: Some(Crossing {
            point: p,
            ab,
            cd,
            on_ab,
            on_cd,
        }),
    })
}

/// Arc, extension lines and intersection mark of a line pair
pub(crate) fn decorate_crossing(shape: &mut GraphicShape, pair: &LinePairAngle) {
    let Some(x) = pair.crossing else {
        return;
    };
    if pair.angle.abs() <= MIN_DECORATED_ANGLE {
        return;
    }
    let p = x.point;
    let i1 = colinear_point_with_ratio(x.ab[1], x.ab[0], 0.25);
    let j1 = colinear_point_with_ratio(x.cd[1], x.cd[0], 0.25);
    let i2 = colinear_point_with_ratio(x.ab[0], x.ab[1], 0.25);
    let j2 = colinear_point_with_ratio(x.cd[0], x.cd[1], 0.25);
    let max_radius = p.distance_to(&i2).min(p.distance_to(&j2));
    let radius = max_radius.min((p.distance_to(&i1) + p.distance_to(&j1)) / 2.0);

    shape.add_fixed(arc_path(p, radius, angle_deg(p, x.ab[0]), pair.angle));
    if !x.on_ab {
        shape.add_dashed(segment_path(p, x.ab[1]));
    }
    if !x.on_cd {
        shape.add_dashed(segment_path(p, x.cd[1]));
    }
    shape.add_invariant(crosshair_path(INTERSECTION_MARK_SIZE), p);
}

/// Segments whose both ends exist and differ
pub(crate) fn valid_segments(pairs: &[(Option<Point>, Option<Point>)]) -> Vec<(Point, Point)> {
    pairs
        .iter()
        .filter_map(|pair| match *pair {
            (Some(a), Some(b)) if a != b => Some((a, b)),
            _ => None,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpenAngleTool;

impl GraphicTool for OpenAngleTool {
    fn class_id(&self) -> &'static str {
        "open_angle"
    }

    fn name(&self) -> &'static str {
        "Open Angle"
    }

    fn point_count(&self) -> PointCount {
        PointCount::Fixed(4)
    }

    fn build_shape(&self, points: &[Point]) -> Option<GraphicShape> {
        let pt = |i: usize| points.get(i).copied();
        let segments = valid_segments(&[(pt(0), pt(1)), (pt(2), pt(3))]);
        if segments.is_empty() {
            return None;
        }
        let mut shape = GraphicShape::new(segments_path(&segments), false);
        if let [a, b, c, d, ..] = points {
            if let Some(pair) = line_pair_angle(*a, *b, *c, *d) {
                decorate_crossing(&mut shape, &pair);
            }
        }
        Some(shape)
    }

    fn is_shape_valid(&self, handles: &HandlePoints) -> bool {
        handles.is_complete()
            && !handles.has_coincident_points()
            && matches!(handles.points(), [a, b, c, d, ..] if line_pair_angle(*a, *b, *c, *d).is_some())
    }

    fn measurement_list(&self) -> Vec<Measurement> {
        vec![
            names::ANGLE,
            names::COMPLEMENTARY_ANGLE,
            names::REFLEX_ANGLE,
        ]
    }

    fn compute_measurements(
        &self,
        points: &[Point],
        _shape: Option<&GraphicShape>,
        ctx: &MeasureContext<'_>,
    ) -> Vec<MeasureItem> {
        let Some(pair) = (match points {
            [a, b, c, d, ..] => line_pair_angle(*a, *b, *c, *d),
            _ => None,
        }) else {
            return Vec::new();
        };
        let mut m = MeasureCollector::new(self.class_id(), ctx);
        add_angle_measurements(&mut m, pair.angle, true);
        m.finish()
    }
}
