use crate::geometry::{angle_deg, is_line_valid, midpoint, perpendicular_point_from_line};
use crate::measure::{names, MeasureCollector, MeasureContext, MeasureItem, Measurement};
use crate::model::angle::{add_angle_measurements, ARC_RADIUS};
use crate::model::open_angle::{line_pair_angle, valid_segments, LinePairAngle};
use crate::model::shape::{arc_path, segment_path, segments_path, GraphicShape};
use crate::model::{GraphicTool, HandlePoints, Point, PointCount};

/// Angle between the line joining the middles of AB and CD and the line
/// joining the middles of EF and GH
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FourPointsAngleTool;

/// Construction points derived from the eight handles
struct Construction {
    i: Option<Point>,
    j: Option<Point>,
    k: Option<Point>,
    l: Option<Point>,
}

impl Construction {
    fn new(points: &[Point]) -> Self {
        let pt = |i: usize| points.get(i).copied();
        let mid = |a: usize, b: usize| match (pt(a), pt(b)) {
            (Some(a), Some(b)) if a != b => Some(midpoint(a, b)),
            _ => None,
        };
        let k = mid(4, 5);
        let l = mid(6, 7).or_else(|| match (pt(6), pt(4), pt(5), k) {
            // temporary direction until GH is placed
            (None, Some(e), Some(f), Some(k)) => perpendicular_point_from_line(e, f, k, 1.0),
            _ => None,
        });
        Self {
            i: mid(0, 1),
            j: mid(2, 3),
            k,
            l,
        }
    }

    fn pair(&self) -> Option<LinePairAngle> {
        match (self.i, self.j, self.k, self.l) {
            (Some(i), Some(j), Some(k), Some(l)) => line_pair_angle(i, j, k, l),
            _ => None,
        }
    }
}

impl GraphicTool for FourPointsAngleTool {
    fn class_id(&self) -> &'static str {
        "four_points_angle"
    }

    fn name(&self) -> &'static str {
        "Four Points Angle"
    }

    fn point_count(&self) -> PointCount {
        PointCount::Fixed(8)
    }

    fn build_shape(&self, points: &[Point]) -> Option<GraphicShape> {
        let pt = |i: usize| points.get(i).copied();
        let c = Construction::new(points);
        let segments = valid_segments(&[
            (pt(0), pt(1)),
            (pt(2), pt(3)),
            (c.i, c.j),
            (pt(4), pt(5)),
            (pt(6), pt(7)),
            (c.k, c.l),
        ]);
        if segments.is_empty() {
            return None;
        }
        let mut shape = GraphicShape::new(segments_path(&segments), false);

        if let Some(pair) = c.pair() {
            if let Some(x) = pair.crossing.filter(|_| pair.angle.abs() > 0.1) {
                shape.add_invariant(
                    arc_path(Point::default(), ARC_RADIUS, angle_deg(x.point, x.ab[0]), pair.angle),
                    x.point,
                );
                if !x.on_ab {
                    shape.add_dashed(segment_path(x.point, x.ab[1]));
                }
                if !x.on_cd {
                    shape.add_dashed(segment_path(x.point, x.cd[1]));
                }
            }
        }
        Some(shape)
    }

    fn is_shape_valid(&self, handles: &HandlePoints) -> bool {
        let pt = |i: usize| handles.get(i);
        handles.is_complete()
            && !handles.has_coincident_points()
            && (0..4).all(|n| is_line_valid(pt(2 * n), pt(2 * n + 1)))
            && Construction::new(handles.points()).pair().is_some()
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
        let Some(pair) = Construction::new(points).pair() else {
            return Vec::new();
        };
        let mut m = MeasureCollector::new(self.class_id(), ctx);
        add_angle_measurements(&mut m, pair.angle, false);
        m.finish()
    }
}
