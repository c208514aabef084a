use crate::geometry::{angle_between_deg, angle_deg, lines_colinear, smallest_rotation_deg};
use crate::measure::{names, MeasureCollector, MeasureContext, MeasureItem, Measurement, DEGREE};
use crate::model::shape::{arc_path, polyline_path, GraphicShape};
use crate::model::{GraphicTool, HandlePoints, Point, PointCount};

/// Arc radius in screen pixels
pub(crate) const ARC_RADIUS: f64 = 32.0;

/// Angle between the rays OA and OB. Handles are A, O (vertex) and B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AngleTool;

/// Signed angle from OA to OB in `[-180, 180]`, `None` when a ray is degenerate
fn vertex_angle(points: &[Point]) -> Option<f64> {
    match points {
        [a, o, b, ..] if a != o && b != o => Some(smallest_rotation_deg(angle_between_deg(*a, *o, *b))),
        _ => None,
    }
}

/// `Angle`, `Compl. Angle` and `Reflex angle` from a signed angle
pub(crate) fn add_angle_measurements(m: &mut MeasureCollector<'_, '_>, angle: f64, reflex: bool) {
    let positive = angle.abs();
    m.add(names::ANGLE, DEGREE, || Some(positive));
    m.add(names::COMPLEMENTARY_ANGLE, DEGREE, || Some(180.0 - positive));
    if reflex {
        m.add(names::REFLEX_ANGLE, DEGREE, || Some(360.0 - positive));
    }
}

impl GraphicTool for AngleTool {
    fn class_id(&self) -> &'static str {
        "angle"
    }

    fn name(&self) -> &'static str {
        "Angle"
    }

    fn point_count(&self) -> PointCount {
        PointCount::Fixed(3)
    }

    fn build_shape(&self, points: &[Point]) -> Option<GraphicShape> {
        let (a, o) = match points {
            [a, o, ..] => (*a, *o),
            _ => return None,
        };
        let b = points.get(2).copied();
        let oa_valid = a != o;
        let ob_valid = b.is_some_and(|b| b != o);

        let mut rays = Vec::with_capacity(3);
        if oa_valid {
            rays.push(a);
            rays.push(o);
        }
        if let (true, Some(b)) = (ob_valid, b) {
            if !oa_valid {
                rays.push(o);
            }
            rays.push(b);
        }
        if rays.len() < 2 {
            return None;
        }
        let mut shape = GraphicShape::new(polyline_path(&rays, false), false);

        if let (true, true, Some(b)) = (oa_valid, ob_valid, b) {
            if !lines_colinear(o, a, o, b) {
                if let Some(angle) = vertex_angle(points) {
                    shape.add_invariant(arc_path(Point::default(), ARC_RADIUS, angle_deg(o, a), angle), o);
                }
            }
        }
        Some(shape)
    }

    fn is_shape_valid(&self, handles: &HandlePoints) -> bool {
        handles.is_complete()
            && !handles.has_coincident_points()
            && vertex_angle(handles.points()).is_some()
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
        let Some(angle) = vertex_angle(points) else {
            return Vec::new();
        };
        let mut m = MeasureCollector::new(self.class_id(), ctx);
        add_angle_measurements(&mut m, angle, true);
        m.finish()
    }
}
