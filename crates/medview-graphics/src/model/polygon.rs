//! Closed polygon and open polyline with a variable number of points.
//!
//! Polygon area, perimeter and centroid are measured on the outline of the
//! region the contour encloses under the non-zero winding rule, so
//! overlapping loops are counted once. Boundary edges keep the direction of
//! the contour edge they lie on: a figure-eight, whose lobes wind in opposite
//! directions, reports the difference of the lobe areas.

use medview_core::GraphicError;
use nalgebra::{Rotation2, Vector2};

use crate::geometry::{intersection_params, is_zero, orientation_deg};
use crate::measure::{names, MeasureCollector, MeasureContext, MeasureItem, Measurement, DEGREE};
use crate::model::shape::{polyline_path, GraphicShape};
use crate::model::{Bounds, GraphicTool, HandlePoints, Point, PointCount};
use crate::statistics::append_image_statistics;

/// Length of the path through `points`, closing it when `closed`
pub fn path_length(points: &[Point], closed: bool) -> f64 {
    let open: f64 = points.windows(2).map(|w| w[0].distance_to(&w[1])).sum();
    match (closed, points.first(), points.last()) {
        (true, Some(first), Some(last)) if points.len() > 2 => open + last.distance_to(first),
        _ => open,
    }
}

/// Vertices closer than this are merged before measuring
const SNAP_DISTANCE: f64 = 1e-10;

/// Closed contour without zero-length segments, including the closing one
pub fn cleaned_contour(points: &[Point]) -> Vec<Point> {
    let mut contour: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        if contour.last().map_or(true, |last| last.distance_to(p) > SNAP_DISTANCE) {
            contour.push(*p);
        }
    }
    while contour.len() > 1
        && contour[0].distance_to(&contour[contour.len() - 1]) <= SNAP_DISTANCE
    {
        contour.pop();
    }
    contour
}

/// Intersection parameters closer than this to an edge end are not splits
const SPLIT_EPSILON: f64 = 1e-9;

/// Directed boundary segment of a resolved outline
pub type Edge = (Point, Point);

fn lerp(a: Point, b: Point, t: f64) -> Point {
    Point::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y))
}

/// Non-zero winding number of the closed contour `points` around `p`
pub fn winding_number(points: &[Point], p: Point) -> i32 {
    let n = points.len();
    let mut winding = 0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        let side = (b.x - a.x) * (p.y - a.y) - (p.x - a.x) * (b.y - a.y);
        if a.y <= p.y {
            if b.y > p.y && side > 0.0 {
                winding += 1;
            }
        } else if b.y <= p.y && side < 0.0 {
            winding -= 1;
        }
    }
    winding
}

/// Boundary of the area enclosed by `points` under the non-zero winding
/// rule. Contour edges are split where they cross each other and the pieces
/// separating a filled side from an empty one are kept.
pub fn nonzero_outline(points: &[Point]) -> Vec<Edge> {
    let n = points.len();
    let Some(bounds) = Bounds::from_points(points) else {
        return Vec::new();
    };
    if n < 3 {
        return Vec::new();
    }
    let offset = (bounds.width() + bounds.height()).max(1.0) * SPLIT_EPSILON;
    let edge = |i: usize| (points[i], points[(i + 1) % n]);

    let mut outline = Vec::with_capacity(n);
    for i in 0..n {
        let (a, b) = edge(i);
        let mut cuts = vec![0.0, 1.0];
        for j in (0..n).filter(|&j| j != i) {
            let (c, d) = edge(j);
            if let Some((r, s)) = intersection_params(a, b, c, d) {
                if r > SPLIT_EPSILON
                    && r < 1.0 - SPLIT_EPSILON
                    && (-SPLIT_EPSILON..=1.0 + SPLIT_EPSILON).contains(&s)
                {
                    cuts.push(r);
                }
            }
        }
        cuts.sort_by(f64::total_cmp);
        cuts.dedup_by(|next, prev| (*next - *prev).abs() < SPLIT_EPSILON);

        for w in cuts.windows(2) {
            let (p, q) = (lerp(a, b, w[0]), lerp(a, b, w[1]));
            let length = p.distance_to(&q);
            if length <= SNAP_DISTANCE {
                continue;
            }
            let mid = lerp(a, b, (w[0] + w[1]) / 2.0);
            let nx = -(q.y - p.y) / length * offset;
            let ny = (q.x - p.x) / length * offset;
            let left = winding_number(points, Point::new(mid.x + nx, mid.y + ny));
            let right = winding_number(points, Point::new(mid.x - nx, mid.y - ny));
            if (left == 0) != (right == 0) {
                outline.push((p, q));
            }
        }
    }
    outline
}

/// Signed area enclosed by directed boundary edges
pub fn outline_area(edges: &[Edge]) -> f64 {
    edges
        .iter()
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum::<f64>()
        / 2.0
}

pub fn outline_length(edges: &[Edge]) -> f64 {
    edges.iter().map(|(a, b)| a.distance_to(b)).sum()
}

/// Area centroid of the outline, `None` when it encloses nothing
pub fn outline_centroid(edges: &[Edge]) -> Option<Point> {
    let area = outline_area(edges);
    if is_zero(area) {
        return None;
    }
    let (mut cx, mut cy) = (0.0, 0.0);
    for (a, b) in edges {
        let cross = a.x * b.y - b.x * a.y;
        cx += (a.x + b.x) * cross;
        cy += (a.y + b.y) * cross;
    }
    Some(Point::new(cx / (6.0 * area), cy / (6.0 * area)))
}

fn convex_hull(points: &[Point]) -> Vec<Point> {
    let mut pts: Vec<Point> = points.to_vec();
    pts.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    pts.dedup();
    if pts.len() < 3 {
        return pts;
    }
    let cross = |o: Point, a: Point, b: Point| (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x);
    let mut hull: Vec<Point> = Vec::with_capacity(pts.len() * 2);
    for &p in pts.iter().chain(pts.iter().rev().skip(1)) {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }
    hull.pop();
    hull
}

/// Minimum-area enclosing rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedBox {
    pub corners: [Point; 4],
    /// Longest side
    pub length: f64,
    pub width: f64,
    /// Orientation of the longest side, in `[0, 180)` degrees
    pub orientation: f64,
}

/// Rotating-edges search of the minimum-area bounding box of `points`
pub fn oriented_bounding_box(points: &[Point]) -> Option<OrientedBox> {
    let hull = convex_hull(points);
    if hull.len() < 3 {
        return None;
    }
    let mut best: Option<(f64, [Point; 4])> = None;
    for i in 0..hull.len() {
        let a = hull[i];
        let b = hull[(i + 1) % hull.len()];
        let edge_angle = (b.y - a.y).atan2(b.x - a.x);
        let to_edge = Rotation2::new(-edge_angle);
        let rotated: Vec<Vector2<f64>> = hull
            .iter()
            .map(|p| to_edge * Vector2::new(p.x, p.y))
            .collect();
        let min_x = rotated.iter().map(|v| v.x).fold(f64::INFINITY, f64::min);
        let max_x = rotated.iter().map(|v| v.x).fold(f64::NEG_INFINITY, f64::max);
        let min_y = rotated.iter().map(|v| v.y).fold(f64::INFINITY, f64::min);
        let max_y = rotated.iter().map(|v| v.y).fold(f64::NEG_INFINITY, f64::max);
        let area = (max_x - min_x) * (max_y - min_y);
        if best.map_or(true, |(best_area, _)| area < best_area) {
            let back = to_edge.inverse();
            let corner = |x: f64, y: f64| {
                let v = back * Vector2::new(x, y);
                Point::new(v.x, v.y)
            };
            best = Some((
                area,
                [
                    corner(min_x, min_y),
                    corner(max_x, min_y),
                    corner(max_x, max_y),
                    corner(min_x, max_y),
                ],
            ));
        }
    }
    let (_, corners) = best?;
    let side1 = corners[0].distance_to(&corners[1]);
    let side2 = corners[1].distance_to(&corners[2]);
    let (length, width, orientation) = if side1 >= side2 {
        (side1, side2, orientation_deg(corners[0], corners[1]))
    } else {
        (side2, side1, orientation_deg(corners[1], corners[2]))
    };
    Some(OrientedBox {
        corners,
        length,
        width,
        orientation,
    })
}

/// Drop the trailing repeats of the last point left by a double-click
fn drop_trailing_duplicates(handles: &mut HandlePoints) {
    while handles.len() > 1 && !handles.is_last_point_valid() {
        handles.remove_last();
    }
}

/// Closed contour through a variable number of points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PolygonTool;

impl GraphicTool for PolygonTool {
    fn class_id(&self) -> &'static str {
        "polygon"
    }

    fn name(&self) -> &'static str {
        "Polygon"
    }

    fn point_count(&self) -> PointCount {
        PointCount::Variable
    }

    fn is_area(&self) -> bool {
        true
    }

    fn min_points(&self) -> usize {
        3
    }

    fn build_shape(&self, points: &[Point]) -> Option<GraphicShape> {
        (points.len() > 1).then(|| GraphicShape::new(polyline_path(points, true), true))
    }

    fn is_shape_valid(&self, handles: &HandlePoints) -> bool {
        handles.is_complete()
            && handles.len() >= self.min_points()
            && !handles.has_consecutive_duplicates()
    }

    fn prepare_points(&self, handles: &mut HandlePoints) -> Result<(), GraphicError> {
        handles.freeze();
        if self.is_shape_valid(handles) {
            return Ok(());
        }
        drop_trailing_duplicates(handles);
        if handles.len() > 1 && handles.get(0) == handles.last() {
            handles.remove_at(0);
        }
        handles.freeze();
        if self.is_shape_valid(handles) {
            Ok(())
        } else {
            Err(GraphicError::invalid_shape(
                "a polygon needs at least 3 distinct successive points",
            ))
        }
    }

    fn measurement_list(&self) -> Vec<Measurement> {
        let mut list = vec![
            names::TOP_LEFT_X,
            names::TOP_LEFT_Y,
            names::WIDTH,
            names::HEIGHT,
            names::CENTER_X,
            names::CENTER_Y,
            names::AREA,
            names::PERIMETER,
            names::OMBB_LENGTH,
            names::OMBB_WIDTH,
            names::OMBB_ORIENTATION,
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
        let Some(b) = Bounds::from_points(points) else {
            return Vec::new();
        };
        let points = cleaned_contour(points);
        let points = points.as_slice();
        let outline = nonzero_outline(points);
        let cal = ctx.calibration();
        let unit = cal.length_unit();
        let center = outline_centroid(&outline);
        let mut m = MeasureCollector::new(self.class_id(), ctx);
        m.add(names::TOP_LEFT_X, unit.as_str(), || Some(cal.x_calibrated(b.min_x)));
        m.add(names::TOP_LEFT_Y, unit.as_str(), || Some(cal.y_calibrated(b.min_y)));
        m.add(names::WIDTH, unit.as_str(), || Some(cal.length(b.width())));
        m.add(names::HEIGHT, unit.as_str(), || Some(cal.length(b.height())));
        m.add(names::CENTER_X, unit.as_str(), || center.map(|c| cal.x_calibrated(c.x)));
        m.add(names::CENTER_Y, unit.as_str(), || center.map(|c| cal.y_calibrated(c.y)));
        m.add(names::AREA, cal.area_unit(), || Some(cal.area(outline_area(&outline).abs())));
        m.add(names::PERIMETER, unit.as_str(), || Some(cal.length(outline_length(&outline))));

        let ombb = if ctx.is_release() {
            oriented_bounding_box(points)
        } else {
            None
        };
        m.add(names::OMBB_LENGTH, unit.as_str(), || ombb.map(|o| cal.length(o.length)));
        m.add(names::OMBB_WIDTH, unit.as_str(), || ombb.map(|o| cal.length(o.width)));
        m.add(names::OMBB_ORIENTATION, DEGREE, || ombb.map(|o| o.orientation));

        append_image_statistics(&mut m, shape);
        m.finish()
    }
}

/// Open path through a variable number of points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PolylineTool;

impl GraphicTool for PolylineTool {
    fn class_id(&self) -> &'static str {
        "polyline"
    }

    fn name(&self) -> &'static str {
        "Polyline"
    }

    fn point_count(&self) -> PointCount {
        PointCount::Variable
    }

    fn build_shape(&self, points: &[Point]) -> Option<GraphicShape> {
        (points.len() > 1).then(|| GraphicShape::new(polyline_path(points, false), false))
    }

    fn is_shape_valid(&self, handles: &HandlePoints) -> bool {
        handles.is_complete() && handles.len() >= 2 && !handles.has_consecutive_duplicates()
    }

    fn prepare_points(&self, handles: &mut HandlePoints) -> Result<(), GraphicError> {
        handles.freeze();
        if self.is_shape_valid(handles) {
            return Ok(());
        }
        drop_trailing_duplicates(handles);
        handles.freeze();
        if self.is_shape_valid(handles) {
            Ok(())
        } else {
            Err(GraphicError::invalid_shape(
                "a polyline needs at least 2 distinct successive points",
            ))
        }
    }

    /// Inserts a point after an inner handle, or reopens entry at the end
    fn force_to_add_points(&self, handles: &mut HandlePoints, index: usize) -> bool {
        handles.insert_after(index)
    }

    fn measurement_list(&self) -> Vec<Measurement> {
        vec![
            names::FIRST_POINT_X,
            names::FIRST_POINT_Y,
            names::LAST_POINT_X,
            names::LAST_POINT_Y,
            names::LINE_LENGTH,
        ]
    }

    fn compute_measurements(
        &self,
        points: &[Point],
        _shape: Option<&GraphicShape>,
        ctx: &MeasureContext<'_>,
    ) -> Vec<MeasureItem> {
        let (Some(first), Some(last)) = (points.first().copied(), points.last().copied()) else {
            return Vec::new();
        };
        let cal = ctx.calibration();
        let unit = cal.length_unit();
        let mut m = MeasureCollector::new(self.class_id(), ctx);
        m.add(names::FIRST_POINT_X, unit.as_str(), || Some(cal.x_calibrated(first.x)));
        m.add(names::FIRST_POINT_Y, unit.as_str(), || Some(cal.y_calibrated(first.y)));
        m.add(names::LAST_POINT_X, unit.as_str(), || Some(cal.x_calibrated(last.x)));
        m.add(names::LAST_POINT_Y, unit.as_str(), || Some(cal.y_calibrated(last.y)));
        m.add(names::LINE_LENGTH, unit.as_str(), || {
            Some(cal.length(path_length(points, false)))
        });
        m.finish()
    }
}
