//! Plane geometry helpers used by the annotation tools.
//!
//! Angles follow the image display convention: image Y grows downwards, so
//! [`angle_rad`] flips Y and returns counter-clockwise angles as seen on
//! screen. Rotations ([`rotate_point`]) are expressed in raw image
//! coordinates, where a positive angle turns the X axis towards the Y axis.

use nalgebra::{Rotation2, Vector2};
use std::f64::consts::PI;

use crate::model::Point;

/// Tolerance under which a determinant is considered null
pub const EPSILON: f64 = 1e-6;

/// Returns true when `value` is null within [`EPSILON`]
pub fn is_zero(value: f64) -> bool {
    value.abs() < EPSILON
}

/// Orientation of the vector AB, in radians, counter-clockwise on screen
pub fn angle_rad(a: Point, b: Point) -> f64 {
    (a.y - b.y).atan2(b.x - a.x)
}

/// Orientation of the vector AB, in degrees
pub fn angle_deg(a: Point, b: Point) -> f64 {
    angle_rad(a, b).to_degrees()
}

/// Signed angle from OA to OB, in radians
pub fn angle_between_rad(a: Point, o: Point, b: Point) -> f64 {
    angle_rad(o, b) - angle_rad(o, a)
}

/// Signed angle from OA to OB, in degrees
pub fn angle_between_deg(a: Point, o: Point, b: Point) -> f64 {
    angle_between_rad(a, o, b).to_degrees()
}

/// Normalize a rotation into `[-180, 180]` degrees
pub fn smallest_rotation_deg(angle: f64) -> f64 {
    let mut a = angle % 360.0;
    if a.abs() > 180.0 {
        a -= a.signum() * 360.0;
    }
    a
}

/// Normalize a rotation into `[-PI, PI]` radians
pub fn smallest_rotation_rad(angle: f64) -> f64 {
    let mut a = angle % (2.0 * PI);
    if a.abs() > PI {
        a -= a.signum() * 2.0 * PI;
    }
    a
}

/// Normalize an undirected line angle into `[-PI/2, PI/2]` radians
pub fn smallest_angle_rad(angle: f64) -> f64 {
    let mut a = angle % PI;
    if a.abs() > PI / 2.0 {
        a -= a.signum() * PI;
    }
    a
}

/// Orientation of an undirected line, in `[0, 180)` degrees
pub fn orientation_deg(a: Point, b: Point) -> f64 {
    angle_deg(a, b).rem_euclid(180.0)
}

/// Azimuth of the vector AB, clockwise from the top of the image, in `[0, 360)` degrees
pub fn azimuth_deg(a: Point, b: Point) -> f64 {
    (90.0 - angle_deg(a, b)).rem_euclid(360.0)
}

pub fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// A line is usable when both points exist and differ
pub fn is_line_valid(a: Option<Point>, b: Option<Point>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a != b)
}

/// Point of the line AB at `k` times the vector AB from A
pub fn colinear_point_with_ratio(a: Point, b: Point, k: f64) -> Point {
    Point::new(b.x * k + a.x * (1.0 - k), b.y * k + a.y * (1.0 - k))
}

/// Point of the line AB at distance `length` from A, towards B
pub fn colinear_point_with_length(a: Point, b: Point, length: f64) -> Option<Point> {
    let dist = a.distance_to(&b);
    if is_zero(dist) {
        return None;
    }
    Some(colinear_point_with_ratio(a, b, length / dist))
}

/// Orthogonal projection of C on the line AB
pub fn perpendicular_point_to_line(a: Point, b: Point, c: Point) -> Option<Point> {
    let ab2 = (b.x - a.x).powi(2) + (b.y - a.y).powi(2);
    if a == b || is_zero(ab2) {
        return None;
    }
    let r = ((a.y - c.y) * (a.y - b.y) + (a.x - c.x) * (a.x - b.x)) / ab2;
    Some(Point::new(a.x + r * (b.x - a.x), a.y + r * (b.y - a.y)))
}

/// Point at signed distance `dist` from P along the normal of AB
pub fn perpendicular_point_from_line(a: Point, b: Point, p: Point, dist: f64) -> Option<Point> {
    let len = a.distance_to(&b);
    if is_zero(len) {
        return None;
    }
    let ux = -(b.y - a.y) / len;
    let uy = (b.x - a.x) / len;
    Some(Point::new(p.x + dist * ux, p.y + dist * uy))
}

/// Line parallel to AB at signed distance `dist`
pub fn parallel_line(a: Point, b: Point, dist: f64) -> Option<(Point, Point)> {
    Some((
        perpendicular_point_from_line(a, b, a, dist)?,
        perpendicular_point_from_line(a, b, b, dist)?,
    ))
}

/// Parametric position of the intersection of lines AB and CD.
///
/// Returns `(r, s)` such that the intersection is `A + r(B - A)` and
/// `C + s(D - C)`, or `None` when the lines are parallel.
pub fn intersection_params(a: Point, b: Point, c: Point, d: Point) -> Option<(f64, f64)> {
    let denominator = (b.x - a.x) * (d.y - c.y) - (b.y - a.y) * (d.x - c.x);
    if is_zero(denominator) {
        return None;
    }
    let r = ((a.y - c.y) * (d.x - c.x) - (a.x - c.x) * (d.y - c.y)) / denominator;
    let s = ((a.y - c.y) * (b.x - a.x) - (a.x - c.x) * (b.y - a.y)) / denominator;
    Some((r, s))
}

/// Intersection of the lines AB and CD, `None` when parallel
pub fn intersect_point(a: Point, b: Point, c: Point, d: Point) -> Option<Point> {
    intersection_params(a, b, c, d)
        .map(|(r, _)| Point::new(a.x + r * (b.x - a.x), a.y + r * (b.y - a.y)))
}

pub fn lines_parallel(a: Point, b: Point, c: Point, d: Point) -> bool {
    is_zero((b.x - a.x) * (d.y - c.y) - (b.y - a.y) * (d.x - c.x))
}

pub fn lines_colinear(a: Point, b: Point, c: Point, d: Point) -> bool {
    lines_parallel(a, b, c, d)
        && is_zero((a.y - c.y) * (d.x - c.x) - (a.x - c.x) * (d.y - c.y))
}

fn orientation(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn on_segment(a: Point, b: Point, p: Point) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Closed segments AB and CD share at least one point
pub fn segments_intersect(a: Point, b: Point, c: Point, d: Point) -> bool {
    let o1 = orientation(a, b, c);
    let o2 = orientation(a, b, d);
    let o3 = orientation(c, d, a);
    let o4 = orientation(c, d, b);

    if ((o1 > 0.0 && o2 < 0.0) || (o1 < 0.0 && o2 > 0.0))
        && ((o3 > 0.0 && o4 < 0.0) || (o3 < 0.0 && o4 > 0.0))
    {
        return true;
    }
    (o1 == 0.0 && on_segment(a, b, c))
        || (o2 == 0.0 && on_segment(a, b, d))
        || (o3 == 0.0 && on_segment(c, d, a))
        || (o4 == 0.0 && on_segment(c, d, b))
}

/// Line half-way between AB and CD, pairing the endpoints that do not cross
pub fn median_line(a: Point, b: Point, c: Point, d: Point) -> (Point, Point) {
    if segments_intersect(a, c, b, d) {
        (midpoint(a, d), midpoint(b, c))
    } else {
        (midpoint(a, c), midpoint(b, d))
    }
}

/// Center of the circle through A, B and C, `None` when colinear
pub fn circle_center(a: Point, b: Point, c: Point) -> Option<Point> {
    let c1 = b.x - a.x;
    let c2 = b.y - a.y;
    let c3 = c.x - a.x;
    let c4 = c.y - a.y;
    let c5 = c1 * (a.x + b.x) + c2 * (a.y + b.y);
    let c6 = c3 * (a.x + c.x) + c4 * (a.y + c.y);

    let denom = 2.0 * (c1 * (c.y - b.y) - c2 * (c.x - b.x));
    if is_zero(denom) {
        return None;
    }
    Some(Point::new(
        (c4 * c5 - c2 * c6) / denom,
        (c1 * c6 - c3 * c5) / denom,
    ))
}

/// Rotate `p` about `center` by `angle` radians in image coordinates
pub fn rotate_point(p: Point, center: Point, angle: f64) -> Point {
    let rotated = Rotation2::new(angle) * Vector2::new(p.x - center.x, p.y - center.y);
    Point::new(center.x + rotated.x, center.y + rotated.y)
}

/// Arrow head at B for the segment OB: returns the two barb tips
pub fn arrow_barbs(o: Point, b: Point, length: f64, width: f64) -> Option<(Point, Point)> {
    let base = colinear_point_with_length(b, o, length)?;
    let left = perpendicular_point_from_line(o, b, base, width / 2.0)?;
    let right = perpendicular_point_from_line(o, b, base, -width / 2.0)?;
    Some((left, right))
}

/// Square corner mark at O between the directions OA and OB
pub fn corner_points(a: Point, o: Point, b: Point, size: f64) -> Option<[Point; 3]> {
    let p1 = colinear_point_with_length(o, a, size)?;
    let p2 = colinear_point_with_length(o, b, size)?;
    let corner = Point::new(p1.x + p2.x - o.x, p1.y + p2.y - o.y);
    Some([p1, corner, p2])
}
