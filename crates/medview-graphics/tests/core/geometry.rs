use medview_graphics::geometry::{
    angle_deg, azimuth_deg, circle_center, colinear_point_with_length, intersect_point,
    lines_parallel, median_line, orientation_deg, parallel_line, perpendicular_point_to_line,
    rotate_point, smallest_angle_rad, smallest_rotation_deg,
};
use medview_graphics::Point;
use proptest::prelude::*;
use std::f64::consts::PI;

fn close(a: Point, b: Point) -> bool {
    a.distance_to(&b) < 1e-9
}

#[test]
fn test_angle_is_counter_clockwise_on_screen() {
    let o = Point::new(0.0, 0.0);
    assert_eq!(angle_deg(o, Point::new(10.0, 0.0)), 0.0);
    // y grows downwards, so a point above the origin is at +90
    assert!((angle_deg(o, Point::new(0.0, -10.0)) - 90.0).abs() < 1e-9);
}

#[test]
fn test_orientation_and_azimuth() {
    let o = Point::new(0.0, 0.0);
    assert_eq!(orientation_deg(o, Point::new(-10.0, 0.0)), 0.0);
    assert!((azimuth_deg(o, Point::new(0.0, -10.0))).abs() < 1e-9);
    assert!((azimuth_deg(o, Point::new(10.0, 0.0)) - 90.0).abs() < 1e-9);
    assert!((azimuth_deg(o, Point::new(0.0, 10.0)) - 180.0).abs() < 1e-9);
}

#[test]
fn test_intersections() {
    let p = intersect_point(
        Point::new(0.0, 0.0),
        Point::new(10.0, 10.0),
        Point::new(0.0, 10.0),
        Point::new(10.0, 0.0),
    )
    .unwrap();
    assert!(close(p, Point::new(5.0, 5.0)));
    assert!(intersect_point(
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Point::new(0.0, 5.0),
        Point::new(10.0, 5.0),
    )
    .is_none());
    assert!(lines_parallel(
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Point::new(3.0, 5.0),
        Point::new(-7.0, 5.0),
    ));
}

#[test]
fn test_perpendicular_foot() {
    let foot = perpendicular_point_to_line(
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Point::new(4.0, 7.0),
    )
    .unwrap();
    assert!(close(foot, Point::new(4.0, 0.0)));
    assert!(perpendicular_point_to_line(
        Point::new(1.0, 1.0),
        Point::new(1.0, 1.0),
        Point::new(4.0, 7.0)
    )
    .is_none());
}

#[test]
fn test_parallel_line_keeps_length() {
    let (c, d) = parallel_line(Point::new(0.0, 0.0), Point::new(10.0, 0.0), 5.0).unwrap();
    assert!((c.distance_to(&d) - 10.0).abs() < 1e-9);
    assert!((c.y.abs() - 5.0).abs() < 1e-9);
    assert_eq!(c.y, d.y);
}

#[test]
fn test_circle_through_three_points() {
    let center = circle_center(
        Point::new(0.0, 5.0),
        Point::new(5.0, 0.0),
        Point::new(0.0, -5.0),
    )
    .unwrap();
    assert!(close(center, Point::new(0.0, 0.0)));
    assert!(circle_center(
        Point::new(0.0, 0.0),
        Point::new(1.0, 1.0),
        Point::new(2.0, 2.0)
    )
    .is_none());
}

#[test]
fn test_median_line_of_crossed_segments() {
    let (m1, m2) = median_line(
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Point::new(10.0, 4.0),
        Point::new(0.0, 4.0),
    );
    assert!(close(m1, Point::new(0.0, 2.0)));
    assert!(close(m2, Point::new(10.0, 2.0)));
}

#[test]
fn test_colinear_point_needs_distinct_points() {
    let p = colinear_point_with_length(Point::new(0.0, 0.0), Point::new(0.0, 10.0), 4.0).unwrap();
    assert!(close(p, Point::new(0.0, 4.0)));
    assert!(colinear_point_with_length(Point::new(2.0, 2.0), Point::new(2.0, 2.0), 4.0).is_none());
}

proptest! {
    #[test]
    fn test_smallest_rotation_range(angle in -5000.0f64..5000.0) {
        let a = smallest_rotation_deg(angle);
        prop_assert!((-180.0..=180.0).contains(&a));
        let turns = (angle - a) / 360.0;
        prop_assert!((turns - turns.round()).abs() < 1e-9);
    }

    #[test]
    fn test_smallest_angle_range(angle in -50.0f64..50.0) {
        let a = smallest_angle_rad(angle);
        prop_assert!(a.abs() <= PI / 2.0 + 1e-12);
    }

    #[test]
    fn test_rotation_preserves_distance(
        x in -100.0f64..100.0,
        y in -100.0f64..100.0,
        angle in -PI..PI,
    ) {
        let center = Point::new(3.0, -2.0);
        let p = Point::new(x, y);
        let rotated = rotate_point(p, center, angle);
        prop_assert!((rotated.distance_to(&center) - p.distance_to(&center)).abs() < 1e-9);
        let back = rotate_point(rotated, center, -angle);
        prop_assert!(back.distance_to(&p) < 1e-9);
    }
}
