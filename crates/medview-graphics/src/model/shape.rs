//! Renderable geometry produced by the graphic tools.
//!
//! A [`GraphicShape`] is a list of lyon paths in image coordinates. The
//! first item is the main outline used for hit-testing and area queries,
//! the others are decorations. Invariant items keep a constant on-screen
//! size: their path is expressed in screen pixels around an image anchor.

use lyon::math::point;
use lyon::path::iterator::*;
use lyon::path::{Event, Path, Winding};

use super::{Bounds, Point};

/// Flattening tolerance in image pixels
const FLATTEN_TOLERANCE: f32 = 0.05;

#[derive(Debug, Clone)]
pub struct ShapeItem {
    pub path: Path,
    /// Stroke width stays the same whatever the zoom
    pub fixed_line_width: bool,
    pub dashed: bool,
}

/// Decoration drawn at a constant screen size around `anchor`
#[derive(Debug, Clone)]
pub struct InvariantItem {
    /// Path in screen pixels, relative to the anchor
    pub path: Path,
    pub anchor: Point,
}

#[derive(Debug, Clone)]
pub struct GraphicShape {
    items: Vec<ShapeItem>,
    invariants: Vec<InvariantItem>,
    closed: bool,
}

impl GraphicShape {
    pub fn new(main: Path, closed: bool) -> Self {
        Self {
            items: vec![ShapeItem {
                path: main,
                fixed_line_width: false,
                dashed: false,
            }],
            invariants: Vec::new(),
            closed,
        }
    }

    pub fn add(&mut self, path: Path) {
        self.items.push(ShapeItem {
            path,
            fixed_line_width: false,
            dashed: false,
        });
    }

    /// Decoration stroked at a constant width
    pub fn add_fixed(&mut self, path: Path) {
        self.items.push(ShapeItem {
            path,
            fixed_line_width: true,
            dashed: false,
        });
    }

    pub fn add_dashed(&mut self, path: Path) {
        self.items.push(ShapeItem {
            path,
            fixed_line_width: true,
            dashed: true,
        });
    }

    pub fn add_invariant(&mut self, path: Path, anchor: Point) {
        self.invariants.push(InvariantItem { path, anchor });
    }

    pub fn main_path(&self) -> &Path {
        &self.items[0].path
    }

    pub fn items(&self) -> &[ShapeItem] {
        &self.items
    }

    pub fn invariants(&self) -> &[InvariantItem] {
        &self.invariants
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Bounds of all image-space items. Invariant items are only accounted
    /// for by their anchor.
    pub fn bounds(&self) -> Option<Bounds> {
        let items = self.items.iter().filter_map(|item| path_bounds(&item.path));
        let anchors = self
            .invariants
            .iter()
            .map(|inv| Bounds::new(inv.anchor.x, inv.anchor.y, inv.anchor.x, inv.anchor.y));
        items.chain(anchors).reduce(|a, b| a.union(&b))
    }

    /// Point lies inside the closed main outline (non-zero winding)
    pub fn contains_area(&self, p: Point) -> bool {
        self.closed && winding_number(self.main_path(), p) != 0
    }

    /// Point lies within `tolerance` of any stroked item
    pub fn outline_hit(&self, p: Point, tolerance: f64) -> bool {
        self.items
            .iter()
            .any(|item| segments(&item.path).any(|(a, b)| distance_to_segment(p, a, b) <= tolerance))
    }

    /// Flattened contours of the main outline
    pub fn contours(&self) -> Vec<Vec<Point>> {
        let mut contours = Vec::new();
        let mut current = Vec::new();
        for event in self.main_path().iter().flattened(FLATTEN_TOLERANCE) {
            match event {
                Event::Begin { at } => {
                    current.clear();
                    current.push(Point::new(at.x as f64, at.y as f64));
                }
                Event::Line { to, .. } => current.push(Point::new(to.x as f64, to.y as f64)),
                Event::End { .. } => {
                    if !current.is_empty() {
                        contours.push(std::mem::take(&mut current));
                    }
                }
                _ => {}
            }
        }
        contours
    }
}

pub fn path_bounds(path: &Path) -> Option<Bounds> {
    if path.iter().next().is_none() {
        return None;
    }
    let bb = lyon::algorithms::aabb::bounding_box(path.iter());
    Some(Bounds::new(
        bb.min.x as f64,
        bb.min.y as f64,
        bb.max.x as f64,
        bb.max.y as f64,
    ))
}

fn segments(path: &Path) -> impl Iterator<Item = (Point, Point)> + '_ {
    path.iter()
        .flattened(FLATTEN_TOLERANCE)
        .filter_map(|event| match event {
            Event::Line { from, to } => Some((
                Point::new(from.x as f64, from.y as f64),
                Point::new(to.x as f64, to.y as f64),
            )),
            Event::End {
                last, first, close: true,
            } => Some((
                Point::new(last.x as f64, last.y as f64),
                Point::new(first.x as f64, first.y as f64),
            )),
            _ => None,
        })
}

fn winding_number(path: &Path, p: Point) -> i32 {
    let mut winding = 0;
    let mut first = None;
    let mut prev = None;
    let edge = |a: Point, b: Point, winding: &mut i32| {
        if a.y <= p.y {
            if b.y > p.y && cross(a, b, p) > 0.0 {
                *winding += 1;
            }
        } else if b.y <= p.y && cross(a, b, p) < 0.0 {
            *winding -= 1;
        }
    };
    for event in path.iter().flattened(FLATTEN_TOLERANCE) {
        match event {
            Event::Begin { at } => {
                let at = Point::new(at.x as f64, at.y as f64);
                first = Some(at);
                prev = Some(at);
            }
            Event::Line { to, .. } => {
                let to = Point::new(to.x as f64, to.y as f64);
                if let Some(from) = prev {
                    edge(from, to, &mut winding);
                }
                prev = Some(to);
            }
            Event::End { .. } => {
                // contours are implicitly closed for area queries
                if let (Some(from), Some(to)) = (prev, first) {
                    if from != to {
                        edge(from, to, &mut winding);
                    }
                }
                first = None;
                prev = None;
            }
            _ => {}
        }
    }
    winding
}

fn cross(a: Point, b: Point, p: Point) -> f64 {
    (b.x - a.x) * (p.y - a.y) - (p.x - a.x) * (b.y - a.y)
}

pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len2 = dx * dx + dy * dy;
    if len2 == 0.0 {
        return p.distance_to(&a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0);
    p.distance_to(&Point::new(a.x + t * dx, a.y + t * dy))
}

fn lpt(p: Point) -> lyon::math::Point {
    point(p.x as f32, p.y as f32)
}

pub fn segment_path(a: Point, b: Point) -> Path {
    let mut builder = Path::builder();
    builder.begin(lpt(a));
    builder.line_to(lpt(b));
    builder.end(false);
    builder.build()
}

/// Disjoint segments in a single path
pub fn segments_path(segments: &[(Point, Point)]) -> Path {
    let mut builder = Path::builder();
    for (a, b) in segments {
        builder.begin(lpt(*a));
        builder.line_to(lpt(*b));
        builder.end(false);
    }
    builder.build()
}

/// Path through `points`. A single point yields a degenerate path.
pub fn polyline_path(points: &[Point], closed: bool) -> Path {
    let mut builder = Path::builder();
    if let Some((first, rest)) = points.split_first() {
        builder.begin(lpt(*first));
        for p in rest {
            builder.line_to(lpt(*p));
        }
        builder.end(closed);
    }
    builder.build()
}

pub fn rectangle_path(bounds: &Bounds) -> Path {
    let mut builder = Path::builder();
    builder.add_rectangle(
        &lyon::math::Box2D::new(
            point(bounds.min_x as f32, bounds.min_y as f32),
            point(bounds.max_x as f32, bounds.max_y as f32),
        ),
        Winding::Positive,
    );
    builder.build()
}

pub fn ellipse_path(bounds: &Bounds) -> Path {
    let center = bounds.center();
    let mut builder = Path::builder();
    builder.add_ellipse(
        lpt(center),
        lyon::math::vector(
            (bounds.width() / 2.0) as f32,
            (bounds.height() / 2.0) as f32,
        ),
        lyon::math::Angle::radians(0.0),
        Winding::Positive,
    );
    builder.build()
}

pub fn circle_path(center: Point, radius: f64) -> Path {
    let mut builder = Path::builder();
    builder.add_circle(lpt(center), radius as f32, Winding::Positive);
    builder.build()
}

/// Open arc around `center`. Angles are in degrees, counter-clockwise as
/// seen on screen, starting from the positive X axis.
pub fn arc_path(center: Point, radius: f64, start_deg: f64, extent_deg: f64) -> Path {
    let steps = ((extent_deg.abs() / 5.0).ceil() as usize).max(8);
    let points: Vec<Point> = (0..=steps)
        .map(|i| {
            let theta = (start_deg + extent_deg * i as f64 / steps as f64).to_radians();
            Point::new(
                center.x + radius * theta.cos(),
                center.y - radius * theta.sin(),
            )
        })
        .collect();
    polyline_path(&points, false)
}

/// Crosshair with a center circle, in screen pixels around the origin
pub fn crosshair_path(size: f64) -> Path {
    let gap = 2.0;
    let mut builder = Path::builder();
    for (from, to) in [
        ((-size, 0.0), (-gap, 0.0)),
        ((gap, 0.0), (size, 0.0)),
        ((0.0, -size), (0.0, -gap)),
        ((0.0, gap), (0.0, size)),
    ] {
        builder.begin(point(from.0 as f32, from.1 as f32));
        builder.line_to(point(to.0 as f32, to.1 as f32));
        builder.end(false);
    }
    builder.add_circle(point(0.0, 0.0), (size / 2.0) as f32, Winding::Positive);
    builder.build()
}
