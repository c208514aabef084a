use medview_core::GraphicError;
use serde::{Deserialize, Serialize};

use crate::label::LABEL_GAP;
use crate::measure::{MeasureContext, MeasureItem, Measurement};

mod angle;
mod circle;
mod cobb;
mod ellipse;
mod four_points_angle;
pub mod handles;
mod line;
mod open_angle;
mod parallel;
mod perpendicular;
mod pixel_info;
mod point;
mod polygon;
mod rectangle;
pub mod shape;

pub use angle::AngleTool;
pub use circle::ThreePointsCircleTool;
pub use cobb::CobbAngleTool;
pub use ellipse::EllipseTool;
pub use four_points_angle::FourPointsAngleTool;
pub use handles::HandlePoints;
pub use line::LineTool;
pub use open_angle::{line_pair_angle, LinePairAngle, OpenAngleTool};
pub use parallel::ParallelLineTool;
pub use perpendicular::PerpendicularLineTool;
pub use pixel_info::{PixelInfoTool, NO_VALUE};
pub use point::PointTool;
pub use polygon::{oriented_bounding_box, OrientedBox, PolygonTool, PolylineTool};
pub use rectangle::{RectangleHandle, RectangleTool};
pub(crate) use rectangle::set_box_handles;
pub use shape::GraphicShape;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// Axis-aligned bounds in image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x: min_x.min(max_x),
            min_y: min_y.min(max_y),
            max_x: min_x.max(max_x),
            max_y: min_y.max(max_y),
        }
    }

    /// Bounds spanned by two opposite corners
    pub fn from_diagonal(a: Point, b: Point) -> Self {
        Self::new(a.x, a.y, b.x, b.y)
    }

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Self::new(first.x, first.y, first.x, first.y);
        for p in iter {
            bounds.min_x = bounds.min_x.min(p.x);
            bounds.min_y = bounds.min_y.min(p.y);
            bounds.max_x = bounds.max_x.max(p.x);
            bounds.max_y = bounds.max_y.max(p.y);
        }
        Some(bounds)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn grown(&self, margin: f64) -> Bounds {
        Bounds {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }
}

/// Image region to repaint after a mutation. Returned by every operation
/// that changes what a graphic looks like.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DirtyRegion(Option<Bounds>);

impl DirtyRegion {
    pub fn none() -> Self {
        Self(None)
    }

    pub fn from_bounds(bounds: Option<Bounds>) -> Self {
        Self(bounds)
    }

    pub fn union(self, other: DirtyRegion) -> DirtyRegion {
        match (self.0, other.0) {
            (Some(a), Some(b)) => Self(Some(a.union(&b))),
            (a, b) => Self(a.or(b)),
        }
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

/// Declared handle cardinality of a graphic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointCount {
    Fixed(usize),
    /// Point entry is terminated by the user
    Variable,
}

/// What a drag acts on: the whole graphic or a single handle point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTarget {
    Whole,
    Handle(usize),
}

/// Default drag behavior: translate everything, or put the targeted handle
/// under the cursor.
pub fn move_points(
    handles: &mut HandlePoints,
    target: DragTarget,
    dx: f64,
    dy: f64,
    cursor: Point,
) -> DragTarget {
    match target {
        DragTarget::Whole => {
            handles.translate(dx, dy);
            DragTarget::Whole
        }
        DragTarget::Handle(index) => {
            if handles.is_empty() {
                return target;
            }
            let index = index.min(handles.len() - 1);
            handles.set(index, cursor);
            DragTarget::Handle(index)
        }
    }
}

/// `name : value unit` lines for the measurements shown on the label
pub fn default_label_lines(items: &[MeasureItem], decimals: usize) -> Vec<String> {
    items
        .iter()
        .filter(|item| item.measurement.graphic_label)
        .map(|item| item.label_line(decimals))
        .collect()
}

/// Per-variant behavior of an annotation graphic: shape builder,
/// measurement provider and drag handler.
pub trait GraphicTool {
    /// Stable identifier used for persistence and configuration
    fn class_id(&self) -> &'static str;
    fn name(&self) -> &'static str;
    fn point_count(&self) -> PointCount;

    /// Closed shapes can be filled and carry pixel statistics
    fn is_area(&self) -> bool {
        false
    }

    /// Fewest handles a variable-count graphic keeps on point removal
    fn min_points(&self) -> usize {
        2
    }

    fn build_shape(&self, points: &[Point]) -> Option<GraphicShape>;
    fn measurement_list(&self) -> Vec<Measurement>;
    fn compute_measurements(
        &self,
        points: &[Point],
        shape: Option<&GraphicShape>,
        ctx: &MeasureContext<'_>,
    ) -> Vec<MeasureItem>;

    fn is_shape_valid(&self, handles: &HandlePoints) -> bool {
        handles.is_complete() && !handles.has_coincident_points()
    }

    fn move_and_resize(
        &self,
        handles: &mut HandlePoints,
        target: DragTarget,
        dx: f64,
        dy: f64,
        cursor: Point,
    ) -> DragTarget {
        move_points(handles, target, dx, dy, cursor)
    }

    /// Clean up the points of a finished graphic before its shape is built
    fn prepare_points(&self, _handles: &mut HandlePoints) -> Result<(), GraphicError> {
        Ok(())
    }

    /// Reopen point entry from the handle at `index`
    fn force_to_add_points(&self, handles: &mut HandlePoints, index: usize) -> bool {
        handles.force_to_add_points(index)
    }

    fn label_lines(&self, items: &[MeasureItem], decimals: usize) -> Vec<String> {
        default_label_lines(items, decimals)
    }

    fn label_anchor(&self, _points: &[Point], bounds: Option<Bounds>) -> Option<Point> {
        bounds.map(|b| Point::new(b.max_x + LABEL_GAP, b.center().y))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GraphicKind {
    Line(LineTool),
    Rectangle(RectangleTool),
    Ellipse(EllipseTool),
    Polygon(PolygonTool),
    Polyline(PolylineTool),
    Angle(AngleTool),
    OpenAngle(OpenAngleTool),
    FourPointsAngle(FourPointsAngleTool),
    CobbAngle(CobbAngleTool),
    ParallelLine(ParallelLineTool),
    PerpendicularLine(PerpendicularLineTool),
    Point(PointTool),
    PixelInfo(PixelInfoTool),
    ThreePointsCircle(ThreePointsCircleTool),
}

impl GraphicKind {
    /// Every graphic kind, in tool palette order
    pub fn all() -> Vec<GraphicKind> {
        vec![
            GraphicKind::Line(LineTool),
            GraphicKind::Rectangle(RectangleTool),
            GraphicKind::Ellipse(EllipseTool),
            GraphicKind::Polygon(PolygonTool),
            GraphicKind::Polyline(PolylineTool),
            GraphicKind::Angle(AngleTool),
            GraphicKind::OpenAngle(OpenAngleTool),
            GraphicKind::FourPointsAngle(FourPointsAngleTool),
            GraphicKind::CobbAngle(CobbAngleTool),
            GraphicKind::ParallelLine(ParallelLineTool),
            GraphicKind::PerpendicularLine(PerpendicularLineTool),
            GraphicKind::Point(PointTool),
            GraphicKind::PixelInfo(PixelInfoTool),
            GraphicKind::ThreePointsCircle(ThreePointsCircleTool),
        ]
    }

    pub fn from_class_id(class_id: &str) -> Option<GraphicKind> {
        Self::all()
            .into_iter()
            .find(|kind| kind.class_id() == class_id)
    }

    fn tool(&self) -> &dyn GraphicTool {
        match self {
            GraphicKind::Line(s) => s,
            GraphicKind::Rectangle(s) => s,
            GraphicKind::Ellipse(s) => s,
            GraphicKind::Polygon(s) => s,
            GraphicKind::Polyline(s) => s,
            GraphicKind::Angle(s) => s,
            GraphicKind::OpenAngle(s) => s,
            GraphicKind::FourPointsAngle(s) => s,
            GraphicKind::CobbAngle(s) => s,
            GraphicKind::ParallelLine(s) => s,
            GraphicKind::PerpendicularLine(s) => s,
            GraphicKind::Point(s) => s,
            GraphicKind::PixelInfo(s) => s,
            GraphicKind::ThreePointsCircle(s) => s,
        }
    }
}

impl GraphicTool for GraphicKind {
    fn class_id(&self) -> &'static str {
        self.tool().class_id()
    }

    fn name(&self) -> &'static str {
        self.tool().name()
    }

    fn point_count(&self) -> PointCount {
        self.tool().point_count()
    }

    fn min_points(&self) -> usize {
        self.tool().min_points()
    }

    fn is_area(&self) -> bool {
        self.tool().is_area()
    }

    fn build_shape(&self, points: &[Point]) -> Option<GraphicShape> {
        self.tool().build_shape(points)
    }

    fn measurement_list(&self) -> Vec<Measurement> {
        self.tool().measurement_list()
    }

    fn compute_measurements(
        &self,
        points: &[Point],
        shape: Option<&GraphicShape>,
        ctx: &MeasureContext<'_>,
    ) -> Vec<MeasureItem> {
        self.tool().compute_measurements(points, shape, ctx)
    }

    fn is_shape_valid(&self, handles: &HandlePoints) -> bool {
        self.tool().is_shape_valid(handles)
    }

    fn move_and_resize(
        &self,
        handles: &mut HandlePoints,
        target: DragTarget,
        dx: f64,
        dy: f64,
        cursor: Point,
    ) -> DragTarget {
        self.tool().move_and_resize(handles, target, dx, dy, cursor)
    }

    fn prepare_points(&self, handles: &mut HandlePoints) -> Result<(), GraphicError> {
        self.tool().prepare_points(handles)
    }

    fn force_to_add_points(&self, handles: &mut HandlePoints, index: usize) -> bool {
        self.tool().force_to_add_points(handles, index)
    }

    fn label_lines(&self, items: &[MeasureItem], decimals: usize) -> Vec<String> {
        self.tool().label_lines(items, decimals)
    }

    fn label_anchor(&self, points: &[Point], bounds: Option<Bounds>) -> Option<Point> {
        self.tool().label_anchor(points, bounds)
    }
}
