use crate::measure::{names, MeasureCollector, MeasureContext, MeasureItem, Measurement};
use crate::model::shape::{rectangle_path, GraphicShape};
use crate::model::{move_points, Bounds, DragTarget, GraphicTool, HandlePoints, Point, PointCount};
use crate::statistics::append_image_statistics;

/// Handles of a box shape. The first two are always diagonal corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RectangleHandle {
    NW = 0,
    SE = 1,
    NE = 2,
    SW = 3,
    N = 4,
    S = 5,
    E = 6,
    W = 7,
}

pub const BOX_HANDLE_COUNT: usize = 8;

impl RectangleHandle {
    pub fn from_index(index: usize) -> Option<Self> {
        use RectangleHandle::*;
        [NW, SE, NE, SW, N, S, E, W].get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Handle on the other side of a vertical axis
    pub fn vertical_mirror(self) -> Self {
        use RectangleHandle::*;
        match self {
            NW => NE,
            NE => NW,
            W => E,
            E => W,
            SW => SE,
            SE => SW,
            other => other,
        }
    }

    /// Handle on the other side of a horizontal axis
    pub fn horizontal_mirror(self) -> Self {
        use RectangleHandle::*;
        match self {
            NW => SW,
            SW => NW,
            N => S,
            S => N,
            NE => SE,
            SE => NE,
            other => other,
        }
    }

    fn moves_west(self) -> bool {
        matches!(self, Self::W | Self::NW | Self::SW)
    }

    fn moves_north(self) -> bool {
        matches!(self, Self::N | Self::NW | Self::NE)
    }

    fn moves_east(self) -> bool {
        matches!(self, Self::E | Self::NE | Self::SE)
    }

    fn moves_south(self) -> bool {
        matches!(self, Self::S | Self::SW | Self::SE)
    }

    fn location(self, b: &Bounds) -> Point {
        let c = b.center();
        match self {
            Self::NW => Point::new(b.min_x, b.min_y),
            Self::SE => Point::new(b.max_x, b.max_y),
            Self::NE => Point::new(b.max_x, b.min_y),
            Self::SW => Point::new(b.min_x, b.max_y),
            Self::N => Point::new(c.x, b.min_y),
            Self::S => Point::new(c.x, b.max_y),
            Self::E => Point::new(b.max_x, c.y),
            Self::W => Point::new(b.min_x, c.y),
        }
    }
}

/// Frame spanned by the two diagonal handles
pub(crate) fn box_bounds(points: &[Point]) -> Option<Bounds> {
    match points {
        [a, b, ..] => Some(Bounds::from_diagonal(*a, *b)),
        _ => None,
    }
}

/// Place the eight handles on `bounds`, appending the missing ones
pub(crate) fn set_box_handles(handles: &mut HandlePoints, bounds: &Bounds) {
    for index in 0..BOX_HANDLE_COUNT {
        if let Some(handle) = RectangleHandle::from_index(index) {
            handles.set(index, handle.location(bounds));
        }
    }
}

/// Resize a box by moving one handle. Crossing the opposite side swaps to
/// the mirrored handle, which is returned as the new target.
pub(crate) fn resize_box(
    handles: &mut HandlePoints,
    target: DragTarget,
    dx: f64,
    dy: f64,
    cursor: Point,
) -> DragTarget {
    let index = match target {
        DragTarget::Whole => return move_points(handles, target, dx, dy, cursor),
        DragTarget::Handle(index) => index,
    };
    let (Some(frame), Some(mut handle)) = (
        box_bounds(handles.points()),
        RectangleHandle::from_index(index),
    ) else {
        return move_points(handles, target, dx, dy, cursor);
    };

    let (mut x, mut y) = (frame.min_x, frame.min_y);
    let (mut w, mut h) = (frame.width(), frame.height());
    if handle.moves_west() {
        x += dx;
        w -= dx;
    }
    if handle.moves_north() {
        y += dy;
        h -= dy;
    }
    if handle.moves_east() {
        w += dx;
    }
    if handle.moves_south() {
        h += dy;
    }
    if w < 0.0 {
        w = -w;
        x -= w;
        handle = handle.vertical_mirror();
    }
    if h < 0.0 {
        h = -h;
        y -= h;
        handle = handle.horizontal_mirror();
    }

    set_box_handles(handles, &Bounds::new(x, y, x + w, y + h));
    DragTarget::Handle(handle.index())
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RectangleTool;

impl GraphicTool for RectangleTool {
    fn class_id(&self) -> &'static str {
        "rectangle"
    }

    fn name(&self) -> &'static str {
        "Rectangle"
    }

    fn point_count(&self) -> PointCount {
        PointCount::Fixed(BOX_HANDLE_COUNT)
    }

    fn is_area(&self) -> bool {
        true
    }

    fn build_shape(&self, points: &[Point]) -> Option<GraphicShape> {
        box_bounds(points).map(|b| GraphicShape::new(rectangle_path(&b), true))
    }

    fn measurement_list(&self) -> Vec<Measurement> {
        let mut list = vec![
            names::TOP_LEFT_X,
            names::TOP_LEFT_Y,
            names::CENTER_X,
            names::CENTER_Y,
            names::WIDTH,
            names::HEIGHT,
            names::AREA,
            names::PERIMETER,
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
        let Some(b) = box_bounds(points) else {
            return Vec::new();
        };
        let cal = ctx.calibration();
        let unit = cal.length_unit();
        let center = b.center();
        let mut m = MeasureCollector::new(self.class_id(), ctx);
        m.add(names::TOP_LEFT_X, unit.as_str(), || Some(cal.x_calibrated(b.min_x)));
        m.add(names::TOP_LEFT_Y, unit.as_str(), || Some(cal.y_calibrated(b.min_y)));
        m.add(names::CENTER_X, unit.as_str(), || Some(cal.x_calibrated(center.x)));
        m.add(names::CENTER_Y, unit.as_str(), || Some(cal.y_calibrated(center.y)));
        m.add(names::WIDTH, unit.as_str(), || Some(cal.length(b.width())));
        m.add(names::HEIGHT, unit.as_str(), || Some(cal.length(b.height())));
        m.add(names::AREA, cal.area_unit(), || Some(cal.area(b.width() * b.height())));
        m.add(names::PERIMETER, unit.as_str(), || {
            Some(cal.length(2.0 * (b.width() + b.height())))
        });
        append_image_statistics(&mut m, shape);
        m.finish()
    }

    fn move_and_resize(
        &self,
        handles: &mut HandlePoints,
        target: DragTarget,
        dx: f64,
        dy: f64,
        cursor: Point,
    ) -> DragTarget {
        resize_box(handles, target, dx, dy, cursor)
    }
}
