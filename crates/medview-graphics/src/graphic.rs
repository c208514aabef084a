//! A graphic instance drawn over an image: handle points, derived shape,
//! label and paint attributes.
//!
//! Every mutation rebuilds what depends on the handle points and returns a
//! [`DirtyRegion`] covering the area to repaint before and after the change.

use medview_core::{Color, GraphicError};
use medview_settings::GraphicsSettings;
use tracing::debug;
use uuid::Uuid;

use crate::label::GraphicLabel;
use crate::measure::{MeasureContext, MeasureItem};
use crate::model::handles::HANDLE_HIT_FACTOR;
use crate::model::{
    Bounds, DirtyRegion, DragTarget, GraphicKind, GraphicShape, GraphicTool, HandlePoints, Point,
};

/// Extra repaint margin in screen pixels
const REPAINT_MARGIN: f64 = 2.0;

#[derive(Debug, Clone)]
pub struct Graphic {
    id: Uuid,
    kind: GraphicKind,
    handles: HandlePoints,
    color: Color,
    thickness: f64,
    filled: bool,
    label_visible: bool,
    selected: bool,
    resizing: bool,
    layer: u32,
    handle_size: f64,
    /// Last view scale seen, used to size screen-constant elements
    view_scale: f64,
    shape: Option<GraphicShape>,
    label: Option<GraphicLabel>,
}

impl Graphic {
    /// Empty graphic ready to be drawn, with default paint attributes
    pub fn new(kind: GraphicKind) -> Self {
        Self::with_settings(kind, &GraphicsSettings::default())
    }

    pub fn with_settings(kind: GraphicKind, settings: &GraphicsSettings) -> Self {
        let handles = HandlePoints::new(kind.point_count());
        Self {
            id: Uuid::new_v4(),
            kind,
            handles,
            color: settings.color,
            thickness: settings.line_thickness,
            filled: settings.filled,
            label_visible: settings.label_visible,
            selected: false,
            resizing: false,
            layer: 0,
            handle_size: settings.handle_size,
            view_scale: 1.0,
            shape: None,
            label: None,
        }
    }

    /// Complete graphic from existing points.
    ///
    /// Variable-count graphics take all the points. Rectangles and ellipses
    /// also accept their two diagonal corners.
    pub fn from_points(kind: GraphicKind, points: &[Point]) -> Result<Self, GraphicError> {
        if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(GraphicError::invalid_shape("non-finite coordinates"));
        }
        if matches!(kind, GraphicKind::Rectangle(_) | GraphicKind::Ellipse(_)) && points.len() == 2 {
            return Self::from_box(kind, Bounds::from_diagonal(points[0], points[1]));
        }

        let mut graphic = Self::new(kind);
        graphic.handles = HandlePoints::with_points(graphic.kind.point_count(), points);
        graphic.handles.freeze();
        graphic.kind.prepare_points(&mut graphic.handles)?;
        if !graphic.handles.is_complete() {
            return Err(GraphicError::invalid_shape(format!(
                "{} needs {:?} points, got {}",
                graphic.kind.class_id(),
                graphic.kind.point_count(),
                points.len()
            )));
        }
        if !graphic.kind.is_shape_valid(&graphic.handles) {
            return Err(GraphicError::invalid_shape(format!(
                "degenerate {}",
                graphic.kind.class_id()
            )));
        }
        graphic.rebuild();
        Ok(graphic)
    }

    pub fn rectangle(bounds: Bounds) -> Result<Self, GraphicError> {
        Self::from_box(GraphicKind::Rectangle(Default::default()), bounds)
    }

    pub fn ellipse(bounds: Bounds) -> Result<Self, GraphicError> {
        Self::from_box(GraphicKind::Ellipse(Default::default()), bounds)
    }

    fn from_box(kind: GraphicKind, bounds: Bounds) -> Result<Self, GraphicError> {
        let finite = [bounds.min_x, bounds.min_y, bounds.max_x, bounds.max_y]
            .iter()
            .all(|v| v.is_finite());
        if !finite || bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            return Err(GraphicError::invalid_shape(format!(
                "empty {} bounds",
                kind.class_id()
            )));
        }
        let mut graphic = Self::new(kind);
        crate::model::set_box_handles(&mut graphic.handles, &bounds);
        graphic.rebuild();
        Ok(graphic)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    pub fn kind(&self) -> &GraphicKind {
        &self.kind
    }

    pub fn class_id(&self) -> &'static str {
        self.kind.class_id()
    }

    pub fn handles(&self) -> &HandlePoints {
        &self.handles
    }

    pub fn points(&self) -> &[Point] {
        self.handles.points()
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    pub fn is_filled(&self) -> bool {
        self.filled
    }

    pub fn is_label_visible(&self) -> bool {
        self.label_visible
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn is_resizing(&self) -> bool {
        self.resizing
    }

    pub fn layer(&self) -> u32 {
        self.layer
    }

    pub fn shape(&self) -> Option<&GraphicShape> {
        self.shape.as_ref()
    }

    pub fn label(&self) -> Option<&GraphicLabel> {
        self.label.as_ref()
    }

    pub fn view_scale(&self) -> f64 {
        self.view_scale
    }

    pub fn is_graphic_complete(&self) -> bool {
        self.handles.is_complete()
    }

    pub fn is_shape_valid(&self) -> bool {
        self.kind.is_shape_valid(&self.handles)
    }

    /// Area to repaint: shape bounds grown by the handle and stroke extent,
    /// plus the label
    pub fn repaint_bounds(&self) -> Option<Bounds> {
        let scale = self.view_scale;
        let margin = (self.handle_size * HANDLE_HIT_FACTOR / 2.0).max(self.thickness / 2.0)
            + REPAINT_MARGIN;
        let shape = self
            .shape
            .as_ref()
            .and_then(GraphicShape::bounds)
            .map(|b| b.grown(margin / scale));
        let label = self
            .label
            .as_ref()
            .filter(|_| self.label_visible)
            .and_then(|l| l.bounds(scale));
        match (shape, label) {
            (Some(s), Some(l)) => Some(s.union(&l)),
            (s, l) => s.or(l),
        }
    }

    fn dirty(&self) -> DirtyRegion {
        DirtyRegion::from_bounds(self.repaint_bounds())
    }

    /// Rebuild the shape from the handle points
    pub fn rebuild(&mut self) -> DirtyRegion {
        let before = self.dirty();
        self.shape = self.kind.build_shape(self.handles.points());
        before.union(self.dirty())
    }

    /// Rebuild the shape and the label
    pub fn refresh(&mut self, ctx: &MeasureContext<'_>) -> DirtyRegion {
        let before = self.dirty();
        self.shape = self.kind.build_shape(self.handles.points());
        self.update_label(ctx);
        before.union(self.dirty())
    }

    /// Recompute the label text from the measurements
    pub fn update_label(&mut self, ctx: &MeasureContext<'_>) {
        if !self.label_visible || !self.is_shape_valid() {
            self.label = None;
            return;
        }
        let items = self.compute_measurements(ctx);
        let lines = self.kind.label_lines(&items, ctx.label_decimals());
        let bounds = self.shape.as_ref().and_then(GraphicShape::bounds);
        let Some(anchor) = self.kind.label_anchor(self.handles.points(), bounds) else {
            self.label = None;
            return;
        };
        if lines.is_empty() {
            self.label = None;
            return;
        }
        match &mut self.label {
            Some(label) => label.update(lines, anchor),
            None => self.label = Some(GraphicLabel::new(lines, anchor)),
        }
    }

    /// Measurements of a valid graphic, empty otherwise
    pub fn compute_measurements(&self, ctx: &MeasureContext<'_>) -> Vec<MeasureItem> {
        if !self.is_shape_valid() {
            return Vec::new();
        }
        self.kind
            .compute_measurements(self.handles.points(), self.shape.as_ref(), ctx)
    }

    pub fn set_handle_point(&mut self, index: usize, point: Point) -> DirtyRegion {
        if self.handles.set(index, point) {
            self.rebuild()
        } else {
            DirtyRegion::none()
        }
    }

    /// Remove a handle of a variable-count graphic. Refused for fixed
    /// counts and when the tool's minimum point count would be crossed.
    pub fn remove_handle_point(&mut self, index: usize) -> Option<Point> {
        match self.handles.remove(index, self.kind.min_points()) {
            Some(removed) => {
                self.rebuild();
                Some(removed)
            }
            None => {
                debug!(
                    class_id = self.class_id(),
                    index,
                    len = self.handles.len(),
                    "handle point removal refused"
                );
                None
            }
        }
    }

    /// Reopen point entry after the handle at `index`
    pub fn force_to_add_points(&mut self, index: usize) -> bool {
        let reopened = self.kind.force_to_add_points(&mut self.handles, index);
        if reopened {
            self.rebuild();
        }
        reopened
    }

    /// Nearest handle under `p` for a view `scale`
    pub fn handle_point_index(&self, p: Point, scale: f64) -> Option<usize> {
        let tolerance = HandlePoints::hit_tolerance(self.handle_size, scale);
        self.handles.nearest_index(p, tolerance)
    }

    /// All handles under `p`, nearest first
    pub fn handle_point_indices(&self, p: Point, scale: f64) -> Vec<usize> {
        let tolerance = HandlePoints::hit_tolerance(self.handle_size, scale);
        self.handles.indices_within(p, tolerance)
    }

    /// Apply a drag delta and return the possibly updated target
    pub fn move_and_resize(&mut self, target: DragTarget, dx: f64, dy: f64, cursor: Point) -> DragTarget {
        self.kind
            .move_and_resize(&mut self.handles, target, dx, dy, cursor)
    }

    pub fn translate(&mut self, dx: f64, dy: f64) -> DirtyRegion {
        self.handles.translate(dx, dy);
        self.rebuild()
    }

    /// Close a variable-count entry and clean up its points
    pub(crate) fn finish_points(&mut self) -> Result<(), GraphicError> {
        self.handles.freeze();
        self.kind.prepare_points(&mut self.handles)
    }

    pub(crate) fn handles_mut(&mut self) -> &mut HandlePoints {
        &mut self.handles
    }

    pub(crate) fn set_resizing(&mut self, resizing: bool) {
        self.resizing = resizing;
    }

    pub fn set_view_scale(&mut self, scale: f64) {
        if scale.is_finite() && scale > 0.0 {
            self.view_scale = scale;
        }
    }

    pub fn move_label(&mut self, dx: f64, dy: f64) -> DirtyRegion {
        let before = self.dirty();
        if let Some(label) = &mut self.label {
            label.move_by(dx, dy);
        }
        before.union(self.dirty())
    }

    pub fn set_color(&mut self, color: Color) -> DirtyRegion {
        self.color = color;
        self.dirty()
    }

    pub fn set_thickness(&mut self, thickness: f64) -> DirtyRegion {
        let before = self.dirty();
        if thickness.is_finite() && thickness > 0.0 {
            self.thickness = thickness;
        }
        before.union(self.dirty())
    }

    /// Only closed shapes can be filled
    pub fn set_filled(&mut self, filled: bool) -> DirtyRegion {
        self.filled = filled && self.kind.is_area();
        self.dirty()
    }

    pub fn set_label_visible(&mut self, visible: bool, ctx: &MeasureContext<'_>) -> DirtyRegion {
        let before = self.dirty();
        self.label_visible = visible;
        self.update_label(ctx);
        before.union(self.dirty())
    }

    /// Hide the label without recomputing the measurements
    pub fn hide_label(&mut self) -> DirtyRegion {
        let before = self.dirty();
        self.label_visible = false;
        self.label = None;
        before
    }

    pub fn set_selected(&mut self, selected: bool) -> DirtyRegion {
        self.selected = selected;
        self.dirty()
    }

    pub fn set_layer(&mut self, layer: u32) {
        self.layer = layer;
    }

    /// Hit test on the outline, the filled area or a constant-size marker
    pub fn contains_point(&self, p: Point, scale: f64) -> bool {
        let Some(shape) = &self.shape else {
            return false;
        };
        let tolerance = HandlePoints::hit_tolerance(self.handle_size, scale)
            .max(self.thickness / 2.0 / scale.max(f64::EPSILON));
        (self.filled && shape.contains_area(p))
            || shape.outline_hit(p, tolerance)
            || shape
                .invariants()
                .iter()
                .any(|inv| inv.anchor.distance_to(&p) <= tolerance)
    }
}
