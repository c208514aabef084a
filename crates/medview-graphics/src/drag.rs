//! Pointer gesture handling for a single graphic.
//!
//! A [`DragSequence`] lives for one press/drag/release gesture on an
//! existing graphic, or for the whole point placement of a new one: while
//! the graphic is incomplete each press adds the point being placed and
//! each release decides whether entry continues.
//!
//! Only the first press of a placement goes to `start_drag`. Later presses
//! and releases both go to `complete_drag` and pointer moves go to `drag`,
//! until `complete_drag` reports an outcome other than `Placing`.

use medview_core::GraphicError;
use tracing::{debug, info};

use crate::graphic::Graphic;
use crate::measure::MeasureContext;
use crate::model::{DirtyRegion, DragTarget, GraphicTool, Point};

/// Pointer event in image coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub position: Point,
    pub click_count: u32,
    /// Screen pixels per image pixel
    pub scale: f64,
}

impl PointerEvent {
    pub fn new(position: Point) -> Self {
        Self {
            position,
            click_count: 1,
            scale: 1.0,
        }
    }

    pub fn at(x: f64, y: f64) -> Self {
        Self::new(Point::new(x, y))
    }

    pub fn with_click_count(mut self, click_count: u32) -> Self {
        self.click_count = click_count;
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn is_double_click(&self) -> bool {
        self.click_count == 2
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Started,
    Dragging,
    Completed,
}

/// Result of releasing the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// The graphic still expects points
    Placing,
    /// The graphic is complete and valid
    Completed,
    /// The graphic is complete but degenerate
    Rejected,
}

impl DragOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, DragOutcome::Completed)
    }
}

#[derive(Debug, Clone)]
pub struct DragSequence {
    target: DragTarget,
    last: Option<Point>,
    state: DragState,
}

impl DragSequence {
    /// Gesture acting on `target` of an existing graphic
    pub fn new(target: DragTarget) -> Self {
        Self {
            target,
            last: None,
            state: DragState::Idle,
        }
    }

    /// Point placement of a new graphic
    pub fn drawing() -> Self {
        Self::new(DragTarget::Handle(0))
    }

    pub fn target(&self) -> DragTarget {
        self.target
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn start_drag(&mut self, graphic: &mut Graphic, event: &PointerEvent) -> DirtyRegion {
        let cursor = event.position;
        self.last = Some(cursor);
        self.state = DragState::Started;
        graphic.set_resizing(true);
        graphic.set_view_scale(event.scale);

        if graphic.is_graphic_complete() {
            debug!(class_id = graphic.class_id(), target = ?self.target, "drag started");
            return DirtyRegion::none();
        }
        let handles = graphic.handles_mut();
        if handles.is_empty() {
            handles.push(cursor);
        }
        if !handles.is_complete() {
            handles.push(cursor);
        }
        self.target = DragTarget::Handle(handles.len() - 1);
        debug!(class_id = graphic.class_id(), target = ?self.target, "point placement started");
        graphic.rebuild()
    }

    /// Move the target by the delta since the last event. Only quick
    /// measurements are refreshed.
    pub fn drag(
        &mut self,
        graphic: &mut Graphic,
        event: &PointerEvent,
        ctx: &MeasureContext<'_>,
    ) -> DirtyRegion {
        let cursor = event.position;
        let last = self.last.unwrap_or(cursor);
        let (dx, dy) = (cursor.x - last.x, cursor.y - last.y);
        if dx == 0.0 && dy == 0.0 {
            return DirtyRegion::none();
        }
        self.last = Some(cursor);
        self.state = DragState::Dragging;
        graphic.set_view_scale(event.scale);
        self.target = graphic.move_and_resize(self.target, dx, dy, cursor);
        graphic.refresh(&ctx.released(false))
    }

    pub fn complete_drag(
        &mut self,
        graphic: &mut Graphic,
        event: &PointerEvent,
        ctx: &MeasureContext<'_>,
    ) -> (DragOutcome, DirtyRegion) {
        let cursor = event.position;
        self.last = Some(cursor);

        if !graphic.is_graphic_complete() {
            let handles = graphic.handles_mut();
            if event.is_double_click() && handles.is_variable() {
                if !handles.is_last_point_valid() {
                    handles.remove_last();
                }
                handles.freeze();
                // falls through to the completion check below
            } else {
                if handles.is_last_point_valid() {
                    handles.push(cursor);
                    self.target = DragTarget::Handle(handles.len() - 1);
                }
                return (DragOutcome::Placing, graphic.rebuild());
            }
        }

        if let Err(err) = graphic.finish_points() {
            return self.reject(graphic, &err);
        }
        if !graphic.is_shape_valid() {
            let err = GraphicError::invalid_shape("coincident handle points");
            return self.reject(graphic, &err);
        }
        graphic.set_resizing(false);
        self.state = DragState::Completed;
        info!(class_id = graphic.class_id(), points = graphic.points().len(), "graphic completed");
        (DragOutcome::Completed, graphic.refresh(&ctx.released(true)))
    }

    fn reject(&mut self, graphic: &mut Graphic, err: &GraphicError) -> (DragOutcome, DirtyRegion) {
        debug!(class_id = graphic.class_id(), %err, "graphic not completed");
        (DragOutcome::Rejected, graphic.rebuild())
    }
}

/// Gesture moving the label of a graphic
#[derive(Debug, Clone, Default)]
pub struct LabelDragSequence {
    last: Option<Point>,
    state: DragState,
}

impl LabelDragSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn start_drag(&mut self, event: &PointerEvent) {
        self.last = Some(event.position);
        self.state = DragState::Started;
    }

    pub fn drag(&mut self, graphic: &mut Graphic, event: &PointerEvent) -> DirtyRegion {
        let cursor = event.position;
        let last = self.last.unwrap_or(cursor);
        self.last = Some(cursor);
        self.state = DragState::Dragging;
        graphic.move_label(cursor.x - last.x, cursor.y - last.y)
    }

    pub fn complete_drag(&mut self, graphic: &mut Graphic, event: &PointerEvent) -> DirtyRegion {
        let dirty = self.drag(graphic, event);
        self.state = DragState::Completed;
        dirty
    }
}
