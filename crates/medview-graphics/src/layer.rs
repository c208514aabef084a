//! Ordered collection of graphics drawn over one image.
//!
//! Graphics are kept in paint order; hit-testing walks them topmost first.
//! For a selected graphic a handle under the cursor wins over its label,
//! which wins over its outline.

use tracing::{debug, info};
use uuid::Uuid;

use crate::graphic::Graphic;
use crate::measure::MeasureContext;
use crate::model::{DirtyRegion, DragTarget, Point};

/// What the cursor is over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerHit {
    Handle { id: Uuid, index: usize },
    Label { id: Uuid },
    Body { id: Uuid },
}

impl LayerHit {
    pub fn id(&self) -> Uuid {
        match *self {
            LayerHit::Handle { id, .. } | LayerHit::Label { id } | LayerHit::Body { id } => id,
        }
    }

    /// Drag target of a gesture starting on this hit, `None` for labels
    pub fn drag_target(&self) -> Option<DragTarget> {
        match *self {
            LayerHit::Handle { index, .. } => Some(DragTarget::Handle(index)),
            LayerHit::Body { .. } => Some(DragTarget::Whole),
            LayerHit::Label { .. } => None,
        }
    }
}

/// Host action requested by a double click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoubleClickAction {
    /// Edit the handle under the cursor
    EditHandle { id: Uuid, index: usize },
    /// Open the properties of the graphic
    OpenProperties { id: Uuid },
    None,
}

#[derive(Debug, Clone, Default)]
pub struct GraphicLayer {
    graphics: Vec<Graphic>,
    locked: bool,
}

impl GraphicLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.graphics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphics.is_empty()
    }

    pub fn graphics(&self) -> &[Graphic] {
        &self.graphics
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// A locked layer ignores hit-testing
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    pub fn get(&self, id: Uuid) -> Option<&Graphic> {
        self.graphics.iter().find(|g| g.id() == id)
    }

    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut Graphic> {
        self.graphics.iter_mut().find(|g| g.id() == id)
    }

    pub fn add(&mut self, graphic: Graphic) -> DirtyRegion {
        let dirty = DirtyRegion::from_bounds(graphic.repaint_bounds());
        info!(id = %graphic.id(), class_id = graphic.class_id(), "graphic added");
        self.graphics.push(graphic);
        dirty
    }

    pub fn remove(&mut self, id: Uuid) -> Option<Graphic> {
        let index = self.graphics.iter().position(|g| g.id() == id)?;
        let graphic = self.graphics.remove(index);
        info!(id = %id, class_id = graphic.class_id(), "graphic removed");
        Some(graphic)
    }

    /// Drop graphics that never reached a valid complete state
    pub fn remove_invalid(&mut self) -> DirtyRegion {
        let mut dirty = DirtyRegion::none();
        self.graphics.retain(|g| {
            let keep = g.is_graphic_complete() && g.is_shape_valid();
            if !keep {
                debug!(id = %g.id(), class_id = g.class_id(), "invalid graphic dropped");
                dirty = dirty.union(DirtyRegion::from_bounds(g.repaint_bounds()));
            }
            keep
        });
        dirty
    }

    pub fn selected(&self) -> impl Iterator<Item = &Graphic> {
        self.graphics.iter().filter(|g| g.is_selected())
    }

    pub fn select_only(&mut self, id: Uuid) -> DirtyRegion {
        let mut dirty = DirtyRegion::none();
        for g in self.graphics.iter_mut() {
            let selected = g.id() == id;
            if g.is_selected() != selected {
                dirty = dirty.union(g.set_selected(selected));
            }
        }
        dirty
    }

    pub fn clear_selection(&mut self) -> DirtyRegion {
        let mut dirty = DirtyRegion::none();
        for g in self.graphics.iter_mut().filter(|g| g.is_selected()) {
            dirty = dirty.union(g.set_selected(false));
        }
        dirty
    }

    /// Topmost element under `p`. Handles are only reachable on selected
    /// graphics.
    pub fn hit(&self, p: Point, scale: f64) -> Option<LayerHit> {
        if self.locked {
            return None;
        }
        for g in self.graphics.iter().rev().filter(|g| g.is_selected()) {
            if let Some(index) = g.handle_point_index(p, scale) {
                return Some(LayerHit::Handle { id: g.id(), index });
            }
        }
        for g in self.graphics.iter().rev() {
            let on_label = g.is_label_visible() && g.label().is_some_and(|l| l.contains(p, scale));
            if on_label {
                return Some(LayerHit::Label { id: g.id() });
            }
            if g.contains_point(p, scale) {
                return Some(LayerHit::Body { id: g.id() });
            }
        }
        None
    }

    /// Route a double click. Only a single selected, complete graphic
    /// reacts; a handle under the cursor takes precedence.
    pub fn double_click(&self, p: Point, scale: f64) -> DoubleClickAction {
        let mut selected = self.selected();
        let (Some(g), None) = (selected.next(), selected.next()) else {
            return DoubleClickAction::None;
        };
        if self.locked || !g.is_graphic_complete() {
            return DoubleClickAction::None;
        }
        if let Some(index) = g.handle_point_index(p, scale) {
            DoubleClickAction::EditHandle { id: g.id(), index }
        } else if g.contains_point(p, scale) {
            DoubleClickAction::OpenProperties { id: g.id() }
        } else {
            DoubleClickAction::None
        }
    }

    /// Recompute the shapes and labels of every graphic
    pub fn refresh_all(&mut self, ctx: &MeasureContext<'_>) -> DirtyRegion {
        self.graphics
            .iter_mut()
            .fold(DirtyRegion::none(), |dirty, g| dirty.union(g.refresh(ctx)))
    }
}
