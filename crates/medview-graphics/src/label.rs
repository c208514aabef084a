//! Text label attached to a graphic.
//!
//! The label is drawn at a constant screen size next to its anchor. Its
//! extent in image coordinates therefore depends on the view scale.

use serde::{Deserialize, Serialize};

use crate::model::{Bounds, Point};

/// Distance between a shape and its label, in image pixels
pub const LABEL_GAP: f64 = 3.0;

/// Approximate glyph advance in screen pixels
const CHAR_WIDTH: f64 = 7.0;

/// Line height in screen pixels
const LINE_HEIGHT: f64 = 15.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphicLabel {
    lines: Vec<String>,
    anchor: Point,
    /// Displacement applied by label drags, in image coordinates
    offset: Point,
}

impl GraphicLabel {
    pub fn new(lines: Vec<String>, anchor: Point) -> Self {
        Self {
            lines,
            anchor,
            offset: Point::default(),
        }
    }

    /// Replace the text and anchor, keeping the user offset
    pub fn update(&mut self, lines: Vec<String>, anchor: Point) {
        self.lines = lines;
        self.anchor = anchor;
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn anchor(&self) -> Point {
        self.anchor
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Top-left corner of the text block
    pub fn position(&self) -> Point {
        self.anchor.translated(self.offset.x, self.offset.y)
    }

    pub fn move_by(&mut self, dx: f64, dy: f64) {
        self.offset.x += dx;
        self.offset.y += dy;
    }

    /// Extent of the text block in image coordinates at `scale`
    pub fn bounds(&self, scale: f64) -> Option<Bounds> {
        if self.lines.is_empty() || scale <= 0.0 {
            return None;
        }
        let chars = self.lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let width = chars as f64 * CHAR_WIDTH / scale;
        let height = self.lines.len() as f64 * LINE_HEIGHT / scale;
        let p = self.position();
        Some(Bounds::new(p.x, p.y - height / 2.0, p.x + width, p.y + height / 2.0))
    }

    pub fn contains(&self, p: Point, scale: f64) -> bool {
        self.bounds(scale).is_some_and(|b| b.contains(p))
    }
}
