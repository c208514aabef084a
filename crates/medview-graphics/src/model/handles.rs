//! Ordered handle points of a graphic.
//!
//! Fixed-count graphics know their total from the start. Variable-count
//! graphics (polygon, polyline) leave the total undefined while points are
//! entered and freeze it once the user terminates the entry.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::{Point, PointCount};

/// Default handle square size in screen pixels
pub const HANDLE_SIZE: f64 = 6.0;

/// Handle hit-test tolerance relative to the handle size
pub const HANDLE_HIT_FACTOR: f64 = 1.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandlePoints {
    points: SmallVec<[Point; 8]>,
    variable: bool,
    /// Declared total, `None` while a variable entry is open
    total: Option<usize>,
}

impl HandlePoints {
    pub fn new(count: PointCount) -> Self {
        match count {
            PointCount::Fixed(n) => Self {
                points: SmallVec::new(),
                variable: false,
                total: Some(n),
            },
            PointCount::Variable => Self {
                points: SmallVec::new(),
                variable: true,
                total: None,
            },
        }
    }

    /// Handles built from existing points. Variable counts stay open until
    /// [`HandlePoints::freeze`] is called.
    pub fn with_points(count: PointCount, points: &[Point]) -> Self {
        let mut handles = Self::new(count);
        handles.points.extend_from_slice(points);
        handles
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Point> {
        self.points.get(index).copied()
    }

    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }

    pub fn is_variable(&self) -> bool {
        self.variable
    }

    pub fn total(&self) -> Option<usize> {
        self.total
    }

    /// All declared points are present
    pub fn is_complete(&self) -> bool {
        self.total == Some(self.points.len())
    }

    /// Replace the point at `index`, or append it when `index` is the next
    /// free slot of an incomplete graphic. Returns false when nothing changed.
    pub fn set(&mut self, index: usize, point: Point) -> bool {
        if index < self.points.len() {
            self.points[index] = point;
            true
        } else if index == self.points.len() && self.accepts_more() {
            self.points.push(point);
            true
        } else {
            false
        }
    }

    /// Append a point while the graphic is incomplete
    pub fn push(&mut self, point: Point) -> bool {
        if self.accepts_more() {
            self.points.push(point);
            true
        } else {
            false
        }
    }

    fn accepts_more(&self) -> bool {
        match self.total {
            Some(total) => self.points.len() < total,
            None => true,
        }
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        for p in self.points.iter_mut() {
            p.x += dx;
            p.y += dy;
        }
    }

    /// Two handle points share the same location
    pub fn has_coincident_points(&self) -> bool {
        let pts = &self.points;
        (1..pts.len()).any(|i| pts[..i].contains(&pts[i]))
    }

    /// Two successive handle points share the same location
    pub fn has_consecutive_duplicates(&self) -> bool {
        self.points.windows(2).any(|w| w[0] == w[1])
    }

    /// The last point differs from the one before it
    pub fn is_last_point_valid(&self) -> bool {
        match self.points.len() {
            0 => false,
            1 => true,
            n => self.points[n - 1] != self.points[n - 2],
        }
    }

    /// Close a variable-count entry on the current number of points
    pub fn freeze(&mut self) {
        if self.variable {
            self.total = Some(self.points.len());
        }
    }

    pub fn remove_last(&mut self) -> Option<Point> {
        self.points.pop()
    }

    pub(crate) fn remove_at(&mut self, index: usize) -> Option<Point> {
        (index < self.points.len()).then(|| self.points.remove(index))
    }

    /// Remove a handle of a variable-count graphic, keeping at least
    /// `min_points` (never less than two)
    pub fn remove(&mut self, index: usize, min_points: usize) -> Option<Point> {
        if !self.variable
            || self.points.len() <= min_points.max(2)
            || index >= self.points.len()
        {
            return None;
        }
        let removed = self.points.remove(index);
        self.total = Some(self.points.len());
        Some(removed)
    }

    /// Reopen point entry so that new points follow the handle at `index`
    pub fn force_to_add_points(&mut self, index: usize) -> bool {
        if !self.variable || index >= self.points.len() {
            return false;
        }
        self.points.rotate_left(index + 1);
        self.total = None;
        true
    }

    /// Duplicate the handle at `index` in place, or reopen entry when it is
    /// the last handle
    pub fn insert_after(&mut self, index: usize) -> bool {
        if !self.variable || index >= self.points.len() {
            return false;
        }
        if index + 1 < self.points.len() {
            let p = self.points[index];
            self.points.insert(index, p);
            self.total = Some(self.points.len());
        } else {
            self.total = None;
        }
        true
    }

    /// Hit tolerance in image pixels for a view `scale`
    pub fn hit_tolerance(handle_size: f64, scale: f64) -> f64 {
        handle_size * HANDLE_HIT_FACTOR / scale.max(f64::EPSILON)
    }

    /// Closest handle within `tolerance` of `p`
    pub fn nearest_index(&self, p: Point, tolerance: f64) -> Option<usize> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, h)| (i, h.distance_to(&p)))
            .filter(|(_, d)| *d <= tolerance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    /// All handles within `tolerance` of `p`, nearest first
    pub fn indices_within(&self, p: Point, tolerance: f64) -> Vec<usize> {
        let mut found: Vec<(usize, f64)> = self
            .points
            .iter()
            .enumerate()
            .map(|(i, h)| (i, h.distance_to(&p)))
            .filter(|(_, d)| *d <= tolerance)
            .collect();
        found.sort_by(|a, b| a.1.total_cmp(&b.1));
        found.into_iter().map(|(i, _)| i).collect()
    }
}
