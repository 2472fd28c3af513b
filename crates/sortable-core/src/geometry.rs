#![forbid(unsafe_code)]

//! Geometric primitives and the read-only geometry model.
//!
//! The renderer owns layout. The engine only asks "where is item X right
//! now?" through [`GeometrySource`] and never writes back. Rectangles use
//! pixel coordinates with the origin at the top-left.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::item::ItemId;

/// A point (or a translation delta) in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Create a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[inline]
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Component-wise difference `self - origin`.
    #[inline]
    #[must_use]
    pub fn delta_from(self, origin: Self) -> Self {
        Self::new(self.x - origin.x, self.y - origin.y)
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box of one rendered item.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Top edge.
    pub top: f32,
    /// Left edge.
    pub left: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    #[must_use]
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Zero-sized rectangle at `point`.
    #[inline]
    #[must_use]
    pub const fn at_point(point: Point) -> Self {
        Self::new(point.x, point.y, 0.0, 0.0)
    }

    /// Right edge.
    #[inline]
    #[must_use]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    /// Bottom edge.
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Center point.
    #[inline]
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Shift the rectangle by `delta`.
    #[inline]
    #[must_use]
    pub fn translate(&self, delta: Point) -> Self {
        Self::new(self.left + delta.x, self.top + delta.y, self.width, self.height)
    }

    /// Whether the two rectangles share any area.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left < other.right()
            && other.left < self.right()
            && self.top < other.bottom()
            && other.top < self.bottom()
    }
}

// ---------------------------------------------------------------------------
// GeometrySource
// ---------------------------------------------------------------------------

/// Read-only access to the renderer's current layout.
///
/// Implementations must reflect the most recent layout pass; the pointer
/// sensor reads it afresh on every move.
pub trait GeometrySource {
    /// Current rectangle of `id`, or `None` if it is not laid out.
    fn rect(&self, id: &ItemId) -> Option<Rect>;
}

impl<F> GeometrySource for F
where
    F: Fn(&ItemId) -> Option<Rect>,
{
    fn rect(&self, id: &ItemId) -> Option<Rect> {
        self(id)
    }
}

/// A captured layout: one rectangle per item id.
#[derive(Debug, Clone, Default)]
pub struct LayoutSnapshot {
    rects: AHashMap<ItemId, Rect>,
}

impl LayoutSnapshot {
    /// Create an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or replace) the rectangle for `id`.
    pub fn insert(&mut self, id: ItemId, rect: Rect) {
        self.rects.insert(id, rect);
    }

    /// Forget every rectangle.
    pub fn clear(&mut self) {
        self.rects.clear();
    }

    /// Number of recorded rectangles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

impl GeometrySource for LayoutSnapshot {
    fn rect(&self, id: &ItemId) -> Option<Rect> {
        self.rects.get(id).copied()
    }
}

impl FromIterator<(ItemId, Rect)> for LayoutSnapshot {
    fn from_iter<I: IntoIterator<Item = (ItemId, Rect)>>(iter: I) -> Self {
        Self {
            rects: iter.into_iter().collect(),
        }
    }
}
