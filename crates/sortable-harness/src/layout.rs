#![forbid(unsafe_code)]

//! Stand-in renderer: lays items out as a fixed-pitch stack.

use sortable_core::{LayoutSnapshot, ListAxis, Order, Point, Rect};

/// A vertical or horizontal stack of equally sized slots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackLayout {
    axis: ListAxis,
    /// Slot size along the axis.
    extent: f32,
    /// Slot size across the axis.
    breadth: f32,
    gap: f32,
    origin: Point,
}

impl Default for StackLayout {
    fn default() -> Self {
        Self::vertical(40.0, 200.0)
    }
}

impl StackLayout {
    /// Rows `row_height` tall and `width` wide.
    #[must_use]
    pub fn vertical(row_height: f32, width: f32) -> Self {
        Self {
            axis: ListAxis::Vertical,
            extent: row_height,
            breadth: width,
            gap: 0.0,
            origin: Point::ORIGIN,
        }
    }

    /// Columns `column_width` wide and `height` tall.
    #[must_use]
    pub fn horizontal(column_width: f32, height: f32) -> Self {
        Self {
            axis: ListAxis::Horizontal,
            extent: column_width,
            breadth: height,
            gap: 0.0,
            origin: Point::ORIGIN,
        }
    }

    #[must_use]
    pub fn with_gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }

    #[must_use]
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    #[must_use]
    pub fn axis(&self) -> ListAxis {
        self.axis
    }

    /// Rectangle of the slot at `index`.
    #[must_use]
    pub fn slot(&self, index: usize) -> Rect {
        let offset = index as f32 * (self.extent + self.gap);
        match self.axis {
            ListAxis::Vertical => Rect::new(
                self.origin.x,
                self.origin.y + offset,
                self.breadth,
                self.extent,
            ),
            ListAxis::Horizontal => Rect::new(
                self.origin.x + offset,
                self.origin.y,
                self.extent,
                self.breadth,
            ),
        }
    }

    /// Lay out `order` from scratch.
    #[must_use]
    pub fn layout(&self, order: &Order) -> LayoutSnapshot {
        let mut snapshot = LayoutSnapshot::new();
        self.refresh(order, &mut snapshot);
        snapshot
    }

    /// Re-measure `order` into an existing snapshot.
    pub fn refresh(&self, order: &Order, snapshot: &mut LayoutSnapshot) {
        snapshot.clear();
        for (index, id) in order.iter().enumerate() {
            snapshot.insert(id.clone(), self.slot(index));
        }
        tracing::trace!(items = order.len(), axis = self.axis.as_str(), "layout refreshed");
    }
}
