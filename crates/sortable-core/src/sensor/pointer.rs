#![forbid(unsafe_code)]

//! Pointer sensor: activation constraints and geometry-driven targeting.
//!
//! A pointer-down only arms the sensor. `Start` is emitted once the
//! activation constraint is satisfied, which keeps plain clicks from
//! turning into drags. Movement before activation is dropped, not queued.
//!
//! Once active, every pointer-move translates the item's rectangle as
//! captured at activation by the pointer delta, reads fresh rectangles for
//! every item in display order, and emits `Move` for the closest one. The
//! active item's own slot is one of the candidates: hovering over home
//! yields a self-targeting `Move`, which changes nothing but lets the next
//! real target register even if it was targeted before.
//!
//! # Invariants
//!
//! 1. `Start` is emitted at most once per pointer-down.
//! 2. A pointer-up before activation emits nothing (it was a click).
//! 3. An interrupt after activation always emits `Cancel`; a drag is
//!    never left dangling.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use web_time::Instant;

use crate::collision::closest_center;
use crate::event::DragEvent;
use crate::geometry::{GeometrySource, Point, Rect};
use crate::item::ItemId;
use crate::sensor::SensorContext;

/// Default activation distance in pixels.
pub const DEFAULT_ACTIVATION_DISTANCE: f32 = 8.0;

// ---------------------------------------------------------------------------
// Configuration and input
// ---------------------------------------------------------------------------

/// When a pressed pointer becomes a drag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActivationConstraint {
    /// Start once the pointer has travelled strictly farther than `distance`.
    Distance { distance: f32 },
    /// Start once the pointer has been held for `delay_ms`, unless it
    /// travelled farther than `tolerance` first.
    Delay { delay_ms: u64, tolerance: f32 },
}

impl Default for ActivationConstraint {
    fn default() -> Self {
        Self::Distance {
            distance: DEFAULT_ACTIVATION_DISTANCE,
        }
    }
}

/// Normalized pointer input delivered by the host's input source.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerInput {
    /// Button pressed on the given item.
    Down { id: ItemId, pos: Point },
    /// Pointer moved (with the button held).
    Move { pos: Point },
    /// Button released.
    Up { pos: Point },
    /// Focus lost, pointer capture lost, or the device went away.
    Interrupt,
}

// ---------------------------------------------------------------------------
// Internal state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Tracker {
    Idle,
    Pending {
        id: ItemId,
        origin: Point,
        last: Point,
        since: Instant,
    },
    Active {
        origin: Point,
        initial_rect: Rect,
        translation: Point,
    },
}

// ---------------------------------------------------------------------------
// PointerSensor
// ---------------------------------------------------------------------------

/// Stateful translator from [`PointerInput`] to [`DragEvent`]s.
#[derive(Debug, Clone)]
pub struct PointerSensor {
    activation: ActivationConstraint,
    tracker: Tracker,
}

impl Default for PointerSensor {
    fn default() -> Self {
        Self::new(ActivationConstraint::default())
    }
}

impl PointerSensor {
    /// Create a pointer sensor.
    #[must_use]
    pub fn new(activation: ActivationConstraint) -> Self {
        Self {
            activation,
            tracker: Tracker::Idle,
        }
    }

    /// Whether a pointer is down but not yet dragging.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self.tracker, Tracker::Pending { .. })
    }

    /// Whether this sensor is driving a drag.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self.tracker, Tracker::Active { .. })
    }

    /// Offset of the dragged item from where it was picked up.
    #[must_use]
    pub fn translation(&self) -> Option<Point> {
        match self.tracker {
            Tracker::Active { translation, .. } => Some(translation),
            Tracker::Idle | Tracker::Pending { .. } => None,
        }
    }

    /// Where the dragged item is drawn now: its picked-up rectangle moved by
    /// the translation.
    #[must_use]
    pub fn dragged_rect(&self) -> Option<Rect> {
        match self.tracker {
            Tracker::Active {
                initial_rect,
                translation,
                ..
            } => Some(initial_rect.translate(translation)),
            Tracker::Idle | Tracker::Pending { .. } => None,
        }
    }

    /// Forget all pointer state without emitting anything.
    pub fn reset(&mut self) {
        self.tracker = Tracker::Idle;
    }

    /// Process one pointer input.
    pub fn process(
        &mut self,
        input: &PointerInput,
        now: Instant,
        ctx: &SensorContext<'_>,
        geometry: &dyn GeometrySource,
    ) -> Vec<DragEvent> {
        let mut out = Vec::with_capacity(1);
        match input {
            PointerInput::Down { id, pos } => {
                if !self.is_active() {
                    self.tracker = Tracker::Pending {
                        id: id.clone(),
                        origin: *pos,
                        last: *pos,
                        since: now,
                    };
                }
            }
            PointerInput::Move { pos } => self.on_move(*pos, now, ctx, geometry, &mut out),
            PointerInput::Up { .. } => {
                if self.is_active() {
                    out.push(DragEvent::End);
                }
                self.tracker = Tracker::Idle;
            }
            PointerInput::Interrupt => {
                if self.is_active() {
                    out.push(DragEvent::Cancel);
                }
                self.tracker = Tracker::Idle;
            }
        }
        out
    }

    /// Check a pending delay activation. Call periodically (e.g. on tick).
    pub fn tick(&mut self, now: Instant, geometry: &dyn GeometrySource) -> Option<DragEvent> {
        let Tracker::Pending { since, .. } = self.tracker else {
            return None;
        };
        match self.activation {
            ActivationConstraint::Delay { delay_ms, .. }
                if now.duration_since(since) >= Duration::from_millis(delay_ms) =>
            {
                self.activate(geometry)
            }
            _ => None,
        }
    }

    fn on_move(
        &mut self,
        pos: Point,
        now: Instant,
        ctx: &SensorContext<'_>,
        geometry: &dyn GeometrySource,
        out: &mut Vec<DragEvent>,
    ) {
        match &mut self.tracker {
            Tracker::Idle => {}
            Tracker::Pending {
                origin,
                last,
                since,
                ..
            } => {
                *last = pos;
                let travelled = origin.distance(pos);
                let ready = match self.activation {
                    ActivationConstraint::Distance { distance } => travelled > distance,
                    ActivationConstraint::Delay {
                        delay_ms,
                        tolerance,
                    } => {
                        if travelled > tolerance
                            && now.duration_since(*since) < Duration::from_millis(delay_ms)
                        {
                            tracing::trace!(travelled, "delay activation aborted by movement");
                            self.tracker = Tracker::Idle;
                            return;
                        }
                        now.duration_since(*since) >= Duration::from_millis(delay_ms)
                    }
                };
                if ready {
                    out.extend(self.activate(geometry));
                }
            }
            Tracker::Active {
                origin,
                initial_rect,
                translation,
            } => {
                *translation = pos.delta_from(*origin);
                let dragged = initial_rect.translate(*translation);
                if let Some(target) = resolve_target(&dragged, ctx, geometry) {
                    out.push(DragEvent::Move(target));
                }
            }
        }
    }

    fn activate(&mut self, geometry: &dyn GeometrySource) -> Option<DragEvent> {
        let Tracker::Pending {
            id, origin, last, ..
        } = std::mem::replace(&mut self.tracker, Tracker::Idle)
        else {
            return None;
        };
        let initial_rect = geometry.rect(&id).unwrap_or_else(|| Rect::at_point(origin));
        tracing::debug!(item = %id, x = last.x, y = last.y, "pointer drag activated");
        self.tracker = Tracker::Active {
            origin,
            initial_rect,
            translation: last.delta_from(origin),
        };
        Some(DragEvent::Start(id))
    }
}

/// Resolve the "over" candidate for a dragged rectangle.
///
/// Reads a fresh rectangle for every item in display order. A list with
/// fewer than two items has no candidates and yields nothing.
fn resolve_target(
    dragged: &Rect,
    ctx: &SensorContext<'_>,
    geometry: &dyn GeometrySource,
) -> Option<ItemId> {
    if ctx.order.len() < 2 {
        return None;
    }
    let candidates: Vec<(ItemId, Rect)> = ctx
        .order
        .iter()
        .filter_map(|id| geometry.rect(id).map(|rect| (id.clone(), rect)))
        .collect();
    closest_center(dragged, &candidates).cloned()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
