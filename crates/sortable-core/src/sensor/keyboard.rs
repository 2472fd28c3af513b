#![forbid(unsafe_code)]

//! Keyboard sensor: discrete reordering without geometry.
//!
//! Activate (Space/Enter) picks up the focused item when idle and drops it
//! while dragging. Escape and focus loss cancel. Arrow keys along the list
//! axis step the dragged item one slot by targeting its neighbour in the
//! live preview; arrows across the axis are ignored.
//!
//! Stepping back onto the item the drag is already over would be absorbed
//! by repeated-target suppression, so in that case the sensor first emits a
//! self-targeting `Move` to re-arm it.

use serde::{Deserialize, Serialize};

use crate::event::DragEvent;
use crate::item::ItemId;
use crate::sensor::SensorContext;

// ---------------------------------------------------------------------------
// Direction and axis
// ---------------------------------------------------------------------------

/// Arrow key direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Layout axis of the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListAxis {
    #[default]
    Vertical,
    Horizontal,
}

impl ListAxis {
    /// Returns the stable string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vertical => "vertical",
            Self::Horizontal => "horizontal",
        }
    }

    /// Signed slot step for a direction, or `None` if it is off-axis.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Option<isize> {
        match (self, direction) {
            (Self::Vertical, Direction::Up) | (Self::Horizontal, Direction::Left) => Some(-1),
            (Self::Vertical, Direction::Down) | (Self::Horizontal, Direction::Right) => Some(1),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Normalized keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyInput {
    /// Space or Enter.
    Activate,
    /// Escape.
    Cancel,
    /// An arrow key.
    Step(Direction),
    /// The list lost keyboard focus.
    FocusLost,
}

impl KeyInput {
    /// Map a conventional key name to an input.
    ///
    /// Accepts `space`, `enter`, `escape`/`esc`, `up`/`down`/`left`/`right`
    /// (with or without an `arrow_` prefix) and `blur`. Case-insensitive.
    #[must_use]
    pub fn from_key_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        let key = lower.strip_prefix("arrow_").unwrap_or(&lower);
        Some(match key {
            "space" | " " | "enter" | "return" => Self::Activate,
            "escape" | "esc" => Self::Cancel,
            "up" => Self::Step(Direction::Up),
            "down" => Self::Step(Direction::Down),
            "left" => Self::Step(Direction::Left),
            "right" => Self::Step(Direction::Right),
            "blur" | "focus_lost" => Self::FocusLost,
            _ => return None,
        })
    }
}

// ---------------------------------------------------------------------------
// KeyboardSensor
// ---------------------------------------------------------------------------

/// Translator from [`KeyInput`] to [`DragEvent`]s.
///
/// Holds only configuration; all drag state lives in the session.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyboardSensor {
    axis: ListAxis,
    wrap: bool,
}

impl KeyboardSensor {
    /// Create a keyboard sensor.
    #[must_use]
    pub const fn new(axis: ListAxis, wrap: bool) -> Self {
        Self { axis, wrap }
    }

    /// Configured axis.
    #[must_use]
    pub const fn axis(&self) -> ListAxis {
        self.axis
    }

    /// Translate one key press.
    ///
    /// `focused` is the item holding keyboard focus; it is only consulted to
    /// pick up an item.
    #[must_use]
    pub fn handle(
        &self,
        key: KeyInput,
        focused: Option<&ItemId>,
        ctx: &SensorContext<'_>,
    ) -> Vec<DragEvent> {
        match (key, ctx.active) {
            (KeyInput::Activate, None) => focused
                .map(|id| vec![DragEvent::Start(id.clone())])
                .unwrap_or_default(),
            (KeyInput::Activate, Some(_)) => vec![DragEvent::End],
            (KeyInput::Cancel | KeyInput::FocusLost, Some(_)) => vec![DragEvent::Cancel],
            (KeyInput::Step(direction), Some(active)) => self.step(direction, active, ctx),
            (KeyInput::Cancel | KeyInput::FocusLost | KeyInput::Step(_), None) => Vec::new(),
        }
    }

    fn step(&self, direction: Direction, active: &ItemId, ctx: &SensorContext<'_>) -> Vec<DragEvent> {
        let Some(delta) = self.axis.step(direction) else {
            return Vec::new();
        };
        let len = ctx.order.len();
        let Some(index) = ctx.order.index_of(active) else {
            return Vec::new();
        };
        let target = match index.checked_add_signed(delta) {
            Some(t) if t < len => t,
            _ if self.wrap && len > 1 => {
                if delta < 0 {
                    len - 1
                } else {
                    0
                }
            }
            _ => return Vec::new(),
        };
        let Some(neighbour) = ctx.order.get(target) else {
            return Vec::new();
        };
        tracing::trace!(active = %active, over = %neighbour, from = index, to = target, "keyboard step");
        if ctx.over == Some(neighbour) {
            vec![
                DragEvent::Move(active.clone()),
                DragEvent::Move(neighbour.clone()),
            ]
        } else {
            vec![DragEvent::Move(neighbour.clone())]
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
