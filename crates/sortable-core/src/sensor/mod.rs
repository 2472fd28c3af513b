#![forbid(unsafe_code)]

//! Sensors: normalize pointer and keyboard input into [`DragEvent`]s.
//!
//! Both sensors speak the same `Start`/`Move`/`End`/`Cancel` vocabulary, so
//! the drag session never needs to know which one is driving it.
//!
//! [`DragEvent`]: crate::event::DragEvent

pub mod keyboard;
pub mod pointer;

pub use keyboard::{Direction, KeyInput, KeyboardSensor, ListAxis};
pub use pointer::{ActivationConstraint, PointerInput, PointerSensor};

use crate::item::{ItemId, Order};

/// Which sensor owns the active drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    Pointer,
    Keyboard,
}

impl SensorKind {
    /// Returns the stable string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pointer => "pointer",
            Self::Keyboard => "keyboard",
        }
    }
}

/// Read-only view of the list a sensor resolves targets against.
#[derive(Debug, Clone, Copy)]
pub struct SensorContext<'a> {
    /// Current display order (the live preview while dragging).
    pub order: &'a Order,
    /// Item being dragged, if any.
    pub active: Option<&'a ItemId>,
    /// Item the dragged item is over, if any.
    pub over: Option<&'a ItemId>,
}

impl<'a> SensorContext<'a> {
    /// Context for a list with no drag in progress.
    #[must_use]
    pub fn idle(order: &'a Order) -> Self {
        Self {
            order,
            active: None,
            over: None,
        }
    }
}
