#![forbid(unsafe_code)]

//! The drag vocabulary shared by every input modality.
//!
//! Sensors translate raw pointer and keyboard input into [`DragEvent`]s.
//! The drag session only ever branches on the event kind, never on where
//! the event came from.
//!
//! # Invariants
//!
//! A well-formed drag is `Start`, zero or more `Move`s, then exactly one of
//! `End` or `Cancel`.

use serde::{Deserialize, Serialize};

use crate::item::ItemId;

/// A normalized drag event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum DragEvent {
    /// Begin dragging the given item.
    Start(ItemId),
    /// The dragged item is now over the given candidate.
    Move(ItemId),
    /// Release: commit the live preview.
    End,
    /// Abort: revert to the baseline order.
    Cancel,
}

impl DragEvent {
    /// Stable name used in logs and traces.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Start(_) => "start",
            Self::Move(_) => "move",
            Self::End => "end",
            Self::Cancel => "cancel",
        }
    }

    /// Item named by the event, if any.
    #[must_use]
    pub fn item(&self) -> Option<&ItemId> {
        match self {
            Self::Start(id) | Self::Move(id) => Some(id),
            Self::End | Self::Cancel => None,
        }
    }

    /// Whether the event terminates a drag.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::End | Self::Cancel)
    }
}
