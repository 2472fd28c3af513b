#![forbid(unsafe_code)]

//! Error taxonomy.
//!
//! Only genuine contract failures are errors. Stale ids and re-entrant
//! starts are absorbed by the drag session and reported as
//! [`IgnoreReason`](crate::session::IgnoreReason) values instead.

use std::fmt;

use thiserror::Error;

use crate::item::ItemId;

/// Which side of a move an out-of-range index came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexRole {
    From,
    To,
}

impl fmt::Display for IndexRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::From => f.write_str("from"),
            Self::To => f.write_str("to"),
        }
    }
}

/// The reorder algorithm was asked to use an index outside `[0, len)`.
///
/// This signals an index-bookkeeping bug in a caller, never a user action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReorderError {
    #[error("{role} index {index} out of range for list of length {len}")]
    IndexOutOfRange {
        index: usize,
        len: usize,
        role: IndexRole,
    },
}

/// An item list violated the unique-id contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    #[error("duplicate item id: {0}")]
    DuplicateId(ItemId),
}

/// Errors surfaced by [`SortableList`](crate::list::SortableList).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SortableError {
    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Reorder(#[from] ReorderError),
    #[error("invalid config: {}", .0.join("; "))]
    InvalidConfig(Vec<String>),
}

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
