use std::path::PathBuf;

use sortable_core::{ConfigError, OrderError, ReorderError, SortableError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HarnessError>;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("engine error: {0}")]
    Sortable(#[from] SortableError),

    #[error("malformed trace at line {line}: {message}")]
    Trace { line: usize, message: String },

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("required path does not exist: {path}")]
    MissingPath { path: PathBuf },
}

impl From<OrderError> for HarnessError {
    fn from(error: OrderError) -> Self {
        Self::Sortable(error.into())
    }
}

impl From<ReorderError> for HarnessError {
    fn from(error: ReorderError) -> Self {
        Self::Sortable(error.into())
    }
}

impl HarnessError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument { .. } | Self::MissingPath { .. } | Self::Config(_) => 2,
            Self::Trace { .. } => 3,
            Self::Sortable(_) => 4,
            Self::Io(_) | Self::Json(_) => 1,
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn trace(line: usize, message: impl Into<String>) -> Self {
        Self::Trace {
            line,
            message: message.into(),
        }
    }
}
