#![forbid(unsafe_code)]

//! Tooling around `sortable-core`: JSONL input traces, a fixed-pitch stand-in
//! renderer, deterministic replay, and the `sortable-harness` CLI.

pub mod cli;
pub mod error;
pub mod layout;
pub mod logging;
pub mod replay;
pub mod trace;

pub use cli::{Cli, Commands, ReplayArgs, run, run_from_env};
pub use error::{HarnessError, Result};
pub use layout::StackLayout;
pub use replay::{ReplayReport, replay};
pub use trace::{
    SCHEMA_VERSION, TraceFile, TraceInput, TraceReader, TraceRecord, TraceSink, TraceWriter,
};
