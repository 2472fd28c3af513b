#![forbid(unsafe_code)]

//! Deterministic replay of a recorded trace against a fresh list.
//!
//! Timestamps are offsets from a single base instant, so replaying the same
//! trace with the same config always yields the same report.

use std::time::Duration;

use serde::Serialize;
use sortable_core::{
    CommitOutcome, Item, ItemId, LayoutSnapshot, SortableConfig, SortableList, Transition,
};
use web_time::Instant;

use crate::error::Result;
use crate::layout::StackLayout;
use crate::trace::{TraceFile, TraceInput};

/// Outcome of replaying one trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    pub session_name: String,
    /// Inputs fed to the list.
    pub events: u64,
    /// Transitions that had no effect.
    pub ignored: u64,
    /// Committed order after each changed drop, in sequence.
    pub commits: Vec<Vec<ItemId>>,
    pub unchanged_drops: u64,
    pub final_order: Vec<ItemId>,
    pub announcements: Vec<String>,
}

/// Replay every input in `trace`, re-laying out the list before each
/// pointer input.
pub fn replay(trace: &TraceFile, config: SortableConfig, layout: &StackLayout) -> Result<ReplayReport> {
    let items: Vec<Item<()>> = trace.items().iter().cloned().map(Item::bare).collect();
    let mut list = SortableList::with_config(items, config)?;
    let mut snapshot = LayoutSnapshot::new();
    let base = Instant::now();

    let mut report = ReplayReport {
        session_name: trace.session_name().to_string(),
        events: 0,
        ignored: 0,
        commits: Vec::new(),
        unchanged_drops: 0,
        final_order: Vec::new(),
        announcements: Vec::new(),
    };

    for (input, ts_ns) in trace.inputs() {
        let now = base + Duration::from_nanos(ts_ns);
        let transitions = match &input {
            TraceInput::Pointer(pointer) => {
                layout.refresh(list.display_order(), &mut snapshot);
                list.handle_pointer(pointer, now, &snapshot)?
            }
            TraceInput::Key { key, focused } => list.handle_key(*key, focused.as_ref())?,
            TraceInput::Tick => {
                layout.refresh(list.display_order(), &mut snapshot);
                list.tick(now, &snapshot)?.into_iter().collect()
            }
        };
        report.events += 1;

        for transition in &transitions {
            match transition {
                Transition::Ignored(reason) => {
                    report.ignored += 1;
                    tracing::trace!(ts_ns, reason = reason.as_str(), "replayed input ignored");
                }
                Transition::Ended {
                    final_order,
                    outcome: CommitOutcome::Committed,
                    ..
                } => report.commits.push(final_order.as_slice().to_vec()),
                Transition::Ended { .. } => report.unchanged_drops += 1,
                _ => {}
            }
        }
        report
            .announcements
            .extend(list.drain_announcements().into_iter().map(|a| a.text));
    }

    report.final_order = list.order().as_slice().to_vec();
    tracing::info!(
        session = %report.session_name,
        events = report.events,
        commits = report.commits.len(),
        ignored = report.ignored,
        "replay finished"
    );
    Ok(report)
}
