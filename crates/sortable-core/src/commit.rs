#![forbid(unsafe_code)]

//! Commit gating: tell the host about a new order exactly once, and only
//! when the order actually changed.
//!
//! The gate is owned by the [`DragSession`](crate::session::DragSession)
//! and is only reachable from its `End` transition, so a commit can never
//! fire on `Cancel` or twice for one drag.

use crate::item::Order;

/// Receiver of committed orders.
pub trait CommitSink {
    /// Called synchronously, at most once per drag, with the new order.
    fn commit(&mut self, final_order: &Order);
}

impl<F> CommitSink for F
where
    F: FnMut(&Order),
{
    fn commit(&mut self, final_order: &Order) {
        self(final_order);
    }
}

/// What the gate decided for one ended drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The order changed and the sink was invoked once.
    Committed,
    /// The final order equals the baseline; the sink was not invoked.
    Unchanged,
}

impl CommitOutcome {
    /// Whether the sink was invoked.
    #[must_use]
    pub const fn is_committed(self) -> bool {
        matches!(self, Self::Committed)
    }
}

/// Compares final against baseline and forwards real changes.
#[derive(Debug, Default, Clone)]
pub struct CommitGate {
    committed: u64,
    unchanged: u64,
}

impl CommitGate {
    /// Create a gate with zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether `final_order` is a change and, if so, commit it.
    pub(crate) fn submit(
        &mut self,
        baseline: &Order,
        final_order: &Order,
        sink: &mut dyn CommitSink,
    ) -> CommitOutcome {
        if baseline == final_order {
            self.unchanged += 1;
            tracing::trace!(len = final_order.len(), "commit suppressed: order unchanged");
            return CommitOutcome::Unchanged;
        }
        self.committed += 1;
        tracing::debug!(commits = self.committed, "order committed");
        sink.commit(final_order);
        CommitOutcome::Committed
    }

    /// Number of drags that ended with a commit.
    #[must_use]
    pub fn committed(&self) -> u64 {
        self.committed
    }

    /// Number of drags that ended without a change.
    #[must_use]
    pub fn unchanged(&self) -> u64 {
        self.unchanged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order<const N: usize>(ids: [&str; N]) -> Order {
        Order::try_from(ids).unwrap()
    }

    #[test]
    fn identical_orders_do_not_commit() {
        let mut gate = CommitGate::new();
        let mut calls = Vec::new();
        let mut sink = |o: &Order| calls.push(o.clone());
        let outcome = gate.submit(&order(["A", "B"]), &order(["A", "B"]), &mut sink);
        assert_eq!(outcome, CommitOutcome::Unchanged);
        assert!(calls.is_empty());
        assert_eq!(gate.unchanged(), 1);
        assert_eq!(gate.committed(), 0);
    }

    #[test]
    fn changed_order_commits_once() {
        let mut gate = CommitGate::new();
        let mut calls = Vec::new();
        let mut sink = |o: &Order| calls.push(o.clone());
        let outcome = gate.submit(&order(["A", "B"]), &order(["B", "A"]), &mut sink);
        assert!(outcome.is_committed());
        assert_eq!(calls, vec![order(["B", "A"])]);
        assert_eq!(gate.committed(), 1);
    }
}
