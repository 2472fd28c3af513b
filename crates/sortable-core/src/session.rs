#![forbid(unsafe_code)]

//! Drag session: the transient state of one in-progress reorder.
//!
//! [`DragSession`] turns [`DragEvent`]s into a live preview order and, on
//! release, a single commit decision.
//!
//! # State Machine
//!
//! ```text
//!            Start(id)                 End
//!   Idle ─────────────▶ Dragging ─────────────▶ Ending ──▶ Idle
//!    ▲                   │   ▲                  (gate runs)
//!    │      Cancel       │   │ Move(candidate)
//!    └───────────────────┘   └──┘
//! ```
//!
//! # Invariants
//!
//! 1. At most one drag is active; a `Start` while not idle is ignored.
//! 2. The preview is always a permutation of the baseline.
//! 3. Each preview is derived from the previous preview, so consecutive
//!    moves compose.
//! 4. A `Move` whose candidate equals the most recent accepted candidate is
//!    ignored, so a stream of identical moves recomputes nothing.
//! 5. The commit gate runs only from `End`; `Cancel` never commits.
//!
//! # Failure Modes
//!
//! Unknown ids, moves while idle, and re-entrant starts are absorbed and
//! reported as [`Transition::Ignored`]. Only a reorder contract violation
//! surfaces as an error.

use crate::commit::{CommitGate, CommitOutcome, CommitSink};
use crate::error::ReorderError;
use crate::event::DragEvent;
use crate::item::{ItemId, Order};
use crate::reorder::move_order;

// ---------------------------------------------------------------------------
// Public state views
// ---------------------------------------------------------------------------

/// Coarse phase of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// No drag in progress.
    #[default]
    Idle,
    /// A drag is in progress and a live preview exists.
    Dragging,
    /// `End` received; the commit gate is running.
    Ending,
}

impl SessionPhase {
    /// Returns the stable string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Dragging => "dragging",
            Self::Ending => "ending",
        }
    }
}

/// Why an event left the session untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// `Move`/`End`/`Cancel` with no drag in progress.
    NotDragging,
    /// `Start` while a drag is already in progress.
    AlreadyDragging,
    /// The event names an id that is not in the list.
    UnknownItem,
    /// The candidate is the dragged item itself.
    SelfTarget,
    /// The candidate equals the previous accepted candidate.
    RepeatedTarget,
    /// The event came from a sensor other than the one driving the drag.
    OtherSensor,
}

impl IgnoreReason {
    /// Returns the stable string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotDragging => "not_dragging",
            Self::AlreadyDragging => "already_dragging",
            Self::UnknownItem => "unknown_item",
            Self::SelfTarget => "self_target",
            Self::RepeatedTarget => "repeated_target",
            Self::OtherSensor => "other_sensor",
        }
    }
}

/// Observable effect of applying one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Nothing changed.
    Ignored(IgnoreReason),
    /// A drag began; `index` is the item's position in the baseline.
    Started { active: ItemId, index: usize, len: usize },
    /// The live preview moved `active` from `from` to `to`.
    PreviewChanged {
        active: ItemId,
        over: ItemId,
        from: usize,
        to: usize,
        len: usize,
    },
    /// The drag ended; `index` is the item's position in `final_order`.
    Ended {
        active: ItemId,
        index: usize,
        final_order: Order,
        outcome: CommitOutcome,
    },
    /// The drag was abandoned; `index` is the item's restored position.
    Cancelled { active: ItemId, index: usize, len: usize },
}

impl Transition {
    /// Whether the event had any effect.
    #[must_use]
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored(_))
    }
}

// ---------------------------------------------------------------------------
// Internal state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct ActiveDrag {
    active: ItemId,
    over: ItemId,
    baseline: Order,
    preview: Order,
    last_candidate: Option<ItemId>,
}

#[derive(Debug, Clone, Default)]
enum State {
    #[default]
    Idle,
    Dragging(ActiveDrag),
    Ending,
}

// ---------------------------------------------------------------------------
// DragSession
// ---------------------------------------------------------------------------

/// State machine for one list instance.
///
/// Two lists never share a session; concurrent drags on different lists
/// are independent.
#[derive(Debug, Clone, Default)]
pub struct DragSession {
    state: State,
    gate: CommitGate,
}

impl DragSession {
    /// Create an idle session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        match self.state {
            State::Idle => SessionPhase::Idle,
            State::Dragging(_) => SessionPhase::Dragging,
            State::Ending => SessionPhase::Ending,
        }
    }

    /// Whether a drag is in progress.
    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, State::Dragging(_))
    }

    /// Item being dragged.
    #[must_use]
    pub fn active_id(&self) -> Option<&ItemId> {
        self.drag().map(|d| &d.active)
    }

    /// Item the dragged item is currently over.
    #[must_use]
    pub fn over_id(&self) -> Option<&ItemId> {
        self.drag().map(|d| &d.over)
    }

    /// Committed order captured at `Start`.
    #[must_use]
    pub fn baseline(&self) -> Option<&Order> {
        self.drag().map(|d| &d.baseline)
    }

    /// Live preview order.
    #[must_use]
    pub fn preview(&self) -> Option<&Order> {
        self.drag().map(|d| &d.preview)
    }

    /// Commit statistics for this session.
    #[must_use]
    pub fn gate(&self) -> &CommitGate {
        &self.gate
    }

    fn drag(&self) -> Option<&ActiveDrag> {
        match &self.state {
            State::Dragging(drag) => Some(drag),
            State::Idle | State::Ending => None,
        }
    }

    /// Apply one event.
    ///
    /// `current` is the committed order (consulted by `Start` only); `sink`
    /// receives the final order if `End` produces a change.
    pub fn apply(
        &mut self,
        event: &DragEvent,
        current: &Order,
        sink: &mut dyn CommitSink,
    ) -> Result<Transition, ReorderError> {
        let transition = match event {
            DragEvent::Start(id) => self.start(id, current),
            DragEvent::Move(candidate) => self.move_over(candidate)?,
            DragEvent::End => self.end(sink),
            DragEvent::Cancel => self.cancel(),
        };
        if let Transition::Ignored(reason) = &transition {
            tracing::trace!(
                event = event.kind(),
                item = ?event.item(),
                reason = reason.as_str(),
                "drag event ignored"
            );
        }
        Ok(transition)
    }

    /// `Idle --Start(id)--> Dragging`.
    pub fn start(&mut self, id: &ItemId, current: &Order) -> Transition {
        if !matches!(self.state, State::Idle) {
            return Transition::Ignored(IgnoreReason::AlreadyDragging);
        }
        let Some(index) = current.index_of(id) else {
            return Transition::Ignored(IgnoreReason::UnknownItem);
        };
        tracing::debug!(active = %id, index, len = current.len(), "drag started");
        self.state = State::Dragging(ActiveDrag {
            active: id.clone(),
            over: id.clone(),
            baseline: current.clone(),
            preview: current.clone(),
            last_candidate: None,
        });
        Transition::Started {
            active: id.clone(),
            index,
            len: current.len(),
        }
    }

    /// `Dragging --Move(candidate)--> Dragging`.
    pub fn move_over(&mut self, candidate: &ItemId) -> Result<Transition, ReorderError> {
        let State::Dragging(drag) = &mut self.state else {
            return Ok(Transition::Ignored(IgnoreReason::NotDragging));
        };
        let Some(to) = drag.preview.index_of(candidate) else {
            return Ok(Transition::Ignored(IgnoreReason::UnknownItem));
        };
        if drag.last_candidate.as_ref() == Some(candidate) {
            return Ok(Transition::Ignored(IgnoreReason::RepeatedTarget));
        }
        drag.last_candidate = Some(candidate.clone());
        if *candidate == drag.active {
            return Ok(Transition::Ignored(IgnoreReason::SelfTarget));
        }
        let Some(from) = drag.preview.index_of(&drag.active) else {
            tracing::error!(active = %drag.active, "active item missing from preview");
            return Ok(Transition::Ignored(IgnoreReason::UnknownItem));
        };

        let preview = move_order(&drag.preview, from, to).inspect_err(|err| {
            tracing::error!(%err, from, to, "preview recomputation failed");
        })?;
        drag.preview = preview;
        drag.over = candidate.clone();
        tracing::debug!(active = %drag.active, over = %candidate, from, to, "preview changed");
        Ok(Transition::PreviewChanged {
            active: drag.active.clone(),
            over: candidate.clone(),
            from,
            to,
            len: drag.preview.len(),
        })
    }

    /// `Dragging --End--> Ending --> Idle`, running the commit gate.
    pub fn end(&mut self, sink: &mut dyn CommitSink) -> Transition {
        let drag = match std::mem::replace(&mut self.state, State::Ending) {
            State::Dragging(drag) => drag,
            other => {
                self.state = other;
                return Transition::Ignored(IgnoreReason::NotDragging);
            }
        };
        let outcome = self.gate.submit(&drag.baseline, &drag.preview, sink);
        self.state = State::Idle;

        let index = drag.preview.index_of(&drag.active).unwrap_or_default();
        tracing::debug!(active = %drag.active, index, committed = outcome.is_committed(), "drag ended");
        Transition::Ended {
            active: drag.active,
            index,
            final_order: drag.preview,
            outcome,
        }
    }

    /// `Dragging --Cancel--> Idle`, discarding the preview.
    pub fn cancel(&mut self) -> Transition {
        let drag = match std::mem::take(&mut self.state) {
            State::Dragging(drag) => drag,
            other => {
                self.state = other;
                return Transition::Ignored(IgnoreReason::NotDragging);
            }
        };
        let index = drag.baseline.index_of(&drag.active).unwrap_or_default();
        tracing::debug!(active = %drag.active, index, "drag cancelled");
        Transition::Cancelled {
            active: drag.active,
            index,
            len: drag.baseline.len(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
