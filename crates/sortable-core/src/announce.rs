#![forbid(unsafe_code)]

//! Screen reader announcements for drag transitions.
//!
//! Every observable [`Transition`] produces one line of text describing the
//! new state with 1-based positions. The host drains the queue after each
//! input and hands the text to whatever live region it renders.
//!
//! # Failure Modes
//!
//! The queue is bounded. When full, the oldest pending announcement is
//! discarded, so a burst of preview moves never grows memory and the most
//! recent position always survives.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::commit::CommitOutcome;
use crate::session::Transition;

/// Default bound on queued announcements.
pub const DEFAULT_MAX_QUEUE: usize = 8;

/// How urgently a screen reader should speak an announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Politeness {
    /// Wait for the current utterance to finish.
    #[default]
    Polite,
    /// Interrupt the current utterance.
    Assertive,
}

/// One announcement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub text: String,
    pub politeness: Politeness,
}

impl Announcement {
    fn polite(text: String) -> Self {
        Self {
            text,
            politeness: Politeness::Polite,
        }
    }

    fn assertive(text: String) -> Self {
        Self {
            text,
            politeness: Politeness::Assertive,
        }
    }

    /// Describe a transition, or `None` if it had no effect.
    #[must_use]
    pub fn for_transition(transition: &Transition) -> Option<Self> {
        let announcement = match transition {
            Transition::Ignored(_) => return None,
            Transition::Started { active, index, len } => Self::assertive(format!(
                "Picked up item {active}. Position {} of {len}.",
                index + 1
            )),
            Transition::PreviewChanged { active, to, len, .. } => Self::polite(format!(
                "Item {active} moved to position {} of {len}.",
                to + 1
            )),
            Transition::Ended {
                active,
                index,
                final_order,
                outcome: CommitOutcome::Committed,
            } => Self::assertive(format!(
                "Item {active} dropped at position {} of {}.",
                index + 1,
                final_order.len()
            )),
            Transition::Ended {
                active,
                outcome: CommitOutcome::Unchanged,
                ..
            } => Self::assertive(format!("Item {active} dropped. Order unchanged.")),
            Transition::Cancelled { active, index, len } => Self::assertive(format!(
                "Reordering cancelled. Item {active} returned to position {} of {len}.",
                index + 1
            )),
        };
        Some(announcement)
    }
}

/// Bounded FIFO of pending announcements.
#[derive(Debug, Clone)]
pub struct AnnouncementQueue {
    enabled: bool,
    max_queue: usize,
    pending: VecDeque<Announcement>,
    dropped: u64,
}

impl Default for AnnouncementQueue {
    fn default() -> Self {
        Self::new(true, DEFAULT_MAX_QUEUE)
    }
}

impl AnnouncementQueue {
    #[must_use]
    pub fn new(enabled: bool, max_queue: usize) -> Self {
        Self {
            enabled,
            max_queue,
            pending: VecDeque::with_capacity(max_queue.min(64)),
            dropped: 0,
        }
    }

    /// Queue the announcement for `transition`, if any.
    pub fn record(&mut self, transition: &Transition) {
        if !self.enabled || self.max_queue == 0 {
            return;
        }
        let Some(announcement) = Announcement::for_transition(transition) else {
            return;
        };
        while self.pending.len() >= self.max_queue {
            self.pending.pop_front();
            self.dropped += 1;
        }
        tracing::trace!(text = %announcement.text, "announcement queued");
        self.pending.push_back(announcement);
    }

    /// Take every pending announcement, oldest first.
    pub fn drain(&mut self) -> Vec<Announcement> {
        self.pending.drain(..).collect()
    }

    /// Pending announcements without clearing them.
    pub fn pending(&self) -> impl Iterator<Item = &Announcement> {
        self.pending.iter()
    }

    /// Number of pending announcements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Announcements discarded on overflow since creation.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
