#![forbid(unsafe_code)]

//! Reorder engine for interactive sortable lists.
//!
//! # Role
//! `sortable-core` turns normalized pointer and keyboard input into a live
//! preview order and a single commit of the final order. It never paints:
//! the host renders [`RenderFrame`]s and supplies item rectangles through a
//! [`GeometrySource`].
//!
//! # Primary responsibilities
//! - **DragSession**: `Idle`/`Dragging`/`Ending` state machine over
//!   [`DragEvent`]s.
//! - **Reorder**: pure `move` of one element between two indices.
//! - **Collision**: closest-center target selection with a display-order
//!   tie-break.
//! - **Sensors**: pointer activation constraints and keyboard stepping,
//!   both emitting the same event vocabulary.
//! - **CommitGate**: commit once per drag, only on a real change.
//! - **SortableList**: the host-facing surface tying these together.
//!
//! # Example
//! ```
//! use sortable_core::{DragEvent, Item, SortableList};
//!
//! let items = vec![Item::bare("A"), Item::bare("B"), Item::bare("C")];
//! let mut list = SortableList::new(items)?;
//! list.dispatch(DragEvent::Start("A".into()))?;
//! list.dispatch(DragEvent::Move("C".into()))?;
//! list.dispatch(DragEvent::End)?;
//! let ids: Vec<&str> = list.items().iter().map(|i| i.id.as_str()).collect();
//! assert_eq!(ids, ["B", "C", "A"]);
//! # Ok::<(), sortable_core::SortableError>(())
//! ```

pub mod announce;
pub mod collision;
pub mod commit;
pub mod config;
pub mod error;
pub mod event;
pub mod geometry;
pub mod item;
pub mod list;
pub mod reorder;
pub mod sensor;
pub mod session;

pub use announce::{Announcement, AnnouncementQueue, Politeness};
pub use collision::closest_center;
pub use commit::{CommitGate, CommitOutcome, CommitSink};
pub use config::SortableConfig;
pub use error::{ConfigError, OrderError, ReorderError, SortableError};
pub use event::DragEvent;
pub use geometry::{GeometrySource, LayoutSnapshot, Point, Rect};
pub use item::{Item, ItemId, Order};
pub use list::{ActiveOverlay, RenderFrame, SortableList};
pub use reorder::{move_index, move_order};
pub use sensor::{
    ActivationConstraint, Direction, KeyInput, KeyboardSensor, ListAxis, PointerInput,
    PointerSensor, SensorContext, SensorKind,
};
pub use session::{DragSession, IgnoreReason, SessionPhase, Transition};
