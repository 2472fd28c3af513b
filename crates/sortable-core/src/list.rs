#![forbid(unsafe_code)]

//! [`SortableList`]: the host-facing reorderable list.
//!
//! Owns the committed items, one [`DragSession`], both sensors, and the
//! announcement queue. The host feeds it normalized input and reads back a
//! [`RenderFrame`]; a registered `on_reorder` callback receives the items in
//! their new order once per changed drag.
//!
//! ```rust,ignore
//! let mut list = SortableList::new(items)?.on_reorder(|items| save(items));
//! list.handle_pointer(&PointerInput::Down { id, pos }, Instant::now(), &layout)?;
//! let frame = list.render_frame();
//! ```
//!
//! # Invariants
//!
//! 1. `items()` and `order()` always agree and change only on `End` (or
//!    [`SortableList::set_items`]).
//! 2. Only the sensor that started a drag may move or end it. Either
//!    sensor may cancel it.
//! 3. A sensor never holds an active drag the session does not know about.

use ahash::AHashMap;
use serde::Serialize;
use web_time::Instant;

use crate::announce::{Announcement, AnnouncementQueue};
use crate::config::SortableConfig;
use crate::error::{OrderError, ReorderError, SortableError};
use crate::event::DragEvent;
use crate::geometry::{GeometrySource, Point, Rect};
use crate::item::{Item, ItemId, Order};
use crate::sensor::{
    KeyInput, KeyboardSensor, PointerInput, PointerSensor, SensorContext, SensorKind,
};
use crate::session::{DragSession, IgnoreReason, SessionPhase, Transition};

type ReorderCallback<T> = Box<dyn FnMut(&[Item<T>])>;

// ---------------------------------------------------------------------------
// Render output
// ---------------------------------------------------------------------------

/// Transform for the item being dragged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveOverlay {
    pub id: ItemId,
    /// Offset from the item's picked-up position. Zero for keyboard drags.
    pub translation: Point,
    /// Rectangle the item should be drawn in, following the pointer.
    /// `None` for keyboard drags, which draw the item in its live slot.
    pub dragged: Option<Rect>,
}

impl ActiveOverlay {
    /// Offset to add to the item's live `slot` so it is drawn at
    /// [`ActiveOverlay::dragged`].
    #[must_use]
    pub fn offset_from(&self, slot: &Rect) -> Point {
        self.dragged.map_or(Point::ORIGIN, |dragged| {
            Point::new(dragged.left - slot.left, dragged.top - slot.top)
        })
    }
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    /// Display order: the live preview while dragging, else the committed order.
    pub order: Order,
    pub active: Option<ActiveOverlay>,
}

impl RenderFrame {
    /// Offset of `id` from its slot in the live layout; `Some` only for the
    /// dragged item.
    ///
    /// `geometry` must describe the layout of [`RenderFrame::order`].
    #[must_use]
    pub fn offset(&self, id: &ItemId, geometry: &dyn GeometrySource) -> Option<Point> {
        let overlay = self.active.as_ref().filter(|overlay| overlay.id == *id)?;
        Some(match geometry.rect(id) {
            Some(slot) => overlay.offset_from(&slot),
            None => overlay.translation,
        })
    }
}

// ---------------------------------------------------------------------------
// SortableList
// ---------------------------------------------------------------------------

/// A reorderable list of host items.
pub struct SortableList<T> {
    items: Vec<Item<T>>,
    order: Order,
    session: DragSession,
    pointer: PointerSensor,
    keyboard: KeyboardSensor,
    owner: Option<SensorKind>,
    announcements: AnnouncementQueue,
    on_reorder: Option<ReorderCallback<T>>,
    config: SortableConfig,
}

impl<T> std::fmt::Debug for SortableList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SortableList")
            .field("order", &self.order)
            .field("phase", &self.session.phase())
            .field("owner", &self.owner)
            .field("on_reorder", &self.on_reorder.is_some())
            .finish_non_exhaustive()
    }
}

impl<T> SortableList<T> {
    /// Create a list with the default configuration.
    pub fn new(items: Vec<Item<T>>) -> Result<Self, SortableError> {
        Self::with_config(items, SortableConfig::default())
    }

    /// Create a list with an explicit configuration.
    ///
    /// The config is validated first; see [`SortableConfig::validate`].
    pub fn with_config(items: Vec<Item<T>>, config: SortableConfig) -> Result<Self, SortableError> {
        let problems = config.validate();
        if !problems.is_empty() {
            tracing::error!(?problems, "rejected list config");
            return Err(SortableError::InvalidConfig(problems));
        }
        let order = Order::from_items(&items)?;
        Ok(Self {
            items,
            order,
            session: DragSession::new(),
            pointer: config.pointer_sensor(),
            keyboard: config.keyboard_sensor(),
            owner: None,
            announcements: AnnouncementQueue::new(
                config.announcements.enabled,
                config.announcements.max_queue,
            ),
            on_reorder: None,
            config,
        })
    }

    /// Register the commit callback.
    #[must_use]
    pub fn on_reorder(mut self, callback: impl FnMut(&[Item<T>]) + 'static) -> Self {
        self.on_reorder = Some(Box::new(callback));
        self
    }

    /// Replace the commit callback.
    pub fn set_on_reorder(&mut self, callback: impl FnMut(&[Item<T>]) + 'static) {
        self.on_reorder = Some(Box::new(callback));
    }

    // -- Input ----------------------------------------------------------------

    /// Apply a drag event directly, bypassing the sensors.
    ///
    /// Events dispatched this way are not tied to a sensor, so either sensor
    /// may later move or end the drag they start.
    pub fn dispatch(&mut self, event: DragEvent) -> Result<Transition, ReorderError> {
        self.apply(None, &event)
    }

    /// Feed one pointer input. `geometry` must reflect the current layout.
    pub fn handle_pointer(
        &mut self,
        input: &PointerInput,
        now: Instant,
        geometry: &dyn GeometrySource,
    ) -> Result<Vec<Transition>, ReorderError> {
        let ctx = SensorContext {
            order: self.session.preview().unwrap_or(&self.order),
            active: self.session.active_id(),
            over: self.session.over_id(),
        };
        let mut events = self.pointer.process(input, now, &ctx, geometry);
        if matches!(input, PointerInput::Interrupt)
            && events.is_empty()
            && self.session.is_dragging()
        {
            events.push(DragEvent::Cancel);
        }
        self.apply_all(SensorKind::Pointer, events)
    }

    /// Feed one key press. `focused` is the item holding keyboard focus.
    pub fn handle_key(
        &mut self,
        key: KeyInput,
        focused: Option<&ItemId>,
    ) -> Result<Vec<Transition>, ReorderError> {
        let ctx = SensorContext {
            order: self.session.preview().unwrap_or(&self.order),
            active: self.session.active_id(),
            over: self.session.over_id(),
        };
        let events = self.keyboard.handle(key, focused, &ctx);
        self.apply_all(SensorKind::Keyboard, events)
    }

    /// Advance time-based pointer activation.
    pub fn tick(
        &mut self,
        now: Instant,
        geometry: &dyn GeometrySource,
    ) -> Result<Option<Transition>, ReorderError> {
        match self.pointer.tick(now, geometry) {
            Some(event) => self.apply(Some(SensorKind::Pointer), &event).map(Some),
            None => Ok(None),
        }
    }

    /// Replace the committed items. An active drag is cancelled first.
    ///
    /// Duplicate ids are rejected and the current items are kept.
    pub fn set_items(&mut self, items: Vec<Item<T>>) -> Result<(), OrderError> {
        let order = Order::from_items(&items)?;
        let transition = self.session.cancel();
        if !transition.is_ignored() {
            tracing::debug!("active drag cancelled by item replacement");
            self.announcements.record(&transition);
        }
        self.finish_drag();
        self.items = items;
        self.order = order;
        Ok(())
    }

    fn apply_all(
        &mut self,
        source: SensorKind,
        events: Vec<DragEvent>,
    ) -> Result<Vec<Transition>, ReorderError> {
        events
            .iter()
            .map(|event| self.apply(Some(source), event))
            .collect()
    }

    fn apply(
        &mut self,
        source: Option<SensorKind>,
        event: &DragEvent,
    ) -> Result<Transition, ReorderError> {
        let span = tracing::debug_span!(
            "sortable.dispatch",
            event = event.kind(),
            source = source.map_or("host", SensorKind::as_str)
        );
        let _guard = span.enter();

        if let (Some(owner), Some(source)) = (self.owner, source)
            && owner != source
            && matches!(event, DragEvent::Move(_) | DragEvent::End)
        {
            tracing::trace!(owner = owner.as_str(), "event from other sensor ignored");
            return Ok(Transition::Ignored(IgnoreReason::OtherSensor));
        }

        let items = &mut self.items;
        let on_reorder = &mut self.on_reorder;
        let mut sink = |final_order: &Order| {
            permute_items(items, final_order);
            if let Some(callback) = on_reorder.as_mut() {
                callback(items.as_slice());
            }
        };
        let transition = self.session.apply(event, &self.order, &mut sink)?;

        match &transition {
            Transition::Started { .. } => self.owner = source,
            Transition::Ended { final_order, .. } => {
                self.order = final_order.clone();
                self.finish_drag();
            }
            Transition::Cancelled { .. } => self.finish_drag(),
            Transition::Ignored(_) if matches!(event, DragEvent::Start(_)) => {
                if source == Some(SensorKind::Pointer) {
                    self.pointer.reset();
                }
            }
            Transition::Ignored(_) | Transition::PreviewChanged { .. } => {}
        }
        self.announcements.record(&transition);
        Ok(transition)
    }

    fn finish_drag(&mut self) {
        self.owner = None;
        self.pointer.reset();
    }

    // -- Views ----------------------------------------------------------------

    /// Committed items.
    #[must_use]
    pub fn items(&self) -> &[Item<T>] {
        &self.items
    }

    /// Committed order.
    #[must_use]
    pub fn order(&self) -> &Order {
        &self.order
    }

    /// Order to display: the live preview while dragging.
    #[must_use]
    pub fn display_order(&self) -> &Order {
        self.session.preview().unwrap_or(&self.order)
    }

    /// Items in display order.
    #[must_use]
    pub fn display_items(&self) -> Vec<&Item<T>> {
        let by_id: AHashMap<&ItemId, &Item<T>> =
            self.items.iter().map(|item| (&item.id, item)).collect();
        self.display_order()
            .iter()
            .filter_map(|id| by_id.get(id).copied())
            .collect()
    }

    /// Snapshot for the renderer.
    #[must_use]
    pub fn render_frame(&self) -> RenderFrame {
        let pointer_drag = self.owner == Some(SensorKind::Pointer);
        let active = self.session.active_id().map(|id| ActiveOverlay {
            id: id.clone(),
            translation: self
                .pointer
                .translation()
                .filter(|_| pointer_drag)
                .unwrap_or_default(),
            dragged: self.pointer.dragged_rect().filter(|_| pointer_drag),
        });
        RenderFrame {
            order: self.display_order().clone(),
            active,
        }
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.session.phase()
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.session.is_dragging()
    }

    #[must_use]
    pub fn active_id(&self) -> Option<&ItemId> {
        self.session.active_id()
    }

    #[must_use]
    pub fn over_id(&self) -> Option<&ItemId> {
        self.session.over_id()
    }

    /// Sensor driving the active drag, if a sensor started it.
    #[must_use]
    pub fn owner(&self) -> Option<SensorKind> {
        self.owner
    }

    /// Take pending screen reader announcements.
    pub fn drain_announcements(&mut self) -> Vec<Announcement> {
        self.announcements.drain()
    }

    /// Number of drags that committed a new order.
    #[must_use]
    pub fn commits(&self) -> u64 {
        self.session.gate().committed()
    }

    /// Number of drags that ended without changing the order.
    #[must_use]
    pub fn unchanged_drops(&self) -> u64 {
        self.session.gate().unchanged()
    }

    #[must_use]
    pub fn config(&self) -> &SortableConfig {
        &self.config
    }
}

/// Reorder `items` in place to follow `order`.
fn permute_items<T>(items: &mut Vec<Item<T>>, order: &Order) {
    let mut by_id: AHashMap<ItemId, Item<T>> =
        items.drain(..).map(|item| (item.id.clone(), item)).collect();
    items.extend(order.iter().filter_map(|id| by_id.remove(id)));
    debug_assert!(by_id.is_empty(), "final order must be a permutation of the items");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commit::CommitOutcome;
    use crate::geometry::LayoutSnapshot;
    use crate::sensor::Direction;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn items(ids: &[&str]) -> Vec<Item<String>> {
        ids.iter()
            .map(|id| Item::new(*id, format!("payload-{id}")))
            .collect()
    }

    fn ids<T>(items: &[Item<T>]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    fn recorded(list: SortableList<String>) -> (SortableList<String>, Rc<RefCell<Vec<Vec<String>>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);
        let list = list.on_reorder(move |items| {
            sink.borrow_mut()
                .push(items.iter().map(|i| i.id.to_string()).collect());
        });
        (list, calls)
    }

    fn stack(order: &Order) -> LayoutSnapshot {
        order
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), Rect::new(0.0, i as f32 * 40.0, 200.0, 40.0)))
            .collect()
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = SortableList::new(items(&["A", "B", "A"])).unwrap_err();
        assert_eq!(err, SortableError::Order(OrderError::DuplicateId("A".into())));
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        use crate::sensor::ActivationConstraint;

        for distance in [f32::NAN, -1.0] {
            let mut config = SortableConfig::default();
            config.pointer.activation = ActivationConstraint::Distance { distance };
            match SortableList::with_config(items(&["A", "B"]), config).unwrap_err() {
                SortableError::InvalidConfig(problems) => {
                    assert_eq!(problems.len(), 1);
                    assert!(problems[0].starts_with("pointer.activation.distance"));
                }
                other => panic!("expected InvalidConfig, got {other}"),
            }
        }

        let mut config = SortableConfig::default();
        config.announcements.max_queue = 0;
        assert!(SortableList::with_config(items(&["A"]), config).is_err());
    }

    #[test]
    fn end_commits_items_with_payloads() {
        let (mut list, calls) = recorded(SortableList::new(items(&["A", "B", "C", "D"])).unwrap());
        list.dispatch(DragEvent::Start("A".into())).unwrap();
        list.dispatch(DragEvent::Move("C".into())).unwrap();
        assert_eq!(list.display_order().as_slice(), ["B", "C", "A", "D"].map(ItemId::from));
        assert_eq!(ids(list.items()), ["A", "B", "C", "D"]);
        list.dispatch(DragEvent::Move("D".into())).unwrap();
        let t = list.dispatch(DragEvent::End).unwrap();
        assert!(matches!(
            t,
            Transition::Ended {
                outcome: CommitOutcome::Committed,
                ..
            }
        ));
        assert_eq!(*calls.borrow(), vec![vec!["B", "C", "D", "A"]]);
        assert_eq!(ids(list.items()), ["B", "C", "D", "A"]);
        assert_eq!(list.items()[3].payload, "payload-A");
        assert_eq!(list.commits(), 1);
    }

    #[test]
    fn display_items_follow_preview() {
        let mut list = SortableList::new(items(&["A", "B", "C"])).unwrap();
        list.dispatch(DragEvent::Start("B".into())).unwrap();
        list.dispatch(DragEvent::Move("A".into())).unwrap();
        let shown: Vec<&str> = list.display_items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(shown, ["B", "A", "C"]);
        list.dispatch(DragEvent::Cancel).unwrap();
        assert_eq!(ids(list.items()), ["A", "B", "C"]);
        assert_eq!(list.display_order(), list.order());
    }

    #[test]
    fn keyboard_drag_ignores_pointer_moves() {
        let mut list = SortableList::new(items(&["A", "B", "C"])).unwrap();
        let a = ItemId::from("A");
        list.handle_key(KeyInput::Activate, Some(&a)).unwrap();
        assert_eq!(list.owner(), Some(SensorKind::Keyboard));

        let geo = stack(list.display_order());
        let t0 = Instant::now();
        list.handle_pointer(
            &PointerInput::Down {
                id: "C".into(),
                pos: Point::new(10.0, 100.0),
            },
            t0,
            &geo,
        )
        .unwrap();
        let ts = list
            .handle_pointer(
                &PointerInput::Move {
                    pos: Point::new(10.0, 20.0),
                },
                t0,
                &geo,
            )
            .unwrap();
        assert_eq!(ts, vec![Transition::Ignored(IgnoreReason::AlreadyDragging)]);
        assert_eq!(list.active_id(), Some(&a));

        list.handle_key(KeyInput::Step(Direction::Down), None).unwrap();
        assert_eq!(list.display_order().as_slice(), ["B", "A", "C"].map(ItemId::from));
    }

    #[test]
    fn pointer_interrupt_cancels_keyboard_drag() {
        let mut list = SortableList::new(items(&["A", "B"])).unwrap();
        let b = ItemId::from("B");
        list.handle_key(KeyInput::Activate, Some(&b)).unwrap();
        list.handle_key(KeyInput::Step(Direction::Up), None).unwrap();
        let geo = stack(list.display_order());
        let ts = list
            .handle_pointer(&PointerInput::Interrupt, Instant::now(), &geo)
            .unwrap();
        assert!(matches!(ts.as_slice(), [Transition::Cancelled { .. }]));
        assert!(!list.is_dragging());
        assert_eq!(ids(list.items()), ["A", "B"]);
    }

    #[test]
    fn render_frame_reports_pointer_translation() {
        let mut list = SortableList::new(items(&["A", "B", "C"])).unwrap();
        let geo = stack(list.order());
        let t0 = Instant::now();
        list.handle_pointer(
            &PointerInput::Down {
                id: "A".into(),
                pos: Point::new(50.0, 20.0),
            },
            t0,
            &geo,
        )
        .unwrap();
        assert_eq!(list.render_frame().active, None);
        list.handle_pointer(
            &PointerInput::Move {
                pos: Point::new(53.0, 32.0),
            },
            t0,
            &geo,
        )
        .unwrap();
        let frame = list.render_frame();
        let overlay = frame.active.as_ref().unwrap();
        assert_eq!(overlay.translation, Point::new(3.0, 12.0));
        assert_eq!(overlay.dragged, Some(Rect::new(3.0, 12.0, 200.0, 40.0)));
        assert_eq!(frame.offset(&"A".into(), &geo), Some(Point::new(3.0, 12.0)));
        assert_eq!(frame.offset(&"B".into(), &geo), None);
    }

    #[test]
    fn render_offset_is_relative_to_live_slot_after_reorder() {
        let mut list = SortableList::new(items(&["A", "B", "C", "D"])).unwrap();
        let t0 = Instant::now();
        for input in [
            PointerInput::Down {
                id: "A".into(),
                pos: Point::new(100.0, 20.0),
            },
            PointerInput::Move {
                pos: Point::new(100.0, 30.0),
            },
            PointerInput::Move {
                pos: Point::new(100.0, 100.0),
            },
        ] {
            let geo = stack(list.display_order());
            list.handle_pointer(&input, t0, &geo).unwrap();
        }
        assert_eq!(list.display_order().as_slice(), ["B", "C", "A", "D"].map(ItemId::from));

        // A sits in slot 2 (top 80) and was picked up at top 0, moved 80 down:
        // it is drawn exactly in its live slot.
        let geo = stack(list.display_order());
        let frame = list.render_frame();
        let offset = frame.offset(&"A".into(), &geo).unwrap();
        let slot = geo.rect(&"A".into()).unwrap();
        assert_eq!(offset, Point::ORIGIN);
        assert_eq!(slot.top + offset.y, 80.0);

        list.handle_pointer(
            &PointerInput::Move {
                pos: Point::new(100.0, 110.0),
            },
            t0,
            &geo,
        )
        .unwrap();
        let geo = stack(list.display_order());
        let frame = list.render_frame();
        assert_eq!(frame.offset(&"A".into(), &geo), Some(Point::new(0.0, 10.0)));
    }

    #[test]
    fn keyboard_drag_has_no_offset() {
        let mut list = SortableList::new(items(&["A", "B"])).unwrap();
        let a = ItemId::from("A");
        list.handle_key(KeyInput::Activate, Some(&a)).unwrap();
        list.handle_key(KeyInput::Step(Direction::Down), None).unwrap();
        let geo = stack(list.display_order());
        let frame = list.render_frame();
        assert_eq!(frame.active.as_ref().unwrap().dragged, None);
        assert_eq!(frame.offset(&a, &geo), Some(Point::ORIGIN));
    }

    #[test]
    fn set_items_cancels_active_drag() {
        let (mut list, calls) = recorded(SortableList::new(items(&["A", "B"])).unwrap());
        list.dispatch(DragEvent::Start("A".into())).unwrap();
        list.dispatch(DragEvent::Move("B".into())).unwrap();
        list.set_items(items(&["X", "Y"])).unwrap();
        assert!(!list.is_dragging());
        assert!(calls.borrow().is_empty());
        assert_eq!(ids(list.items()), ["X", "Y"]);

        assert!(list.set_items(items(&["Z", "Z"])).is_err());
        assert_eq!(ids(list.items()), ["X", "Y"]);
    }

    #[test]
    fn announcements_follow_transitions() {
        let mut list = SortableList::new(items(&["A", "B", "C"])).unwrap();
        list.dispatch(DragEvent::Start("A".into())).unwrap();
        list.dispatch(DragEvent::Move("B".into())).unwrap();
        list.dispatch(DragEvent::End).unwrap();
        let texts: Vec<String> = list
            .drain_announcements()
            .into_iter()
            .map(|a| a.text)
            .collect();
        assert_eq!(
            texts,
            [
                "Picked up item A. Position 1 of 3.",
                "Item A moved to position 2 of 3.",
                "Item A dropped at position 2 of 3.",
            ]
        );
        assert!(list.drain_announcements().is_empty());
    }
}
