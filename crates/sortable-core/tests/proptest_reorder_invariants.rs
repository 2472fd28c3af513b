//! Property-based tests for the reorder algorithm and the drag session.
//!
//! 1. **Permutation**: `move_index` keeps every element exactly once.
//! 2. **Identity**: `move_index(v, i, i) == v`.
//! 3. **Round trip**: `move_index(move_index(v, i, j), j, i) == v`.
//! 4. **Contract**: out-of-range indices are reported, never clamped.
//! 5. **No-op commit**: drags made only of self-targeting moves never commit.
//! 6. **Single commit**: one drag commits at most once, with its last preview.
//! 7. **Cancel reverts**: cancel restores the baseline and never commits.
//! 8. **Arbitrary streams**: any event sequence keeps the preview a
//!    permutation and commits no more often than it ends.

use proptest::prelude::*;
use sortable_core::error::{IndexRole, ReorderError};
use sortable_core::{move_index, move_order, DragEvent, DragSession, ItemId, Order, Transition};

// ── Helpers ─────────────────────────────────────────────────────────────

fn order_of(n: usize) -> Order {
    Order::try_from_ids((0..n).map(|i| ItemId::new(format!("i{i}"))).collect())
        .expect("generated ids are unique")
}

fn sorted(order: &Order) -> Vec<ItemId> {
    let mut ids = order.as_slice().to_vec();
    ids.sort();
    ids
}

/// A list length plus two valid indices into it.
fn len_and_indices() -> impl Strategy<Value = (usize, usize, usize)> {
    (1usize..24).prop_flat_map(|n| (Just(n), 0..n, 0..n))
}

/// Run `events` through a fresh session against `baseline`, collecting commits.
fn run(baseline: &Order, events: &[DragEvent]) -> (DragSession, Vec<Order>) {
    let mut session = DragSession::new();
    let mut commits = Vec::new();
    {
        let mut sink = |o: &Order| commits.push(o.clone());
        for event in events {
            session
                .apply(event, baseline, &mut sink)
                .expect("session never violates the reorder contract");
        }
    }
    (session, commits)
}

#[derive(Debug, Clone)]
enum Op {
    Start(usize),
    Move(usize),
    End,
    Cancel,
}

fn op(n: usize) -> impl Strategy<Value = Op> {
    // Indices up to n + 2 so unknown ids show up too.
    prop_oneof![
        1 => (0..n + 2).prop_map(Op::Start),
        6 => (0..n + 2).prop_map(Op::Move),
        1 => Just(Op::End),
        1 => Just(Op::Cancel),
    ]
}

fn to_event(op: &Op) -> DragEvent {
    match op {
        Op::Start(i) => DragEvent::Start(ItemId::new(format!("i{i}"))),
        Op::Move(i) => DragEvent::Move(ItemId::new(format!("i{i}"))),
        Op::End => DragEvent::End,
        Op::Cancel => DragEvent::Cancel,
    }
}

// ── Reorder algorithm ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn move_is_a_permutation((n, from, to) in len_and_indices()) {
        let order = order_of(n);
        let moved = move_order(&order, from, to).unwrap();
        prop_assert_eq!(moved.len(), n);
        prop_assert_eq!(sorted(&moved), sorted(&order));
        prop_assert_eq!(moved.get(to), order.get(from));
    }

    #[test]
    fn move_to_same_index_is_identity((n, i, _) in len_and_indices()) {
        let v: Vec<usize> = (0..n).collect();
        prop_assert_eq!(move_index(&v, i, i).unwrap(), v);
    }

    #[test]
    fn move_round_trips((n, i, j) in len_and_indices()) {
        let v: Vec<usize> = (0..n).collect();
        let there = move_index(&v, i, j).unwrap();
        prop_assert_eq!(move_index(&there, j, i).unwrap(), v);
    }

    #[test]
    fn move_preserves_relative_order_of_others((n, from, to) in len_and_indices()) {
        let v: Vec<usize> = (0..n).collect();
        let moved = move_index(&v, from, to).unwrap();
        let rest_before: Vec<usize> = v.iter().copied().filter(|&x| x != from).collect();
        let rest_after: Vec<usize> = moved.iter().copied().filter(|&x| x != from).collect();
        prop_assert_eq!(rest_before, rest_after);
    }

    #[test]
    fn out_of_range_is_reported((n, i, _) in len_and_indices(), extra in 0usize..8) {
        let v: Vec<usize> = (0..n).collect();
        let bad = n + extra;
        prop_assert_eq!(
            move_index(&v, bad, i),
            Err(ReorderError::IndexOutOfRange { index: bad, len: n, role: IndexRole::From })
        );
        prop_assert_eq!(
            move_index(&v, i, bad),
            Err(ReorderError::IndexOutOfRange { index: bad, len: n, role: IndexRole::To })
        );
    }
}

// ── Drag session ────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn self_targeting_drag_never_commits((n, active, _) in len_and_indices(), repeats in 0usize..6) {
        let order = order_of(n);
        let id = order.get(active).unwrap().clone();
        let mut events = vec![DragEvent::Start(id.clone())];
        events.extend(std::iter::repeat_n(DragEvent::Move(id), repeats));
        events.push(DragEvent::End);
        let (session, commits) = run(&order, &events);
        prop_assert!(commits.is_empty());
        prop_assert_eq!(session.gate().unchanged(), 1);
    }

    #[test]
    fn one_drag_commits_at_most_once_with_last_preview(
        n in 2usize..12,
        active in 0usize..12,
        moves in prop::collection::vec(0usize..12, 0..16),
    ) {
        let order = order_of(n);
        let active = order.get(active % n).unwrap().clone();
        let mut session = DragSession::new();
        let mut commits = Vec::new();
        let mut last_preview = order.clone();
        {
            let mut sink = |o: &Order| commits.push(o.clone());
            session.apply(&DragEvent::Start(active.clone()), &order, &mut sink).unwrap();
            for m in moves {
                let target = order.get(m % n).unwrap().clone();
                session.apply(&DragEvent::Move(target), &order, &mut sink).unwrap();
                let preview = session.preview().unwrap();
                prop_assert_eq!(sorted(preview), sorted(&order));
                last_preview = preview.clone();
            }
            session.apply(&DragEvent::End, &order, &mut sink).unwrap();
        }
        if last_preview == order {
            prop_assert!(commits.is_empty());
        } else {
            prop_assert_eq!(commits, vec![last_preview]);
        }
        prop_assert!(!session.is_dragging());
    }

    #[test]
    fn cancel_restores_baseline(
        n in 1usize..12,
        active in 0usize..12,
        moves in prop::collection::vec(0usize..12, 0..16),
    ) {
        let order = order_of(n);
        let active = order.get(active % n).unwrap().clone();
        let mut events = vec![DragEvent::Start(active.clone())];
        events.extend(moves.iter().map(|m| DragEvent::Move(order.get(m % n).unwrap().clone())));
        events.push(DragEvent::Cancel);

        let mut session = DragSession::new();
        let mut commits = Vec::new();
        let mut last = None;
        {
            let mut sink = |o: &Order| commits.push(o.clone());
            for event in &events {
                last = Some(session.apply(event, &order, &mut sink).unwrap());
            }
        }
        prop_assert!(commits.is_empty());
        prop_assert!(session.preview().is_none());
        let restored = order.index_of(&active).unwrap();
        let expected = Transition::Cancelled { active, index: restored, len: n };
        prop_assert_eq!(last, Some(expected));
    }

    #[test]
    fn arbitrary_streams_keep_invariants(
        (n, ops) in (1usize..8).prop_flat_map(|n| (Just(n), prop::collection::vec(op(n), 0..40))),
    ) {
        let order = order_of(n);
        let mut session = DragSession::new();
        let mut commits = Vec::new();
        let mut ends = 0u64;
        {
            let mut sink = |o: &Order| commits.push(o.clone());
            for op in &ops {
                let was_dragging = session.is_dragging();
                let t = session.apply(&to_event(op), &order, &mut sink).unwrap();
                if matches!(t, Transition::Ended { .. }) {
                    prop_assert!(was_dragging);
                    ends += 1;
                }
                if let Some(preview) = session.preview() {
                    prop_assert_eq!(sorted(preview), sorted(&order));
                }
            }
        }
        prop_assert!(commits.len() as u64 <= ends);
        prop_assert_eq!(session.gate().committed(), commits.len() as u64);
        for commit in &commits {
            prop_assert_ne!(commit, &order);
        }
    }
}
