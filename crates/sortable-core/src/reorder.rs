#![forbid(unsafe_code)]

//! Index-permutation arithmetic.
//!
//! [`move_index`] removes the element at `from` and reinserts it at `to`,
//! shifting every element in between by exactly one slot. All other
//! relative orderings are preserved.
//!
//! # Invariants
//!
//! 1. The output is a permutation of the input.
//! 2. `move_index(xs, i, i) == xs`.
//! 3. `move_index(move_index(xs, i, j), j, i) == xs`.
//!
//! # Failure Modes
//!
//! Out-of-range indices are reported as [`ReorderError::IndexOutOfRange`].
//! They are never clamped: a bad index means a caller lost track of its
//! bookkeeping.

use crate::error::{IndexRole, ReorderError};
use crate::item::Order;

fn check(index: usize, len: usize, role: IndexRole) -> Result<(), ReorderError> {
    if index < len {
        Ok(())
    } else {
        Err(ReorderError::IndexOutOfRange { index, len, role })
    }
}

/// Move the element at `from` to `to`, in place.
pub fn move_in_place<T>(items: &mut [T], from: usize, to: usize) -> Result<(), ReorderError> {
    let len = items.len();
    check(from, len, IndexRole::From)?;
    check(to, len, IndexRole::To)?;
    if from < to {
        items[from..=to].rotate_left(1);
    } else if to < from {
        items[to..=from].rotate_right(1);
    }
    Ok(())
}

/// Return a copy of `items` with the element at `from` moved to `to`.
pub fn move_index<T: Clone>(items: &[T], from: usize, to: usize) -> Result<Vec<T>, ReorderError> {
    let mut out = items.to_vec();
    move_in_place(&mut out, from, to)?;
    Ok(out)
}

/// [`move_index`] over an [`Order`].
pub fn move_order(order: &Order, from: usize, to: usize) -> Result<Order, ReorderError> {
    move_index(order.as_slice(), from, to).map(Order::from_unique)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_forward_shifts_intervening_back() {
        let out = move_index(&['A', 'B', 'C', 'D'], 0, 2).unwrap();
        assert_eq!(out, vec!['B', 'C', 'A', 'D']);
    }

    #[test]
    fn move_backward_shifts_intervening_forward() {
        let out = move_index(&['A', 'B', 'C', 'D'], 3, 1).unwrap();
        assert_eq!(out, vec!['A', 'D', 'B', 'C']);
    }

    #[test]
    fn same_index_is_identity() {
        let xs = ['A', 'B', 'C'];
        for i in 0..xs.len() {
            assert_eq!(move_index(&xs, i, i).unwrap(), xs.to_vec());
        }
    }

    #[test]
    fn to_end_and_to_front() {
        assert_eq!(move_index(&[1, 2, 3], 0, 2).unwrap(), vec![2, 3, 1]);
        assert_eq!(move_index(&[1, 2, 3], 2, 0).unwrap(), vec![3, 1, 2]);
    }

    #[test]
    fn out_of_range_is_reported_not_clamped() {
        assert_eq!(
            move_index(&[1, 2, 3], 3, 0),
            Err(ReorderError::IndexOutOfRange {
                index: 3,
                len: 3,
                role: IndexRole::From
            })
        );
        assert_eq!(
            move_index(&[1, 2, 3], 0, 7),
            Err(ReorderError::IndexOutOfRange {
                index: 7,
                len: 3,
                role: IndexRole::To
            })
        );
    }

    #[test]
    fn empty_list_rejects_every_index() {
        let empty: [u8; 0] = [];
        assert!(move_index(&empty, 0, 0).is_err());
    }

    #[test]
    fn in_place_leaves_input_untouched_on_error() {
        let mut xs = vec![1, 2, 3];
        assert!(move_in_place(&mut xs, 1, 9).is_err());
        assert_eq!(xs, vec![1, 2, 3]);
    }

    #[test]
    fn move_order_keeps_ids() {
        let order = Order::try_from(["A", "B", "C"]).unwrap();
        let moved = move_order(&order, 2, 0).unwrap();
        assert_eq!(moved, Order::try_from(["C", "A", "B"]).unwrap());
    }
}
