#![forbid(unsafe_code)]

//! Collision resolution: which item is the dragged rectangle "over"?
//!
//! Candidates are scored by the distance between their center and the
//! dragged rectangle's center. Ties go to the candidate that comes first in
//! the slice, which callers pass in display order, so the result is
//! deterministic.
//!
//! There is no "no target" outcome while candidates exist: a dragged item
//! that overlaps nothing is still over whichever candidate is closest.

use crate::geometry::Rect;
use crate::item::ItemId;

/// Candidate whose center is nearest the center of `active`.
#[must_use]
pub fn closest_center<'a>(active: &Rect, candidates: &'a [(ItemId, Rect)]) -> Option<&'a ItemId> {
    let center = active.center();
    pick_min(candidates, |rect| center.distance(rect.center()))
}

fn pick_min<'a>(
    candidates: &'a [(ItemId, Rect)],
    score: impl Fn(&Rect) -> f32,
) -> Option<&'a ItemId> {
    let mut best: Option<(&'a ItemId, f32)> = None;
    for (id, rect) in candidates {
        let distance = score(rect);
        // Strict comparison keeps the earliest candidate on ties.
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ if distance.is_nan() => {}
            _ => best = Some((id, distance)),
        }
    }
    best.map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, index: usize) -> (ItemId, Rect) {
        (id.into(), Rect::new(0.0, index as f32 * 40.0, 200.0, 40.0))
    }

    #[test]
    fn picks_nearest_center() {
        let candidates = vec![row("A", 0), row("B", 1), row("C", 2)];
        let dragged = Rect::new(0.0, 70.0, 200.0, 40.0);
        assert_eq!(closest_center(&dragged, &candidates), Some(&ItemId::from("C")));
    }

    #[test]
    fn no_overlap_still_returns_closest() {
        let candidates = vec![row("A", 0), row("B", 1)];
        let far_away = Rect::new(900.0, 900.0, 200.0, 40.0);
        assert_eq!(closest_center(&far_away, &candidates), Some(&ItemId::from("B")));
    }

    #[test]
    fn tie_prefers_earlier_display_position() {
        // Active center sits exactly between display indices 1 and 3.
        let candidates = vec![row("A", 0), row("B", 1), row("C", 4), row("D", 3)];
        let between = Rect::new(0.0, 80.0, 200.0, 40.0);
        for _ in 0..10 {
            assert_eq!(closest_center(&between, &candidates), Some(&ItemId::from("B")));
        }
    }

    #[test]
    fn zero_candidates_yield_nothing() {
        let dragged = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(closest_center(&dragged, &[]), None);
    }

    #[test]
    fn nan_scores_are_skipped() {
        let candidates = vec![
            ("bad".into(), Rect::new(f32::NAN, 0.0, 1.0, 1.0)),
            row("A", 0),
        ];
        let dragged = Rect::new(0.0, 0.0, 200.0, 40.0);
        assert_eq!(closest_center(&dragged, &candidates), Some(&ItemId::from("A")));
    }
}
