//! Collision primitives shared by both resolvers
//!
//! Axis-aligned rectangles for the formation shooter, circle distance tests
//! for the vector game, and the deferred index removal both resolvers rely on.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle of the given size centred on `center`
    pub fn centered(center: Vec2, w: f32, h: f32) -> Self {
        Self {
            x: center.x - w / 2.0,
            y: center.y - h / 2.0,
            w,
            h,
        }
    }

    /// Strict overlap test. Touching edges do not count.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }

    /// Inclusive point containment
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// Circle overlap: distance between centres strictly less than the radius sum
#[inline]
pub fn circles_overlap(c1: Vec2, r1: f32, c2: Vec2, r2: f32) -> bool {
    c1.distance(c2) < r1 + r2
}

/// Remove the given indices from `items`.
///
/// Indices are deduplicated and removed highest first so earlier removals
/// never shift later ones. An index past the end is a resolver bug.
pub fn remove_at_indices<T>(items: &mut Vec<T>, indices: &[usize]) {
    let mut sorted: Vec<usize> = indices.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted.dedup();

    for idx in sorted {
        debug_assert!(
            idx < items.len(),
            "removal index {} out of range (len {})",
            idx,
            items.len()
        );
        if idx < items.len() {
            items.remove(idx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rect_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        // Shared edge is not an overlap
        assert!(!a.overlaps(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(0.0, 20.0, 10.0, 10.0)));
    }

    #[test]
    fn test_centered_rect() {
        let r = Rect::centered(Vec2::new(100.0, 50.0), 20.0, 10.0);
        assert_eq!(r, Rect::new(90.0, 45.0, 20.0, 10.0));
        assert_eq!(r.center(), Vec2::new(100.0, 50.0));
        assert!(r.contains(Vec2::new(90.0, 45.0)));
    }

    #[test]
    fn test_circles_overlap() {
        assert!(circles_overlap(Vec2::ZERO, 5.0, Vec2::new(9.0, 0.0), 5.0));
        assert!(!circles_overlap(Vec2::ZERO, 5.0, Vec2::new(10.0, 0.0), 5.0));
    }

    #[test]
    fn test_remove_at_indices_descending_with_duplicates() {
        let mut v = vec!['a', 'b', 'c', 'd', 'e'];
        remove_at_indices(&mut v, &[1, 3, 1]);
        assert_eq!(v, vec!['a', 'c', 'e']);
    }

    #[test]
    fn test_remove_at_indices_empty() {
        let mut v = vec![1, 2, 3];
        remove_at_indices(&mut v, &[]);
        assert_eq!(v, vec![1, 2, 3]);
    }

    fn rect_strategy() -> impl Strategy<Value = Rect> {
        (
            -500.0f32..500.0,
            -500.0f32..500.0,
            0.0f32..200.0,
            0.0f32..200.0,
        )
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    proptest! {
        #[test]
        fn rect_overlap_is_symmetric(a in rect_strategy(), b in rect_strategy()) {
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn circle_overlap_is_symmetric(
            x1 in -500.0f32..500.0, y1 in -500.0f32..500.0, r1 in 0.0f32..100.0,
            x2 in -500.0f32..500.0, y2 in -500.0f32..500.0, r2 in 0.0f32..100.0,
        ) {
            let a = Vec2::new(x1, y1);
            let b = Vec2::new(x2, y2);
            prop_assert_eq!(circles_overlap(a, r1, b, r2), circles_overlap(b, r2, a, r1));
        }

        #[test]
        fn removal_keeps_untouched_items_in_order(
            len in 0usize..20,
            picks in proptest::collection::vec(0usize..20, 0..10),
        ) {
            let mut items: Vec<usize> = (0..len).collect();
            let picks: Vec<usize> = picks.into_iter().filter(|&i| i < len).collect();
            remove_at_indices(&mut items, &picks);
            let expected: Vec<usize> = (0..len).filter(|i| !picks.contains(i)).collect();
            prop_assert_eq!(items, expected);
        }
    }
}
