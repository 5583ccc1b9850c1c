// src/render/replicate.rs

//! Wraparound copies of changes near the canvas edges.
//!
//! A circle close to one edge of the torus also covers cells along the
//! opposite edge. Instead of making every span wrap, each change is placed at
//! its own position and at its translations by `±size` along x, y and both
//! diagonals; only the placements that genuinely reach the window are kept.
//! Downstream code then works in plain, non-wrapping grid coordinates.

use crate::change::{ScaledChange, Window};

/// `(minus, plus)` translation pairs in units of the canvas side: x, y and
/// the two diagonals. Since the radius is at most half the side, a change can
/// reach the window through at most one member of each pair.
const TRANSLATION_PAIRS: [((f64, f64), (f64, f64)); 4] = [
    ((-1.0, 0.0), (1.0, 0.0)),
    ((0.0, -1.0), (0.0, 1.0)),
    ((-1.0, -1.0), (1.0, 1.0)),
    ((-1.0, 1.0), (1.0, -1.0)),
];

/// The window as a closed rectangle in grid units.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Bounds {
    left: f64,
    right: f64,
    low: f64,
    high: f64,
}

impl Bounds {
    fn of(window: &Window) -> Self {
        Bounds {
            left: f64::from(window.left),
            right: f64::from(window.right),
            low: f64::from(window.low),
            high: f64::from(window.high),
        }
    }

    /// Keeps `candidate` when the circle intersects the rectangle.
    ///
    /// Returns whether the circle's bounding box overlapped the rectangle,
    /// whether or not the circle itself was kept.
    fn consider<D: Copy>(
        &self,
        candidate: ScaledChange<D>,
        placements: &mut Vec<ScaledChange<D>>,
    ) -> bool {
        let ScaledChange { cx, cy, radius, .. } = candidate;
        if cx + radius < self.left
            || self.right < cx - radius
            || cy + radius < self.low
            || self.high < cy - radius
        {
            return false;
        }
        let dx = gap(cx, self.left, self.right);
        let dy = gap(cy, self.low, self.high);
        if dx * dx + dy * dy <= radius * radius {
            placements.push(candidate);
        }
        true
    }
}

/// Distance from `value` to the interval `[low, high]`.
fn gap(value: f64, low: f64, high: f64) -> f64 {
    if value < low {
        low - value
    } else if high < value {
        value - high
    } else {
        0.0
    }
}

/// Every placement of `changes` that reaches `window` on a torus of side
/// `size`. Expects centres in `[0, size)` and radii in `[0, size / 2]`.
pub fn replicate<D: Copy>(
    changes: &[ScaledChange<D>],
    size: u32,
    window: &Window,
) -> Vec<ScaledChange<D>> {
    let bounds = Bounds::of(window);
    let side = f64::from(size);
    let mut placements = Vec::with_capacity(changes.len());
    for change in changes {
        bounds.consider(*change, &mut placements);
        for ((mx, my), (px, py)) in TRANSLATION_PAIRS {
            if !bounds.consider(change.translated(mx * side, my * side), &mut placements) {
                bounds.consider(change.translated(px * side, py * side), &mut placements);
            }
        }
    }
    placements
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    const SIDE: f64 = 1.0;

    fn unit_bounds() -> Bounds {
        Bounds {
            left: 0.0,
            right: 2.0 * SIDE,
            low: 0.0,
            high: 2.0 * SIDE,
        }
    }

    fn circle(cx: f64, cy: f64) -> ScaledChange<i64> {
        ScaledChange {
            cx,
            cy,
            radius: SIDE,
            delta: 1024,
        }
    }

    #[test]
    fn gap_to_interval() {
        assert_eq!(gap(-1.0, 0.0, 2.0), 1.0);
        assert_eq!(gap(0.0, 0.0, 2.0), 0.0);
        assert_eq!(gap(1.0, 0.0, 2.0), 0.0);
        assert_eq!(gap(2.0, 0.0, 2.0), 0.0);
        assert_eq!(gap(3.0, 0.0, 2.0), 1.0);
    }

    #[test]
    fn circle_inside_is_kept() {
        let mut kept = Vec::new();
        assert!(unit_bounds().consider(circle(SIDE, SIDE), &mut kept));
        assert_eq!(kept, vec![circle(SIDE, SIDE)]);
    }

    #[test]
    fn circles_clear_of_each_edge_are_dropped() {
        let bounds = unit_bounds();
        for (cx, cy) in [
            (-2.0 * SIDE, SIDE),
            (4.0 * SIDE, SIDE),
            (SIDE, -2.0 * SIDE),
            (SIDE, 4.0 * SIDE),
        ] {
            let mut kept = Vec::new();
            assert!(!bounds.consider(circle(cx, cy), &mut kept));
            assert!(kept.is_empty());
        }
    }

    #[test]
    fn circles_straddling_each_edge_are_kept() {
        let bounds = unit_bounds();
        for (cx, cy) in [
            (-0.5 * SIDE, SIDE),
            (2.5 * SIDE, SIDE),
            (SIDE, -0.5 * SIDE),
            (SIDE, 2.5 * SIDE),
        ] {
            let mut kept = Vec::new();
            assert!(bounds.consider(circle(cx, cy), &mut kept));
            assert_eq!(kept, vec![circle(cx, cy)]);
        }
    }

    #[test]
    fn bounding_box_overlap_at_corner_is_not_enough() {
        let mut kept = Vec::new();
        assert!(unit_bounds().consider(circle(-0.8, -0.8), &mut kept));
        assert!(kept.is_empty());
    }

    #[test]
    fn central_change_has_one_placement() {
        let changes = vec![circle(5.0, 5.0)];
        let placements = replicate(&changes, 10, &Window::full(10));
        assert_eq!(placements, changes);
    }

    #[test]
    fn corner_change_has_four_placements() {
        let change = ScaledChange {
            cx: 0.5,
            cy: 0.5,
            radius: 2.0,
            delta: 1.0,
        };
        let placements = replicate(&[change], 10, &Window::full(10));
        let centres: Vec<(f64, f64)> = placements.iter().map(|p| (p.cx, p.cy)).collect();
        assert_eq!(
            centres,
            vec![(0.5, 0.5), (10.5, 0.5), (0.5, 10.5), (10.5, 10.5)]
        );
    }

    #[test]
    fn window_far_from_change_gets_only_the_wrapped_copy() {
        let change = ScaledChange {
            cx: 9.5,
            cy: 5.0,
            radius: 2.0,
            delta: 1.0,
        };
        let window = Window {
            low: 4,
            high: 6,
            left: 0,
            right: 2,
        };
        let placements = replicate(&[change], 10, &window);
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].cx, -0.5);
        assert_eq!(placements[0].cy, 5.0);
    }

    #[test]
    fn change_missing_window_has_no_placements() {
        let change = ScaledChange {
            cx: 5.0,
            cy: 5.0,
            radius: 1.0,
            delta: 1.0,
        };
        let window = Window {
            low: 0,
            high: 2,
            left: 0,
            right: 2,
        };
        assert!(replicate(&[change], 10, &window).is_empty());
    }
}
