// src/render/oracle.rs

//! Brute-force reference renderer.
//!
//! Evaluates every cell of the window against every change by looking for
//! the change's nearest image on the torus. It is quadratic and only exists
//! to check the sweep-line renderer.

use crate::change::{Change, ScaledChange, Window};

/// Image translations, in units of the canvas side, that can reach a cell
/// of the canvas from a centre inside it.
const IMAGE_OFFSETS: [f64; 3] = [-1.0, 0.0, 1.0];

/// Whether the cell centre `(sx, sy)` lies within the radius of the image of
/// `change` nearest to it.
///
/// Offsets from an image are taken in `[-side/2, side/2)` on each axis, so a
/// point exactly opposite the centre has one nearest image, not two.
fn covers(change: &ScaledChange<f64>, sx: f64, sy: f64, side: f64) -> bool {
    let half_side = side / 2.0;
    let nearest = |offset: f64| -half_side <= offset && offset < half_side;
    let r2 = change.radius * change.radius;
    IMAGE_OFFSETS.iter().any(|&i| {
        IMAGE_OFFSETS.iter().any(|&j| {
            let dx = sx - (change.cx + i * side);
            let dy = sy - (change.cy + j * side);
            nearest(dx) && nearest(dy) && dx * dx + dy * dy <= r2
        })
    })
}

/// Renders `window` cell by cell, summing in `f64`.
pub fn render_brute_force(size: u32, window: &Window, changes: &[Change]) -> Vec<Vec<f32>> {
    let side = f64::from(size);
    let scaled: Vec<_> = changes
        .iter()
        .map(|change| change.scaled(size))
        .filter(|change| change.radius > 0.0)
        .collect();
    window
        .rows()
        .map(|row| {
            let sy = f64::from(row) + 0.5;
            (window.left..window.right.max(window.left))
                .map(|col| {
                    let sx = f64::from(col) + 0.5;
                    scaled
                        .iter()
                        .filter(|change| covers(change, sx, sy, side))
                        .fold(0.0, |height, change| height + change.delta) as f32
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn single_bump() {
        let rows = render_brute_force(4, &Window::full(4), &[Change::new(0.5, 0.5, 0.49, 1.0)]);
        assert_eq!(
            rows,
            vec![
                vec![0.0, 0.0, 0.0, 0.0],
                vec![0.0, 1.0, 1.0, 0.0],
                vec![0.0, 1.0, 1.0, 0.0],
                vec![0.0, 0.0, 0.0, 0.0],
            ]
        );
    }

    #[test]
    fn bump_wraps_across_corner() {
        let rows = render_brute_force(4, &Window::full(4), &[Change::new(0.0, 0.0, 0.49, 2.0)]);
        assert_eq!(
            rows,
            vec![
                vec![2.0, 0.0, 0.0, 2.0],
                vec![0.0, 0.0, 0.0, 0.0],
                vec![0.0, 0.0, 0.0, 0.0],
                vec![2.0, 0.0, 0.0, 2.0],
            ]
        );
    }

    #[test]
    fn cell_centres_on_the_circle_are_covered() {
        // Grid centre (4, 3.5), radius 2.5.
        let rows = render_brute_force(8, &Window::full(8), &[Change::new(0.5, 0.4375, 0.625, 1.0)]);
        assert_eq!(rows[3], vec![0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0]);
        assert_eq!(rows[1], vec![0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn opposite_cell_is_counted_once() {
        // Grid centre (3.5, 3.5), radius 4: cell (7, 3) is half the side away
        // from both the change and its copy at x = 11.5.
        let rows = render_brute_force(8, &Window::full(8), &[Change::new(0.4375, 0.4375, 1.0, 1.0)]);
        assert_eq!(rows[3][7], 1.0);
        assert_eq!(rows[7][3], 1.0);
        assert_eq!(rows[7][7], 0.0);
    }

    #[test]
    fn uncovered_cells_are_positive_zero() {
        let rows = render_brute_force(4, &Window::full(4), &[Change::new(0.5, 0.5, 0.1, -3.0)]);
        assert!(rows[0][0].is_sign_positive());
        let rows = render_brute_force(2, &Window::full(2), &[]);
        assert!(rows.iter().flatten().all(|h| h.to_bits() == 0));
    }
}
