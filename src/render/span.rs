// src/render/span.rs

//! Turns a circle placement into the run of columns it covers on one row.
//!
//! Cells are sampled at their centres, `(col + 0.5, row + 0.5)`. The chord
//! half-length gives approximate bounds; the exact first and one-past-last
//! columns are then picked by testing the neighbouring integer columns
//! against the circle, so boundary cells are classified by distance rather
//! than by rounding.

use crate::change::ScaledChange;

const CELL_CENTRE: f64 = 0.5;

/// Half-open run of columns `[from, to)` within `[0, size]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub from: u32,
    pub to: u32,
}

impl Span {
    pub fn is_empty(&self) -> bool {
        self.to <= self.from
    }
}

/// Columns of `row` whose centres the placement covers, or `None` when the
/// row misses the circle or no cell centre falls inside it.
///
/// A centre is covered when it lies within the radius, boundary included,
/// and its offset from the placement's centre falls in `[-size/2, size/2)`
/// on both axes. The offset rule only bites for a radius of half the side:
/// a cell exactly opposite the centre on the torus then belongs to the copy
/// whose centre lies right of or below it, so copies never cover one cell
/// twice.
pub fn row_span<D>(change: &ScaledChange<D>, row: u32, size: u32) -> Option<Span> {
    let radius = change.radius;
    if size == 0 || radius <= 0.0 {
        return None;
    }
    let half_side = f64::from(size) / 2.0;
    let within_period = |offset: f64| -half_side <= offset && offset < half_side;

    let r2 = radius * radius;
    let dy = f64::from(row) + CELL_CENTRE - change.cy;
    let dy2 = dy * dy;
    if dy2 > r2 || !within_period(dy) {
        return None;
    }

    let half_chord = (r2 - dy2).max(0.0).sqrt();
    let covers = |col: i64| {
        let dx = col as f64 + CELL_CENTRE - change.cx;
        within_period(dx) && dx * dx + dy2 <= r2
    };

    // Chord ends expressed in column indices.
    let first = (change.cx - half_chord - CELL_CENTRE).max(0.0);
    let last = change.cx + half_chord - CELL_CENTRE;
    let last_column = i64::from(size) - 1;

    let from = ((first.floor() as i64 - 1).max(0)..=(first.ceil() as i64 + 1).min(last_column))
        .find(|&col| covers(col))?;

    let scan_end = last.ceil() as i64 + 1;
    let to = ((from + 1).max(last.floor() as i64 - 1)..=scan_end)
        .find(|&col| col > last_column || !covers(col))
        .unwrap_or_else(|| (scan_end + 1).max(from + 1))
        .min(i64::from(size));

    Some(Span {
        from: from as u32,
        to: to as u32,
    })
}
