// src/render/accumulate.rs

//! Difference-array accumulation of one row at a time.
//!
//! Every span adds `+delta` at its first column and `-delta` one past its
//! last; a prefix sum then yields the height of each column. The cost of a
//! row is proportional to the number of spans plus the window width.

use super::span::Span;
use crate::change::Window;
use std::ops::{AddAssign, SubAssign};

/// Numeric type a row is accumulated in: `i64` for fixed point, `f64` for
/// direct floating accumulation.
pub trait DeltaValue: Copy + Default + AddAssign + SubAssign {}

impl DeltaValue for i64 {}
impl DeltaValue for f64 {}

/// Window-scoped difference array, reused across the rows of one request.
#[derive(Debug)]
pub struct DeltaAccumulator<D> {
    left: u32,
    right: u32,
    slots: Vec<D>,
}

impl<D: DeltaValue> DeltaAccumulator<D> {
    pub fn new(window: &Window) -> Self {
        DeltaAccumulator {
            left: window.left,
            right: window.right.max(window.left),
            slots: vec![D::default(); window.width() + 1],
        }
    }

    /// Folds one span into the current row.
    ///
    /// Columns left of the window shift into slot 0, which carries the same
    /// baseline a sweep from column 0 would have reached at `left`. Columns at
    /// or past `right` are never materialised.
    pub fn add_span(&mut self, span: Span, delta: D) {
        if span.is_empty() || span.from >= self.right || span.to <= self.left {
            return;
        }
        let from = (span.from.max(self.left) - self.left) as usize;
        let to = (span.to.min(self.right) - self.left) as usize;
        self.slots[from] += delta;
        self.slots[to] -= delta;
    }

    /// Runs the prefix sum into `row`, converting each running total with
    /// `to_height`, and clears every slot for the next row.
    pub fn sweep_into<F>(&mut self, row: &mut [f32], to_height: F)
    where
        F: Fn(D) -> f32,
    {
        debug_assert_eq!(row.len() + 1, self.slots.len());
        let mut height = D::default();
        for (slot, out) in self.slots.iter_mut().zip(row.iter_mut()) {
            height += *slot;
            *slot = D::default();
            *out = to_height(height);
        }
        // The closing slot only ever receives `-delta` for spans reaching `right`.
        if let Some(closing) = self.slots.last_mut() {
            *closing = D::default();
        }
    }
}
