// src/render/precision.rs

//! Fixed-point rescaling of deltas.
//!
//! Summing many `f64` deltas per cell drifts; summing integers does not.
//! Each delta is multiplied by a power of two chosen so that no prefix sum
//! can leave the `i64` range, rounded, accumulated exactly, and divided back
//! when a row is emitted.

use crate::change::ScaledChange;
use log::trace;

/// Headroom kept for the number of changes when there are few of them.
const BASELINE_COUNT_BITS: u32 = 12;
/// Headroom for the up to four placements one change can have on a torus.
const PLACEMENT_BITS: u32 = 2;
/// Magnitude bits of an `i64` left after the sign bit and one guard bit.
const USABLE_BITS: i32 = 62;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedPoint {
    scale: f64,
}

impl FixedPoint {
    /// Picks the scale for a set of changes.
    ///
    /// With `n` changes and largest magnitude `m`, the scale `S` is the
    /// largest power of two with `S · m ≤ 2^(62 − h)`, where `h` reserves
    /// `max(12, ceil(log2 n))` bits for the count plus two for placements.
    pub fn for_changes<D>(changes: &[ScaledChange<D>]) -> Self
    where
        D: Copy + Into<f64>,
    {
        let max_abs = changes
            .iter()
            .map(|change| change.delta.into().abs())
            .fold(0.0, f64::max);
        let fixed = Self::for_magnitude(max_abs, changes.len());
        trace!(
            "Fixed-point scale {:e} for {} change(s), max |delta| {}",
            fixed.scale,
            changes.len(),
            max_abs
        );
        fixed
    }

    pub fn for_magnitude(max_abs: f64, count: usize) -> Self {
        if !(max_abs > 0.0) || !max_abs.is_finite() {
            return FixedPoint { scale: 1.0 };
        }
        let count_bits = ceil_log2(count).max(BASELINE_COUNT_BITS) + PLACEMENT_BITS;
        let room = 2f64.powi(USABLE_BITS - count_bits as i32);
        let exponent = (room / max_abs)
            .log2()
            .floor()
            .clamp(f64::from(f64::MIN_EXP - 1), f64::from(f64::MAX_EXP - 1));
        FixedPoint {
            scale: 2f64.powi(exponent as i32),
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn quantize(&self, delta: f64) -> i64 {
        (delta * self.scale).round() as i64
    }

    pub fn height(&self, accumulated: i64) -> f32 {
        (accumulated as f64 / self.scale) as f32
    }
}

fn ceil_log2(count: usize) -> u32 {
    if count <= 1 {
        0
    } else {
        usize::BITS - (count - 1).leading_zeros()
    }
}
