// src/change.rs

//! Value types of a render request: the circular height changes, the canvas
//! they are painted on and the window of rows/columns to compute.
//!
//! Everything here is created per request and dropped once the response has
//! been written. Nothing is validated beyond what the decoder enforces: the
//! renderer assumes finite numbers.

use serde::Deserialize;

/// A circular, signed height perturbation.
///
/// Centre and radius are fractions of the canvas side; `delta` is added to
/// every cell whose centre lies inside the circle.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "[f64; 4]")]
pub struct Change {
    pub x: f64,
    pub y: f64,
    pub r: f64,
    pub delta: f64,
}

impl From<[f64; 4]> for Change {
    fn from([x, y, r, delta]: [f64; 4]) -> Self {
        Change { x, y, r, delta }
    }
}

impl Change {
    pub fn new(x: f64, y: f64, r: f64, delta: f64) -> Self {
        Change { x, y, r, delta }
    }

    /// Maps the change into grid units of a `size × size` torus.
    ///
    /// The centre is reduced modulo `size` so both `0.0` and `1.0` name the
    /// seam, and the radius is capped at half the side: a larger circle
    /// would overlap itself around the torus.
    pub fn scaled(&self, size: u32) -> ScaledChange<f64> {
        let side = f64::from(size);
        ScaledChange {
            cx: (self.x * side).rem_euclid(side),
            cy: (self.y * side).rem_euclid(side),
            radius: self.r.clamp(0.0, 1.0) * 0.5 * side,
            delta: self.delta,
        }
    }
}

/// A change in grid units, possibly translated by `±size` to stand in for
/// one of its wraparound copies. `D` is the delta representation used by
/// the accumulator (`f64`, or `i64` once fixed-point rescaled).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledChange<D> {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    pub delta: D,
}

impl<D> ScaledChange<D> {
    pub fn with_delta<E>(&self, delta: E) -> ScaledChange<E> {
        ScaledChange {
            cx: self.cx,
            cy: self.cy,
            radius: self.radius,
            delta,
        }
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self
    where
        D: Copy,
    {
        ScaledChange {
            cx: self.cx + dx,
            cy: self.cy + dy,
            radius: self.radius,
            delta: self.delta,
        }
    }
}

/// The sub-rectangle of the canvas to compute: rows `[low, high)` and
/// columns `[left, right)`, all within `[0, size]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub low: u32,
    pub high: u32,
    pub left: u32,
    pub right: u32,
}

impl Window {
    /// The whole canvas.
    pub fn full(size: u32) -> Self {
        Window {
            low: 0,
            high: size,
            left: 0,
            right: size,
        }
    }

    /// Applies defaults for missing bounds and clamps given ones to the canvas.
    pub fn resolve(
        size: u32,
        low: Option<u32>,
        high: Option<u32>,
        left: Option<u32>,
        right: Option<u32>,
    ) -> Self {
        let clamp = |bound: Option<u32>, default: u32| bound.map_or(default, |b| b.min(size));
        Window {
            low: clamp(low, 0),
            high: clamp(high, size),
            left: clamp(left, 0),
            right: clamp(right, size),
        }
    }

    /// Number of rows emitted; zero when `high <= low`.
    pub fn row_count(&self) -> usize {
        self.high.saturating_sub(self.low) as usize
    }

    /// Number of values per emitted row; zero when `right <= left`.
    pub fn width(&self) -> usize {
        self.right.saturating_sub(self.left) as usize
    }

    pub fn rows(&self) -> std::ops::Range<u32> {
        self.low..self.high.max(self.low)
    }
}

/// One decoded request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Request {
    pub size: u32,
    #[serde(default)]
    pub low: Option<u32>,
    #[serde(default)]
    pub high: Option<u32>,
    #[serde(default)]
    pub left: Option<u32>,
    #[serde(default)]
    pub right: Option<u32>,
    pub changes: Vec<Change>,
}

impl Request {
    pub fn window(&self) -> Window {
        Window::resolve(self.size, self.low, self.high, self.left, self.right)
    }
}
