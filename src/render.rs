// src/render.rs

//! Renders terrain changes into a heightfield window.
//!
//! Every change is a circle on a toroidal grid that raises or lowers the
//! cells whose centres it covers. The `Renderer` avoids evaluating every
//! cell against every change:
//!
//! 1. changes are scaled to grid units and zero-radius ones dropped;
//! 2. deltas are optionally rescaled to fixed point (`precision`);
//! 3. each change is replicated into the wraparound copies that reach the
//!    requested window (`replicate`);
//! 4. for each row, every copy contributes one run of columns (`span`),
//!    folded into a difference array (`accumulate`);
//! 5. the prefix sum of that array is the finished row, handed to a
//!    `RowSink`.
//!
//! `oracle` holds the brute-force renderer the tests compare against.

pub mod accumulate;
#[cfg(test)]
pub mod oracle;
pub mod precision;
pub mod replicate;
pub mod span;


use crate::change::{Change, Request, ScaledChange, Window};
use crate::config::RenderConfig;
use accumulate::{DeltaAccumulator, DeltaValue};
use precision::FixedPoint;
use replicate::replicate;
use span::row_span;

use anyhow::Result;
use log::{debug, trace};

/// Receives finished rows in increasing row order.
pub trait RowSink {
    fn emit_row(&mut self, row: &[f32]) -> Result<()>;
}

impl RowSink for Vec<Vec<f32>> {
    fn emit_row(&mut self, row: &[f32]) -> Result<()> {
        self.push(row.to_vec());
        Ok(())
    }
}

/// Sweep-line heightfield renderer.
///
/// Holds no per-request state; every call allocates its own scratch buffers,
/// so one `Renderer` can serve any number of requests, from any thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renderer {
    fixed_point: bool,
}

impl Default for Renderer {
    fn default() -> Self {
        Renderer::new(&RenderConfig::default())
    }
}

impl Renderer {
    pub fn new(config: &RenderConfig) -> Self {
        Renderer {
            fixed_point: config.fixed_point,
        }
    }

    /// Renders the window a request asks for.
    pub fn render<S>(&self, request: &Request, sink: &mut S) -> Result<()>
    where
        S: RowSink + ?Sized,
    {
        self.render_window(request.size, request.window(), &request.changes, sink)
    }

    /// Emits one row per `y` in `[window.low, window.high)`, each holding
    /// `window.width()` heights. The only errors are the sink's.
    pub fn render_window<S>(
        &self,
        size: u32,
        window: Window,
        changes: &[Change],
        sink: &mut S,
    ) -> Result<()>
    where
        S: RowSink + ?Sized,
    {
        let scaled: Vec<ScaledChange<f64>> = changes
            .iter()
            .map(|change| change.scaled(size))
            .filter(|change| change.radius > 0.0)
            .collect();
        debug!(
            "Rendering {:?} of a {}x{} canvas from {} change(s) ({} with area)",
            window,
            size,
            size,
            changes.len(),
            scaled.len()
        );

        if self.fixed_point {
            let fixed = FixedPoint::for_changes(&scaled);
            let quantized: Vec<ScaledChange<i64>> = scaled
                .iter()
                .map(|change| change.with_delta(fixed.quantize(change.delta)))
                .collect();
            sweep(size, &window, &quantized, sink, |acc| fixed.height(acc))
        } else {
            sweep(size, &window, &scaled, sink, |acc| acc as f32)
        }
    }
}

fn sweep<D, S, F>(
    size: u32,
    window: &Window,
    changes: &[ScaledChange<D>],
    sink: &mut S,
    to_height: F,
) -> Result<()>
where
    D: DeltaValue,
    S: RowSink + ?Sized,
    F: Fn(D) -> f32,
{
    let mut row = vec![0.0f32; window.width()];
    if row.is_empty() {
        for _ in window.rows() {
            sink.emit_row(&row)?;
        }
        return Ok(());
    }

    let placements = replicate(changes, size, window);
    trace!(
        "{} placement(s) reach the window from {} change(s)",
        placements.len(),
        changes.len()
    );
    let mut accumulator = DeltaAccumulator::new(window);
    for y in window.rows() {
        for placement in &placements {
            if let Some(span) = row_span(placement, y, size) {
                accumulator.add_span(span, placement.delta);
            }
        }
        accumulator.sweep_into(&mut row, &to_height);
        sink.emit_row(&row)?;
    }
    Ok(())
}
