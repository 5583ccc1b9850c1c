// src/io/encoder.rs

//! Streams `{"heightfield":[[...],...]}` responses row by row.

use crate::render::RowSink;
use anyhow::{Context, Result};
use log::trace;
use std::io::Write;

pub struct HeightfieldEncoder<W: Write> {
    out: W,
    rows: usize,
}

impl<W: Write> HeightfieldEncoder<W> {
    pub fn new(out: W) -> Self {
        HeightfieldEncoder { out, rows: 0 }
    }

    /// Opens a response.
    pub fn begin_array(&mut self) -> Result<()> {
        self.rows = 0;
        self.out
            .write_all(b"{\"heightfield\":[")
            .context("Failed to write response header")
    }

    pub fn write_row(&mut self, row: &[f32]) -> Result<()> {
        if self.rows > 0 {
            self.out
                .write_all(b",")
                .context("Failed to write row separator")?;
        }
        serde_json::to_writer(&mut self.out, row)
            .with_context(|| format!("Failed to write row {}", self.rows))?;
        self.rows += 1;
        Ok(())
    }

    /// Closes the response, terminates it with a newline and flushes.
    pub fn end_array(&mut self) -> Result<()> {
        self.out
            .write_all(b"]}\n")
            .context("Failed to write response trailer")?;
        self.out.flush().context("Failed to flush response")?;
        trace!("Response of {} rows written", self.rows);
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RowSink for HeightfieldEncoder<W> {
    fn emit_row(&mut self, row: &[f32]) -> Result<()> {
        self.write_row(row)
    }
}
