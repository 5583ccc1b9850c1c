// src/filter.rs
//! The request loop: decode a request, render it straight into the response
//! encoder, repeat until the input ends.

use crate::io::{HeightfieldEncoder, RequestDecoder};
use crate::render::Renderer;
use anyhow::{Context, Result};
use std::io::{Read, Write};

/// Status of the filter after handling one request.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FilterStatus {
    /// A request was answered; more may follow.
    Running,
    /// The input ended between requests.
    Finished,
}

pub struct RequestFilter<R: Read, W: Write> {
    decoder: RequestDecoder<R>,
    encoder: HeightfieldEncoder<W>,
    renderer: Renderer,
    processed: usize,
}

impl<R: Read, W: Write> RequestFilter<R, W> {
    pub fn new(input: R, output: W, renderer: Renderer) -> Self {
        RequestFilter {
            decoder: RequestDecoder::new(input),
            encoder: HeightfieldEncoder::new(output),
            renderer,
            processed: 0,
        }
    }

    /// Answers the next request, if any.
    pub fn process_next(&mut self) -> Result<FilterStatus> {
        let Some(request) = self.decoder.next_request()? else {
            log::info!("Filter: input ended after {} requests.", self.processed);
            return Ok(FilterStatus::Finished);
        };
        let window = request.window();
        log::debug!(
            "Filter: rendering request {} ({} rows x {} columns).",
            self.processed + 1,
            window.row_count(),
            window.width()
        );
        self.encoder.begin_array()?;
        self.renderer
            .render(&request, &mut self.encoder)
            .with_context(|| format!("Failed to answer request {}", self.processed + 1))?;
        self.encoder.end_array()?;
        self.processed += 1;
        Ok(FilterStatus::Running)
    }

    /// Answers requests until the input ends and returns how many were answered.
    pub fn run(&mut self) -> Result<usize> {
        while self.process_next()? == FilterStatus::Running {}
        Ok(self.processed)
    }

    pub fn into_writer(self) -> W {
        self.encoder.into_inner()
    }
}
