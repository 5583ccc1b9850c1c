// src/io/decoder.rs

//! Turns the byte stream arriving through the block queue into requests.

use crate::change::Request;
use crate::io::block_queue::{Block, BlockQueue};
use anyhow::{bail, Context, Result};
use log::debug;
use serde_json::de::IoRead;
use serde_json::StreamDeserializer;
use std::io::{self, Read};
use std::sync::Arc;

/// `Read` adapter over the blocks of a `BlockQueue`.
///
/// Each exhausted block is handed back to the queue for the reader thread to
/// refill. A reader failure surfaces as an `io::Error` once every block queued
/// before it has been consumed.
pub struct BlockReader {
    queue: Arc<BlockQueue>,
    block: Option<Block>,
    pos: usize,
}

impl BlockReader {
    pub fn new(queue: Arc<BlockQueue>) -> Self {
        BlockReader {
            queue,
            block: None,
            pos: 0,
        }
    }
}

impl Read for BlockReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        loop {
            if let Some(block) = &self.block {
                let rest = &block[self.pos..];
                if !rest.is_empty() {
                    let count = rest.len().min(buf.len());
                    buf[..count].copy_from_slice(&rest[..count]);
                    self.pos += count;
                    return Ok(count);
                }
            }
            let emptied = self.block.take();
            self.pos = 0;
            match self.queue.remove(emptied, true) {
                Some(block) => self.block = Some(block),
                None => {
                    return match self.queue.take_failure() {
                        Some(e) => Err(io::Error::other(format!("{:#}", e))),
                        None => Ok(0),
                    }
                }
            }
        }
    }
}

/// Yields one request per JSON object in the stream. Objects may be
/// concatenated directly or separated by whitespace.
pub struct RequestDecoder<R: Read> {
    stream: StreamDeserializer<'static, IoRead<R>, Request>,
    decoded: usize,
}

impl<R: Read> RequestDecoder<R> {
    pub fn new(reader: R) -> Self {
        RequestDecoder {
            stream: serde_json::Deserializer::from_reader(reader).into_iter(),
            decoded: 0,
        }
    }

    /// Next request, or `None` once the stream ends cleanly between requests.
    pub fn next_request(&mut self) -> Result<Option<Request>> {
        let Some(next) = self.stream.next() else {
            debug!("Request stream ended after {} requests", self.decoded);
            return Ok(None);
        };
        let request = next.with_context(|| {
            format!("Failed to decode request {}", self.decoded + 1)
        })?;
        if request.size == 0 {
            bail!(
                "Failed to decode request {}: canvas size must be positive",
                self.decoded + 1
            );
        }
        self.decoded += 1;
        debug!(
            "Decoded request {}: size {}, {} changes, window {:?}",
            self.decoded,
            request.size,
            request.changes.len(),
            request.window()
        );
        Ok(Some(request))
    }
}
