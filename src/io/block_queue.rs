// src/io/block_queue.rs

//! Bounded hand-off of filled input blocks from the reader thread to the
//! decoder, with recycling of emptied blocks.
//!
//! The reader fills one block at a time and `add`s it; in exchange it gets
//! back the block the decoder last returned (or a fresh one). At most
//! `capacity` filled blocks wait in the queue and at most one emptied block
//! waits to be reused. `end` wakes every waiter: afterwards `remove` drains
//! what is left and then reports `None` instead of blocking.

use anyhow::Error as AnyhowError;
use log::{debug, trace};
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

pub type Block = Vec<u8>;

#[derive(Debug, Default)]
struct QueueState {
    queue: VecDeque<Block>,
    available: Option<Block>,
    ended: bool,
    failure: Option<AnyhowError>,
}

#[derive(Debug)]
pub struct BlockQueue {
    state: Mutex<QueueState>,
    waiter: Condvar,
    capacity: usize,
}

impl BlockQueue {
    pub fn new(capacity: usize) -> Self {
        BlockQueue {
            state: Mutex::new(QueueState::default()),
            waiter: Condvar::new(),
            capacity: capacity.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wait<'a>(&self, guard: MutexGuard<'a, QueueState>) -> MutexGuard<'a, QueueState> {
        self.waiter
            .wait(guard)
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Queues a filled block and returns an empty one to fill next.
    ///
    /// Waits while the queue is full. Once the queue has ended, the block is
    /// dropped instead of queued.
    pub fn add(&self, filled: Block) -> Block {
        let mut state = self.lock();
        while state.queue.len() >= self.capacity && !state.ended {
            trace!("Block queue full, reader waiting");
            state = self.wait(state);
        }
        if state.ended {
            debug!("Block queue ended, dropping {} byte block", filled.len());
        } else {
            state.queue.push_back(filled);
        }
        let next = state.available.take().unwrap_or_default();
        drop(state);
        self.waiter.notify_all();
        next
    }

    /// Takes the oldest filled block, handing `emptied` back for reuse.
    ///
    /// With `wait`, blocks until a block arrives or the queue ends;
    /// otherwise returns `None` immediately when nothing is queued.
    pub fn remove(&self, emptied: Option<Block>, wait: bool) -> Option<Block> {
        let mut state = self.lock();
        if let Some(mut block) = emptied {
            if state.available.is_none() {
                block.clear();
                state.available = Some(block);
            }
        }
        loop {
            if let Some(block) = state.queue.pop_front() {
                drop(state);
                self.waiter.notify_all();
                return Some(block);
            }
            if !wait || state.ended {
                return None;
            }
            state = self.wait(state);
        }
    }

    /// No more blocks will be added.
    pub fn end(&self) {
        self.lock().ended = true;
        self.waiter.notify_all();
    }

    /// Ends the queue because the producer failed; the consumer retrieves
    /// the reason with `take_failure` once it has drained the queue.
    pub fn fail(&self, error: AnyhowError) {
        {
            let mut state = self.lock();
            state.failure = Some(error);
            state.ended = true;
        }
        self.waiter.notify_all();
    }

    pub fn take_failure(&self) -> Option<AnyhowError> {
        self.lock().failure.take()
    }

    /// `end` or `fail` has been called, whether or not blocks remain.
    pub fn is_closed(&self) -> bool {
        self.lock().ended
    }

}
