// src/io/read_thread.rs

use crate::config::InputConfig;
use crate::io::block_queue::{Block, BlockQueue};
use crate::os::fd_input::{FdInput, ReadOutcome};
use log::*;
use std::sync::Arc;
use std::thread::JoinHandle;

/// Owns the input descriptor and feeds its bytes to a `BlockQueue`.
pub struct ReadThread {
    queue: Arc<BlockQueue>,
    join_handle: Option<JoinHandle<()>>,
}

impl ReadThread {
    /// Spawns the read thread.
    ///
    /// # Arguments
    ///
    /// * `input` - Descriptor to read until end of input
    /// * `queue` - Queue receiving filled blocks and returning recycled ones
    /// * `config` - Block size and readiness timeout
    pub fn spawn(
        mut input: FdInput,
        queue: Arc<BlockQueue>,
        config: &InputConfig,
    ) -> anyhow::Result<Self> {
        // A zero-length read would look like end of input.
        let block_size = config.block_size.max(1);
        let timeout_ms = i32::try_from(config.poll_interval_ms).unwrap_or(i32::MAX);
        let thread_queue = Arc::clone(&queue);

        let handle = std::thread::Builder::new()
            .name("input-reader".to_string())
            .spawn(move || {
                debug!("Read thread started");
                let mut block = Block::with_capacity(block_size);
                loop {
                    if thread_queue.is_closed() {
                        debug!("Block queue closed by consumer, read thread stopping");
                        break;
                    }
                    block.resize(block_size, 0);
                    match input.read_into(&mut block, timeout_ms) {
                        Ok(ReadOutcome::Data(count)) => {
                            block.truncate(count);
                            trace!("Queueing {} byte block", count);
                            block = thread_queue.add(block);
                        }
                        Ok(ReadOutcome::Pending) => continue,
                        Ok(ReadOutcome::Ended) => {
                            info!("Input ended");
                            thread_queue.end();
                            break;
                        }
                        Err(e) => {
                            error!("Input read error: {:#}", e);
                            thread_queue.fail(e);
                            break;
                        }
                    }
                }
                debug!("Read thread exited");
            })?;

        Ok(Self {
            queue,
            join_handle: Some(handle),
        })
    }
}

impl Drop for ReadThread {
    fn drop(&mut self) {
        // The reader checks the queue between polls, so ending it bounds the
        // join by one poll interval.
        self.queue.end();
        if let Some(handle) = self.join_handle.take() {
            if let Err(panic_payload) = handle.join() {
                if std::thread::panicking() {
                    eprintln!("Read thread panicked (during unwind): {:?}", panic_payload);
                } else {
                    std::panic::resume_unwind(panic_payload);
                }
            }
        }
    }
}
