// src/os/fd_input.rs

//! Non-blocking reads from the filter's input descriptor.
//!
//! The descriptor itself is left in blocking mode (it may be a shared
//! terminal or pipe); reads are only issued once `poll` reports it readable,
//! so a call never blocks for longer than the given timeout.

use super::poll::{poll_fd, PollFlags};
use anyhow::{Context, Result};
use log::{debug, trace};
use std::fs::File;
use std::io::{self, Read};
use std::os::fd::AsFd;
use std::os::unix::io::AsRawFd;
use std::path::Path;

/// Result of one read attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// `n` bytes were stored at the start of the buffer.
    Data(usize),
    /// Nothing available yet; try again.
    Pending,
    /// End of input. Every later call reports `Ended` too.
    Ended,
}

#[derive(Debug)]
pub struct FdInput {
    file: File,
    ended: bool,
}

impl FdInput {
    /// Opens `path`, or duplicates standard input when no path is given.
    pub fn open(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::open(path)
                .with_context(|| format!("Failed to open input file {:?}", path))?,
            None => {
                let fd = io::stdin()
                    .as_fd()
                    .try_clone_to_owned()
                    .context("Failed to duplicate standard input")?;
                File::from(fd)
            }
        };
        debug!("Input opened on fd {}", file.as_raw_fd());
        Ok(FdInput::from_file(file))
    }

    pub fn from_file(file: File) -> Self {
        FdInput { file, ended: false }
    }

    /// Reads whatever is available into `buf`, waiting at most `timeout_ms`
    /// for the descriptor to become readable.
    ///
    /// "Would block" and interrupted reads are `Pending`, a zero-length read
    /// or an invalid descriptor is `Ended`; any other failure is an error.
    pub fn read_into(&mut self, buf: &mut [u8], timeout_ms: i32) -> Result<ReadOutcome> {
        if self.ended {
            return Ok(ReadOutcome::Ended);
        }
        let fd = self.file.as_raw_fd();
        let events = poll_fd(fd, PollFlags::POLLIN, timeout_ms)?;
        if events.contains(PollFlags::POLLNVAL) {
            debug!("Input fd {} is not open, treating as end of input", fd);
            self.ended = true;
            return Ok(ReadOutcome::Ended);
        }
        if !events.is_readable() {
            return Ok(ReadOutcome::Pending);
        }
        match self.file.read(buf) {
            Ok(0) if !buf.is_empty() => {
                debug!("Input fd {} reached end of input", fd);
                self.ended = true;
                Ok(ReadOutcome::Ended)
            }
            Ok(count) => {
                trace!("Read {} bytes from fd {}", count, fd);
                Ok(ReadOutcome::Data(count))
            }
            Err(e)
                if e.kind() == io::ErrorKind::WouldBlock
                    || e.kind() == io::ErrorKind::Interrupted =>
            {
                trace!("Read on fd {} would block or was interrupted", fd);
                Ok(ReadOutcome::Pending)
            }
            Err(e) => Err(e).with_context(|| format!("Failed to read input fd {}", fd)),
        }
    }
}
