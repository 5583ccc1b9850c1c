// src/os/poll.rs

//! Readiness checks for a single file descriptor using raw `libc::poll`.
//! Unlike epoll, `poll(2)` accepts regular files, which always report
//! readable, as well as pipes, sockets and terminals.

use anyhow::{Context, Result};
use bitflags::bitflags;
use log::trace;
use std::io;
use std::os::unix::io::RawFd;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PollFlags: libc::c_short {
        const POLLIN = libc::POLLIN;
        const POLLPRI = libc::POLLPRI;
        const POLLOUT = libc::POLLOUT;
        const POLLERR = libc::POLLERR;
        const POLLHUP = libc::POLLHUP;
        const POLLNVAL = libc::POLLNVAL;
    }
}

impl PollFlags {
    /// The descriptor has data, or a hang-up or error a read will report.
    pub fn is_readable(&self) -> bool {
        self.intersects(PollFlags::POLLIN | PollFlags::POLLHUP | PollFlags::POLLERR)
    }
}

/// Waits up to `timeout_ms` (negative: forever) for any of `interest` on
/// `fd` and returns the reported events. An interrupted wait reports no
/// events rather than an error.
pub fn poll_fd(fd: RawFd, interest: PollFlags, timeout_ms: i32) -> Result<PollFlags> {
    let mut pollfd = libc::pollfd {
        fd,
        events: interest.bits(),
        revents: 0,
    };
    let ready = unsafe { libc::poll(&mut pollfd, 1, timeout_ms) };
    if ready == -1 {
        let err = io::Error::last_os_error();
        if err.kind() == io::ErrorKind::Interrupted {
            trace!("poll on fd {} interrupted (EINTR), reporting no events.", fd);
            return Ok(PollFlags::empty());
        }
        return Err(err).with_context(|| format!("poll failed on fd {}", fd));
    }
    let events = PollFlags::from_bits_truncate(pollfd.revents);
    trace!("poll on fd {} returned {:?}", fd, events);
    Ok(events)
}
