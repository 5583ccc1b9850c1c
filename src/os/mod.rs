// src/os/mod.rs

//! Thin wrappers over the OS facilities the filter needs.

pub mod fd_input;
pub mod poll;

use anyhow::{Context, Result};
use nix::sys::signal::{signal, SigHandler, Signal};

/// Restores the default `SIGPIPE` disposition, which the Rust runtime sets to
/// ignore. A filter whose reader has gone away then terminates quietly
/// instead of failing every later write with `EPIPE`.
pub fn restore_default_sigpipe() -> Result<()> {
    unsafe { signal(Signal::SIGPIPE, SigHandler::SigDfl) }
        .context("Failed to restore default SIGPIPE handling")?;
    Ok(())
}
