// In src/main.rs

// Declare modules
pub mod change;
pub mod config;
pub mod filter;
pub mod io;
pub mod os;
pub mod render;

use crate::{
    config::CONFIG,
    filter::RequestFilter,
    io::{BlockQueue, BlockReader, ReadThread},
    os::fd_input::FdInput,
    render::Renderer,
};

use anyhow::Context;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

/// Main entry point for the `render-changes` filter.
///
/// Reads requests from the file named by the only argument, or from standard
/// input, and writes one response line per request to standard output.
fn main() -> anyhow::Result<()> {
    // Diagnostics go to stderr; stdout carries responses only.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_micros()
        .init();

    os::restore_default_sigpipe()?;

    let input_path = std::env::args_os().nth(1).map(PathBuf::from);
    info!(
        "Starting render-changes, input: {}",
        input_path
            .as_deref()
            .map_or_else(|| "<stdin>".to_string(), |p| p.display().to_string())
    );

    let config = &*CONFIG;
    info!("Configuration: {:?}", config);

    let input = FdInput::open(input_path.as_deref())?;
    let queue = Arc::new(BlockQueue::new(config.input.queued_blocks));
    let read_thread = ReadThread::spawn(input, Arc::clone(&queue), &config.input)
        .context("Failed to spawn input read thread")?;

    let stdout = std::io::stdout();
    let output = std::io::BufWriter::new(stdout.lock());
    let mut filter = RequestFilter::new(
        BlockReader::new(Arc::clone(&queue)),
        output,
        Renderer::new(&config.render),
    );

    let result = filter.run();
    // Stop the reader before reporting, whether or not the run succeeded.
    drop(read_thread);

    let processed = result?;
    info!("render-changes finished after {} requests.", processed);
    Ok(())
}
