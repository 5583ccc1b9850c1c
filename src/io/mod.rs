// src/io/mod.rs

//! Request input and response output around the renderer.
//!
//! A `ReadThread` owns the input descriptor and fills blocks into a
//! `BlockQueue`; the `RequestDecoder` parses requests out of those blocks
//! through a `BlockReader`, and the `HeightfieldEncoder` streams each rendered
//! row to the output.

pub mod block_queue;
pub mod decoder;
pub mod encoder;
pub mod read_thread;

pub use block_queue::BlockQueue;
pub use decoder::{BlockReader, RequestDecoder};
pub use encoder::HeightfieldEncoder;
pub use read_thread::ReadThread;
