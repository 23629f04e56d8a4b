//! Link Module
//!
//! The serial link and the frame assembly loop.
//!
//! ## Architecture
//! - `SerialLink`: timed single-byte reads, whole-buffer writes
//! - Reader threads feed bytes through crossbeam channels
//! - `FrameAssembler` splits the byte stream on `0x00`
//! - `Server` drives frames through the engine and writes responses back

mod channel;
mod stream;
mod assembler;
mod server;

use std::time::Duration;

use crate::error::Result;

pub use channel::ChannelLink;
pub use stream::StreamLink;
pub use assembler::FrameAssembler;
pub use server::{serve_tcp, Server, ServerStats};

/// Byte-oriented serial link
pub trait SerialLink {
    /// Read the next byte, waiting at most `timeout`
    ///
    /// Returns `Ok(None)` on timeout and `Err(LinkClosed)` once the peer is gone.
    fn read_byte(&mut self, timeout: Duration) -> Result<Option<u8>>;

    /// Write the whole buffer
    fn write_all(&mut self, data: &[u8]) -> Result<()>;
}

impl<L: SerialLink + ?Sized> SerialLink for Box<L> {
    fn read_byte(&mut self, timeout: Duration) -> Result<Option<u8>> {
        (**self).read_byte(timeout)
    }

    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        (**self).write_all(data)
    }
}
