//! Frame Assembler
//!
//! Accumulates bytes between `0x00` delimiters into complete frames.

use bytes::{BufMut, Bytes, BytesMut};

use crate::protocol::cobs::DELIMITER;

/// Splits a byte stream into delimiter-bounded frames
///
/// - A delimiter with an empty buffer is ignored (leading or repeated `0x00`)
/// - A delimiter with data hands the buffered frame out and starts over
/// - A byte that would exceed `capacity` discards the partial frame
#[derive(Debug)]
pub struct FrameAssembler {
    /// Bytes received since the last delimiter
    buffer: BytesMut,

    /// Maximum frame length
    capacity: usize,

    /// Number of partial frames discarded for overflowing
    overflows: u64,
}

impl FrameAssembler {
    /// Create an assembler with a fixed capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
            capacity,
            overflows: 0,
        }
    }

    /// Feed one byte; returns a frame when `byte` completes one
    pub fn push(&mut self, byte: u8) -> Option<Bytes> {
        if byte == DELIMITER {
            if self.buffer.is_empty() {
                return None;
            }
            return Some(self.buffer.split().freeze());
        }

        if self.buffer.len() < self.capacity {
            self.buffer.put_u8(byte);
        } else {
            tracing::warn!(
                "Frame buffer overflow ({} bytes), discarding partial frame",
                self.buffer.len()
            );
            self.buffer.clear();
            self.overflows += 1;
        }

        None
    }

    /// Get the number of buffered bytes
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Get the number of discarded partial frames
    pub fn overflow_count(&self) -> u64 {
        self.overflows
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
