//! In-memory links
//!
//! Byte queues fed by crossbeam channels, and a connected link pair.

use std::collections::VecDeque;
use std::time::Duration;

use crossbeam::channel::{unbounded, Receiver, RecvTimeoutError, Sender};

use crate::error::{Result, UartFsError};
use super::SerialLink;

/// Receive side shared by the link implementations
///
/// Chunks arrive on a channel and are handed out one byte at a time.
#[derive(Debug)]
pub(crate) struct ByteQueue {
    rx: Receiver<Vec<u8>>,
    pending: VecDeque<u8>,
}

impl ByteQueue {
    pub(crate) fn new(rx: Receiver<Vec<u8>>) -> Self {
        Self {
            rx,
            pending: VecDeque::new(),
        }
    }

    pub(crate) fn read_byte(&mut self, timeout: Duration) -> Result<Option<u8>> {
        loop {
            if let Some(byte) = self.pending.pop_front() {
                return Ok(Some(byte));
            }

            match self.rx.recv_timeout(timeout) {
                Ok(chunk) => self.pending.extend(chunk),
                Err(RecvTimeoutError::Timeout) => return Ok(None),
                Err(RecvTimeoutError::Disconnected) => return Err(UartFsError::LinkClosed),
            }
        }
    }
}

/// One end of an in-memory serial link
#[derive(Debug)]
pub struct ChannelLink {
    queue: ByteQueue,
    tx: Sender<Vec<u8>>,
}

impl ChannelLink {
    /// Create two connected ends: bytes written to one are read from the other
    pub fn pair() -> (ChannelLink, ChannelLink) {
        let (a_tx, b_rx) = unbounded();
        let (b_tx, a_rx) = unbounded();

        let a = ChannelLink {
            queue: ByteQueue::new(a_rx),
            tx: a_tx,
        };
        let b = ChannelLink {
            queue: ByteQueue::new(b_rx),
            tx: b_tx,
        };
        (a, b)
    }
}

impl SerialLink for ChannelLink {
    fn read_byte(&mut self, timeout: Duration) -> Result<Option<u8>> {
        self.queue.read_byte(timeout)
    }

    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.tx
            .send(data.to_vec())
            .map_err(|_| UartFsError::LinkClosed)
    }
}
