//! Stream-backed links
//!
//! Wraps any blocking byte stream (tty device node, TCP socket) as a
//! `SerialLink`. A reader thread pumps incoming bytes into a channel so
//! reads can honor a timeout regardless of the stream type.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::path::Path;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{unbounded, Sender};

use crate::error::Result;
use super::channel::ByteQueue;
use super::SerialLink;

/// Read size of the pump thread
const PUMP_BUFFER_SIZE: usize = 512;

/// Serial link over a reader/writer pair
pub struct StreamLink<W: Write> {
    /// Bytes delivered by the reader thread
    queue: ByteQueue,

    /// Write half
    writer: W,

    /// Reader thread; ends when the stream reaches EOF or fails
    _reader: JoinHandle<()>,
}

impl<W: Write> StreamLink<W> {
    /// Start pumping `reader` on a background thread
    pub fn new<R: Read + Send + 'static>(reader: R, writer: W) -> Result<Self> {
        let (tx, rx) = unbounded();

        let handle = thread::Builder::new()
            .name("uartfs-rx".to_string())
            .spawn(move || pump(reader, tx))?;

        Ok(Self {
            queue: ByteQueue::new(rx),
            writer,
            _reader: handle,
        })
    }
}

impl StreamLink<TcpStream> {
    /// Link over a connected TCP stream
    pub fn tcp(stream: TcpStream) -> Result<Self> {
        // Disable Nagle's algorithm; frames are small and latency-bound
        stream.set_nodelay(true)?;
        let read_stream = stream.try_clone()?;
        Self::new(read_stream, stream)
    }
}

impl StreamLink<File> {
    /// Link over a character device such as `/dev/ttyUSB0`
    ///
    /// Line settings (baud rate, parity) are left as configured on the device.
    pub fn device(path: &Path) -> Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        let read_file = file.try_clone()?;
        Self::new(read_file, file)
    }
}

impl<W: Write> SerialLink for StreamLink<W> {
    fn read_byte(&mut self, timeout: Duration) -> Result<Option<u8>> {
        self.queue.read_byte(timeout)
    }

    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Forward everything read from `reader` until EOF or a read error
fn pump<R: Read>(mut reader: R, tx: Sender<Vec<u8>>) {
    let mut buf = [0u8; PUMP_BUFFER_SIZE];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => {
                tracing::debug!("Link stream reached EOF");
                break;
            }
            Ok(n) => {
                if tx.send(buf[..n].to_vec()).is_err() {
                    break;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                tracing::debug!("Link stream read failed: {}", e);
                break;
            }
        }
    }
}
