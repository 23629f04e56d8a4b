//! Frame Loop Server
//!
//! Reads the link byte by byte, assembles frames, runs them through the
//! engine and writes the encoded responses back.

use std::io;
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crate::engine::Engine;
use crate::error::{Result, UartFsError};
use crate::protocol::{encode_frame, encode_response, Response};
use crate::vfs::FileSystem;
use super::{FrameAssembler, SerialLink, StreamLink};

/// Counters kept by the frame loop
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ServerStats {
    /// Complete frames handed to the engine
    pub frames: u64,

    /// Response frames written to the link
    pub responses: u64,

    /// Responses dropped because they did not encode within the frame limit
    pub dropped: u64,
}

/// Drives one link through the engine
pub struct Server<F: FileSystem, L: SerialLink> {
    engine: Arc<Engine<F>>,
    link: L,
    assembler: FrameAssembler,
    shutdown: Arc<AtomicBool>,
    stats: ServerStats,
}

impl<F: FileSystem, L: SerialLink> Server<F, L> {
    /// Create a server for `link`
    pub fn new(engine: Arc<Engine<F>>, link: L) -> Self {
        Self::with_shutdown(engine, link, Arc::new(AtomicBool::new(false)))
    }

    /// Create a server that stops once `shutdown` is set
    pub fn with_shutdown(engine: Arc<Engine<F>>, link: L, shutdown: Arc<AtomicBool>) -> Self {
        let assembler = FrameAssembler::new(engine.config().max_frame_size);
        Self {
            engine,
            link,
            assembler,
            shutdown,
            stats: ServerStats::default(),
        }
    }

    /// Flag that stops `run` at its next poll
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Run the frame loop (blocking)
    ///
    /// A read timeout simply polls again. Returns when the link closes or
    /// the shutdown flag is set.
    pub fn run(&mut self) -> Result<()> {
        let timeout = self.engine.config().read_timeout();
        tracing::info!("Entering frame loop");

        while !self.shutdown.load(Ordering::Relaxed) {
            let byte = match self.link.read_byte(timeout) {
                Ok(Some(byte)) => byte,
                Ok(None) => continue,
                Err(UartFsError::LinkClosed) => {
                    tracing::debug!("Link closed, leaving frame loop");
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!("Link read error: {}", e);
                    thread::sleep(timeout);
                    continue;
                }
            };

            let Some(frame) = self.assembler.push(byte) else {
                continue;
            };

            tracing::debug!("Frame received ({} bytes)", frame.len());
            self.stats.frames += 1;

            let response = self.engine.handle_frame(&frame);
            match self.send_response(&response) {
                Ok(()) => {}
                Err(UartFsError::LinkClosed) => {
                    tracing::debug!("Link closed before response could be sent");
                    return Ok(());
                }
                Err(e) => tracing::warn!("Error writing response: {}", e),
            }
        }

        tracing::info!("Frame loop stopped");
        Ok(())
    }

    /// Encode and write a response; an oversized response is dropped
    fn send_response(&mut self, response: &Response) -> Result<()> {
        tracing::debug!(
            "Sending response - JSON: {}, binary: {} bytes",
            response.json,
            response.binary.len()
        );

        let encoded = encode_response(response)
            .and_then(|packet| encode_frame(&packet, self.engine.config().max_frame_size));

        match encoded {
            Ok(frame) => {
                self.link.write_all(&frame)?;
                self.stats.responses += 1;
            }
            Err(e) => {
                tracing::warn!("Dropping response: {}", e);
                self.stats.dropped += 1;
            }
        }
        Ok(())
    }

    /// Get the loop counters
    pub fn stats(&self) -> ServerStats {
        self.stats
    }

    /// Get the number of partial frames discarded for overflowing
    pub fn overflow_count(&self) -> u64 {
        self.assembler.overflow_count()
    }

    /// Consume the server and return its link
    pub fn into_link(self) -> L {
        self.link
    }
}

/// Accept TCP connections one at a time and serve each as a serial link
///
/// All connections share the engine, and with it the current directory.
/// The listener is polled every read timeout, so `shutdown` also stops an
/// idle listener.
pub fn serve_tcp<F: FileSystem>(
    engine: Arc<Engine<F>>,
    listener: TcpListener,
    shutdown: Arc<AtomicBool>,
) -> Result<()> {
    tracing::info!("Listening on {}", listener.local_addr()?);
    listener.set_nonblocking(true)?;
    let poll_interval = engine.config().read_timeout();

    while !shutdown.load(Ordering::Relaxed) {
        let stream = match listener.accept() {
            Ok((stream, _)) => stream,
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                thread::sleep(poll_interval);
                continue;
            }
            Err(e) => {
                tracing::warn!("Accept failed: {}", e);
                thread::sleep(poll_interval);
                continue;
            }
        };

        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());
        tracing::info!("Connection established from {}", peer_addr);

        // Accepted sockets may inherit non-blocking mode on some platforms
        let link = match stream
            .set_nonblocking(false)
            .map_err(Into::into)
            .and_then(|_| StreamLink::<TcpStream>::tcp(stream))
        {
            Ok(link) => link,
            Err(e) => {
                tracing::warn!("Failed to set up link for {}: {}", peer_addr, e);
                continue;
            }
        };
        let mut server = Server::with_shutdown(Arc::clone(&engine), link, Arc::clone(&shutdown));
        if let Err(e) = server.run() {
            tracing::warn!("Connection {} ended with error: {}", peer_addr, e);
        }

        tracing::info!("Connection from {} closed", peer_addr);
    }

    tracing::info!("Listener stopped");
    Ok(())
}
