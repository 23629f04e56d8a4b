//! Host Client
//!
//! Host-side counterpart of the engine: builds request frames, waits for
//! the response frame and interprets its status text.
//!
//! ## Chunked Transfer
//! - `download`: `get` with increasing `off` until `eof`
//! - `upload`: `put` at offset 0 (create/truncate), then at each next offset

use std::time::{Duration, Instant};

use bytes::Bytes;
use serde::Deserialize;
use serde_json::json;

use crate::config::Config;
use crate::error::{Result, UartFsError};
use crate::link::{FrameAssembler, SerialLink};
use crate::protocol::{
    decode_frame, decode_response, encode_frame, encode_request, CommandType, Request, Response,
    CHECKSUM_SIZE, HEADER_SIZE,
};

/// Longest poll of the link while waiting for a response
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Kind of a listed entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum EntryKind {
    #[serde(rename = "f")]
    File,
    #[serde(rename = "d")]
    Directory,
}

/// One entry of a directory listing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DirEntry {
    #[serde(rename = "n")]
    pub name: String,

    #[serde(rename = "t")]
    pub kind: EntryKind,

    #[serde(rename = "s")]
    pub size: u64,
}

/// One chunk returned by `get`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub data: Vec<u8>,
    pub eof: bool,
}

/// Status text of a response, in either of its shapes
#[derive(Debug, Default, Deserialize)]
struct Status {
    ok: Option<bool>,
    err: Option<String>,
    error: Option<String>,
    eof: Option<bool>,
    bin: Option<usize>,
    entries: Option<Vec<DirEntry>>,
}

/// Client for a device reachable over a serial link
pub struct Client<L: SerialLink> {
    link: L,
    config: Config,
    assembler: FrameAssembler,
}

impl<L: SerialLink> Client<L> {
    /// Create a client using the protocol limits in `config`
    pub fn new(link: L, config: Config) -> Self {
        let assembler = FrameAssembler::new(config.max_frame_size);
        Self {
            link,
            config,
            assembler,
        }
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Change the device's current directory
    pub fn cd(&mut self, path: &str) -> Result<()> {
        self.call(CommandType::ChangeDir, json!({ "path": path }), Vec::new())?;
        Ok(())
    }

    /// List `path`, or the device's current directory when `None`
    pub fn ls(&mut self, path: Option<&str>) -> Result<Vec<DirEntry>> {
        let params = match path {
            Some(path) => json!({ "path": path }),
            None => json!({}),
        };
        let (status, _) = self.call(CommandType::ListDir, params, Vec::new())?;
        Ok(status.entries.unwrap_or_default())
    }

    /// Remove a file or an empty directory
    pub fn rm(&mut self, path: &str) -> Result<()> {
        self.call(CommandType::Remove, json!({ "path": path }), Vec::new())?;
        Ok(())
    }

    /// Read one chunk of `path` starting at `offset`
    pub fn get_chunk(&mut self, path: &str, offset: u64) -> Result<Chunk> {
        let off = wire_offset(offset)?;
        let (status, data) = self.call(
            CommandType::Get,
            json!({ "path": path, "off": off }),
            Vec::new(),
        )?;

        let declared = status.bin.unwrap_or(0);
        if declared != data.len() {
            return Err(UartFsError::Protocol(format!(
                "GET declared {} bytes but carried {}",
                declared,
                data.len()
            )));
        }

        Ok(Chunk {
            data,
            eof: status.eof.unwrap_or(true),
        })
    }

    /// Write `data` into `path` at `offset` (0 creates or truncates)
    pub fn put_chunk(&mut self, path: &str, offset: u64, data: &[u8]) -> Result<()> {
        let off = wire_offset(offset)?;
        self.call(
            CommandType::Put,
            json!({ "path": path, "off": off }),
            data.to_vec(),
        )?;
        Ok(())
    }

    /// Read a whole file chunk by chunk
    pub fn download(&mut self, path: &str) -> Result<Vec<u8>> {
        let mut contents = Vec::new();
        loop {
            let chunk = self.get_chunk(path, contents.len() as u64)?;
            contents.extend_from_slice(&chunk.data);
            if chunk.eof {
                break;
            }
        }
        tracing::debug!("Downloaded {} ({} bytes)", path, contents.len());
        Ok(contents)
    }

    /// Write a whole file chunk by chunk, replacing any previous contents
    pub fn upload(&mut self, path: &str, data: &[u8]) -> Result<()> {
        let chunk_size = self.put_chunk_size(path);
        if chunk_size == 0 {
            return Err(UartFsError::Protocol(format!(
                "Path too long to leave room for data: {}",
                path
            )));
        }

        // An empty upload still creates/truncates the file
        self.put_chunk(path, 0, &data[..chunk_size.min(data.len())])?;

        let mut offset = chunk_size.min(data.len());
        while offset < data.len() {
            let end = (offset + chunk_size).min(data.len());
            self.put_chunk(path, offset as u64, &data[offset..end])?;
            offset = end;
        }

        tracing::debug!("Uploaded {} ({} bytes)", path, data.len());
        Ok(())
    }

    /// Largest `put` payload for `path` that keeps the frame within limits
    pub fn put_chunk_size(&self, path: &str) -> usize {
        let params = json!({ "path": path, "off": i32::MAX }).to_string();
        self.config
            .max_packet_size()
            .saturating_sub(HEADER_SIZE + CHECKSUM_SIZE + params.len())
    }

    // =========================================================================
    // Request/Response
    // =========================================================================

    /// Send a request and wait for its response
    pub fn request(&mut self, request: &Request) -> Result<Response> {
        let packet = encode_request(request)?;
        let frame = encode_frame(&packet, self.config.max_frame_size)?;
        self.link.write_all(&frame)?;

        let frame = self.read_frame()?;
        let packet = decode_frame(&frame, self.config.max_frame_size)?;
        decode_response(&packet)
    }

    /// Send a command and require an `"ok":true` status
    fn call(
        &mut self,
        command: CommandType,
        params: serde_json::Value,
        binary: Vec<u8>,
    ) -> Result<(Status, Vec<u8>)> {
        let request = Request::new(command, params.to_string(), binary);
        let response = self.request(&request)?;

        let status: Status = serde_json::from_str(&response.json).map_err(|e| {
            UartFsError::Protocol(format!("Bad status text {:?}: {}", response.json, e))
        })?;

        if let Some(error) = status.error {
            return Err(UartFsError::Remote(error));
        }
        if status.ok != Some(true) {
            return Err(UartFsError::Remote(
                status.err.unwrap_or_else(|| "unspecified failure".to_string()),
            ));
        }

        Ok((status, response.binary))
    }

    /// Wait for the next complete frame
    fn read_frame(&mut self) -> Result<Bytes> {
        let deadline = Instant::now() + self.config.response_timeout();
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                self.assembler.clear();
                return Err(UartFsError::Timeout);
            }

            if let Some(byte) = self.link.read_byte(remaining.min(POLL_INTERVAL))? {
                if let Some(frame) = self.assembler.push(byte) {
                    return Ok(frame);
                }
            }
        }
    }

    /// Consume the client and return its link
    pub fn into_link(self) -> L {
        self.link
    }
}

/// Offsets travel as 32-bit signed integers
fn wire_offset(offset: u64) -> Result<i32> {
    i32::try_from(offset).map_err(|_| {
        UartFsError::Protocol(format!("Offset {} exceeds the 31-bit wire range", offset))
    })
}
