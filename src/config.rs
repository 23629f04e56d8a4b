//! Configuration for uartfs
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Result, UartFsError};
use crate::protocol::{CHECKSUM_SIZE, HEADER_SIZE};

/// Smallest frame capacity that still leaves room for a useful `get` chunk
const MIN_FRAME_SIZE: usize = 256;

/// Bytes reserved for the status text of a `get` response
const GET_STATUS_RESERVE: usize = 64;

/// Main configuration for a uartfs instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Filesystem Configuration
    // -------------------------------------------------------------------------
    /// Host directory served as the device root `/`
    pub root_dir: PathBuf,

    // -------------------------------------------------------------------------
    // Protocol Limits
    // -------------------------------------------------------------------------
    /// Max bytes in one frame, both as accumulated on the wire and decoded
    pub max_frame_size: usize,

    /// Max path length, including the terminator slot the device reserves
    pub max_path_len: usize,

    /// Max length of parameter text and of response status text
    pub max_json_len: usize,

    // -------------------------------------------------------------------------
    // Link Configuration
    // -------------------------------------------------------------------------
    /// Wait per byte read before the loop polls again (milliseconds)
    pub read_timeout_ms: u64,

    /// How long a client waits for a complete response frame (milliseconds)
    pub response_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("./uartfs_root"),
            max_frame_size: 8192,
            max_path_len: 256,
            max_json_len: 4096,
            read_timeout_ms: 100,
            response_timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Byte read timeout as a `Duration`
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Client response timeout as a `Duration`
    pub fn response_timeout(&self) -> Duration {
        Duration::from_millis(self.response_timeout_ms)
    }

    /// Largest decoded packet whose encoded frame still fits `max_frame_size`
    ///
    /// COBS adds one code byte per 254 data bytes plus a leading one, so a
    /// packet of `n` bytes encodes to at most `n + 1 + n / 254` bytes.
    pub fn max_packet_size(&self) -> usize {
        self.max_frame_size.saturating_sub(1) * 254 / 255
    }

    /// Largest `get` payload whose full response frame still fits `max_frame_size`
    pub fn get_chunk_size(&self) -> usize {
        self.max_packet_size()
            .saturating_sub(HEADER_SIZE + CHECKSUM_SIZE + GET_STATUS_RESERVE)
    }

    /// Check that the limits are consistent with each other
    pub fn validate(&self) -> Result<()> {
        if self.max_frame_size < MIN_FRAME_SIZE {
            return Err(UartFsError::Config(format!(
                "max_frame_size must be at least {} bytes, got {}",
                MIN_FRAME_SIZE, self.max_frame_size
            )));
        }
        if self.max_path_len < 2 {
            return Err(UartFsError::Config(format!(
                "max_path_len must be at least 2, got {}",
                self.max_path_len
            )));
        }
        if self.max_json_len > u16::MAX as usize || self.max_json_len >= self.max_frame_size {
            return Err(UartFsError::Config(format!(
                "max_json_len must fit a 16-bit length and the frame, got {}",
                self.max_json_len
            )));
        }
        if self.read_timeout_ms == 0 {
            return Err(UartFsError::Config(
                "read_timeout_ms must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the directory served as the device root
    pub fn root_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.root_dir = path.into();
        self
    }

    /// Set the maximum frame size (in bytes)
    pub fn max_frame_size(mut self, size: usize) -> Self {
        self.config.max_frame_size = size;
        self
    }

    /// Set the maximum path length (in bytes)
    pub fn max_path_len(mut self, len: usize) -> Self {
        self.config.max_path_len = len;
        self
    }

    /// Set the maximum parameter/status text length (in bytes)
    pub fn max_json_len(mut self, len: usize) -> Self {
        self.config.max_json_len = len;
        self
    }

    /// Set the byte read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the client response timeout (in milliseconds)
    pub fn response_timeout_ms(mut self, ms: u64) -> Self {
        self.config.response_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
