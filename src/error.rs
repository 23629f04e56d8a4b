//! Error types for uartfs
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using UartFsError
pub type Result<T> = std::result::Result<T, UartFsError>;

/// Unified error type for uartfs operations
#[derive(Debug, Error)]
pub enum UartFsError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("Frame too short: {0} bytes (min 7)")]
    FrameTooShort(usize),

    #[error("CRC mismatch: expected 0x{expected:08x}, got 0x{actual:08x}")]
    CrcMismatch { expected: u32, actual: u32 },

    #[error("Invalid length: header declares {declared} parameter bytes, {available} available")]
    InvalidLength { declared: usize, available: usize },

    #[error("Malformed frame: {0}")]
    MalformedFrame(String),

    #[error("Frame too large: {len} bytes (max {max})")]
    FrameTooLarge { len: usize, max: usize },

    #[error("Parameters too long: {len} bytes (max {max})")]
    ParamsTooLong { len: usize, max: usize },

    #[error("Malformed parameters: {0}")]
    MalformedParams(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Link Errors
    // -------------------------------------------------------------------------
    #[error("Link closed")]
    LinkClosed,

    #[error("Timed out waiting for response")]
    Timeout,

    // -------------------------------------------------------------------------
    // Remote Errors
    // -------------------------------------------------------------------------
    #[error("Remote error: {0}")]
    Remote(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl UartFsError {
    /// Error text reported to the peer in a `{"ok":false,"err":...}` response
    pub fn wire_message(&self) -> &'static str {
        match self {
            UartFsError::FrameTooShort(_) => "Frame too short",
            UartFsError::CrcMismatch { .. } => "CRC mismatch",
            UartFsError::InvalidLength { .. } => "Invalid length",
            UartFsError::MalformedFrame(_) => "Malformed frame",
            UartFsError::ParamsTooLong { .. } => "Parameters too long",
            UartFsError::MalformedParams(_) => "Malformed parameters",
            UartFsError::FrameTooLarge { .. } => "Frame too large",
            _ => "Internal error",
        }
    }
}
