//! Response definitions
//!
//! Represents responses to the host. Status text is produced by direct
//! formatting; file names are not escaped.

/// Response code, the first byte of every response packet
pub const RESPONSE_CODE: u8 = 0x00;

/// Command-level failures reported as `{"ok":false,"err":"..."}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    MissingPath,
    PathTooLong,
    InvalidOffset,
    DirectoryNotFound,
    CannotOpenDirectory,
    FileNotFound,
    RemoveFailed,
    CannotOpenFile,
    SeekFailed,
    WriteFailed,
}

impl Failure {
    /// Message carried in the `err` field
    pub fn message(self) -> &'static str {
        match self {
            Failure::MissingPath => "Missing path parameter",
            Failure::PathTooLong => "Path too long",
            Failure::InvalidOffset => "Invalid offset",
            Failure::DirectoryNotFound => "Directory not found",
            Failure::CannotOpenDirectory => "Cannot open directory",
            Failure::FileNotFound => "File not found",
            Failure::RemoveFailed => "Failed to remove",
            Failure::CannotOpenFile => "Cannot open file",
            Failure::SeekFailed => "Seek failed",
            Failure::WriteFailed => "Write failed",
        }
    }
}

/// A response to send to the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Status text (JSON-shaped)
    pub json: String,

    /// Binary payload appended right after the status text
    pub binary: Vec<u8>,
}

impl Response {
    /// Create a response from raw status text with no payload
    pub fn with_json(json: impl Into<String>) -> Self {
        Self {
            json: json.into(),
            binary: Vec::new(),
        }
    }

    /// `{"ok":true}`
    pub fn ok() -> Self {
        Self::with_json("{\"ok\":true}")
    }

    /// `{"ok":false,"err":"<message>"}`
    pub fn error(message: &str) -> Self {
        Self::with_json(format!("{{\"ok\":false,\"err\":\"{}\"}}", message))
    }

    /// Error response for a command-level failure
    pub fn failure(failure: Failure) -> Self {
        Self::error(failure.message())
    }

    /// `{"error":"Unknown command"}`, a different shape from every other error
    pub fn unknown_command() -> Self {
        Self::with_json("{\"error\":\"Unknown command\"}")
    }

    /// `{"ok":true,"eof":<bool>,"bin":<n>}` followed by the chunk bytes
    pub fn chunk(data: Vec<u8>, eof: bool) -> Self {
        Self {
            json: format!("{{\"ok\":true,\"eof\":{},\"bin\":{}}}", eof, data.len()),
            binary: data,
        }
    }
}
