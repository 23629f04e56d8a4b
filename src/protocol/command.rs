//! Command definitions
//!
//! Represents requests from the host.

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandType {
    ChangeDir = 0x11,
    ListDir = 0x12,
    Remove = 0x13,
    Get = 0x21,
    Put = 0x22,
}

impl CommandType {
    /// Map a wire code to a command, `None` for anything outside the fixed set
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0x11 => Some(CommandType::ChangeDir),
            0x12 => Some(CommandType::ListDir),
            0x13 => Some(CommandType::Remove),
            0x21 => Some(CommandType::Get),
            0x22 => Some(CommandType::Put),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Short name used in logs
    pub fn name(self) -> &'static str {
        match self {
            CommandType::ChangeDir => "cd",
            CommandType::ListDir => "ls",
            CommandType::Remove => "rm",
            CommandType::Get => "get",
            CommandType::Put => "put",
        }
    }
}

/// A parsed request packet
///
/// The raw command code is kept so that unknown codes still reach the
/// dispatcher, which answers them with a dedicated response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Command code as received
    pub code: u8,

    /// Parameter text, cut at the first NUL byte
    pub params: String,

    /// Binary payload following the parameter text (may be empty)
    pub binary: Vec<u8>,
}

impl Request {
    /// Build a request for a known command
    pub fn new(command: CommandType, params: impl Into<String>, binary: Vec<u8>) -> Self {
        Self {
            code: command.code(),
            params: params.into(),
            binary,
        }
    }

    /// Get the command type, if the code is known
    pub fn command_type(&self) -> Option<CommandType> {
        CommandType::from_code(self.code)
    }
}
