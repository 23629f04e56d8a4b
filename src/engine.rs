//! Engine Module
//!
//! The long-lived engine context and the command dispatcher.
//!
//! ## Responsibilities
//! - Turn a raw frame into a request (COBS decode, CRC check, packet parse)
//! - Serialize command execution under the session lock
//! - Map the five commands onto filesystem operations
//! - Own the current directory, the only state a command mutates

use std::io::{Read, Seek, SeekFrom, Write};

use parking_lot::Mutex;

use crate::config::Config;
use crate::error::Result;
use crate::protocol::params::{ParamError, Params};
use crate::protocol::{decode_frame, decode_request, CommandType, Failure, Request, Response};
use crate::vfs::{FileSystem, HostFs};

/// Closing text of a directory listing
const LIST_CLOSE: &str = "]}";

/// Result of a single command handler
type CommandResult = std::result::Result<Response, Failure>;

/// Mutable state guarded by the session lock
#[derive(Debug)]
struct Session {
    /// Current working directory, default target of `ls`
    current_dir: String,
}

/// The protocol engine
///
/// ## Concurrency Model
///
/// One task drives the frame loop, so there is a single caller by
/// construction. Every dispatch still takes `session`, which serializes
/// command execution should a second caller ever appear.
pub struct Engine<F: FileSystem> {
    /// Engine configuration
    config: Config,

    /// Filesystem the commands operate on
    fs: F,

    /// Serializes dispatch and owns the current directory
    session: Mutex<Session>,
}

impl Engine<HostFs> {
    /// Open an engine serving `config.root_dir` from the host filesystem
    pub fn open(config: Config) -> Result<Self> {
        let fs = HostFs::open(&config.root_dir)?;
        Self::new(config, fs)
    }
}

impl<F: FileSystem> Engine<F> {
    /// Create an engine over the given filesystem
    ///
    /// The current directory starts at the filesystem root.
    pub fn new(config: Config, fs: F) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            fs,
            session: Mutex::new(Session {
                current_dir: "/".to_string(),
            }),
        })
    }

    // =========================================================================
    // Frame Processing
    // =========================================================================

    /// Process one COBS frame (delimiter stripped) and produce the response
    ///
    /// Transport errors (malformed frame, too short, CRC mismatch, invalid
    /// length) are answered with an error response before any command runs.
    pub fn handle_frame(&self, frame: &[u8]) -> Response {
        let request = decode_frame(frame, self.config.max_frame_size)
            .and_then(|packet| decode_request(&packet, self.config.max_json_len));

        match request {
            Ok(request) => self.execute(&request),
            Err(e) => {
                tracing::debug!("Rejected frame ({} bytes): {}", frame.len(), e);
                Response::error(e.wire_message())
            }
        }
    }

    /// Execute a request
    ///
    /// Routes commands to the appropriate handler under the session lock
    pub fn execute(&self, request: &Request) -> Response {
        let mut session = self.session.lock();

        let Some(command) = request.command_type() else {
            tracing::debug!("Unknown command code 0x{:02x}", request.code);
            return Response::unknown_command();
        };

        tracing::debug!(
            "CMD={} params_len={} binary_len={}",
            command.name(),
            request.params.len(),
            request.binary.len()
        );
        tracing::trace!("Params: {}", request.params);

        let params = Params::new(&request.params);
        let result = match command {
            CommandType::ChangeDir => self.change_dir(&mut session, &params),
            CommandType::ListDir => self.list_dir(&session, &params),
            CommandType::Remove => self.remove(&params),
            CommandType::Get => self.get(&params),
            CommandType::Put => self.put(&params, &request.binary),
        };

        result.unwrap_or_else(|failure| {
            tracing::debug!("{} failed: {}", command.name(), failure.message());
            Response::failure(failure)
        })
    }

    // =========================================================================
    // Command Handlers
    // =========================================================================

    /// CD: verify the target opens as a directory, then make it current
    fn change_dir(&self, session: &mut Session, params: &Params<'_>) -> CommandResult {
        let path = self.required_path(params)?;

        if self.fs.open_dir(path).is_err() {
            return Err(Failure::DirectoryNotFound);
        }

        session.current_dir = path.to_string();
        Ok(Response::ok())
    }

    /// LS: list `path` (or the current directory) with kind and size
    ///
    /// Entries that fail to stat or whose full path would not fit the path
    /// buffer are skipped. The listing stops early, still successfully, once
    /// the next entry would leave no terminator slot within `max_json_len`.
    fn list_dir(&self, session: &Session, params: &Params<'_>) -> CommandResult {
        let path = match params.string("path", self.config.max_path_len) {
            Ok(path) => path,
            Err(ParamError::TooLong { .. }) => return Err(Failure::PathTooLong),
            Err(_) => session.current_dir.as_str(),
        };

        let names = self
            .fs
            .open_dir(path)
            .map_err(|_| Failure::CannotOpenDirectory)?;

        let mut json = String::with_capacity(self.config.max_json_len);
        json.push_str("{\"ok\":true,\"entries\":[");
        let mut emitted = 0usize;

        for name in &names {
            let full_path = join_path(path, name);
            if full_path.len() >= self.config.max_path_len {
                continue;
            }

            let Ok(stat) = self.fs.stat(&full_path) else {
                continue;
            };

            let entry = format!(
                "{{\"n\":\"{}\",\"t\":\"{}\",\"s\":{}}}",
                name,
                stat.kind.tag(),
                stat.size
            );

            let separator = usize::from(emitted > 0);
            if json.len() + separator + entry.len() + LIST_CLOSE.len() >= self.config.max_json_len {
                tracing::debug!(
                    "Listing of {} truncated after {} of {} entries",
                    path,
                    emitted,
                    names.len()
                );
                break;
            }

            if emitted > 0 {
                json.push(',');
            }
            json.push_str(&entry);
            emitted += 1;
        }

        json.push_str(LIST_CLOSE);
        Ok(Response::with_json(json))
    }

    /// RM: remove a file, or an empty directory
    fn remove(&self, params: &Params<'_>) -> CommandResult {
        let path = self.required_path(params)?;

        let stat = self.fs.stat(path).map_err(|_| Failure::FileNotFound)?;

        let removed = if stat.is_dir() {
            self.fs.remove_dir(path)
        } else {
            self.fs.remove_file(path)
        };

        removed.map_err(|e| {
            tracing::debug!("Remove {} failed: {}", path, e);
            Failure::RemoveFailed
        })?;

        Ok(Response::ok())
    }

    /// GET: read one chunk starting at `off`
    ///
    /// `eof` is set whenever fewer than a full chunk was read.
    fn get(&self, params: &Params<'_>) -> CommandResult {
        let path = self.required_path(params)?;
        let offset = self.offset(params)?;

        let mut file = self
            .fs
            .open_read(path)
            .map_err(|_| Failure::CannotOpenFile)?;

        if offset > 0 {
            file.seek(SeekFrom::Start(offset))
                .map_err(|_| Failure::SeekFailed)?;
        }

        let chunk_size = self.config.get_chunk_size();
        let mut data = Vec::with_capacity(chunk_size);
        if let Err(e) = file.take(chunk_size as u64).read_to_end(&mut data) {
            tracing::warn!("Read of {} stopped after {} bytes: {}", path, data.len(), e);
        }

        let eof = data.len() < chunk_size;
        tracing::debug!(
            "GET path={} offset={} bytes_read={} eof={}",
            path,
            offset,
            data.len(),
            eof
        );

        Ok(Response::chunk(data, eof))
    }

    /// PUT: write the payload at `off`
    ///
    /// Offset 0 creates or truncates. Any other offset requires an existing
    /// file, opened for update.
    fn put(&self, params: &Params<'_>, data: &[u8]) -> CommandResult {
        let path = self.required_path(params)?;
        let offset = self.offset(params)?;

        let opened = if offset == 0 {
            self.fs.create(path)
        } else {
            self.fs.open_update(path)
        };
        let mut file = opened.map_err(|_| Failure::CannotOpenFile)?;

        if offset > 0 {
            file.seek(SeekFrom::Start(offset))
                .map_err(|_| Failure::SeekFailed)?;
        }

        file.write_all(data)
            .and_then(|_| file.flush())
            .map_err(|e| {
                tracing::warn!("Write to {} failed: {}", path, e);
                Failure::WriteFailed
            })?;

        tracing::debug!("PUT path={} offset={} bytes={}", path, offset, data.len());
        Ok(Response::ok())
    }

    // =========================================================================
    // Parameter Helpers
    // =========================================================================

    /// Required `path` parameter
    fn required_path<'p>(&self, params: &Params<'p>) -> std::result::Result<&'p str, Failure> {
        match params.string("path", self.config.max_path_len) {
            Ok(path) => Ok(path),
            Err(ParamError::TooLong { .. }) => Err(Failure::PathTooLong),
            Err(_) => Err(Failure::MissingPath),
        }
    }

    /// Optional `off` parameter, 0 when absent
    fn offset(&self, params: &Params<'_>) -> std::result::Result<u64, Failure> {
        let offset = params
            .int_or("off", 0)
            .map_err(|_| Failure::InvalidOffset)?;
        u64::try_from(offset).map_err(|_| Failure::InvalidOffset)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the current directory
    pub fn current_dir(&self) -> String {
        self.session.lock().current_dir.clone()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the underlying filesystem
    pub fn filesystem(&self) -> &F {
        &self.fs
    }
}

/// Join a directory and an entry name with a single separator
fn join_path(dir: &str, name: &str) -> String {
    if dir.ends_with('/') {
        format!("{}{}", dir, name)
    } else {
        format!("{}/{}", dir, name)
    }
}
