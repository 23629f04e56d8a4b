//! Filesystem Module
//!
//! The byte-addressable hierarchical store the engine operates on.
//!
//! ## Responsibilities
//! - Enumerate and stat directory entries
//! - Open files for reading, create/truncate, or in-place update
//! - Remove files and empty directories
//!
//! Paths are device paths (`/dir/file`); implementations decide how those
//! map onto real storage.

mod host;

use std::io::{self, Read, Seek, Write};

pub use host::HostFs;

/// Kind of a filesystem entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    File,
    Directory,
}

impl FileKind {
    /// Single-letter tag used in listings (`f` / `d`)
    pub fn tag(self) -> &'static str {
        match self {
            FileKind::File => "f",
            FileKind::Directory => "d",
        }
    }
}

/// Result of a stat call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub kind: FileKind,
    pub size: u64,
}

impl FileStat {
    pub fn is_dir(&self) -> bool {
        self.kind == FileKind::Directory
    }
}

/// Filesystem capability consumed by the engine
///
/// Implementations serialize their own internal state; the engine issues
/// at most one open→seek→read/write→close pipeline per command.
pub trait FileSystem: Send + Sync {
    /// Open file handle
    type File: Read + Write + Seek;

    /// Open a directory and return the names of its entries
    fn open_dir(&self, path: &str) -> io::Result<Vec<String>>;

    /// Stat a path
    fn stat(&self, path: &str) -> io::Result<FileStat>;

    /// Open an existing file for reading
    fn open_read(&self, path: &str) -> io::Result<Self::File>;

    /// Create a file, truncating it if it exists
    fn create(&self, path: &str) -> io::Result<Self::File>;

    /// Open an existing file for reading and writing without truncation
    fn open_update(&self, path: &str) -> io::Result<Self::File>;

    /// Remove a file
    fn remove_file(&self, path: &str) -> io::Result<()>;

    /// Remove an empty directory
    fn remove_dir(&self, path: &str) -> io::Result<()>;
}
