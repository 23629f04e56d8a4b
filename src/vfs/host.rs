//! Host filesystem
//!
//! Serves a directory of the host as the device root.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use super::{FileKind, FileStat, FileSystem};

/// `std::fs`-backed filesystem rooted at a host directory
///
/// Device path `/a/b` maps to `{root}/a/b`. Empty and `.` components are
/// ignored; `..` is refused so requests cannot leave the root.
/// Directories report size 0, as on FAT volumes.
#[derive(Debug, Clone)]
pub struct HostFs {
    root: PathBuf,
}

impl HostFs {
    /// Serve `root`, creating it if it doesn't exist
    pub fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Get the served root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a device path onto the host
    pub fn resolve(&self, path: &str) -> io::Result<PathBuf> {
        if path.is_empty() {
            return Err(io::Error::new(io::ErrorKind::NotFound, "empty path"));
        }

        let mut resolved = self.root.clone();
        for component in path.split('/') {
            match component {
                "" | "." => {}
                ".." => {
                    return Err(io::Error::new(
                        io::ErrorKind::PermissionDenied,
                        format!("parent components not allowed: {}", path),
                    ))
                }
                name => resolved.push(name),
            }
        }
        Ok(resolved)
    }
}

impl FileSystem for HostFs {
    type File = File;

    fn open_dir(&self, path: &str) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(self.resolve(path)?)? {
            let entry = entry?;
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(name) => {
                    tracing::debug!("Skipping non-UTF-8 entry {:?} in {}", name, path);
                }
            }
        }
        Ok(names)
    }

    fn stat(&self, path: &str) -> io::Result<FileStat> {
        let metadata = fs::metadata(self.resolve(path)?)?;
        if metadata.is_dir() {
            Ok(FileStat {
                kind: FileKind::Directory,
                size: 0,
            })
        } else {
            Ok(FileStat {
                kind: FileKind::File,
                size: metadata.len(),
            })
        }
    }

    fn open_read(&self, path: &str) -> io::Result<File> {
        let resolved = self.resolve(path)?;
        if resolved.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("is a directory: {}", path),
            ));
        }
        File::open(resolved)
    }

    fn create(&self, path: &str) -> io::Result<File> {
        OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(self.resolve(path)?)
    }

    fn open_update(&self, path: &str) -> io::Result<File> {
        OpenOptions::new()
            .read(true)
            .write(true)
            .open(self.resolve(path)?)
    }

    fn remove_file(&self, path: &str) -> io::Result<()> {
        fs::remove_file(self.resolve(path)?)
    }

    fn remove_dir(&self, path: &str) -> io::Result<()> {
        let resolved = self.resolve(path)?;
        if resolved == self.root {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "cannot remove the root directory",
            ));
        }
        fs::remove_dir(resolved)
    }
}
