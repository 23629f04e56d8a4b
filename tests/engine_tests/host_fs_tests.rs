//! Host Filesystem Tests
//!
//! Tests for mapping device paths onto a host directory.

use std::fs;
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};

use tempfile::TempDir;
use uartfs::vfs::{FileKind, FileSystem, HostFs};

fn setup_fs() -> (TempDir, HostFs) {
    let dir = TempDir::new().unwrap();
    let fs = HostFs::open(dir.path()).unwrap();
    (dir, fs)
}

// =============================================================================
// Path Resolution
// =============================================================================

#[test]
fn test_resolve_absolute_path() {
    let (dir, fs) = setup_fs();
    assert_eq!(fs.resolve("/a/b.txt").unwrap(), dir.path().join("a").join("b.txt"));
}

#[test]
fn test_resolve_root() {
    let (dir, fs) = setup_fs();
    assert_eq!(fs.resolve("/").unwrap(), dir.path());
}

#[test]
fn test_resolve_collapses_empty_and_dot_components() {
    let (dir, fs) = setup_fs();
    assert_eq!(fs.resolve("//a/./b//").unwrap(), dir.path().join("a").join("b"));
}

#[test]
fn test_resolve_relative_path_is_root_based() {
    let (dir, fs) = setup_fs();
    assert_eq!(fs.resolve("a/b").unwrap(), dir.path().join("a").join("b"));
}

#[test]
fn test_resolve_refuses_parent() {
    let (_dir, fs) = setup_fs();
    let err = fs.resolve("/../etc/passwd").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PermissionDenied);
}

#[test]
fn test_resolve_empty_path() {
    let (_dir, fs) = setup_fs();
    assert_eq!(fs.resolve("").unwrap_err().kind(), ErrorKind::NotFound);
}

// =============================================================================
// Directory Operations
// =============================================================================

#[test]
fn test_open_dir_lists_names() {
    let (dir, fs) = setup_fs();
    fs::write(dir.path().join("one"), b"1").unwrap();
    fs::create_dir(dir.path().join("two")).unwrap();

    let mut names = fs.open_dir("/").unwrap();
    names.sort();
    assert_eq!(names, vec!["one".to_string(), "two".to_string()]);
}

#[cfg(unix)]
#[test]
fn test_open_dir_skips_non_utf8_names() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let (dir, fs) = setup_fs();
    fs::write(dir.path().join("plain"), b"1").unwrap();
    fs::write(dir.path().join(OsStr::from_bytes(b"caf\xE9")), b"2").unwrap();

    assert_eq!(fs.open_dir("/").unwrap(), vec!["plain".to_string()]);
}

#[test]
fn test_open_dir_on_file_fails() {
    let (dir, fs) = setup_fs();
    fs::write(dir.path().join("one"), b"1").unwrap();

    assert!(fs.open_dir("/one").is_err());
}

#[test]
fn test_stat_file_and_directory() {
    let (dir, fs) = setup_fs();
    fs::write(dir.path().join("f"), b"12345").unwrap();
    fs::create_dir(dir.path().join("d")).unwrap();

    let file = fs.stat("/f").unwrap();
    assert_eq!(file.kind, FileKind::File);
    assert_eq!(file.size, 5);
    assert!(!file.is_dir());

    let directory = fs.stat("/d").unwrap();
    assert_eq!(directory.kind, FileKind::Directory);
    assert_eq!(directory.size, 0);
    assert!(directory.is_dir());
}

#[test]
fn test_kind_tags() {
    assert_eq!(FileKind::File.tag(), "f");
    assert_eq!(FileKind::Directory.tag(), "d");
}

#[test]
fn test_remove_dir_refuses_root() {
    let (dir, fs) = setup_fs();
    assert!(fs.remove_dir("/").is_err());
    assert!(dir.path().is_dir());
}

// =============================================================================
// File Operations
// =============================================================================

#[test]
fn test_open_read_refuses_directory() {
    let (dir, fs) = setup_fs();
    fs::create_dir(dir.path().join("d")).unwrap();

    assert!(fs.open_read("/d").is_err());
}

#[test]
fn test_create_truncates() {
    let (dir, fs) = setup_fs();
    fs::write(dir.path().join("f"), b"old contents").unwrap();

    let mut file = fs.create("/f").unwrap();
    file.write_all(b"new").unwrap();
    drop(file);

    assert_eq!(fs::read(dir.path().join("f")).unwrap(), b"new");
}

#[test]
fn test_open_update_keeps_contents() {
    let (dir, fs) = setup_fs();
    fs::write(dir.path().join("f"), b"abcdef").unwrap();

    let mut file = fs.open_update("/f").unwrap();
    file.seek(SeekFrom::Start(2)).unwrap();
    file.write_all(b"XY").unwrap();
    drop(file);

    assert_eq!(fs::read(dir.path().join("f")).unwrap(), b"abXYef");
}

#[test]
fn test_open_update_requires_existing_file() {
    let (_dir, fs) = setup_fs();
    assert!(fs.open_update("/missing").is_err());
}

#[test]
fn test_open_read_reads_contents() {
    let (dir, fs) = setup_fs();
    fs::write(dir.path().join("f"), b"payload").unwrap();

    let mut contents = String::new();
    fs.open_read("/f").unwrap().read_to_string(&mut contents).unwrap();
    assert_eq!(contents, "payload");
}
