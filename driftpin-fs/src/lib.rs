//! Filesystem helpers for drift package extraction, built on `cap-std` and
//! `camino`.
//!
//! Every helper resolves an ambient directory for the parent of the target
//! path and performs the operation relative to it, so callers can work with
//! absolute UTF-8 paths while the actual IO goes through capability handles.
#![forbid(unsafe_code)]

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use std::io;
use std::path::Component;

/// Open the parent directory of `path` and return it with the file name.
pub fn open_dir_and_file(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("{path} does not name a file")))?
        .to_owned();
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

/// Split `path` into an ambient base directory and the path relative to it.
///
/// Absolute paths are anchored at their root (or drive prefix on Windows);
/// relative paths are anchored at the current directory.
pub fn split_ambient(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let std_path = path.as_std_path();
    let anchor = match std_path.components().next() {
        Some(Component::Prefix(component)) => {
            let prefix = component
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;
            Some(Utf8PathBuf::from(prefix).join(std::path::MAIN_SEPARATOR.to_string()))
        }
        Some(Component::RootDir) => Some(Utf8PathBuf::from(std::path::MAIN_SEPARATOR.to_string())),
        _ => None,
    };

    let (base, relative) = match anchor {
        Some(base) => {
            let relative = path
                .strip_prefix(&base)
                .map_err(|_| io::Error::other(format!("failed to strip {base} from {path}")))?
                .to_path_buf();
            (base, relative)
        }
        None => (Utf8PathBuf::from("."), path.to_path_buf()),
    };

    let dir = fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?;
    Ok((dir, relative))
}

/// Open `path` as a directory capability.
///
/// Operations through the returned handle cannot escape `path`.
pub fn open_dir(path: &Utf8Path) -> io::Result<fs_utf8::Dir> {
    fs_utf8::Dir::open_ambient_dir(path, ambient_authority())
}

/// Open an existing file for reading.
pub fn open_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    let (dir, name) = open_dir_and_file(path)?;
    dir.open(name.as_str())
}

/// Delete `path` recursively when it exists, then recreate it empty.
///
/// Refuses to operate on a filesystem root.
pub fn reset_dir(path: &Utf8Path) -> io::Result<()> {
    let (base, relative) = split_ambient(path)?;
    if relative.as_str().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("refusing to reset filesystem root {path}"),
        ));
    }
    match base.remove_dir_all(&relative) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    base.create_dir_all(&relative)
}

/// Create `path` and any missing ancestors.
pub fn ensure_dir(path: &Utf8Path) -> io::Result<()> {
    let (base, relative) = split_ambient(path)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    base.create_dir_all(&relative)
}

/// Read a UTF-8 file into a string.
pub fn read_utf8(path: &Utf8Path) -> io::Result<String> {
    let (dir, name) = open_dir_and_file(path)?;
    dir.read_to_string(name.as_str())
}

/// Replace the contents of a file, creating it when absent.
pub fn write_utf8(path: &Utf8Path, contents: &str) -> io::Result<()> {
    let (dir, name) = open_dir_and_file(path)?;
    dir.write(name.as_str(), contents)
}

/// Return whether `path` exists and is a regular file.
///
/// A missing file or missing parent directory yields `Ok(false)`.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = match open_dir_and_file(path) {
        Ok(found) => found,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(err) => return Err(err),
    };
    match dir.metadata(name.as_str()) {
        Ok(meta) => Ok(meta.is_file()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

/// Return whether `path` exists and is a directory.
pub fn dir_is_dir(path: &Utf8Path) -> io::Result<bool> {
    let (base, relative) = split_ambient(path)?;
    if relative.as_str().is_empty() {
        return Ok(true);
    }
    match base.metadata(&relative) {
        Ok(meta) => Ok(meta.is_dir()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}
