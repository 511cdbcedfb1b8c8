//! File system primitives
//!
//! The splitter writes many small files, each one opened in append mode and
//! closed again as soon as a single object has been written. These helpers
//! keep that pattern in one place.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use walkdir::WalkDir;

/// Create `path` (and every missing parent directory) if it does not exist.
///
/// Returns `true` when the file was created by this call and `false` when it
/// was already present.
pub fn create_file(path: impl AsRef<Path>) -> io::Result<bool> {
    let path = path.as_ref();

    if path.exists() {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().write(true).create_new(true).open(path)?;
    Ok(true)
}

/// Append `data` to an existing file, closing it before returning.
pub fn append(path: impl AsRef<Path>, data: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new().append(true).open(path)?;
    file.write_all(data)?;
    file.flush()
}

/// Recursively copy the contents of `src` into `dest`.
///
/// Directories are recreated, files are copied byte for byte and existing
/// destination files are overwritten. Returns the number of files copied.
pub fn copy_dir(src: impl AsRef<Path>, dest: impl AsRef<Path>) -> io::Result<u64> {
    let src = src.as_ref();
    let dest = dest.as_ref();
    let mut copied = 0;

    fs::create_dir_all(dest)?;

    for entry in WalkDir::new(src).min_depth(1) {
        let entry = entry.map_err(io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }

    Ok(copied)
}

/// Remove everything inside `dir`, leaving the directory itself in place.
///
/// A missing directory has nothing to wipe and is not an error.
pub fn wipe_dir(dir: impl AsRef<Path>) -> io::Result<()> {
    let dir = dir.as_ref();

    if !dir.exists() {
        return Ok(());
    }

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if entry.file_type()?.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }

    Ok(())
}
