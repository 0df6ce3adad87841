//! Atomic file write operations.
//!
//! All writes follow the same pattern: write the content to a temporary file
//! in the target directory, sync it to disk, and rename it over the target.
//! Source and destination stay on one filesystem, so the final rename is
//! atomic on POSIX; on Windows an existing target is removed first, which is
//! close enough for a single-process tool. On crash a temporary file named
//! `.{filename}.tmp` may remain in the target directory.

use crate::error::{MergeError, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Atomically write bytes to a file.
///
/// The parent directory is created if it does not exist.
///
/// # Arguments
///
/// * `path` - The target file path
/// * `content` - The bytes to write
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            MergeError::UserError(format!(
                "failed to create directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let temp_path = temp_path_for(path)?;
    write_and_sync(&temp_path, content)?;
    replace(&temp_path, path)
}

/// Atomically write a string to a file.
///
/// Convenience wrapper around `atomic_write` for string content.
pub fn atomic_write_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes())
}

/// Temporary file path in the same directory as the target, so the final
/// rename never crosses a filesystem boundary.
fn temp_path_for(target: &Path) -> Result<PathBuf> {
    let parent = target.parent().unwrap_or(Path::new("."));
    let filename = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| MergeError::UserError("invalid file path".to_string()))?;

    Ok(parent.join(format!(".{}.tmp", filename)))
}

/// Write content to a file and sync it to disk.
fn write_and_sync(path: &Path, content: &[u8]) -> Result<()> {
    let mut file = File::create(path).map_err(|e| {
        MergeError::UserError(format!(
            "failed to create temporary file '{}': {}",
            path.display(),
            e
        ))
    })?;

    let written = file.write_all(content).and_then(|_| file.sync_all());
    if let Err(e) = written {
        let _ = fs::remove_file(path);
        return Err(MergeError::UserError(format!(
            "failed to write temporary file '{}': {}",
            path.display(),
            e
        )));
    }

    Ok(())
}

/// Replace the target file with the source file.
#[cfg(unix)]
fn replace(source: &Path, target: &Path) -> Result<()> {
    // On POSIX, rename() is atomic and replaces the destination if it exists.
    fs::rename(source, target).map_err(|e| {
        let _ = fs::remove_file(source);
        MergeError::UserError(format!("failed to replace '{}': {}", target.display(), e))
    })?;

    // Sync the parent directory so the rename itself is persisted.
    if let Some(parent) = target.parent()
        && let Ok(dir) = File::open(parent)
    {
        let _ = dir.sync_all();
    }

    Ok(())
}

/// Replace the target file with the source file.
#[cfg(windows)]
fn replace(source: &Path, target: &Path) -> Result<()> {
    // Windows rename() refuses to clobber an existing destination.
    if target.exists() {
        fs::remove_file(target).map_err(|e| {
            let _ = fs::remove_file(source);
            MergeError::UserError(format!("failed to remove '{}': {}", target.display(), e))
        })?;
    }

    fs::rename(source, target).map_err(|e| {
        let _ = fs::remove_file(source);
        MergeError::UserError(format!("failed to replace '{}': {}", target.display(), e))
    })
}
