//! Directory scanning for entry and patch files.

use crate::error::{MergeError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Extension a file must have to be picked up by a directory scan.
pub const DATA_EXTENSION: &str = "json";

/// List the `.json` files directly inside `dir`, sorted by filename.
///
/// Filesystems return directory entries in no particular order; sorting pins
/// which file wins when two files define the same key. Subdirectories and
/// files with other extensions are ignored.
pub fn json_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();

    let entries = fs::read_dir(dir).map_err(|e| {
        MergeError::UserError(format!(
            "failed to read directory '{}': {}",
            dir.display(),
            e
        ))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry
            .map_err(|e| MergeError::UserError(format!("failed to read directory entry: {}", e)))?;

        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some(DATA_EXTENSION) {
            continue;
        }

        files.push(path);
    }

    files.sort();
    Ok(files)
}
