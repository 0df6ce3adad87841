//! The merge engine for textmerge.
//!
//! This module provides:
//! - Base collection loading: fold every base entry file into one mapping
//! - Patch application: replace existing entries per the value-shape policy
//! - Missing-set computation: the base keys no patch ever addressed
//!
//! Two values accumulate over a run, the merged entry map and the set of
//! patched keys. Both are threaded through these functions as locals rather
//! than held in process-wide state.

mod paginate;
mod reduce;


pub use paginate::write_missing_pages;
pub use reduce::reduce_patch_value;

use crate::error::{MergeError, Result};
use crate::scan;
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;

/// Insertion-ordered mapping of entry keys to values.
///
/// `serde_json::Map` is backed by an index map (the `preserve_order` feature),
/// so iteration follows insertion order and re-inserting an existing key
/// replaces the value without moving the key.
pub type EntryMap = serde_json::Map<String, Value>;

/// Patch files with this exact name are never applied, so a previous
/// missing-entry report dropped into the patch directory cannot feed back
/// into the merge.
pub const RESERVED_PATCH_FILE: &str = "missing.json";

/// Outcome of applying a patch directory.
#[derive(Debug, Default)]
pub struct PatchSummary {
    /// Every key that appeared at the top level of a successfully parsed
    /// patch file, whether or not it changed an entry.
    pub patched_keys: HashSet<String>,

    /// Number of patch files applied.
    pub files_applied: usize,

    /// Number of patch files skipped because they could not be read or parsed.
    pub files_skipped: usize,
}

/// Load and combine every base entry file in `text_dir`.
///
/// Files are folded in sorted filename order with last-write-wins on
/// duplicate keys. The base collection is required for correctness, so an
/// unreadable or malformed base file is fatal.
pub fn load_base_collection(text_dir: &Path) -> Result<EntryMap> {
    let mut merged = EntryMap::new();

    for path in scan::json_files(text_dir)? {
        let entries = read_entry_file(&path)?;
        for (key, value) in entries {
            merged.insert(key, value);
        }
    }

    Ok(merged)
}

/// Apply every patch file in `patch_dir` to `entries`.
///
/// Patch keys absent from `entries` are ignored; patches never insert new
/// keys, so the key set of `entries` is unchanged on return. A patch file
/// that cannot be read or parsed is reported on stderr and skipped, and the
/// remaining files are still applied.
pub fn apply_patches(entries: &mut EntryMap, patch_dir: &Path) -> Result<PatchSummary> {
    let mut summary = PatchSummary::default();

    for path in scan::json_files(patch_dir)? {
        if path.file_name().and_then(|n| n.to_str()) == Some(RESERVED_PATCH_FILE) {
            continue;
        }

        let patch = match read_entry_file(&path) {
            Ok(patch) => patch,
            Err(err) => {
                eprintln!("Warning: skipping patch file: {}", err);
                summary.files_skipped += 1;
                continue;
            }
        };

        for (key, value) in patch {
            summary.patched_keys.insert(key.clone());

            if !entries.contains_key(&key) {
                continue;
            }
            if let Some(replacement) = reduce_patch_value(value) {
                entries.insert(key, replacement);
            }
        }

        summary.files_applied += 1;
    }

    Ok(summary)
}

/// Entries whose keys never appeared in any successfully parsed patch file.
///
/// Iteration order of the result follows `entries`, so pagination is stable
/// across runs.
pub fn missing_entries(entries: &EntryMap, patched_keys: &HashSet<String>) -> EntryMap {
    entries
        .iter()
        .filter(|(key, _)| !patched_keys.contains(key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Serialize an entry map as pretty-printed JSON with a trailing newline.
///
/// Non-ASCII characters are written unescaped and the indentation is stable,
/// keeping the output diff-friendly across runs.
pub fn to_pretty_json(entries: &EntryMap) -> Result<String> {
    let mut rendered = serde_json::to_string_pretty(entries)
        .map_err(|e| MergeError::UserError(format!("failed to serialize entries: {}", e)))?;
    rendered.push('\n');
    Ok(rendered)
}

/// Read one file as a JSON object of entries.
fn read_entry_file(path: &Path) -> Result<EntryMap> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        MergeError::UserError(format!("failed to read file '{}': {}", path.display(), e))
    })?;

    let value: Value = serde_json::from_str(&content).map_err(|e| {
        MergeError::ParseError(format!("failed to parse '{}': {}", path.display(), e))
    })?;

    match value {
        Value::Object(entries) => Ok(entries),
        other => Err(MergeError::ParseError(format!(
            "expected a JSON object at the top level of '{}', found {}",
            path.display(),
            json_type_name(&other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
