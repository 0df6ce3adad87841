//! Command implementation for textmerge.
//!
//! `run` is the single entry point: it resolves the run layout from the CLI
//! arguments and config, checks the fatal preconditions, executes the merge
//! pipeline, and prints the run summary.

use crate::cli::Cli;
use crate::config::Config;
use crate::error::{MergeError, Result};
use crate::fs;
use crate::merge;

/// Execute a merge run.
///
/// The merged entry map and the patched-key set live here as locals and flow
/// through the merge operations; nothing is kept in process-wide state.
pub fn run(cli: Cli) -> Result<()> {
    let base_dir = &cli.base_dir;
    if !base_dir.is_dir() {
        return Err(MergeError::UserError(format!(
            "base directory '{}' does not exist",
            base_dir.display()
        )));
    }
    if !cli.patch_dir.is_dir() {
        return Err(MergeError::UserError(format!(
            "patch directory '{}' does not exist",
            cli.patch_dir.display()
        )));
    }

    let config = Config::load_for(base_dir)?;

    let text_dir = base_dir.join(&config.text_subdir);
    if !text_dir.is_dir() {
        return Err(MergeError::UserError(format!(
            "base directory '{}' has no '{}' subdirectory",
            base_dir.display(),
            config.text_subdir
        )));
    }

    let mut entries = merge::load_base_collection(&text_dir)?;
    let summary = merge::apply_patches(&mut entries, &cli.patch_dir)?;

    let output_path = base_dir.join(&config.output_filename);
    fs::atomic_write_file(&output_path, &merge::to_pretty_json(&entries)?)?;

    println!(
        "Merged {} entries into '{}' ({} patch files applied)",
        entries.len(),
        output_path.display(),
        summary.files_applied
    );
    if summary.files_skipped > 0 {
        println!(
            "Skipped {} patch file(s) that could not be parsed.",
            summary.files_skipped
        );
    }

    if cli.miss {
        let missing_dir = base_dir.join(&config.missing_subdir);
        std::fs::create_dir_all(&missing_dir).map_err(|e| {
            MergeError::UserError(format!(
                "failed to create missing directory '{}': {}",
                missing_dir.display(),
                e
            ))
        })?;

        let missing = merge::missing_entries(&entries, &summary.patched_keys);
        let pages = merge::write_missing_pages(&missing, &missing_dir, config.entries_per_page)?;
        println!(
            "Saved {} missing entries to {} files.",
            missing.len(),
            pages
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::EntryMap;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn cli_for(base_dir: &Path, patch_dir: &Path, miss: bool) -> Cli {
        Cli {
            base_dir: base_dir.to_path_buf(),
            patch_dir: patch_dir.to_path_buf(),
            miss,
        }
    }

    fn run_fixture() -> (TempDir, PathBuf, TempDir) {
        let base_dir = TempDir::new().unwrap();
        let text_dir = base_dir.path().join("text");
        std::fs::create_dir(&text_dir).unwrap();
        let patch_dir = TempDir::new().unwrap();
        (base_dir, text_dir, patch_dir)
    }

    fn read_map(path: &Path) -> EntryMap {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn run_writes_merged_output() {
        let (base_dir, text_dir, patch_dir) = run_fixture();
        std::fs::write(text_dir.join("a.json"), r#"{"greeting": "hello"}"#).unwrap();
        std::fs::write(patch_dir.path().join("p.json"), r#"{"greeting": "hi"}"#).unwrap();

        run(cli_for(base_dir.path(), patch_dir.path(), false)).unwrap();

        let merged = read_map(&base_dir.path().join("entries.json"));
        assert_eq!(merged["greeting"], serde_json::json!("hi"));
    }

    #[test]
    fn run_without_miss_writes_no_missing_directory() {
        let (base_dir, text_dir, patch_dir) = run_fixture();
        std::fs::write(text_dir.join("a.json"), r#"{"greeting": "hello"}"#).unwrap();

        run(cli_for(base_dir.path(), patch_dir.path(), false)).unwrap();

        assert!(!base_dir.path().join("missing").exists());
    }

    #[test]
    fn run_with_miss_paginates_unaddressed_entries() {
        let (base_dir, text_dir, patch_dir) = run_fixture();
        std::fs::write(
            text_dir.join("a.json"),
            r#"{"one": "1", "two": "2", "three": "3"}"#,
        )
        .unwrap();
        std::fs::write(patch_dir.path().join("p.json"), r#"{"two": "patched"}"#).unwrap();
        // Page size small enough to force a partial second page.
        std::fs::write(
            base_dir.path().join(crate::config::CONFIG_FILENAME),
            "entries_per_page: 1\n",
        )
        .unwrap();

        run(cli_for(base_dir.path(), patch_dir.path(), true)).unwrap();

        let missing_dir = base_dir.path().join("missing");
        let first = read_map(&missing_dir.join("missing_00001.json"));
        let second = read_map(&missing_dir.join("missing_00002.json"));
        assert!(first.contains_key("one"));
        assert!(second.contains_key("three"));
        assert!(!missing_dir.join("missing_00003.json").exists());
    }

    #[test]
    fn run_with_miss_and_no_missing_entries_creates_empty_directory() {
        let (base_dir, text_dir, patch_dir) = run_fixture();
        std::fs::write(text_dir.join("a.json"), r#"{"one": "1"}"#).unwrap();
        std::fs::write(patch_dir.path().join("p.json"), r#"{"one": "patched"}"#).unwrap();

        run(cli_for(base_dir.path(), patch_dir.path(), true)).unwrap();

        let missing_dir = base_dir.path().join("missing");
        assert!(missing_dir.is_dir());
        assert!(!missing_dir.join("missing_00001.json").exists());
    }

    #[test]
    fn run_succeeds_despite_corrupt_patch_file() {
        let (base_dir, text_dir, patch_dir) = run_fixture();
        std::fs::write(text_dir.join("a.json"), r#"{"greeting": "hello"}"#).unwrap();
        std::fs::write(patch_dir.path().join("bad.json"), "{ nope").unwrap();

        let result = run(cli_for(base_dir.path(), patch_dir.path(), false));

        assert!(result.is_ok());
        assert!(base_dir.path().join("entries.json").exists());
    }

    #[test]
    fn run_fails_without_base_directory() {
        let patch_dir = TempDir::new().unwrap();
        let err = run(cli_for(
            Path::new("/nonexistent/base"),
            patch_dir.path(),
            false,
        ))
        .unwrap_err();

        assert_eq!(err.exit_code(), crate::exit_codes::USER_ERROR);
        assert!(err.to_string().contains("base directory"));
    }

    #[test]
    fn run_fails_without_patch_directory() {
        let (base_dir, _text_dir, _patches) = run_fixture();
        let err = run(cli_for(
            base_dir.path(),
            Path::new("/nonexistent/patches"),
            false,
        ))
        .unwrap_err();

        assert!(err.to_string().contains("patch directory"));
    }

    #[test]
    fn run_fails_without_text_subdirectory() {
        let base_dir = TempDir::new().unwrap();
        let patch_dir = TempDir::new().unwrap();

        let err = run(cli_for(base_dir.path(), patch_dir.path(), false)).unwrap_err();
        assert!(err.to_string().contains("'text' subdirectory"));
    }

    #[test]
    fn run_fails_on_malformed_base_file() {
        let (base_dir, text_dir, patch_dir) = run_fixture();
        std::fs::write(text_dir.join("a.json"), "{ nope").unwrap();

        let err = run(cli_for(base_dir.path(), patch_dir.path(), false)).unwrap_err();
        assert_eq!(err.exit_code(), crate::exit_codes::PARSE_FAILURE);
        assert!(!base_dir.path().join("entries.json").exists());
    }
}
