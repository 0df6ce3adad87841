//! CLI argument parsing for textmerge.
//!
//! Uses clap derive macros for declarative argument definitions. The tool has
//! a single operation, so the arguments are flat rather than subcommands.

use clap::Parser;
use std::path::PathBuf;

/// Textmerge: merge keyed text entry files with patch overrides.
///
/// Base entries are read from `<BASE_DIR>/text/*.json`, patch files from
/// `<PATCH_DIR>/*.json`, and the consolidated mapping is written to
/// `<BASE_DIR>/entries.json`. Patches only replace entries that already
/// exist; they never introduce new keys.
#[derive(Parser, Debug)]
#[command(name = "textmerge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Base directory. Must contain a `text/` subdirectory of entry files
    /// and receives the merged `entries.json` at its root.
    pub base_dir: PathBuf,

    /// Directory of patch files. A file literally named `missing.json` in
    /// this directory is never applied.
    pub patch_dir: PathBuf,

    /// Also compute the entries never addressed by any patch and write them,
    /// paginated, to `<BASE_DIR>/missing/`.
    #[arg(long)]
    pub miss: bool,
}
