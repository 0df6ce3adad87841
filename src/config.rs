//! Configuration for a merge run.
//!
//! An optional `merge.yaml` at the root of the base directory overrides the
//! defaults below. Unknown fields in the YAML are ignored for forward
//! compatibility, every field is optional, and a missing config file means
//! all defaults. The recognized data extension and the reserved patch
//! filename are deliberately not configurable.

use crate::error::{MergeError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Filename of the optional per-run config inside the base directory.
pub const CONFIG_FILENAME: &str = "merge.yaml";

/// Configuration for the merge pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Entries per page when paginating missing entries.
    pub entries_per_page: usize,

    /// Subdirectory of the base directory holding the base entry files.
    pub text_subdir: String,

    /// Filename of the merged output, relative to the base directory.
    pub output_filename: String,

    /// Subdirectory of the base directory for paginated missing entries.
    pub missing_subdir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            entries_per_page: 265,
            text_subdir: "text".to_string(),
            output_filename: "entries.json".to_string(),
            missing_subdir: "missing".to_string(),
        }
    }
}

impl Config {
    /// Load the config for a base directory.
    ///
    /// Falls back to defaults when no config file is present. A config file
    /// that exists but cannot be read or parsed is a fatal error: silently
    /// ignoring it would run the merge with settings the user did not ask for.
    pub fn load_for<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let path = base_dir.as_ref().join(CONFIG_FILENAME);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| {
            MergeError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    ///
    /// Unknown fields are silently ignored for forward compatibility.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| MergeError::ParseError(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate config values and return an error on invalid values.
    pub fn validate(&self) -> Result<()> {
        if self.entries_per_page == 0 {
            return Err(MergeError::UserError(
                "config validation failed: entries_per_page must be greater than 0".to_string(),
            ));
        }

        for (field, value) in [
            ("text_subdir", &self.text_subdir),
            ("output_filename", &self.output_filename),
            ("missing_subdir", &self.missing_subdir),
        ] {
            if value.is_empty() {
                return Err(MergeError::UserError(format!(
                    "config validation failed: {} must be non-empty",
                    field
                )));
            }
        }

        Ok(())
    }
}
